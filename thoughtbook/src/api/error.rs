use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;

use crate::errors::{GraphError, ValidationIssue};

/// Failure of one request, rendered as `{"message": ...}` with a status per kind.
#[derive(Debug)]
pub enum ApiError {
    Graph(GraphError),
    /// The body was not the JSON the endpoint expects.
    MalformedBody(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<ValidationIssue>>,
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        ApiError::Graph(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Graph(GraphError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Graph(GraphError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Graph(GraphError::Conflict { .. }) => StatusCode::CONFLICT,
            ApiError::Graph(GraphError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::MalformedBody(message) => ErrorBody { message, issues: None },
            ApiError::Graph(GraphError::Validation(validation)) => ErrorBody {
                message: validation.summary(),
                issues: Some(validation.issues),
            },
            ApiError::Graph(GraphError::NotFound { entity, key }) => ErrorBody {
                message: format!("No {entity} found ({key})"),
                issues: None,
            },
            ApiError::Graph(GraphError::Conflict { message }) => ErrorBody { message, issues: None },
            ApiError::Graph(GraphError::Store(err)) => {
                error!("store failure: {err}");
                ErrorBody {
                    message: "The request could not be completed.".to_string(),
                    issues: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
