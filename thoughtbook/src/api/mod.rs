//! HTTP surface. Every route lives under `/api`; anything else gets a JSON 404.

mod error;
mod thoughts;
mod users;

pub use error::ApiError;
pub use users::DeletedUserBody;

use std::time::Instant;

use axum::{
    Json, Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{graph::SocialGraph, store::DocumentStore};

pub const NOT_FOUND_MESSAGE: &str = "The resource you seek is not here.";

/// Plain confirmation or error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn build_router<S: DocumentStore>(graph: SocialGraph<S>) -> Router {
    let api = Router::new()
        .route("/users", get(users::list::<S>).post(users::create::<S>))
        .route(
            "/users/:user_id",
            get(users::get::<S>).put(users::update::<S>).delete(users::delete::<S>),
        )
        .route(
            "/users/:user_id/friends/:friend_id",
            post(users::add_friend::<S>).delete(users::delete_friend::<S>),
        )
        .route("/thoughts", get(thoughts::list::<S>).post(thoughts::create::<S>))
        .route(
            "/thoughts/:thought_id",
            get(thoughts::get::<S>)
                .put(thoughts::update::<S>)
                .delete(thoughts::delete::<S>),
        )
        .route("/thoughts/:thought_id/reactions", post(thoughts::add_reaction::<S>))
        .route(
            "/thoughts/:thought_id/reactions/:reaction_id",
            axum::routing::delete(thoughts::delete_reaction::<S>),
        )
        .with_state(graph);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(middleware::from_fn(log_requests))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(Message::new(NOT_FOUND_MESSAGE)))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        "{method} {path} -> {} in {:.1?}",
        response.status().as_u16(),
        started.elapsed()
    );
    response
}
