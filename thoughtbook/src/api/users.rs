use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use super::ApiError;
use crate::{
    graph::SocialGraph,
    model::{
        NewUser, UserPatch,
        view::{PopulatedUser, UserView},
    },
    store::DocumentStore,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUserBody {
    pub message: String,
    pub thoughts_deleted: u64,
    pub friend_links_removed: u64,
}

fn view(user: PopulatedUser) -> Json<UserView> {
    Json(UserView::from(&user))
}

pub async fn list<S: DocumentStore>(State(graph): State<SocialGraph<S>>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = graph.list_users().await?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

pub async fn create<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(new_user) = payload?;
    let user = graph.create_user(new_user).await?;
    Ok((StatusCode::CREATED, view(user)))
}

pub async fn get<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    Ok(view(graph.get_user(&user_id).await?))
}

pub async fn update<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(user_id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Json(patch) = payload?;
    Ok(view(graph.update_user(&user_id, patch).await?))
}

pub async fn delete<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<DeletedUserBody>, ApiError> {
    let deleted = graph.delete_user(&user_id).await?;
    Ok(Json(DeletedUserBody {
        message: format!(
            "User (ID: {}) deleted along with {} thought(s).",
            deleted.user.id, deleted.thoughts_deleted
        ),
        thoughts_deleted: deleted.thoughts_deleted,
        friend_links_removed: deleted.friend_links_removed,
    }))
}

pub async fn add_friend<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> Result<Json<UserView>, ApiError> {
    Ok(view(graph.add_friend(&user_id, &friend_id).await?))
}

pub async fn delete_friend<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> Result<Json<UserView>, ApiError> {
    Ok(view(graph.delete_friend(&user_id, &friend_id).await?))
}
