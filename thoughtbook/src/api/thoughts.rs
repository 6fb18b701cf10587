use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::{ApiError, Message};
use crate::{
    graph::SocialGraph,
    model::{NewReaction, NewThought, Thought, ThoughtPatch, view::ThoughtView},
    store::DocumentStore,
};

fn view(thought: Thought) -> Json<ThoughtView> {
    Json(ThoughtView::from(&thought))
}

pub async fn list<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
) -> Result<Json<Vec<ThoughtView>>, ApiError> {
    let thoughts = graph.list_thoughts().await?;
    Ok(Json(thoughts.iter().map(ThoughtView::from).collect()))
}

pub async fn create<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    payload: Result<Json<NewThought>, JsonRejection>,
) -> Result<(StatusCode, Json<ThoughtView>), ApiError> {
    let Json(new_thought) = payload?;
    let thought = graph.create_thought(new_thought).await?;
    Ok((StatusCode::CREATED, view(thought)))
}

pub async fn get<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(thought_id): Path<String>,
) -> Result<Json<ThoughtView>, ApiError> {
    Ok(view(graph.get_thought(&thought_id).await?))
}

pub async fn update<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(thought_id): Path<String>,
    payload: Result<Json<ThoughtPatch>, JsonRejection>,
) -> Result<Json<ThoughtView>, ApiError> {
    let Json(patch) = payload?;
    Ok(view(graph.update_thought(&thought_id, patch).await?))
}

pub async fn delete<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(thought_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let thought = graph.delete_thought(&thought_id).await?;
    Ok(Json(Message::new(format!("Thought (ID: {}) deleted.", thought.id))))
}

pub async fn add_reaction<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path(thought_id): Path<String>,
    payload: Result<Json<NewReaction>, JsonRejection>,
) -> Result<Json<ThoughtView>, ApiError> {
    let Json(reaction) = payload?;
    Ok(view(graph.add_reaction(&thought_id, reaction).await?))
}

pub async fn delete_reaction<S: DocumentStore>(
    State(graph): State<SocialGraph<S>>,
    Path((thought_id, reaction_id)): Path<(String, String)>,
) -> Result<Json<ThoughtView>, ApiError> {
    Ok(view(graph.delete_reaction(&thought_id, &reaction_id).await?))
}
