use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::error;

use super::{
    error::{AppError, AppResult},
    store::TodoStore,
};
use crate::core::{NewTodo, Todo, TodoId, TodoPatch};

pub type AppState = Arc<TodoStore>;

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_todos(State(store): State<AppState>) -> Json<Vec<Todo>> {
    Json(store.list().await)
}

pub async fn get_todo(
    State(store): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Todo>> {
    let todo = store
        .get(parse_id(id)?)
        .await
        .ok_or_else(|| AppError::not_found("todo not found"))?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(store): State<AppState>,
    Json(payload): Json<NewTodo>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    if payload.text.trim().is_empty() {
        return Err(AppError::validation("text must not be blank"));
    }

    let Some(todo) = store.create(payload).await else {
        error!("todo id space exhausted");
        return Err(AppError::internal());
    };
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn patch_todo(
    State(store): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<TodoPatch>,
) -> AppResult<Json<Todo>> {
    if let Some(text) = payload.text.as_deref()
        && text.trim().is_empty()
    {
        return Err(AppError::validation("text must not be blank"));
    }

    let todo = store
        .patch(parse_id(id)?, payload)
        .await
        .ok_or_else(|| AppError::not_found("todo not found"))?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(store): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    store
        .delete(parse_id(id)?)
        .await
        .ok_or_else(|| AppError::not_found("todo not found"))?;
    Ok(Json(json!({})))
}

fn parse_id(raw: u64) -> AppResult<TodoId> {
    TodoId::server(raw).ok_or_else(|| AppError::not_found("todo not found"))
}
