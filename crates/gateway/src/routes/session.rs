//! Session CRUD: `/api/session/new`, `/api/sessions`, `/api/session/{id}`,
//! `/api/session/{id}/name`, `/api/session/{id}/model`, `/api/clear/{id}`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::{Session, SessionError};

use crate::app::AppState;
use crate::routes::ApiError;

#[derive(Serialize)]
pub struct SessionBody {
    id: Uuid,
    name: String,
    model_id: String,
    message_count: usize,
}

impl From<Session> for SessionBody {
    fn from(s: Session) -> Self {
        Self { id: s.id, name: s.name, model_id: s.model_id, message_count: s.message_count() }
    }
}

fn not_found(err: SessionError) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, ApiError::new(err.to_string()))
}

fn parse_id(raw: &str) -> Result<Uuid, (StatusCode, Json<ApiError>)> {
    Uuid::parse_str(raw).map_err(|_| (StatusCode::BAD_REQUEST, ApiError::new(format!("invalid session id: {raw}"))))
}

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub name: Option<String>,
    pub model_id: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Json<SessionBody> {
    let id = state.sessions.create(req.name, req.model_id);
    let session = state.sessions.get(id).await.expect("just created");
    Json(session.into())
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_empty: bool,
}

pub async fn list(State(state): State<Arc<AppState>>, Query(q): Query<ListQuery>) -> Json<Vec<SessionBody>> {
    let sessions = state.sessions.list(q.include_empty).await;
    Json(sessions.into_iter().map(SessionBody::from).collect())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let id = parse_id(&id)?;
    if state.sessions.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, ApiError::new(format!("session not found: {id}"))))
    }
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

pub async fn rename(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<SessionBody>, (StatusCode, Json<ApiError>)> {
    let id = parse_id(&id)?;
    state.sessions.rename(id, req.name).await.map_err(not_found)?;
    let session = state.sessions.get(id).await.ok_or(SessionError::NotFound(id)).map_err(not_found)?;
    Ok(Json(session.into()))
}

#[derive(Deserialize)]
pub struct SetModelRequest {
    pub model_id: String,
}

pub async fn set_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SetModelRequest>,
) -> Result<Json<SessionBody>, (StatusCode, Json<ApiError>)> {
    let id = parse_id(&id)?;
    if state.models.get(&req.model_id).is_none() {
        return Err((StatusCode::BAD_REQUEST, ApiError::new(format!("unknown model_id: {}", req.model_id))));
    }
    state.sessions.set_model(id, req.model_id).await.map_err(not_found)?;
    let session = state.sessions.get(id).await.ok_or(SessionError::NotFound(id)).map_err(not_found)?;
    Ok(Json(session.into()))
}

pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    let id = parse_id(&id)?;
    let session = state.sessions.get(id).await.ok_or(SessionError::NotFound(id)).map_err(not_found)?;
    Ok(Json(serde_json::json!({ "model_id": session.model_id })))
}

pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let id = parse_id(&id)?;
    state.sessions.clear_messages(id).await.map_err(not_found)?;
    Ok(StatusCode::NO_CONTENT)
}
