//! `/api/models`, `/api/models/{id}`. Never echoes `api_key`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use wayfarer_config::{ModelConfig, Provider};

use crate::app::AppState;
use crate::routes::ApiError;

#[derive(Serialize)]
pub struct ModelSummary {
    model_id: String,
    name: String,
    provider: Provider,
    model: String,
}

impl From<&ModelConfig> for ModelSummary {
    fn from(cfg: &ModelConfig) -> Self {
        Self { model_id: cfg.model_id.clone(), name: cfg.name.clone(), provider: cfg.provider, model: cfg.model.clone() }
    }
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ModelSummary>> {
    Json(state.models.list().into_iter().map(ModelSummary::from).collect())
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(model_id): Path<String>,
) -> Result<Json<ModelSummary>, (StatusCode, Json<ApiError>)> {
    state
        .models
        .get(&model_id)
        .map(|cfg| Json(ModelSummary::from(cfg)))
        .ok_or_else(|| (StatusCode::NOT_FOUND, ApiError::new(format!("unknown model_id: {model_id}"))))
}
