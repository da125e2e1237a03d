use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_core::Resource;
use tracing::info;

use crate::error::AppError;
use crate::state::HasCollection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub message: String,
}

pub async fn health_check() -> ResponseJson<HealthCheckResponse> {
    info!("Health check endpoint called");

    ResponseJson(HealthCheckResponse {
        status: "healthy".to_string(),
        message: "Storefront API is running".to_string(),
    })
}

pub async fn list_documents<R, S>(State(state): State<S>) -> ResponseJson<Vec<R>>
where
    R: Resource,
    S: HasCollection<R>,
{
    let records = state.collection().list().await;
    info!("Listing {} {}", records.len(), R::COLLECTION);
    ResponseJson(records)
}

pub async fn get_document<R, S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<ResponseJson<R>, AppError>
where
    R: Resource,
    S: HasCollection<R>,
{
    info!("Getting {} with id: {}", R::COLLECTION, id);
    Ok(ResponseJson(state.collection().get(&id).await?))
}

pub async fn create_document<R, S>(
    State(state): State<S>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<R>), AppError>
where
    R: Resource,
    S: HasCollection<R>,
{
    let Json(record) = payload?;
    info!("Creating {} with id: {}", R::COLLECTION, record.id());
    let created = state.collection().insert(record).await?;
    Ok((StatusCode::CREATED, ResponseJson(created)))
}

pub async fn update_document<R, S>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<ResponseJson<R>, AppError>
where
    R: Resource,
    S: HasCollection<R>,
{
    let Json(patch) = payload?;
    let keys: Vec<&String> = patch.keys().collect();
    info!("Updating {} {} fields {:?}", R::COLLECTION, id, keys);
    let updated = state.collection().merge(&id, patch).await?;
    Ok(ResponseJson(updated))
}

pub async fn delete_document<R, S>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    R: Resource,
    S: HasCollection<R>,
{
    info!("Deleting {} with id: {}", R::COLLECTION, id);
    state.collection().remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
