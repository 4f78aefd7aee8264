use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::storage_locations;
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocationResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<storage_locations::Model> for StorageLocationResponse {
    fn from(location: storage_locations::Model) -> Self {
        Self {
            id: location.id,
            name: location.name,
            description: location.description,
            created_at: location.created_at,
            updated_at: location.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocationRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// GET /api/v1/storage-locations
pub async fn list_storage_locations(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<StorageLocationResponse>>, ApiError> {
    let locations = state.storage_locations.list(&principal).await?;
    Ok(Json(locations.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/storage-locations/{id}
pub async fn get_storage_location(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<StorageLocationResponse>, ApiError> {
    let location = state.storage_locations.get(&principal, id).await?;
    Ok(Json(location.into()))
}

/// POST /api/v1/storage-locations
pub async fn create_storage_location(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<StorageLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = state
        .storage_locations
        .create(&principal, &payload.name, &payload.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(StorageLocationResponse::from(location)),
    ))
}

/// PUT /api/v1/storage-locations/{id}
pub async fn update_storage_location(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(payload): Json<StorageLocationRequest>,
) -> Result<Json<StorageLocationResponse>, ApiError> {
    let location = state
        .storage_locations
        .update(&principal, id, &payload.name, &payload.description)
        .await?;
    Ok(Json(location.into()))
}

/// DELETE /api/v1/storage-locations/{id}
pub async fn delete_storage_location(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.storage_locations.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
