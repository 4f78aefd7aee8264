use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::devices::{self, DevicePlatformType};
use crate::services::{DeviceInput, Principal};

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: i64,
    pub installation_id: String,
    pub name: String,
    pub model: String,
    pub platform: DevicePlatformType,
    pub device_token: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<devices::Model> for DeviceResponse {
    fn from(device: devices::Model) -> Self {
        Self {
            id: device.id,
            installation_id: device.installation_id,
            name: device.name,
            model: device.model,
            platform: device.platform,
            device_token: device.device_token,
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    pub installation_id: String,
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_platform")]
    pub platform: DevicePlatformType,
    #[serde(default)]
    pub device_token: Option<String>,
}

const fn default_platform() -> DevicePlatformType {
    DevicePlatformType::Unknown
}

/// GET /api/v1/devices
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    let devices = state.devices.list(&principal).await?;
    Ok(Json(devices.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/devices/{installation_id}
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(installation_id): Path<String>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let device = state.devices.get(&principal, &installation_id).await?;
    Ok(Json(device.into()))
}

/// POST /api/v1/devices
///
/// Registers the device, or refreshes it when the installation id is already
/// known for this account.
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<DeviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let device = state
        .devices
        .create_or_update(
            &principal,
            DeviceInput {
                installation_id: payload.installation_id,
                name: payload.name,
                model: payload.model,
                platform: payload.platform,
                device_token: payload.device_token,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(DeviceResponse::from(device))))
}

/// DELETE /api/v1/devices/{installation_id}
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(installation_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.devices.delete(&principal, &installation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
