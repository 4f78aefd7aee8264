use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::households::{self, SubscriptionType};
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdResponse {
    pub id: i64,
    pub name: String,
    pub subscription_type: SubscriptionType,
    pub created_at: String,
    pub updated_at: String,
}

impl From<households::Model> for HouseholdResponse {
    fn from(household: households::Model) -> Self {
        Self {
            id: household.id,
            name: household.name,
            subscription_type: household.subscription_type,
            created_at: household.created_at,
            updated_at: household.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHouseholdRequest {
    pub name: String,
    pub subscription_type: SubscriptionType,
}

/// GET /api/v1/households/my
pub async fn get_my_household(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<HouseholdResponse>, ApiError> {
    let household = state.households.get(&principal).await?;
    Ok(Json(household.into()))
}

/// POST /api/v1/households
pub async fn create_household(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateHouseholdRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let household = state
        .households
        .create(&principal, &payload.name, payload.subscription_type)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(HouseholdResponse::from(household)),
    ))
}
