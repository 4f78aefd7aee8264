use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::accounts;
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub friends_code: String,
    pub household_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            friends_code: account.friends_code,
            household_id: account.household_id,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

/// GET /api/v1/accounts/me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get(&principal).await?;
    Ok(Json(account.into()))
}

/// PUT /api/v1/accounts/me
///
/// Upsert: first call creates the account, later calls update the names.
pub async fn put_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<PutAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .create_or_update(&principal, &payload.first_name, &payload.last_name)
        .await?;
    Ok(Json(account.into()))
}

/// DELETE /api/v1/accounts/me
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.delete(&principal).await?;
    Ok(StatusCode::NO_CONTENT)
}
