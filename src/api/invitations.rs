use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::invitations;
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: i64,
    pub household_id: i64,
    pub friends_code: String,
    pub valid_until_date: String,
    pub created_at: String,
}

impl From<invitations::Model> for InvitationResponse {
    fn from(invitation: invitations::Model) -> Self {
        Self {
            id: invitation.id,
            household_id: invitation.household_id,
            friends_code: invitation.friends_code,
            valid_until_date: invitation.valid_until_date,
            created_at: invitation.created_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    /// Friends-code of the account being invited.
    pub friends_code: String,
}

/// GET /api/v1/invitations
pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<InvitationResponse>>, ApiError> {
    let invitations = state.invitations.list(&principal).await?;
    Ok(Json(invitations.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/invitations
pub async fn create_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation = state
        .invitations
        .create(&principal, &payload.friends_code)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse::from(invitation)),
    ))
}

/// PUT /api/v1/invitations/{friends_code}/accept
pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(friends_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.invitations.accept(&principal, &friends_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/invitations/{friends_code}/decline
pub async fn decline_invitation(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(friends_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.invitations.decline(&principal, &friends_code).await?;
    Ok(StatusCode::NO_CONTENT)
}
