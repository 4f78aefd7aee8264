use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::sync::Arc;

use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,

    /// Space-separated scopes, OAuth style.
    #[serde(default)]
    scope: Option<String>,

    #[allow(dead_code)]
    exp: usize,
}

/// Resolves the caller to a [`Principal`] and stores it in the request
/// extensions. Two paths in:
///
/// 1. `Authorization: Bearer <jwt>`, HS256-signed with the configured secret.
/// 2. `x-user-id` / `x-scopes` headers, only when the backdoor is enabled
///    (never in the production environment, config validation rejects that).
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (auth_id, scopes) = identify(&state, &headers)?;

    let required_scope = &state.config.auth.required_scope;
    if !required_scope.is_empty() && !scopes.iter().any(|s| s == required_scope) {
        return Err(ApiError::Forbidden("Missing required scope".to_string()));
    }

    // The account may not exist yet; the first PUT /accounts/me creates it.
    let account = state
        .store
        .find_account_by_oauth_id(&auth_id)
        .await
        .map_err(|e| ApiError::InternalError(format!("Account lookup failed: {e}")))?;

    let principal = Principal {
        account_id: account.as_ref().map(|a| a.id),
        household_id: account.and_then(|a| a.household_id),
        auth_id: Some(auth_id),
        scopes,
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn identify(state: &AppState, headers: &HeaderMap) -> Result<(String, Vec<String>), ApiError> {
    if state.config.auth.backdoor_enabled
        && let Some(user_id) = headers.get("x-user-id").and_then(|v| v.to_str().ok())
    {
        let scopes = headers
            .get("x-scopes")
            .and_then(|v| v.to_str().ok())
            .map(split_scopes)
            .unwrap_or_default();
        return Ok((user_id.to_string(), scopes));
    }

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let auth = &state.config.auth;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&auth.jwt_issuer]);
    validation.set_audience(&[&auth.jwt_audience]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| ApiError::unauthorized(format!("Invalid token: {e}")))?;

    let scopes = token_data
        .claims
        .scope
        .as_deref()
        .map(split_scopes)
        .unwrap_or_default();
    Ok((token_data.claims.sub, scopes))
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
