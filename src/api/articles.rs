use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::ArticleInput;
use crate::entities::articles::{self, ContentType};
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: i64,
    pub storage_location_id: i64,
    pub global_trade_item_number: Option<String>,
    pub name: String,
    pub best_before_date: String,
    pub quantity: i32,
    pub content: Option<String>,
    pub content_type: ContentType,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<articles::Model> for ArticleResponse {
    fn from(article: articles::Model) -> Self {
        Self {
            id: article.id,
            storage_location_id: article.storage_location_id,
            global_trade_item_number: article.global_trade_item_number,
            name: article.name,
            best_before_date: article.best_before_date,
            quantity: article.quantity,
            content: article.content,
            content_type: article.content_type,
            image_url: article.image_url,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    pub storage_location_id: i64,
    #[serde(default)]
    pub global_trade_item_number: Option<String>,
    pub name: String,
    pub best_before_date: String,
    pub quantity: i32,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub image_url: Option<String>,
}

const fn default_content_type() -> ContentType {
    ContentType::Unknown
}

impl ArticleRequest {
    /// Best-before dates travel as RFC 3339 and are stored verbatim, so a
    /// malformed one is rejected at the edge.
    fn into_input(self) -> Result<ArticleInput, ApiError> {
        DateTime::parse_from_rfc3339(&self.best_before_date).map_err(|_| {
            ApiError::bad_request("bestBeforeDate must be an RFC 3339 timestamp")
        })?;

        Ok(ArticleInput {
            storage_location_id: self.storage_location_id,
            global_trade_item_number: self.global_trade_item_number,
            name: self.name,
            best_before_date: self.best_before_date,
            quantity: self.quantity,
            content: self.content,
            content_type: self.content_type,
            image_url: self.image_url,
        })
    }
}

/// GET /api/v1/articles
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let articles = state.articles.list(&principal).await?;
    Ok(Json(articles.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/articles/{id}
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state.articles.get(&principal, id).await?;
    Ok(Json(article.into()))
}

/// POST /api/v1/articles
pub async fn create_article(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ArticleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .articles
        .create(&principal, payload.into_input()?)
        .await?;
    Ok((StatusCode::CREATED, Json(ArticleResponse::from(article))))
}

/// PUT /api/v1/articles/{id}
pub async fn update_article(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(payload): Json<ArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state
        .articles
        .update(&principal, id, payload.into_input()?)
        .await?;
    Ok(Json(article.into()))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.articles.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
