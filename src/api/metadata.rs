use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::entities::metadata;
use crate::services::Principal;

use super::{ApiError, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub id: i64,
    pub global_trade_item_number: String,
    pub food_facts: Option<String>,
    pub product_facts: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<metadata::Model> for MetadataResponse {
    fn from(metadata: metadata::Model) -> Self {
        Self {
            id: metadata.id,
            global_trade_item_number: metadata.global_trade_item_number,
            food_facts: metadata.food_facts,
            product_facts: metadata.product_facts,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
        }
    }
}

/// GET /api/v1/metadatas/{gtin}
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(gtin): Path<String>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let found = state.metadata.get(&principal, &gtin).await?;
    Ok(Json(found.into()))
}
