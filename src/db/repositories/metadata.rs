use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::metadata;

pub struct MetadataRepository {
    conn: DatabaseConnection,
}

impl MetadataRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_gtin(&self, gtin: &str) -> Result<Option<metadata::Model>> {
        metadata::Entity::find()
            .filter(metadata::Column::GlobalTradeItemNumber.eq(gtin))
            .one(&self.conn)
            .await
            .context("Failed to query metadata by GTIN")
    }

    pub async fn insert(
        &self,
        gtin: &str,
        food_facts: Option<String>,
        product_facts: Option<String>,
    ) -> Result<metadata::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = metadata::ActiveModel {
            global_trade_item_number: Set(gtin.to_string()),
            food_facts: Set(food_facts),
            product_facts: Set(product_facts),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert metadata")
    }
}
