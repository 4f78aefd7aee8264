use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::articles::{self, ContentType};

/// Field values shared by article create and update.
#[derive(Debug, Clone)]
pub struct ArticleInput {
    pub storage_location_id: i64,
    pub global_trade_item_number: Option<String>,
    pub name: String,
    pub best_before_date: String,
    pub quantity: i32,
    pub content: Option<String>,
    pub content_type: ContentType,
    pub image_url: Option<String>,
}

pub struct ArticleRepository {
    conn: DatabaseConnection,
}

impl ArticleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_household(&self, household_id: i64) -> Result<Vec<articles::Model>> {
        articles::Entity::find()
            .filter(articles::Column::HouseholdId.eq(household_id))
            .order_by_asc(articles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list articles")
    }

    /// Returns the article only when it belongs to the household.
    pub async fn find_for_household(
        &self,
        id: i64,
        household_id: i64,
    ) -> Result<Option<articles::Model>> {
        articles::Entity::find()
            .filter(articles::Column::Id.eq(id))
            .filter(articles::Column::HouseholdId.eq(household_id))
            .one(&self.conn)
            .await
            .context("Failed to query article")
    }

    pub async fn insert(&self, household_id: i64, input: &ArticleInput) -> Result<articles::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = articles::ActiveModel {
            household_id: Set(household_id),
            storage_location_id: Set(input.storage_location_id),
            global_trade_item_number: Set(input.global_trade_item_number.clone()),
            name: Set(input.name.clone()),
            best_before_date: Set(input.best_before_date.clone()),
            quantity: Set(input.quantity),
            content: Set(input.content.clone()),
            content_type: Set(input.content_type),
            image_url: Set(input.image_url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert article")
    }

    pub async fn update(
        &self,
        article: articles::Model,
        input: &ArticleInput,
    ) -> Result<articles::Model> {
        let mut active: articles::ActiveModel = article.into();
        active.storage_location_id = Set(input.storage_location_id);
        active.global_trade_item_number = Set(input.global_trade_item_number.clone());
        active.name = Set(input.name.clone());
        active.best_before_date = Set(input.best_before_date.clone());
        active.quantity = Set(input.quantity);
        active.content = Set(input.content.clone());
        active.content_type = Set(input.content_type);
        active.image_url = Set(input.image_url.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update article")
    }

    pub async fn delete(&self, article: articles::Model) -> Result<()> {
        article
            .delete(&self.conn)
            .await
            .context("Failed to delete article")?;
        Ok(())
    }
}
