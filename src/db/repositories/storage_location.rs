use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::storage_locations;

pub struct StorageLocationRepository {
    conn: DatabaseConnection,
}

impl StorageLocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_household(
        &self,
        household_id: i64,
    ) -> Result<Vec<storage_locations::Model>> {
        storage_locations::Entity::find()
            .filter(storage_locations::Column::HouseholdId.eq(household_id))
            .order_by_asc(storage_locations::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list storage locations")
    }

    /// Returns the storage location only when it belongs to the household.
    pub async fn find_for_household(
        &self,
        id: i64,
        household_id: i64,
    ) -> Result<Option<storage_locations::Model>> {
        storage_locations::Entity::find()
            .filter(storage_locations::Column::Id.eq(id))
            .filter(storage_locations::Column::HouseholdId.eq(household_id))
            .one(&self.conn)
            .await
            .context("Failed to query storage location")
    }

    pub async fn insert(
        &self,
        household_id: i64,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = storage_locations::ActiveModel {
            household_id: Set(household_id),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert storage location")
    }

    pub async fn update(
        &self,
        storage_location: storage_locations::Model,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model> {
        let mut active: storage_locations::ActiveModel = storage_location.into();
        active.name = Set(name.to_string());
        active.description = Set(description.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update storage location")
    }

    pub async fn delete(&self, storage_location: storage_locations::Model) -> Result<()> {
        storage_location
            .delete(&self.conn)
            .await
            .context("Failed to delete storage location")?;
        Ok(())
    }
}
