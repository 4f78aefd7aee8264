use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::households::{self, SubscriptionType};

pub struct HouseholdRepository {
    conn: DatabaseConnection,
}

impl HouseholdRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<households::Model>> {
        households::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query household by id")
    }

    pub async fn insert(
        &self,
        name: &str,
        subscription_type: SubscriptionType,
    ) -> Result<households::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = households::ActiveModel {
            name: Set(name.to_string()),
            subscription_type: Set(subscription_type),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert household")
    }
}
