use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::devices::{self, DevicePlatformType};

pub struct DeviceRepository {
    conn: DatabaseConnection,
}

impl DeviceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_account(&self, account_id: i64) -> Result<Vec<devices::Model>> {
        devices::Entity::find()
            .filter(devices::Column::AccountId.eq(account_id))
            .order_by_asc(devices::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list devices")
    }

    /// Installation ids are globally unique; the account scoping happens in
    /// the service layer so that a foreign device is indistinguishable from a
    /// missing one.
    pub async fn find_by_installation_id(
        &self,
        installation_id: &str,
    ) -> Result<Option<devices::Model>> {
        devices::Entity::find()
            .filter(devices::Column::InstallationId.eq(installation_id))
            .one(&self.conn)
            .await
            .context("Failed to query device by installation id")
    }

    pub async fn insert(
        &self,
        account_id: i64,
        installation_id: &str,
        name: &str,
        model: &str,
        platform: DevicePlatformType,
        device_token: Option<String>,
    ) -> Result<devices::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = devices::ActiveModel {
            account_id: Set(account_id),
            installation_id: Set(installation_id.to_string()),
            name: Set(name.to_string()),
            model: Set(model.to_string()),
            platform: Set(platform),
            device_token: Set(device_token),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert device")
    }

    pub async fn update(
        &self,
        device: devices::Model,
        name: &str,
        device_token: Option<String>,
    ) -> Result<devices::Model> {
        let mut active: devices::ActiveModel = device.into();
        active.name = Set(name.to_string());
        active.device_token = Set(device_token);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update device")
    }

    pub async fn delete(&self, device: devices::Model) -> Result<()> {
        device
            .delete(&self.conn)
            .await
            .context("Failed to delete device")?;
        Ok(())
    }
}
