//! Handlers for the caller's registered devices.
//!
//! Devices are keyed by the app-installation id the client generates, so
//! re-registering after a reinstall updates the existing row instead of
//! piling up duplicates.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::entities::devices::{self, DevicePlatformType};

use super::{Principal, ServiceError};

pub struct DeviceInput {
    pub installation_id: String,
    pub name: String,
    pub model: String,
    pub platform: DevicePlatformType,
    pub device_token: Option<String>,
}

#[async_trait]
pub trait DeviceService: Send + Sync {
    async fn list(&self, principal: &Principal) -> Result<Vec<devices::Model>, ServiceError>;

    async fn get(
        &self,
        principal: &Principal,
        installation_id: &str,
    ) -> Result<devices::Model, ServiceError>;

    /// Registers a device, or refreshes name and push token when the
    /// installation id is already known for this account. An installation id
    /// registered under another account fails NotFound.
    async fn create_or_update(
        &self,
        principal: &Principal,
        input: DeviceInput,
    ) -> Result<devices::Model, ServiceError>;

    async fn delete(
        &self,
        principal: &Principal,
        installation_id: &str,
    ) -> Result<(), ServiceError>;
}

pub struct SeaOrmDeviceService {
    store: Store,
}

impl SeaOrmDeviceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn find_owned(
        &self,
        account_id: i64,
        installation_id: &str,
    ) -> Result<devices::Model, ServiceError> {
        self.store
            .find_device_by_installation_id(installation_id)
            .await?
            .filter(|device| device.account_id == account_id)
            .ok_or(ServiceError::NotFound("Device"))
    }
}

#[async_trait]
impl DeviceService for SeaOrmDeviceService {
    async fn list(&self, principal: &Principal) -> Result<Vec<devices::Model>, ServiceError> {
        let account_id = principal.account_id_or_forbidden()?;
        Ok(self.store.list_devices(account_id).await?)
    }

    async fn get(
        &self,
        principal: &Principal,
        installation_id: &str,
    ) -> Result<devices::Model, ServiceError> {
        let account_id = principal.account_id_or_forbidden()?;
        self.find_owned(account_id, installation_id).await
    }

    async fn create_or_update(
        &self,
        principal: &Principal,
        input: DeviceInput,
    ) -> Result<devices::Model, ServiceError> {
        let account_id = principal.account_id_or_forbidden()?;

        match self
            .store
            .find_device_by_installation_id(&input.installation_id)
            .await?
        {
            Some(device) if device.account_id == account_id => {
                debug!(installation_id = %input.installation_id, "Refreshing known device");
                Ok(self
                    .store
                    .update_device(device, &input.name, input.device_token)
                    .await?)
            }
            // The installation id belongs to someone else. Treated the same
            // as unknown, never leaked.
            Some(_) => Err(ServiceError::NotFound("Device")),
            None => Ok(self
                .store
                .insert_device(
                    account_id,
                    &input.installation_id,
                    &input.name,
                    &input.model,
                    input.platform,
                    input.device_token,
                )
                .await?),
        }
    }

    async fn delete(
        &self,
        principal: &Principal,
        installation_id: &str,
    ) -> Result<(), ServiceError> {
        let account_id = principal.account_id_or_forbidden()?;
        let device = self.find_owned(account_id, installation_id).await?;
        self.store.delete_device(device).await?;
        Ok(())
    }
}
