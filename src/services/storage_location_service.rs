//! Handlers for storage locations, always scoped to the caller's household.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::storage_locations;

use super::{Principal, ServiceError};

#[async_trait]
pub trait StorageLocationService: Send + Sync {
    async fn list(
        &self,
        principal: &Principal,
    ) -> Result<Vec<storage_locations::Model>, ServiceError>;

    async fn get(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<storage_locations::Model, ServiceError>;

    async fn create(
        &self,
        principal: &Principal,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model, ServiceError>;

    async fn update(
        &self,
        principal: &Principal,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model, ServiceError>;

    /// Deleting a location outside the caller's household fails NotFound, it
    /// never silently no-ops.
    async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError>;
}

pub struct SeaOrmStorageLocationService {
    store: Store,
}

impl SeaOrmStorageLocationService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn find_owned(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<storage_locations::Model, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        self.store
            .find_storage_location(id, household_id)
            .await?
            .ok_or(ServiceError::NotFound("Storage location"))
    }
}

#[async_trait]
impl StorageLocationService for SeaOrmStorageLocationService {
    async fn list(
        &self,
        principal: &Principal,
    ) -> Result<Vec<storage_locations::Model>, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        Ok(self.store.list_storage_locations(household_id).await?)
    }

    async fn get(
        &self,
        principal: &Principal,
        id: i64,
    ) -> Result<storage_locations::Model, ServiceError> {
        self.find_owned(principal, id).await
    }

    async fn create(
        &self,
        principal: &Principal,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        Ok(self
            .store
            .insert_storage_location(household_id, name, description)
            .await?)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model, ServiceError> {
        let storage_location = self.find_owned(principal, id).await?;
        Ok(self
            .store
            .update_storage_location(storage_location, name, description)
            .await?)
    }

    async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let storage_location = self.find_owned(principal, id).await?;
        self.store.delete_storage_location(storage_location).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::household_member;

    #[tokio::test]
    async fn create_and_list_are_household_scoped() {
        let (store, principal) = household_member("auth0|john").await;
        let (_, other) = household_member_in(&store, "auth0|jane").await;

        let service = SeaOrmStorageLocationService::new(store);
        service.create(&principal, "Pantry", "Under the stairs").await.unwrap();
        service.create(&other, "Cellar", "").await.unwrap();

        let mine = service.list(&principal).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Pantry");
    }

    #[tokio::test]
    async fn foreign_delete_is_not_found() {
        let (store, principal) = household_member("auth0|john").await;
        let (_, other) = household_member_in(&store, "auth0|jane").await;

        let service = SeaOrmStorageLocationService::new(store);
        let location = service.create(&principal, "Pantry", "").await.unwrap();

        let err = service.delete(&other, location.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // Still there for the owner.
        assert!(service.get(&principal, location.id).await.is_ok());
    }

    #[tokio::test]
    async fn update_changes_name_and_description() {
        let (store, principal) = household_member("auth0|john").await;
        let service = SeaOrmStorageLocationService::new(store);

        let location = service.create(&principal, "Pantry", "old").await.unwrap();
        let updated = service
            .update(&principal, location.id, "Larder", "new")
            .await
            .unwrap();

        assert_eq!(updated.name, "Larder");
        assert_eq!(updated.description, "new");
    }

    /// Second member with their own household in the same store.
    async fn household_member_in(store: &Store, auth_id: &str) -> (Store, Principal) {
        crate::services::test_support::household_member_with_store(store.clone(), auth_id).await
    }
}
