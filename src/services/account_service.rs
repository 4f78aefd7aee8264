//! Command and query handlers for the caller's account.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::db::Store;
use crate::entities::accounts;

use super::{Principal, ServiceError};

/// One handler per account operation, always scoped to the caller's external
/// identity.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Returns the caller's account.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Forbidden`] without an identity claim,
    /// [`ServiceError::NotFound`] when no account exists yet.
    async fn get(&self, principal: &Principal) -> Result<accounts::Model, ServiceError>;

    /// Creates the account on first call, updates the name fields on
    /// subsequent calls. The friends-code is minted once and never changes.
    async fn create_or_update(
        &self,
        principal: &Principal,
        first_name: &str,
        last_name: &str,
    ) -> Result<accounts::Model, ServiceError>;

    /// Deletes the caller's account. Owned devices and created invitations go
    /// with it (FK cascade).
    async fn delete(&self, principal: &Principal) -> Result<(), ServiceError>;
}

pub struct SeaOrmAccountService {
    store: Store,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn get(&self, principal: &Principal) -> Result<accounts::Model, ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;

        self.store
            .find_account_by_oauth_id(auth_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))
    }

    async fn create_or_update(
        &self,
        principal: &Principal,
        first_name: &str,
        last_name: &str,
    ) -> Result<accounts::Model, ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;

        let account = match self.store.find_account_by_oauth_id(auth_id).await? {
            Some(existing) => {
                self.store
                    .update_account_names(existing, first_name, last_name)
                    .await?
            }
            None => {
                let friends_code = Uuid::new_v4().to_string();
                debug!(auth_id, "Creating account on first authenticated request");
                self.store
                    .insert_account(auth_id, first_name, last_name, &friends_code)
                    .await?
            }
        };

        Ok(account)
    }

    async fn delete(&self, principal: &Principal) -> Result<(), ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;

        let account = self
            .store
            .find_account_by_oauth_id(auth_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        self.store.delete_account(account).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn creates_account_with_fresh_friends_code() {
        let service = SeaOrmAccountService::new(test_store().await);
        let principal = Principal::for_auth_id("auth0|1234567890");

        let account = service
            .create_or_update(&principal, "Jane", "Doe")
            .await
            .unwrap();

        assert_eq!(account.first_name, "Jane");
        assert_eq!(account.last_name, "Doe");
        assert_eq!(account.oauth_id, "auth0|1234567890");
        assert!(Uuid::parse_str(&account.friends_code).is_ok());
        assert!(account.household_id.is_none());
    }

    #[tokio::test]
    async fn second_call_updates_names_and_keeps_friends_code() {
        let service = SeaOrmAccountService::new(test_store().await);
        let principal = Principal::for_auth_id("auth0|1234567890");

        let first = service
            .create_or_update(&principal, "Jane", "Doe")
            .await
            .unwrap();
        let second = service
            .create_or_update(&principal, "John", "Smith")
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.first_name, "John");
        assert_eq!(second.last_name, "Smith");
        assert_eq!(second.friends_code, first.friends_code);
    }

    #[tokio::test]
    async fn missing_identity_is_forbidden() {
        let service = SeaOrmAccountService::new(test_store().await);

        let err = service
            .create_or_update(&Principal::anonymous(), "John", "Doe")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_without_account_is_not_found() {
        let service = SeaOrmAccountService::new(test_store().await);
        let principal = Principal::for_auth_id("auth0|1234567890");

        let err = service.delete(&principal).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_account() {
        let service = SeaOrmAccountService::new(test_store().await);
        let principal = Principal::for_auth_id("auth0|1234567890");

        service
            .create_or_update(&principal, "Jane", "Doe")
            .await
            .unwrap();
        service.delete(&principal).await.unwrap();

        let err = service.get(&principal).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
