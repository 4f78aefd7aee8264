//! Command and query handlers for the caller's household.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::entities::households::{self, SubscriptionType};

use super::{Principal, ServiceError};

#[async_trait]
pub trait HouseholdService: Send + Sync {
    /// Returns the caller's household.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] when the account has not joined one.
    async fn get(&self, principal: &Principal) -> Result<households::Model, ServiceError>;

    /// Creates a household and attaches the caller's account to it.
    ///
    /// # Errors
    ///
    /// [`ServiceError::BadRequest`] when the account already has a household.
    async fn create(
        &self,
        principal: &Principal,
        name: &str,
        subscription_type: SubscriptionType,
    ) -> Result<households::Model, ServiceError>;
}

pub struct SeaOrmHouseholdService {
    store: Store,
}

impl SeaOrmHouseholdService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HouseholdService for SeaOrmHouseholdService {
    async fn get(&self, principal: &Principal) -> Result<households::Model, ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;

        let account = self
            .store
            .find_account_by_oauth_id(auth_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        let household_id = account
            .household_id
            .ok_or(ServiceError::NotFound("Household"))?;

        self.store
            .find_household(household_id)
            .await?
            .ok_or(ServiceError::NotFound("Household"))
    }

    async fn create(
        &self,
        principal: &Principal,
        name: &str,
        subscription_type: SubscriptionType,
    ) -> Result<households::Model, ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;

        let account = self
            .store
            .find_account_by_oauth_id(auth_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        if account.household_id.is_some() {
            return Err(ServiceError::bad_request(
                "Account already belongs to a household",
            ));
        }

        let household = self.store.insert_household(name, subscription_type).await?;
        self.store
            .set_account_household(account, Some(household.id))
            .await?;

        info!(household_id = household.id, "Household created");
        Ok(household)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AccountService, SeaOrmAccountService};

    const AUTH_ID: &str = "auth0|1234567890";

    async fn setup() -> (SeaOrmHouseholdService, Principal) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let principal = Principal::for_auth_id(AUTH_ID);
        SeaOrmAccountService::new(store.clone())
            .create_or_update(&principal, "John", "Doe")
            .await
            .unwrap();
        (SeaOrmHouseholdService::new(store), principal)
    }

    #[tokio::test]
    async fn creates_household_and_attaches_account() {
        let (service, principal) = setup().await;

        let household = service
            .create(&principal, "Test", SubscriptionType::Free)
            .await
            .unwrap();

        assert_eq!(household.name, "Test");
        assert_eq!(household.subscription_type, SubscriptionType::Free);

        let fetched = service.get(&principal).await.unwrap();
        assert_eq!(fetched.id, household.id);
    }

    #[tokio::test]
    async fn second_household_is_a_bad_request() {
        let (service, principal) = setup().await;

        service
            .create(&principal, "Test", SubscriptionType::Free)
            .await
            .unwrap();
        let err = service
            .create(&principal, "Test", SubscriptionType::Free)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn get_without_household_is_not_found() {
        let (service, principal) = setup().await;
        let err = service.get(&principal).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_identity_is_forbidden() {
        let (service, _) = setup().await;
        let err = service
            .create(&Principal::anonymous(), "Test", SubscriptionType::Free)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
