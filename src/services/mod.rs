//! Command and query handlers. Each aggregate gets a trait describing its
//! operations plus a `SeaOrm*` implementation on top of the [`Store`]; the
//! API layer only ever sees the traits.
//!
//! [`Store`]: crate::db::Store

pub mod account_service;
pub mod article_service;
pub mod device_service;
pub mod error;
pub mod household_service;
pub mod invitation_service;
pub mod metadata_service;
pub mod principal;
pub mod storage_location_service;

pub use account_service::{AccountService, SeaOrmAccountService};
pub use article_service::{ArticleService, SeaOrmArticleService};
pub use device_service::{DeviceInput, DeviceService, SeaOrmDeviceService};
pub use error::ServiceError;
pub use household_service::{HouseholdService, SeaOrmHouseholdService};
pub use invitation_service::{INVITATION_VALID_DAYS, InvitationService, SeaOrmInvitationService};
pub use metadata_service::{MetadataService, SeaOrmMetadataService};
pub use principal::Principal;
pub use storage_location_service::{SeaOrmStorageLocationService, StorageLocationService};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::Store;
    use crate::entities::{accounts, households::SubscriptionType};

    use super::{
        AccountService, HouseholdService, Principal, SeaOrmAccountService, SeaOrmHouseholdService,
    };

    /// Fresh in-memory store with one account that founded its own household.
    pub async fn household_member(auth_id: &str) -> (Store, Principal) {
        let store = Store::new("sqlite::memory:")
            .await
            .expect("in-memory store");
        household_member_with_store(store, auth_id).await
    }

    /// Adds another household-founding member to an existing store.
    pub async fn household_member_with_store(store: Store, auth_id: &str) -> (Store, Principal) {
        let principal = Principal::for_auth_id(auth_id);
        let account = SeaOrmAccountService::new(store.clone())
            .create_or_update(&principal, "Test", "User")
            .await
            .expect("account");
        let household = SeaOrmHouseholdService::new(store.clone())
            .create(&principal, "Test household", SubscriptionType::Free)
            .await
            .expect("household");

        let principal = Principal {
            auth_id: Some(auth_id.to_string()),
            account_id: Some(account.id),
            household_id: Some(household.id),
            scopes: Vec::new(),
        };
        (store, principal)
    }

    /// Account without a household, for invitation scenarios.
    pub async fn account_only(store: &Store, auth_id: &str) -> (accounts::Model, Principal) {
        let principal = Principal::for_auth_id(auth_id);
        let account = SeaOrmAccountService::new(store.clone())
            .create_or_update(&principal, "Test", "User")
            .await
            .expect("account");

        let principal = Principal {
            auth_id: Some(auth_id.to_string()),
            account_id: Some(account.id),
            household_id: None,
            scopes: Vec::new(),
        };
        (account, principal)
    }
}
