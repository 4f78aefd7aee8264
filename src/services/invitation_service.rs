//! Handlers for the invitation lifecycle: a household member invites another
//! account by friends-code, the invitee accepts or declines.
//!
//! An invitation is valid for [`INVITATION_VALID_DAYS`] days from creation.
//! Accepting an expired invitation removes it and fails; declining ignores
//! expiry entirely, a stale invitation can always be cleared.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration};
use tracing::info;

use crate::clock::Clock;
use crate::db::Store;
use crate::entities::{accounts, invitations};

use super::{Principal, ServiceError};

pub const INVITATION_VALID_DAYS: i64 = 10;

#[async_trait]
pub trait InvitationService: Send + Sync {
    /// All invitations the caller can see: ones they created and ones
    /// addressed to their friends-code.
    async fn list(&self, principal: &Principal) -> Result<Vec<invitations::Model>, ServiceError>;

    /// Invites the account behind `friends_code` into the caller's household.
    async fn create(
        &self,
        principal: &Principal,
        friends_code: &str,
    ) -> Result<invitations::Model, ServiceError>;

    /// Accepts the invitation addressed to the caller and joins the household.
    async fn accept(&self, principal: &Principal, friends_code: &str) -> Result<(), ServiceError>;

    /// Declines the invitation addressed to the caller.
    async fn decline(&self, principal: &Principal, friends_code: &str)
        -> Result<(), ServiceError>;
}

pub struct SeaOrmInvitationService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl SeaOrmInvitationService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn caller_account(
        &self,
        principal: &Principal,
    ) -> Result<accounts::Model, ServiceError> {
        let auth_id = principal.auth_id_or_forbidden()?;
        self.store
            .find_account_by_oauth_id(auth_id)
            .await?
            .ok_or(ServiceError::NotFound("Account"))
    }

    fn is_expired(&self, invitation: &invitations::Model) -> Result<bool, ServiceError> {
        let valid_until = DateTime::parse_from_rfc3339(&invitation.valid_until_date)
            .map_err(|err| {
                ServiceError::Internal(format!("Unparseable invitation deadline: {err}"))
            })?;
        Ok(valid_until < self.clock.now())
    }
}

#[async_trait]
impl InvitationService for SeaOrmInvitationService {
    async fn list(&self, principal: &Principal) -> Result<Vec<invitations::Model>, ServiceError> {
        let account = self.caller_account(principal).await?;
        Ok(self
            .store
            .list_invitations(account.id, &account.friends_code)
            .await?)
    }

    async fn create(
        &self,
        principal: &Principal,
        friends_code: &str,
    ) -> Result<invitations::Model, ServiceError> {
        let account = self.caller_account(principal).await?;
        let household_id = account
            .household_id
            .ok_or_else(|| ServiceError::forbidden("Caller has no household"))?;

        if friends_code == account.friends_code {
            return Err(ServiceError::forbidden("Cannot invite yourself"));
        }

        self.store
            .find_account_by_friends_code(friends_code)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        if self
            .store
            .find_duplicate_invitation(household_id, friends_code)
            .await?
            .is_some()
        {
            return Err(ServiceError::bad_request(
                "An invitation for this account already exists",
            ));
        }

        let valid_until = self.clock.now() + Duration::days(INVITATION_VALID_DAYS);
        let invitation = self
            .store
            .insert_invitation(
                account.id,
                household_id,
                friends_code,
                &valid_until.to_rfc3339(),
            )
            .await?;

        info!(household_id, "Invitation created");
        Ok(invitation)
    }

    async fn accept(&self, principal: &Principal, friends_code: &str) -> Result<(), ServiceError> {
        let account = self.caller_account(principal).await?;

        if friends_code != account.friends_code {
            return Err(ServiceError::forbidden(
                "Invitation is addressed to someone else",
            ));
        }
        if account.household_id.is_some() {
            return Err(ServiceError::forbidden(
                "Account already belongs to a household",
            ));
        }

        let invitation = self
            .store
            .find_invitation_by_friends_code(friends_code)
            .await?
            .ok_or(ServiceError::NotFound("Invitation"))?;

        if self.is_expired(&invitation)? {
            // A dead invitation is useless to everyone, drop it right away.
            self.store.delete_invitation(invitation).await?;
            return Err(ServiceError::bad_request("Invitation has expired"));
        }

        let household_id = invitation.household_id;
        self.store
            .consume_invitation_into_household(invitation, account)
            .await?;

        info!(household_id, "Invitation accepted");
        Ok(())
    }

    async fn decline(
        &self,
        principal: &Principal,
        friends_code: &str,
    ) -> Result<(), ServiceError> {
        let account = self.caller_account(principal).await?;

        if friends_code != account.friends_code {
            return Err(ServiceError::forbidden(
                "Invitation is addressed to someone else",
            ));
        }

        let invitation = self
            .store
            .find_invitation_by_friends_code(friends_code)
            .await?
            .ok_or(ServiceError::NotFound("Invitation"))?;

        self.store.delete_invitation(invitation).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::services::test_support::{account_only, household_member};
    use chrono::{TimeZone, Utc};

    struct Fixture {
        store: Store,
        clock: Arc<FixedClock>,
        service: SeaOrmInvitationService,
        inviter: Principal,
        invitee: Principal,
        invitee_code: String,
    }

    async fn fixture() -> Fixture {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(t0));

        let (store, inviter) = household_member("auth0|inviter").await;
        let (invitee_account, invitee) = account_only(&store, "auth0|invitee").await;

        let service =
            SeaOrmInvitationService::new(store.clone(), clock.clone() as Arc<dyn Clock>);
        Fixture {
            store,
            clock,
            service,
            inviter,
            invitee,
            invitee_code: invitee_account.friends_code,
        }
    }

    fn days(n: i64) -> Duration {
        Duration::days(n)
    }

    #[tokio::test]
    async fn create_and_accept_joins_the_household() {
        let f = fixture().await;

        let invitation = f
            .service
            .create(&f.inviter, &f.invitee_code)
            .await
            .unwrap();
        assert_eq!(invitation.friends_code, f.invitee_code);

        // Within the validity window.
        f.clock.set(f.clock.now() + days(INVITATION_VALID_DAYS - 1));
        f.service.accept(&f.invitee, &f.invitee_code).await.unwrap();

        let account = f
            .store
            .find_account_by_oauth_id("auth0|invitee")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.household_id, Some(invitation.household_id));

        // Consumed; the invitee now has a household, so accepting again is
        // rejected before the invitation lookup.
        let err = f
            .service
            .accept(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn expired_accept_fails_and_removes_the_invitation() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        f.clock
            .set(f.clock.now() + days(INVITATION_VALID_DAYS) + Duration::seconds(1));

        let err = f
            .service
            .accept(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        // The expired invitation was dropped, not left behind.
        let err = f
            .service
            .accept(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn decline_ignores_expiry() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        f.clock.set(f.clock.now() + days(INVITATION_VALID_DAYS + 5));

        f.service
            .decline(&f.invitee, &f.invitee_code)
            .await
            .unwrap();

        let err = f
            .service
            .decline(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn accept_for_someone_else_is_forbidden() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        let (_, bystander) = account_only(&f.store, "auth0|bystander").await;
        let err = f
            .service
            .accept(&bystander, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = f
            .service
            .decline(&bystander, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn accept_with_household_is_forbidden() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        // The invitee founds their own household first.
        use crate::services::{HouseholdService, SeaOrmHouseholdService};
        SeaOrmHouseholdService::new(f.store.clone())
            .create(
                &f.invitee,
                "Own place",
                crate::entities::households::SubscriptionType::Free,
            )
            .await
            .unwrap();

        let err = f
            .service
            .accept(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn self_invitation_is_forbidden() {
        let f = fixture().await;
        let inviter_account = f
            .store
            .find_account_by_oauth_id("auth0|inviter")
            .await
            .unwrap()
            .unwrap();

        let err = f
            .service
            .create(&f.inviter, &inviter_account.friends_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn duplicate_invitation_is_a_bad_request() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        let err = f
            .service
            .create(&f.inviter, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_invitee_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create(&f.inviter, "no-such-code")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_without_household_is_forbidden() {
        let f = fixture().await;
        let err = f
            .service
            .create(&f.invitee, &f.invitee_code)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn list_shows_created_and_received() {
        let f = fixture().await;
        f.service.create(&f.inviter, &f.invitee_code).await.unwrap();

        let created = f.service.list(&f.inviter).await.unwrap();
        assert_eq!(created.len(), 1);

        let received = f.service.list(&f.invitee).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].id, created[0].id);

        let (_, bystander) = account_only(&f.store, "auth0|bystander").await;
        assert!(f.service.list(&bystander).await.unwrap().is_empty());
    }
}
