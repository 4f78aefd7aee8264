use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{accounts, invitations};

pub struct InvitationRepository {
    conn: DatabaseConnection,
}

impl InvitationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Invitations the account is involved in, either as the creator or as
    /// the invitee (by friends-code).
    pub async fn list_for_account(
        &self,
        account_id: i64,
        friends_code: &str,
    ) -> Result<Vec<invitations::Model>> {
        invitations::Entity::find()
            .filter(
                Condition::any()
                    .add(invitations::Column::CreatorAccountId.eq(account_id))
                    .add(invitations::Column::FriendsCode.eq(friends_code)),
            )
            .order_by_asc(invitations::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list invitations")
    }

    pub async fn find_by_friends_code(
        &self,
        friends_code: &str,
    ) -> Result<Option<invitations::Model>> {
        invitations::Entity::find()
            .filter(invitations::Column::FriendsCode.eq(friends_code))
            .one(&self.conn)
            .await
            .context("Failed to query invitation by friends code")
    }

    /// An unconsumed invitation for the same (household, invitee) pair.
    pub async fn find_duplicate(
        &self,
        household_id: i64,
        friends_code: &str,
    ) -> Result<Option<invitations::Model>> {
        invitations::Entity::find()
            .filter(invitations::Column::HouseholdId.eq(household_id))
            .filter(invitations::Column::FriendsCode.eq(friends_code))
            .one(&self.conn)
            .await
            .context("Failed to query duplicate invitation")
    }

    pub async fn insert(
        &self,
        creator_account_id: i64,
        household_id: i64,
        friends_code: &str,
        valid_until_date: &str,
    ) -> Result<invitations::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = invitations::ActiveModel {
            creator_account_id: Set(creator_account_id),
            household_id: Set(household_id),
            friends_code: Set(friends_code.to_string()),
            valid_until_date: Set(valid_until_date.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert invitation")
    }

    pub async fn delete(&self, invitation: invitations::Model) -> Result<()> {
        invitation
            .delete(&self.conn)
            .await
            .context("Failed to delete invitation")?;
        Ok(())
    }

    /// Consumes the invitation and moves the account into its household, as
    /// one transaction.
    pub async fn consume_into_household(
        &self,
        invitation: invitations::Model,
        account: accounts::Model,
    ) -> Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin accept transaction")?;

        let household_id = invitation.household_id;

        invitation
            .delete(&txn)
            .await
            .context("Failed to delete accepted invitation")?;

        let mut active: accounts::ActiveModel = account.into();
        active.household_id = Set(Some(household_id));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&txn)
            .await
            .context("Failed to attach account to household")?;

        txn.commit()
            .await
            .context("Failed to commit accept transaction")?;

        Ok(())
    }
}
