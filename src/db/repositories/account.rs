use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};

use crate::entities::accounts;

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_oauth_id(&self, oauth_id: &str) -> Result<Option<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::OauthId.eq(oauth_id))
            .one(&self.conn)
            .await
            .context("Failed to query account by oauth id")
    }

    pub async fn find_by_friends_code(
        &self,
        friends_code: &str,
    ) -> Result<Option<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::FriendsCode.eq(friends_code))
            .one(&self.conn)
            .await
            .context("Failed to query account by friends code")
    }

    pub async fn insert(
        &self,
        oauth_id: &str,
        first_name: &str,
        last_name: &str,
        friends_code: &str,
    ) -> Result<accounts::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            oauth_id: Set(oauth_id.to_string()),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            friends_code: Set(friends_code.to_string()),
            household_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert account")
    }

    pub async fn update_names(
        &self,
        account: accounts::Model,
        first_name: &str,
        last_name: &str,
    ) -> Result<accounts::Model> {
        let mut active: accounts::ActiveModel = account.into();
        active.first_name = Set(first_name.to_string());
        active.last_name = Set(last_name.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active.update(&self.conn).await.context("Failed to update account")
    }

    pub async fn set_household(
        &self,
        account: accounts::Model,
        household_id: Option<i64>,
    ) -> Result<accounts::Model> {
        let mut active: accounts::ActiveModel = account.into();
        active.household_id = Set(household_id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update account household")
    }

    pub async fn delete(&self, account: accounts::Model) -> Result<()> {
        account
            .delete(&self.conn)
            .await
            .context("Failed to delete account")?;
        Ok(())
    }
}
