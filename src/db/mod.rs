use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{
    accounts, articles, devices, households, invitations, metadata, storage_locations,
};

pub mod migrator;
pub mod repositories;

pub use repositories::article::ArticleInput;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn household_repo(&self) -> repositories::household::HouseholdRepository {
        repositories::household::HouseholdRepository::new(self.conn.clone())
    }

    fn storage_location_repo(&self) -> repositories::storage_location::StorageLocationRepository {
        repositories::storage_location::StorageLocationRepository::new(self.conn.clone())
    }

    fn article_repo(&self) -> repositories::article::ArticleRepository {
        repositories::article::ArticleRepository::new(self.conn.clone())
    }

    fn device_repo(&self) -> repositories::device::DeviceRepository {
        repositories::device::DeviceRepository::new(self.conn.clone())
    }

    fn invitation_repo(&self) -> repositories::invitation::InvitationRepository {
        repositories::invitation::InvitationRepository::new(self.conn.clone())
    }

    fn metadata_repo(&self) -> repositories::metadata::MetadataRepository {
        repositories::metadata::MetadataRepository::new(self.conn.clone())
    }

    // Accounts

    pub async fn find_account_by_oauth_id(&self, oauth_id: &str) -> Result<Option<accounts::Model>> {
        self.account_repo().find_by_oauth_id(oauth_id).await
    }

    pub async fn find_account_by_friends_code(
        &self,
        friends_code: &str,
    ) -> Result<Option<accounts::Model>> {
        self.account_repo().find_by_friends_code(friends_code).await
    }

    pub async fn insert_account(
        &self,
        oauth_id: &str,
        first_name: &str,
        last_name: &str,
        friends_code: &str,
    ) -> Result<accounts::Model> {
        self.account_repo()
            .insert(oauth_id, first_name, last_name, friends_code)
            .await
    }

    pub async fn update_account_names(
        &self,
        account: accounts::Model,
        first_name: &str,
        last_name: &str,
    ) -> Result<accounts::Model> {
        self.account_repo()
            .update_names(account, first_name, last_name)
            .await
    }

    pub async fn set_account_household(
        &self,
        account: accounts::Model,
        household_id: Option<i64>,
    ) -> Result<accounts::Model> {
        self.account_repo().set_household(account, household_id).await
    }

    pub async fn delete_account(&self, account: accounts::Model) -> Result<()> {
        self.account_repo().delete(account).await
    }

    // Households

    pub async fn find_household(&self, id: i64) -> Result<Option<households::Model>> {
        self.household_repo().find_by_id(id).await
    }

    pub async fn insert_household(
        &self,
        name: &str,
        subscription_type: households::SubscriptionType,
    ) -> Result<households::Model> {
        self.household_repo().insert(name, subscription_type).await
    }

    // Storage locations

    pub async fn list_storage_locations(
        &self,
        household_id: i64,
    ) -> Result<Vec<storage_locations::Model>> {
        self.storage_location_repo()
            .list_for_household(household_id)
            .await
    }

    pub async fn find_storage_location(
        &self,
        id: i64,
        household_id: i64,
    ) -> Result<Option<storage_locations::Model>> {
        self.storage_location_repo()
            .find_for_household(id, household_id)
            .await
    }

    pub async fn insert_storage_location(
        &self,
        household_id: i64,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model> {
        self.storage_location_repo()
            .insert(household_id, name, description)
            .await
    }

    pub async fn update_storage_location(
        &self,
        storage_location: storage_locations::Model,
        name: &str,
        description: &str,
    ) -> Result<storage_locations::Model> {
        self.storage_location_repo()
            .update(storage_location, name, description)
            .await
    }

    pub async fn delete_storage_location(
        &self,
        storage_location: storage_locations::Model,
    ) -> Result<()> {
        self.storage_location_repo().delete(storage_location).await
    }

    // Articles

    pub async fn list_articles(&self, household_id: i64) -> Result<Vec<articles::Model>> {
        self.article_repo().list_for_household(household_id).await
    }

    pub async fn find_article(
        &self,
        id: i64,
        household_id: i64,
    ) -> Result<Option<articles::Model>> {
        self.article_repo().find_for_household(id, household_id).await
    }

    pub async fn insert_article(
        &self,
        household_id: i64,
        input: &ArticleInput,
    ) -> Result<articles::Model> {
        self.article_repo().insert(household_id, input).await
    }

    pub async fn update_article(
        &self,
        article: articles::Model,
        input: &ArticleInput,
    ) -> Result<articles::Model> {
        self.article_repo().update(article, input).await
    }

    pub async fn delete_article(&self, article: articles::Model) -> Result<()> {
        self.article_repo().delete(article).await
    }

    // Devices

    pub async fn list_devices(&self, account_id: i64) -> Result<Vec<devices::Model>> {
        self.device_repo().list_for_account(account_id).await
    }

    pub async fn find_device_by_installation_id(
        &self,
        installation_id: &str,
    ) -> Result<Option<devices::Model>> {
        self.device_repo()
            .find_by_installation_id(installation_id)
            .await
    }

    pub async fn insert_device(
        &self,
        account_id: i64,
        installation_id: &str,
        name: &str,
        model: &str,
        platform: devices::DevicePlatformType,
        device_token: Option<String>,
    ) -> Result<devices::Model> {
        self.device_repo()
            .insert(account_id, installation_id, name, model, platform, device_token)
            .await
    }

    pub async fn update_device(
        &self,
        device: devices::Model,
        name: &str,
        device_token: Option<String>,
    ) -> Result<devices::Model> {
        self.device_repo().update(device, name, device_token).await
    }

    pub async fn delete_device(&self, device: devices::Model) -> Result<()> {
        self.device_repo().delete(device).await
    }

    // Invitations

    pub async fn list_invitations(
        &self,
        account_id: i64,
        friends_code: &str,
    ) -> Result<Vec<invitations::Model>> {
        self.invitation_repo()
            .list_for_account(account_id, friends_code)
            .await
    }

    pub async fn find_invitation_by_friends_code(
        &self,
        friends_code: &str,
    ) -> Result<Option<invitations::Model>> {
        self.invitation_repo()
            .find_by_friends_code(friends_code)
            .await
    }

    pub async fn find_duplicate_invitation(
        &self,
        household_id: i64,
        friends_code: &str,
    ) -> Result<Option<invitations::Model>> {
        self.invitation_repo()
            .find_duplicate(household_id, friends_code)
            .await
    }

    pub async fn insert_invitation(
        &self,
        creator_account_id: i64,
        household_id: i64,
        friends_code: &str,
        valid_until_date: &str,
    ) -> Result<invitations::Model> {
        self.invitation_repo()
            .insert(creator_account_id, household_id, friends_code, valid_until_date)
            .await
    }

    pub async fn delete_invitation(&self, invitation: invitations::Model) -> Result<()> {
        self.invitation_repo().delete(invitation).await
    }

    pub async fn consume_invitation_into_household(
        &self,
        invitation: invitations::Model,
        account: accounts::Model,
    ) -> Result<()> {
        self.invitation_repo()
            .consume_into_household(invitation, account)
            .await
    }

    // Metadata

    pub async fn find_metadata_by_gtin(&self, gtin: &str) -> Result<Option<metadata::Model>> {
        self.metadata_repo().find_by_gtin(gtin).await
    }

    pub async fn insert_metadata(
        &self,
        gtin: &str,
        food_facts: Option<String>,
        product_facts: Option<String>,
    ) -> Result<metadata::Model> {
        self.metadata_repo()
            .insert(gtin, food_facts, product_facts)
            .await
    }
}
