//! Handlers for pantry articles. Every referenced entity (the article itself
//! and its storage location) must belong to the caller's household.

use async_trait::async_trait;

use crate::db::{ArticleInput, Store};
use crate::entities::articles;

use super::{Principal, ServiceError};

#[async_trait]
pub trait ArticleService: Send + Sync {
    async fn list(&self, principal: &Principal) -> Result<Vec<articles::Model>, ServiceError>;

    async fn get(&self, principal: &Principal, id: i64) -> Result<articles::Model, ServiceError>;

    async fn create(
        &self,
        principal: &Principal,
        input: ArticleInput,
    ) -> Result<articles::Model, ServiceError>;

    async fn update(
        &self,
        principal: &Principal,
        id: i64,
        input: ArticleInput,
    ) -> Result<articles::Model, ServiceError>;

    async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError>;
}

pub struct SeaOrmArticleService {
    store: Store,
}

impl SeaOrmArticleService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The storage location an article points at must live in the same
    /// household, both on create and on update.
    async fn check_storage_location(
        &self,
        household_id: i64,
        storage_location_id: i64,
    ) -> Result<(), ServiceError> {
        self.store
            .find_storage_location(storage_location_id, household_id)
            .await?
            .ok_or(ServiceError::NotFound("Storage location"))?;
        Ok(())
    }
}

#[async_trait]
impl ArticleService for SeaOrmArticleService {
    async fn list(&self, principal: &Principal) -> Result<Vec<articles::Model>, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        Ok(self.store.list_articles(household_id).await?)
    }

    async fn get(&self, principal: &Principal, id: i64) -> Result<articles::Model, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        self.store
            .find_article(id, household_id)
            .await?
            .ok_or(ServiceError::NotFound("Article"))
    }

    async fn create(
        &self,
        principal: &Principal,
        input: ArticleInput,
    ) -> Result<articles::Model, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;
        self.check_storage_location(household_id, input.storage_location_id)
            .await?;

        Ok(self.store.insert_article(household_id, &input).await?)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: i64,
        input: ArticleInput,
    ) -> Result<articles::Model, ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;

        let article = self
            .store
            .find_article(id, household_id)
            .await?
            .ok_or(ServiceError::NotFound("Article"))?;
        self.check_storage_location(household_id, input.storage_location_id)
            .await?;

        Ok(self.store.update_article(article, &input).await?)
    }

    async fn delete(&self, principal: &Principal, id: i64) -> Result<(), ServiceError> {
        let household_id = principal.household_id_or_forbidden()?;

        let article = self
            .store
            .find_article(id, household_id)
            .await?
            .ok_or(ServiceError::NotFound("Article"))?;

        self.store.delete_article(article).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::articles::ContentType;
    use crate::services::test_support::{household_member, household_member_with_store};
    use crate::services::{SeaOrmStorageLocationService, StorageLocationService};

    fn input(storage_location_id: i64, name: &str, quantity: i32) -> ArticleInput {
        ArticleInput {
            storage_location_id,
            global_trade_item_number: None,
            name: name.to_string(),
            best_before_date: "2026-12-31T00:00:00+00:00".to_string(),
            quantity,
            content: None,
            content_type: ContentType::Unknown,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn create_requires_owned_storage_location() {
        let (store, principal) = household_member("auth0|john").await;
        let (_, stranger) = household_member_with_store(store.clone(), "auth0|jane").await;

        let locations = SeaOrmStorageLocationService::new(store.clone());
        let location = locations.create(&principal, "Pantry", "").await.unwrap();

        let service = SeaOrmArticleService::new(store);

        // Stranger's household does not own the location.
        let err = service
            .create(&stranger, input(location.id, "Milk", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let article = service
            .create(&principal, input(location.id, "Milk", 1))
            .await
            .unwrap();
        assert_eq!(article.name, "Milk");
        assert_eq!(article.storage_location_id, location.id);
    }

    #[tokio::test]
    async fn delete_leaves_other_articles_untouched() {
        let (store, principal) = household_member("auth0|john").await;
        let locations = SeaOrmStorageLocationService::new(store.clone());
        let location = locations.create(&principal, "Pantry", "").await.unwrap();

        let service = SeaOrmArticleService::new(store);
        let first = service
            .create(&principal, input(location.id, "Flour", 10))
            .await
            .unwrap();
        let second = service
            .create(&principal, input(location.id, "Sugar", 2))
            .await
            .unwrap();

        service.delete(&principal, first.id).await.unwrap();

        let remaining = service.list(&principal).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
        assert_eq!(remaining[0].quantity, 2);
    }

    #[tokio::test]
    async fn foreign_article_is_invisible() {
        let (store, principal) = household_member("auth0|john").await;
        let (_, stranger) = household_member_with_store(store.clone(), "auth0|jane").await;

        let locations = SeaOrmStorageLocationService::new(store.clone());
        let location = locations.create(&principal, "Pantry", "").await.unwrap();

        let service = SeaOrmArticleService::new(store);
        let article = service
            .create(&principal, input(location.id, "Milk", 1))
            .await
            .unwrap();

        assert!(matches!(
            service.get(&stranger, article.id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            service.delete(&stranger, article.id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            service
                .update(&stranger, article.id, input(location.id, "Stolen", 1))
                .await
                .unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn update_moves_article_between_locations() {
        let (store, principal) = household_member("auth0|john").await;
        let locations = SeaOrmStorageLocationService::new(store.clone());
        let pantry = locations.create(&principal, "Pantry", "").await.unwrap();
        let cellar = locations.create(&principal, "Cellar", "").await.unwrap();

        let service = SeaOrmArticleService::new(store);
        let article = service
            .create(&principal, input(pantry.id, "Wine", 6))
            .await
            .unwrap();

        let updated = service
            .update(&principal, article.id, input(cellar.id, "Wine", 5))
            .await
            .unwrap();

        assert_eq!(updated.storage_location_id, cellar.id);
        assert_eq!(updated.quantity, 5);
    }
}
