//! GTIN metadata lookups. Cached rows are served as-is; on a miss the handler
//! optionally asks Open Food Facts and caches whatever comes back.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::FoodFactsGateway;
use crate::db::Store;
use crate::entities::metadata;

use super::{Principal, ServiceError};

#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn get(
        &self,
        principal: &Principal,
        gtin: &str,
    ) -> Result<metadata::Model, ServiceError>;
}

pub struct SeaOrmMetadataService {
    store: Store,
    gateway: Option<Arc<dyn FoodFactsGateway>>,
}

impl SeaOrmMetadataService {
    #[must_use]
    pub fn new(store: Store, gateway: Option<Arc<dyn FoodFactsGateway>>) -> Self {
        Self { store, gateway }
    }
}

#[async_trait]
impl MetadataService for SeaOrmMetadataService {
    async fn get(
        &self,
        principal: &Principal,
        gtin: &str,
    ) -> Result<metadata::Model, ServiceError> {
        principal.auth_id_or_forbidden()?;

        if let Some(cached) = self.store.find_metadata_by_gtin(gtin).await? {
            return Ok(cached);
        }

        let Some(gateway) = &self.gateway else {
            return Err(ServiceError::NotFound("Metadata"));
        };

        let food_facts = gateway.fetch(gtin).await.map_err(|err| {
            warn!(gtin, error = %err, "Metadata enrichment failed");
            ServiceError::Internal("Metadata lookup failed".to_string())
        })?;

        match food_facts {
            Some(facts) => {
                debug!(gtin, "Caching enriched metadata");
                Ok(self.store.insert_metadata(gtin, Some(facts), None).await?)
            }
            None => Err(ServiceError::NotFound("Metadata")),
        }
    }
}
