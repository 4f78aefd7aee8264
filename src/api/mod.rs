use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::clients::{FoodFactsGateway, OpenFoodFactsClient};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, ArticleService, DeviceService, HouseholdService, InvitationService,
    MetadataService, SeaOrmAccountService, SeaOrmArticleService, SeaOrmDeviceService,
    SeaOrmHouseholdService, SeaOrmInvitationService, SeaOrmMetadataService, StorageLocationService,
    SeaOrmStorageLocationService,
};

mod accounts;
mod articles;
pub mod auth;
mod devices;
mod error;
mod households;
mod invitations;
mod metadata;
mod observability;
mod storage_locations;
mod system;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub config: Arc<Config>,

    pub clock: Arc<dyn Clock>,

    pub accounts: Arc<dyn AccountService>,

    pub households: Arc<dyn HouseholdService>,

    pub storage_locations: Arc<dyn StorageLocationService>,

    pub articles: Arc<dyn ArticleService>,

    pub devices: Arc<dyn DeviceService>,

    pub invitations: Arc<dyn InvitationService>,

    pub metadata: Arc<dyn MetadataService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    create_app_state_with_clock(config, Arc::new(SystemClock), prometheus_handle).await
}

/// Same as [`create_app_state_from_config`] but with an injected time source,
/// so tests can pin "now" when exercising invitation expiry.
pub async fn create_app_state_with_clock(
    config: Config,
    clock: Arc<dyn Clock>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let gateway: Option<Arc<dyn FoodFactsGateway>> = if config.metadata.enrichment_enabled {
        Some(Arc::new(OpenFoodFactsClient::new(&config.metadata)?))
    } else {
        None
    };

    Ok(Arc::new(AppState {
        accounts: Arc::new(SeaOrmAccountService::new(store.clone())),
        households: Arc::new(SeaOrmHouseholdService::new(store.clone())),
        storage_locations: Arc::new(SeaOrmStorageLocationService::new(store.clone())),
        articles: Arc::new(SeaOrmArticleService::new(store.clone())),
        devices: Arc::new(SeaOrmDeviceService::new(store.clone())),
        invitations: Arc::new(SeaOrmInvitationService::new(store.clone(), clock.clone())),
        metadata: Arc::new(SeaOrmMetadataService::new(store.clone(), gateway)),
        store,
        config: Arc::new(config),
        clock,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", create_protected_router(state.clone()))
        .route("/health/live", get(system::live))
        .route("/health/ready", get(system::ready))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/accounts/me",
            get(accounts::get_me)
                .put(accounts::put_me)
                .delete(accounts::delete_me),
        )
        .route("/households", post(households::create_household))
        .route("/households/my", get(households::get_my_household))
        .route(
            "/storage-locations",
            get(storage_locations::list_storage_locations)
                .post(storage_locations::create_storage_location),
        )
        .route(
            "/storage-locations/{id}",
            get(storage_locations::get_storage_location)
                .put(storage_locations::update_storage_location)
                .delete(storage_locations::delete_storage_location),
        )
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/devices/{installation_id}",
            get(devices::get_device).delete(devices::delete_device),
        )
        .route(
            "/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/invitations/{friends_code}/accept",
            put(invitations::accept_invitation),
        )
        .route(
            "/invitations/{friends_code}/decline",
            put(invitations::decline_invitation),
        )
        .route("/metadatas/{gtin}", get(metadata::get_metadata))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
