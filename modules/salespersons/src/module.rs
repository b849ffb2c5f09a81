use std::sync::Arc;

use arc_swap::ArcSwapOption;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::guard::AdminKey;
use crate::api::rest::openapi::SalespersonsApiDoc;
use crate::api::rest::routes;
use crate::config::SalespersonsConfig;
use crate::contract::client::SalespersonsApi;
use crate::domain::ports::ExternalAuthPort;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::SalespersonsLocalClient;
use crate::infra::auth::{DisabledIdentityProvider, HttpIdentityClient};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmCrmStore;

/// The salespersons module: owns the domain service and exposes it over REST
/// and as an in-process client.
#[derive(Default)]
pub struct Salespersons {
    service: ArcSwapOption<Service>,
    admin_key: ArcSwapOption<String>,
}

impl Clone for Salespersons {
    fn clone(&self) -> Self {
        Self {
            service: ArcSwapOption::new(self.service.load_full()),
            admin_key: ArcSwapOption::new(self.admin_key.load_full()),
        }
    }
}

impl Salespersons {
    pub const NAME: &'static str = "salespersons";

    /// Build the service with the identity provider chosen from `cfg`.
    pub fn init(&self, db: DatabaseConnection, cfg: SalespersonsConfig) -> anyhow::Result<()> {
        let auth: Arc<dyn ExternalAuthPort> = match &cfg.identity_provider {
            Some(idp) => {
                info!(base_url = %idp.base_url, project = %idp.project_id, "Using HTTP identity provider");
                Arc::new(HttpIdentityClient::new(idp)?)
            }
            None => {
                info!("No identity provider configured; external accounts will not be deleted");
                Arc::new(DisabledIdentityProvider)
            }
        };
        self.init_with_auth(db, cfg, auth)
    }

    /// Same as `init` with an explicit identity provider adapter.
    pub fn init_with_auth(
        &self,
        db: DatabaseConnection,
        cfg: SalespersonsConfig,
        auth: Arc<dyn ExternalAuthPort>,
    ) -> anyhow::Result<()> {
        info!("Initializing salespersons module");
        debug!(
            "Loaded salespersons config: default_page_size={}, max_page_size={}, admin_key={}",
            cfg.default_page_size,
            cfg.max_page_size,
            cfg.admin_api_key.is_some()
        );

        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        };
        let store = Arc::new(SeaOrmCrmStore::new(db));
        self.service
            .store(Some(Arc::new(Service::new(store, auth, service_config))));
        self.admin_key.store(cfg.admin_api_key.map(Arc::new));
        Ok(())
    }

    pub async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running salespersons database migrations");
        Migrator::up(db, None).await?;
        info!("Salespersons database migrations completed successfully");
        Ok(())
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering salespersons REST routes");
        let admin_key = AdminKey::new(self.admin_key.load_full().map(|k| (*k).clone()));
        if !admin_key.is_enabled() {
            info!("Admin key not configured; salespersons routes are unguarded");
        }
        Ok(routes::register_routes(router, self.service()?, admin_key))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn SalespersonsApi>> {
        Ok(Arc::new(SalespersonsLocalClient::new(self.service()?)))
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        SalespersonsApiDoc::openapi()
    }
}
