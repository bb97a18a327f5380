//! SpiceTrack client core
//!
//! Library backing a small-business spice inventory app: product catalog,
//! supplier directory, purchase recording with stock tracking, account
//! management and dashboard reporting. State lives in the
//! [`InventoryService`] container and persists through an
//! [`store::InventoryBackend`], either the local JSON store or the remote
//! Postgres gateway. The two are mutually exclusive per [`App`] instance.

pub mod config;
pub mod error;
pub mod gateway;
pub mod sample;
pub mod services;
pub mod store;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{AuthService, InventoryService, ReportingService};

use gateway::RemoteGateway;
use store::local::LocalStore;
use store::InventoryBackend;

/// Install the global tracing subscriber
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spicetrack_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Composition root wiring the services to a persistence backend
pub struct App {
    pub config: Config,
    pub inventory: Arc<InventoryService>,
    pub auth: Arc<AuthService>,
    pub reporting: ReportingService,
}

impl App {
    /// Open the app against the local JSON store
    pub async fn open(config: Config) -> AppResult<Self> {
        let store = Arc::new(LocalStore::open(&config.storage.data_dir)?);
        let backend: Arc<dyn InventoryBackend> = store.clone();
        Self::assemble(config, store, backend).await
    }

    /// Open the app against a remote Postgres gateway
    ///
    /// Sessions and accounts stay in the local store; only the inventory
    /// collections go through the gateway.
    pub async fn connect(config: Config) -> AppResult<Self> {
        let url = config.remote.database_url.clone().ok_or_else(|| {
            AppError::Configuration("remote mode requires a database URL".to_string())
        })?;
        let pool = PgPoolOptions::new()
            .max_connections(config.remote.max_connections)
            .connect(&url)
            .await?;
        tracing::info!(max_connections = config.remote.max_connections, "connected to remote gateway");

        let store = Arc::new(LocalStore::open(&config.storage.data_dir)?);
        let backend: Arc<dyn InventoryBackend> = Arc::new(RemoteGateway::new(pool));
        Self::assemble(config, store, backend).await
    }

    async fn assemble(
        config: Config,
        store: Arc<LocalStore>,
        backend: Arc<dyn InventoryBackend>,
    ) -> AppResult<Self> {
        let inventory = Arc::new(InventoryService::new(backend));
        inventory.hydrate().await?;

        let auth = Arc::new(AuthService::new(store, config.auth.bcrypt_cost));
        auth.restore_session().await?;

        let reporting = ReportingService::new(inventory.clone());
        Ok(Self {
            config,
            inventory,
            auth,
            reporting,
        })
    }
}
