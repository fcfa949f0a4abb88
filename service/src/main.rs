use anyhow::Context;
use site_common::database;
use crate::domain::site_management::SiteManagementService;
use crate::infrastructure::memory::InMemoryContentStore;
use crate::infrastructure::persistence::PostgresContentStore;
use crate::infrastructure::{AppStateImpl, ContentStoreAdapter};
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::settings::{Settings, StoreBackend};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = match settings.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, content is lost on restart");
            ContentStoreAdapter::Memory(InMemoryContentStore::default())
        }
        StoreBackend::Postgres => {
            let database_settings = settings
                .database
                .as_ref()
                .context("database settings are required for the postgres store")?;
            let database = database::connect(database_settings).await?;
            tracing::info!("Connected to DB");
            ContentStoreAdapter::Postgres(PostgresContentStore::new(database))
        }
    };

    let default_site = settings.site.default_site()?;
    tracing::info!(site = %default_site, "default site");

    let site_management = SiteManagementService::new(store, settings.site.empty_list_policy);
    let state = AppStateImpl::new(site_management, default_site);

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
