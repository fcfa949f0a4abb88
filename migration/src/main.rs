use crate::{
    domain::migration::Migration,
    infrastructure::{migration::MigrationAdapter, settings::Settings, tables::TablesAdapter},
};
use site_common::database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = database::connect(&settings.database).await?;
    tracing::info!("Connected to DB");

    // create the site content table when it is missing
    let migration = MigrationAdapter::new(TablesAdapter::new(database), database);
    migration.migrate().await?;
    tracing::info!("Database migrated");

    Ok(())
}
