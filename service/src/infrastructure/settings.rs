use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use site_common::{EmptyListPolicy, SiteId, database::DatabaseSettings};

const DEFAULT_SITE_ID: &str = "main";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: String,
    pub store: StoreSettings,
    #[serde(default)]
    pub site: SiteSettings,
    /// Required by the postgres store only.
    pub database: Option<DatabaseSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// Site served by the routes that carry no site id.
    #[serde(default = "default_site_id")]
    pub default_site_id: String,
    #[serde(default)]
    pub empty_list_policy: EmptyListPolicy,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_site_id: default_site_id(),
            empty_list_policy: EmptyListPolicy::default(),
        }
    }
}

impl SiteSettings {
    pub fn default_site(&self) -> anyhow::Result<SiteId> {
        SiteId::try_new(self.default_site_id.as_str())
            .with_context(|| format!("invalid site.default_site_id '{}'", self.default_site_id))
    }
}

fn default_site_id() -> String {
    DEFAULT_SITE_ID.to_string()
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
