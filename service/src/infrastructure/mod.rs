use site_common::{FlatContent, SiteId};

use crate::{
    domain::{AppState, ContentStore, error::StoreError, site_management::SiteManagementService},
    infrastructure::{memory::InMemoryContentStore, persistence::PostgresContentStore},
};

pub mod http;
pub mod memory;
pub mod persistence;
pub mod settings;
#[cfg(test)]
pub mod test_utils;

/// Store selected by configuration.
#[derive(Clone, Debug)]
pub enum ContentStoreAdapter {
    Memory(InMemoryContentStore),
    Postgres(PostgresContentStore),
}

impl ContentStore for ContentStoreAdapter {
    async fn read(&self, site: &SiteId) -> Result<Option<FlatContent>, StoreError> {
        match self {
            Self::Memory(store) => store.read(site).await,
            Self::Postgres(store) => store.read(site).await,
        }
    }

    async fn write(&self, site: &SiteId, record: FlatContent) -> Result<FlatContent, StoreError> {
        match self {
            Self::Memory(store) => store.write(site, record).await,
            Self::Postgres(store) => store.write(site, record).await,
        }
    }
}

#[derive(Clone)]
pub struct AppStateImpl<S: ContentStore> {
    site_management: SiteManagementService<S>,
    default_site: SiteId,
}

impl<S: ContentStore> AppStateImpl<S> {
    pub fn new(site_management: SiteManagementService<S>, default_site: SiteId) -> Self {
        Self {
            site_management,
            default_site,
        }
    }
}

impl<S: ContentStore> AppState for AppStateImpl<S> {
    type S = S;

    fn site_management(&self) -> &SiteManagementService<Self::S> {
        &self.site_management
    }

    fn default_site(&self) -> &SiteId {
        &self.default_site
    }
}
