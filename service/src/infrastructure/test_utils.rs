use site_common::{FlatContent, SiteId};

use crate::domain::{ContentStore, error::StoreError};
use crate::infrastructure::memory::InMemoryContentStore;

/// Store where another editor writes the record right after every read,
/// so the row version handed out by `read` is always stale.
#[derive(Clone, Debug, Default)]
pub struct InterleavedEditStore {
    pub inner: InMemoryContentStore,
}

impl ContentStore for InterleavedEditStore {
    async fn read(&self, site: &SiteId) -> Result<Option<FlatContent>, StoreError> {
        let record = self.inner.read(site).await?;
        let concurrent = record.clone().unwrap_or_default();
        self.inner.write(site, concurrent).await?;
        Ok(record)
    }

    async fn write(&self, site: &SiteId, record: FlatContent) -> Result<FlatContent, StoreError> {
        self.inner.write(site, record).await
    }
}
