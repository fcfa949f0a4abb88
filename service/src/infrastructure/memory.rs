use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use site_common::{FlatContent, SiteId};
use tokio::sync::RwLock;

use crate::domain::{ContentStore, error::StoreError};

/// Process local store, used for development and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentStore {
    records: Arc<RwLock<HashMap<SiteId, FlatContent>>>,
}

impl ContentStore for InMemoryContentStore {
    async fn read(&self, site: &SiteId) -> Result<Option<FlatContent>, StoreError> {
        Ok(self.records.read().await.get(site).cloned())
    }

    async fn write(&self, site: &SiteId, mut record: FlatContent) -> Result<FlatContent, StoreError> {
        let mut records = self.records.write().await;

        let actual = records.get(site).map(|stored| stored.row_version).unwrap_or(0);
        if actual != record.row_version {
            return Err(StoreError::Conflict {
                expected: record.row_version,
                actual,
            });
        }

        record.row_version += 1;
        record.updated_at = Some(Utc::now());
        records.insert(site.clone(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str) -> SiteId {
        SiteId::try_new(id).unwrap()
    }

    #[tokio::test]
    async fn write_bumps_row_version() {
        let store = InMemoryContentStore::default();

        let first = store.write(&site("main"), FlatContent::default()).await.unwrap();
        let second = store.write(&site("main"), first.clone()).await.unwrap();

        assert_eq!(first.row_version, 1);
        assert_eq!(second.row_version, 2);
        assert!(second.updated_at.is_some());
    }

    #[tokio::test]
    async fn sites_are_isolated() {
        let store = InMemoryContentStore::default();
        let record = FlatContent {
            vision: Some("North campus".to_string()),
            ..FlatContent::default()
        };
        store.write(&site("north"), record).await.unwrap();

        assert!(store.read(&site("south")).await.unwrap().is_none());
        assert_eq!(
            store.read(&site("north")).await.unwrap().unwrap().vision.as_deref(),
            Some("North campus")
        );
    }

    #[tokio::test]
    async fn first_write_must_not_claim_a_version() {
        let store = InMemoryContentStore::default();
        let record = FlatContent {
            row_version: 3,
            ..FlatContent::default()
        };

        let result = store.write(&site("main"), record).await;

        assert!(matches!(
            result,
            Err(StoreError::Conflict { expected: 3, actual: 0 })
        ));
    }
}
