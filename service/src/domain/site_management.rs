use chrono::Utc;
use serde_json::Value;
use site_common::{
    EmptyListPolicy, FlatContent, SiteId, SiteManagement, SiteMeta, SiteTree, VersionSnapshot,
    history::{find_version, push_snapshot},
    merge_onto, normalize, to_legacy_content,
};

use crate::domain::{
    ContentStore,
    error::{SiteManagementError, StoreError},
};

/// Draft / publish / version history workflow of the site content tree.
///
/// Nothing is kept in memory between calls: every operation reads the whole
/// record once and writes it back at most once. The write is conditional on
/// the row version that was read, so a concurrent editor gets a conflict
/// instead of silently losing an update.
#[derive(Clone, Debug)]
pub struct SiteManagementService<S: ContentStore> {
    store: S,
    policy: EmptyListPolicy,
}

impl<S: ContentStore> SiteManagementService<S> {
    pub fn new(store: S, policy: EmptyListPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn fetch(&self, site: &SiteId) -> Result<SiteManagement, SiteManagementError> {
        let (_, management) = self.load(site).await?;
        Ok(management)
    }

    /// Merges `partial` onto the current draft. Published tree and history are untouched.
    pub async fn save_draft(
        &self,
        site: &SiteId,
        partial: &Value,
    ) -> Result<SiteManagement, SiteManagementError> {
        let (flat, mut management) = self.load(site).await?;
        management.draft = merge_onto(&management.draft, partial, self.policy);
        self.save(site, flat, management).await
    }

    /// Merges `partial` onto the draft and publishes the result as a new version.
    pub async fn publish(
        &self,
        site: &SiteId,
        partial: Option<&Value>,
        note: &str,
    ) -> Result<SiteManagement, SiteManagementError> {
        let (flat, mut management) = self.load(site).await?;

        let data = match partial {
            Some(partial) => merge_onto(&management.draft, partial, self.policy),
            None => management.draft.clone(),
        };
        let current = management.current_version();
        let version = current
            .checked_add(1)
            .ok_or(SiteManagementError::VersionExhausted(current))?;
        let now = Utc::now();

        push_snapshot(
            &mut management.history,
            VersionSnapshot {
                version,
                published_at: now,
                note: note.to_string(),
                data: data.clone(),
            },
        );
        management.draft = data.clone();
        management.published = data;
        management.meta = SiteMeta {
            version,
            last_saved_at: Some(now),
            last_published_at: Some(now),
        };

        let management = self.persist(site, flat, management).await?;
        tracing::info!(site = %site, version, "site content published");
        Ok(management)
    }

    /// Discards draft edits: the draft becomes an exact copy of the published tree.
    pub async fn reset_draft_to_published(
        &self,
        site: &SiteId,
    ) -> Result<SiteManagement, SiteManagementError> {
        let (flat, mut management) = self.load(site).await?;
        management.draft = management.published.clone();
        self.save(site, flat, management).await
    }

    /// Loads the data of a history entry into the draft. Publishing is a separate step.
    pub async fn restore_version(
        &self,
        site: &SiteId,
        version: i64,
    ) -> Result<SiteManagement, SiteManagementError> {
        let (flat, mut management) = self.load(site).await?;
        let snapshot = find_version(&management.history, version)
            .ok_or(SiteManagementError::VersionNotFound(version))?;
        management.draft = self.replace(&snapshot.data);

        let management = self.save(site, flat, management).await?;
        tracing::info!(site = %site, version, "draft restored from history");
        Ok(management)
    }

    /// Replaces the draft with freshly generated defaults.
    pub async fn reset_draft_to_defaults(
        &self,
        site: &SiteId,
    ) -> Result<SiteManagement, SiteManagementError> {
        let (flat, mut management) = self.load(site).await?;
        management.draft = normalize(None, None, self.policy);
        self.save(site, flat, management).await
    }

    /// Flat record as pages that still read the old columns see it.
    pub async fn legacy_view(&self, site: &SiteId) -> Result<FlatContent, SiteManagementError> {
        let (flat, management) = self.load(site).await?;
        Ok(to_legacy_content(&flat, &management.published))
    }

    async fn load(
        &self,
        site: &SiteId,
    ) -> Result<(FlatContent, SiteManagement), SiteManagementError> {
        let flat = self.store.read(site).await?.unwrap_or_default();
        let management = SiteManagement::from_flat(&flat, self.policy);
        Ok((flat, management))
    }

    fn replace(&self, tree: &SiteTree) -> SiteTree {
        normalize(Some(&tree.to_value()), None, self.policy)
    }

    async fn save(
        &self,
        site: &SiteId,
        flat: FlatContent,
        mut management: SiteManagement,
    ) -> Result<SiteManagement, SiteManagementError> {
        management.meta.last_saved_at = Some(Utc::now());
        let management = self.persist(site, flat, management).await?;
        tracing::debug!(site = %site, "draft saved");
        Ok(management)
    }

    /// Mirrors the published tree into the legacy columns and writes the whole record.
    async fn persist(
        &self,
        site: &SiteId,
        flat: FlatContent,
        management: SiteManagement,
    ) -> Result<SiteManagement, SiteManagementError> {
        let mut record = to_legacy_content(&flat, &management.published);
        management
            .embed(&mut record.extra_content)
            .map_err(|e| StoreError::Write(e.to_string()))?;

        self.store.write(site, record).await?;
        Ok(management)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};
    use site_common::{HISTORY_LIMIT, META_KEY, default_cards};

    use crate::infrastructure::memory::InMemoryContentStore;
    use crate::infrastructure::test_utils::InterleavedEditStore;

    use super::*;

    fn site() -> SiteId {
        SiteId::try_new("main").unwrap()
    }

    fn service() -> SiteManagementService<InMemoryContentStore> {
        SiteManagementService::new(InMemoryContentStore::default(), EmptyListPolicy::Preserve)
    }

    #[derive(Clone)]
    struct FailingStore;

    impl ContentStore for FailingStore {
        async fn read(&self, _site: &SiteId) -> Result<Option<FlatContent>, StoreError> {
            Err(StoreError::Read("connection refused".to_string()))
        }

        async fn write(&self, _site: &SiteId, _record: FlatContent) -> Result<FlatContent, StoreError> {
            Err(StoreError::Write("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn fetch_of_unknown_site_returns_defaults() {
        let management = service().fetch(&site()).await.unwrap();
        assert!(management.history.is_empty());
        assert_eq!(management.meta.version, 0);
        assert!(!management.draft.cards("admissionsPage.steps").is_empty());
    }

    #[tokio::test]
    async fn fetch_seeds_trees_from_legacy_columns() {
        let store = InMemoryContentStore::default();
        let legacy = FlatContent {
            mission: Some("Teach with care".to_string()),
            contact_email: Some("office@school.example".to_string()),
            ..FlatContent::default()
        };
        store.write(&site(), legacy).await.unwrap();
        let service = SiteManagementService::new(store, EmptyListPolicy::Preserve);

        let management = service.fetch(&site()).await.unwrap();

        assert_eq!(management.published.str_at("aboutPage.mission"), Some("Teach with care"));
        assert_eq!(management.draft.str_at("contactPage.email"), Some("office@school.example"));
    }

    #[tokio::test]
    async fn save_draft_leaves_published_and_history_untouched() {
        let service = service();
        let published = service.publish(&site(), None, "initial").await.unwrap();

        let saved = service
            .save_draft(&site(), &json!({"homepage": {"hero": {"title": "Draft title"}}}))
            .await
            .unwrap();

        assert_eq!(saved.draft.str_at("homepage.hero.title"), Some("Draft title"));
        assert_eq!(saved.published, published.published);
        assert_eq!(saved.history, published.history);
        assert!(saved.meta.last_saved_at >= published.meta.last_saved_at);

        let fetched = service.fetch(&site()).await.unwrap();
        assert_eq!(fetched.draft, saved.draft);
        assert_eq!(fetched.published, published.published);
    }

    #[tokio::test]
    async fn save_draft_keeps_card_ids() {
        let service = service();
        let first = service.save_draft(&site(), &json!({})).await.unwrap();
        let before = first.draft.cards("footer.quickLinks").to_vec();

        let saved = service
            .save_draft(&site(), &json!({"footer": {"tagline": "Changed"}}))
            .await
            .unwrap();

        assert_eq!(saved.draft.cards("footer.quickLinks"), before.as_slice());
    }

    #[tokio::test]
    async fn publish_increments_versions_without_gaps() {
        let service = service();
        for expected in 1..=5 {
            let management = service
                .publish(&site(), None, &format!("release {}", expected))
                .await
                .unwrap();
            assert_eq!(management.meta.version, expected);
            assert_eq!(management.history[0].version, expected);
            assert_eq!(management.history[0].note, format!("release {}", expected));
        }

        let versions: Vec<i64> = service
            .fetch(&site())
            .await
            .unwrap()
            .history
            .iter()
            .map(|snapshot| snapshot.version)
            .collect();
        assert_eq!(versions, vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn history_is_capped_to_the_newest_entries() {
        let service = service();
        for n in 1..=25 {
            service.publish(&site(), None, &format!("release {}", n)).await.unwrap();
        }

        let management = service.fetch(&site()).await.unwrap();
        assert_eq!(management.history.len(), HISTORY_LIMIT);
        let versions: Vec<i64> = management.history.iter().map(|s| s.version).collect();
        assert_eq!(versions, (6..=25).rev().collect::<Vec<_>>());
        assert_eq!(management.meta.version, 25);
    }

    #[tokio::test]
    async fn publish_copies_data_into_draft_and_published() {
        let service = service();
        let management = service
            .publish(
                &site(),
                Some(&json!({"globalSettings": {"schoolName": "Riverside Academy"}})),
                "rename",
            )
            .await
            .unwrap();

        assert_eq!(management.draft, management.published);
        assert_eq!(management.history[0].data, management.published);
        assert_eq!(
            management.published.str_at("globalSettings.schoolName"),
            Some("Riverside Academy")
        );
        assert_eq!(management.meta.last_published_at, Some(management.history[0].published_at));
    }

    #[tokio::test]
    async fn publishing_empty_list_keeps_it_empty() {
        let service = service();
        let management = service
            .publish(&site(), Some(&json!({"admissionsPage": {"steps": []}})), "trim steps")
            .await
            .unwrap();

        assert!(management.published.cards("admissionsPage.steps").is_empty());
        let fetched = service.fetch(&site()).await.unwrap();
        assert!(fetched.published.cards("admissionsPage.steps").is_empty());
        assert!(fetched.history[0].data.cards("admissionsPage.steps").is_empty());
    }

    #[tokio::test]
    async fn publishing_empty_list_restores_defaults_when_configured() {
        let service =
            SiteManagementService::new(InMemoryContentStore::default(), EmptyListPolicy::RestoreDefaults);
        let management = service
            .publish(&site(), Some(&json!({"admissionsPage": {"steps": []}})), "trim steps")
            .await
            .unwrap();

        let steps = management.published.cards("admissionsPage.steps");
        assert_eq!(steps.len(), default_cards("admissionsPage.steps").len());
        assert_eq!(steps[0]["title"], "Submit an inquiry");
    }

    #[tokio::test]
    async fn reset_discards_draft_edits() {
        let service = service();
        let published = service.publish(&site(), None, "initial").await.unwrap().published;
        service
            .save_draft(
                &site(),
                &json!({"homepage": {"stats": []}, "experimental": {"banner": true}}),
            )
            .await
            .unwrap();

        let reset = service.reset_draft_to_published(&site()).await.unwrap();

        assert_eq!(reset.draft, published);
        let fetched = service.fetch(&site()).await.unwrap();
        assert_eq!(
            serde_json::to_string(&fetched.draft).unwrap(),
            serde_json::to_string(&published).unwrap()
        );
    }

    #[tokio::test]
    async fn restore_loads_snapshot_into_draft_only() {
        let service = service();
        service
            .publish(&site(), Some(&json!({"aboutPage": {"vision": "First"}})), "v1")
            .await
            .unwrap();
        let latest = service
            .publish(&site(), Some(&json!({"aboutPage": {"vision": "Second"}})), "v2")
            .await
            .unwrap();

        let restored = service.restore_version(&site(), 1).await.unwrap();

        assert_eq!(restored.draft.str_at("aboutPage.vision"), Some("First"));
        assert_eq!(restored.draft, restored.history[1].data);
        assert_eq!(restored.published, latest.published);
        assert_eq!(restored.meta.version, 2);

        let fetched = service.fetch(&site()).await.unwrap();
        assert_eq!(fetched.published.str_at("aboutPage.vision"), Some("Second"));
        assert_eq!(fetched.draft.str_at("aboutPage.vision"), Some("First"));
    }

    #[tokio::test]
    async fn restore_of_unknown_version_fails() {
        let service = service();
        service.publish(&site(), None, "v1").await.unwrap();

        let result = service.restore_version(&site(), 42).await;

        assert!(matches!(result, Err(SiteManagementError::VersionNotFound(42))));
    }

    #[tokio::test]
    async fn reset_to_defaults_replaces_the_draft() {
        let service = service();
        service
            .save_draft(&site(), &json!({"homepage": {"stats": []}, "aboutPage": {"vision": "Custom"}}))
            .await
            .unwrap();

        let management = service.reset_draft_to_defaults(&site()).await.unwrap();

        assert!(!management.draft.cards("homepage.stats").is_empty());
        assert_ne!(management.draft.str_at("aboutPage.vision"), Some("Custom"));
    }

    #[tokio::test]
    async fn legacy_view_mirrors_the_published_tree() {
        let service = service();
        service
            .publish(
                &site(),
                Some(&json!({"contactPage": {"email": "hello@school.example"}})),
                "contact",
            )
            .await
            .unwrap();
        service
            .save_draft(&site(), &json!({"contactPage": {"email": "draft@school.example"}}))
            .await
            .unwrap();

        let legacy = service.legacy_view(&site()).await.unwrap();

        assert_eq!(legacy.contact_email.as_deref(), Some("hello@school.example"));
        assert!(legacy.history.is_some());
    }

    #[tokio::test]
    async fn stale_write_is_rejected() {
        let store = InMemoryContentStore::default();
        let service = SiteManagementService::new(store.clone(), EmptyListPolicy::Preserve);
        service.publish(&site(), None, "v1").await.unwrap();

        let stale = store.read(&site()).await.unwrap().unwrap();
        service.publish(&site(), None, "v2").await.unwrap();
        let result = store.write(&site(), stale).await;

        assert!(matches!(
            result,
            Err(StoreError::Conflict { expected: 1, actual: 2 })
        ));
        assert_eq!(service.fetch(&site()).await.unwrap().meta.version, 2);
    }

    #[tokio::test]
    async fn concurrent_edit_fails_with_conflict() {
        let store = InterleavedEditStore::default();
        SiteManagementService::new(store.inner.clone(), EmptyListPolicy::Preserve)
            .publish(&site(), Some(&json!({"aboutPage": {"vision": "Agreed"}})), "v1")
            .await
            .unwrap();
        let before = store.inner.read(&site()).await.unwrap().unwrap();
        let service = SiteManagementService::new(store.clone(), EmptyListPolicy::Preserve);

        let saved = service
            .save_draft(&site(), &json!({"aboutPage": {"vision": "Mine"}}))
            .await;
        let published = service.publish(&site(), None, "v2").await;

        assert!(matches!(
            saved,
            Err(SiteManagementError::Store(StoreError::Conflict { expected: 1, actual: 2 }))
        ));
        assert!(matches!(
            published,
            Err(SiteManagementError::Store(StoreError::Conflict { expected: 2, actual: 3 }))
        ));

        let after = store.inner.read(&site()).await.unwrap().unwrap();
        assert_eq!(after.extra_content, before.extra_content);
        assert_eq!(after.vision.as_deref(), Some("Agreed"));
    }

    #[tokio::test]
    async fn publish_refuses_to_overflow_the_version() {
        let store = InMemoryContentStore::default();
        let mut extra_content = Map::new();
        extra_content.insert(META_KEY.to_string(), json!({"version": i64::MAX}));
        let record = FlatContent {
            extra_content,
            ..FlatContent::default()
        };
        store.write(&site(), record).await.unwrap();
        let service = SiteManagementService::new(store.clone(), EmptyListPolicy::Preserve);

        let result = service.publish(&site(), None, "next").await;

        assert!(matches!(
            result,
            Err(SiteManagementError::VersionExhausted(version)) if version == i64::MAX
        ));
        let stored = store.read(&site()).await.unwrap().unwrap();
        assert_eq!(stored.row_version, 1);
        assert!(service.fetch(&site()).await.unwrap().history.is_empty());
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let service = SiteManagementService::new(FailingStore, EmptyListPolicy::Preserve);

        let fetched = service.fetch(&site()).await;
        let published = service.publish(&site(), None, "v1").await;

        assert!(matches!(
            fetched,
            Err(SiteManagementError::Store(StoreError::Read(_)))
        ));
        assert!(matches!(
            published,
            Err(SiteManagementError::Store(StoreError::Read(_)))
        ));
    }
}
