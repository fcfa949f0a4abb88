use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    DRAFT_KEY, HISTORY_KEY, META_KEY, PUBLISHED_KEY,
    domain::{
        content::FlatContent,
        history::{SiteMeta, VersionSnapshot, derive_meta, sanitize_history},
        normalize::{EmptyListPolicy, normalize},
        tree::SiteTree,
    },
};

/// Raw site management values as found in `extra_content`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredSiteManagement {
    pub draft: Option<Value>,
    pub published: Option<Value>,
    pub history: Option<Value>,
    pub meta: Option<Value>,
}

impl StoredSiteManagement {
    pub fn extract(extra_content: &Map<String, Value>) -> Self {
        let read = |key: &str| extra_content.get(key).filter(|value| !value.is_null()).cloned();
        Self {
            draft: read(DRAFT_KEY),
            published: read(PUBLISHED_KEY),
            history: read(HISTORY_KEY),
            meta: read(META_KEY),
        }
    }
}

/// Draft, published tree, history and meta of one site, fully normalized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteManagement {
    pub draft: SiteTree,
    pub published: SiteTree,
    pub history: Vec<VersionSnapshot>,
    pub meta: SiteMeta,
}

impl SiteManagement {
    /// Reads the blob out of a flat record. The legacy columns seed both trees,
    /// so a site that was never managed starts from its old content.
    pub fn from_flat(flat: &FlatContent, policy: EmptyListPolicy) -> Self {
        let stored = StoredSiteManagement::extract(&flat.extra_content);

        let draft_source = stored.draft.as_ref().or(stored.published.as_ref());
        let draft = normalize(draft_source, Some(flat), policy);
        let published = normalize(stored.published.as_ref(), Some(flat), policy);
        let history = sanitize_history(stored.history.as_ref());
        let meta = derive_meta(stored.meta.as_ref(), &history);

        Self {
            draft,
            published,
            history,
            meta,
        }
    }

    /// Highest version known, from meta or the history head.
    pub fn current_version(&self) -> i64 {
        let head = self.history.first().map(|snapshot| snapshot.version).unwrap_or(0);
        self.meta.version.max(head)
    }

    /// Writes the four blob keys, leaving other keys untouched.
    pub fn embed(&self, extra_content: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        extra_content.insert(DRAFT_KEY.to_string(), self.draft.to_value());
        extra_content.insert(PUBLISHED_KEY.to_string(), self.published.to_value());
        extra_content.insert(HISTORY_KEY.to_string(), serde_json::to_value(&self.history)?);
        extra_content.insert(META_KEY.to_string(), serde_json::to_value(&self.meta)?);
        Ok(())
    }
}
