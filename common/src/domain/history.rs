use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::tree::SiteTree;

/// Number of published snapshots kept, newest first.
pub const HISTORY_LIMIT: usize = 20;

/// Immutable copy of a published tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub version: i64,
    pub published_at: DateTime<Utc>,
    pub note: String,
    pub data: SiteTree,
}

/// Bookkeeping derived from the history, never authoritative on its own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMeta {
    pub version: i64,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_published_at: Option<DateTime<Utc>>,
}

impl VersionSnapshot {
    /// Lenient read of one stored entry. Entries without a positive version
    /// or without object data are rejected.
    fn from_stored(entry: &Value) -> Option<Self> {
        let version = entry.get("version")?.as_i64().filter(|v| *v >= 1)?;
        let data = SiteTree::from_value(entry.get("data")?.clone())?;
        let published_at = entry
            .get("published_at")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or(DateTime::UNIX_EPOCH);
        let note = entry
            .get("note")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self {
            version,
            published_at,
            note,
            data,
        })
    }
}

/// Drops malformed and duplicate entries, orders newest first and caps the list.
pub fn sanitize_history(stored: Option<&Value>) -> Vec<VersionSnapshot> {
    let Some(entries) = stored.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut history: Vec<VersionSnapshot> = entries
        .iter()
        .filter_map(|entry| {
            let snapshot = VersionSnapshot::from_stored(entry);
            if snapshot.is_none() {
                tracing::warn!("dropping malformed history entry");
            }
            snapshot
        })
        .filter(|snapshot| seen.insert(snapshot.version))
        .collect();

    history.sort_by(|a, b| b.version.cmp(&a.version));
    history.truncate(HISTORY_LIMIT);
    history
}

/// Prepends `snapshot` and drops the oldest entries beyond the limit.
pub fn push_snapshot(history: &mut Vec<VersionSnapshot>, snapshot: VersionSnapshot) {
    history.insert(0, snapshot);
    history.truncate(HISTORY_LIMIT);
}

pub fn find_version(history: &[VersionSnapshot], version: i64) -> Option<&VersionSnapshot> {
    history.iter().find(|snapshot| snapshot.version == version)
}

/// Stored meta when readable, otherwise derived from the history head.
/// The version never lags behind the newest snapshot.
pub fn derive_meta(stored: Option<&Value>, history: &[VersionSnapshot]) -> SiteMeta {
    let head = history.first();
    let head_version = head.map(|snapshot| snapshot.version).unwrap_or(0);

    let stored = stored
        .filter(|value| value.is_object())
        .and_then(|value| serde_json::from_value::<SiteMeta>(value.clone()).ok());

    match stored {
        Some(mut meta) => {
            if meta.version < head_version {
                meta.version = head_version;
                meta.last_published_at = head.map(|snapshot| snapshot.published_at);
            }
            meta
        }
        None => SiteMeta {
            version: head_version,
            last_saved_at: None,
            last_published_at: head.map(|snapshot| snapshot.published_at),
        },
    }
}
