use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The flat content record of a site as older pages read it.
///
/// The structured site management blob travels inside `extra_content`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatContent {
    pub vision: Option<String>,
    pub mission: Option<String>,
    pub history: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub extra_content: Map<String, Value>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Concurrency token, bumped by the store on every successful write.
    /// Zero means the record has never been stored.
    #[serde(default)]
    pub row_version: i64,
}
