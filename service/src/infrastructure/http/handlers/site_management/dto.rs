use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_common::{FlatContent, SiteManagement, SiteMeta, SiteTree, VersionSnapshot};

/// Body of the publish route. The body itself and both fields are optional:
/// without `data` the current draft is published as is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishRequest {
    pub data: Option<Value>,
    #[serde(default)]
    pub note: String,
}

/// Response for the site management routes
#[derive(Debug, Clone, Serialize)]
pub struct SiteManagementResponse {
    draft: SiteTree,
    published: SiteTree,
    history: Vec<VersionSnapshot>,
    meta: SiteMeta,
}

impl From<SiteManagement> for SiteManagementResponse {
    fn from(value: SiteManagement) -> Self {
        Self {
            draft: value.draft,
            published: value.published,
            history: value.history,
            meta: value.meta,
        }
    }
}

/// Flat fields read by pages not yet migrated to the structured tree
#[derive(Debug, Clone, Serialize)]
pub struct LegacyContentResponse {
    vision: Option<String>,
    mission: Option<String>,
    history: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<FlatContent> for LegacyContentResponse {
    fn from(value: FlatContent) -> Self {
        Self {
            vision: value.vision,
            mission: value.mission,
            history: value.history,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
            updated_at: value.updated_at,
        }
    }
}
