pub mod database;
pub mod domain;

// Flat content table and column names

pub const SITE_CONTENT_TABLE_NAME: &'static str = "site_content";

pub const SITE_ID_FIELD_NAME: &'static str = "site_id";
pub const VISION_FIELD_NAME: &'static str = "vision";
pub const MISSION_FIELD_NAME: &'static str = "mission";
pub const HISTORY_FIELD_NAME: &'static str = "history";
pub const CONTACT_EMAIL_FIELD_NAME: &'static str = "contact_email";
pub const CONTACT_PHONE_FIELD_NAME: &'static str = "contact_phone";
pub const EXTRA_CONTENT_FIELD_NAME: &'static str = "extra_content";
pub const UPDATED_FIELD_NAME: &'static str = "updated_at";
pub const ROW_VERSION_FIELD_NAME: &'static str = "row_version";

// Keys of the site management blob inside extra_content

pub const DRAFT_KEY: &'static str = "site_management_draft";
pub const PUBLISHED_KEY: &'static str = "site_management_published";
pub const HISTORY_KEY: &'static str = "site_management_history";
pub const META_KEY: &'static str = "site_management_meta";

// expose domain module

pub use domain::*;
