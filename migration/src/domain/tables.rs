use std::collections::HashSet;
use std::future::Future;

use site_common::{
    CONTACT_EMAIL_FIELD_NAME, CONTACT_PHONE_FIELD_NAME, EXTRA_CONTENT_FIELD_NAME,
    HISTORY_FIELD_NAME, MISSION_FIELD_NAME, ROW_VERSION_FIELD_NAME, SITE_CONTENT_TABLE_NAME,
    SITE_ID_FIELD_NAME, UPDATED_FIELD_NAME, VISION_FIELD_NAME,
};

pub trait Tables: Send + Sync + Clone + 'static {
    /// load names of existing tables from database
    fn load(&self) -> impl Future<Output = Result<HashSet<String>, anyhow::Error>>;
}

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>) -> Self {
        Self { name, columns }
    }
}

impl Column {
    pub fn new<T: Into<String>>(
        name: T,
        column_type: T,
        not_null: bool,
        default_value: Option<T>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null,
            primary_key: false,
            default_value: default_value.map(T::into),
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: T) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null: false,
            primary_key: true,
            default_value: None,
        }
    }
}

/// Tables the service expects to exist.
pub fn required_tables() -> Vec<Table> {
    vec![site_content_table()]
}

/// One row per site: legacy columns plus the site management blob in `extra_content`.
fn site_content_table() -> Table {
    Table::new(
        SITE_CONTENT_TABLE_NAME.to_string(),
        vec![
            Column::primary_key(SITE_ID_FIELD_NAME, "VARCHAR(40)"),
            Column::new(VISION_FIELD_NAME, "TEXT", false, None),
            Column::new(MISSION_FIELD_NAME, "TEXT", false, None),
            Column::new(HISTORY_FIELD_NAME, "TEXT", false, None),
            Column::new(CONTACT_EMAIL_FIELD_NAME, "VARCHAR(255)", false, None),
            Column::new(CONTACT_PHONE_FIELD_NAME, "VARCHAR(64)", false, None),
            Column::new(EXTRA_CONTENT_FIELD_NAME, "JSONB", true, Some("'{}'::jsonb")),
            Column::new(UPDATED_FIELD_NAME, "TIMESTAMPTZ", true, Some("now()")),
            Column::new(ROW_VERSION_FIELD_NAME, "BIGINT", true, Some("0")),
        ],
    )
}
