use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use site_common::{
    CONTACT_EMAIL_FIELD_NAME, CONTACT_PHONE_FIELD_NAME, EXTRA_CONTENT_FIELD_NAME, FlatContent,
    HISTORY_FIELD_NAME, MISSION_FIELD_NAME, ROW_VERSION_FIELD_NAME, SITE_CONTENT_TABLE_NAME,
    SITE_ID_FIELD_NAME, SiteId, UPDATED_FIELD_NAME, VISION_FIELD_NAME, database::Database,
};
use sqlx::{Row, postgres::PgRow, types::Json};

use crate::domain::{ContentStore, error::StoreError};

/// Stores the flat content record of every site in one row of `site_content`.
#[derive(Clone, Debug)]
pub struct PostgresContentStore {
    database: &'static Database,
}

impl PostgresContentStore {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn table(&self) -> String {
        format!(
            "\"{}\".\"{}\"",
            self.database.database_schema(),
            SITE_CONTENT_TABLE_NAME
        )
    }

    async fn stored_row_version(&self, site: &SiteId) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            ROW_VERSION_FIELD_NAME,
            self.table(),
            SITE_ID_FIELD_NAME
        );

        let version = sqlx::query_scalar::<_, i64>(&sql)
            .bind(site.as_ref())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        Ok(version.unwrap_or(0))
    }
}

impl ContentStore for PostgresContentStore {
    async fn read(&self, site: &SiteId) -> Result<Option<FlatContent>, StoreError> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {}, {}, {} FROM {} WHERE {} = $1",
            VISION_FIELD_NAME,
            MISSION_FIELD_NAME,
            HISTORY_FIELD_NAME,
            CONTACT_EMAIL_FIELD_NAME,
            CONTACT_PHONE_FIELD_NAME,
            EXTRA_CONTENT_FIELD_NAME,
            UPDATED_FIELD_NAME,
            ROW_VERSION_FIELD_NAME,
            self.table(),
            SITE_ID_FIELD_NAME
        );
        tracing::debug!("Generated SQL: {}", sql);

        let row = sqlx::query(&sql)
            .bind(site.as_ref())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        row.map(|row| row_to_content(&row)).transpose()
    }

    async fn write(&self, site: &SiteId, record: FlatContent) -> Result<FlatContent, StoreError> {
        let expected = record.row_version;

        let sql = if expected == 0 {
            format!(
                "INSERT INTO {table} ({site_id}, {vision}, {mission}, {history}, {email}, {phone}, {extra}, {updated}, {version}) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, now(), 1) \
                 ON CONFLICT ({site_id}) DO NOTHING \
                 RETURNING {updated}, {version}",
                table = self.table(),
                site_id = SITE_ID_FIELD_NAME,
                vision = VISION_FIELD_NAME,
                mission = MISSION_FIELD_NAME,
                history = HISTORY_FIELD_NAME,
                email = CONTACT_EMAIL_FIELD_NAME,
                phone = CONTACT_PHONE_FIELD_NAME,
                extra = EXTRA_CONTENT_FIELD_NAME,
                updated = UPDATED_FIELD_NAME,
                version = ROW_VERSION_FIELD_NAME,
            )
        } else {
            format!(
                "UPDATE {table} SET {vision} = $2, {mission} = $3, {history} = $4, {email} = $5, {phone} = $6, \
                 {extra} = $7, {updated} = now(), {version} = {version} + 1 \
                 WHERE {site_id} = $1 AND {version} = $8 \
                 RETURNING {updated}, {version}",
                table = self.table(),
                site_id = SITE_ID_FIELD_NAME,
                vision = VISION_FIELD_NAME,
                mission = MISSION_FIELD_NAME,
                history = HISTORY_FIELD_NAME,
                email = CONTACT_EMAIL_FIELD_NAME,
                phone = CONTACT_PHONE_FIELD_NAME,
                extra = EXTRA_CONTENT_FIELD_NAME,
                updated = UPDATED_FIELD_NAME,
                version = ROW_VERSION_FIELD_NAME,
            )
        };
        tracing::debug!("Generated SQL: {}", sql);

        let mut query = sqlx::query(&sql)
            .bind(site.as_ref())
            .bind(record.vision.as_deref())
            .bind(record.mission.as_deref())
            .bind(record.history.as_deref())
            .bind(record.contact_email.as_deref())
            .bind(record.contact_phone.as_deref())
            .bind(Json(&record.extra_content));
        if expected != 0 {
            query = query.bind(expected);
        }

        let row = query
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        let Some(row) = row else {
            let actual = self.stored_row_version(site).await?;
            tracing::warn!(site = %site, expected, actual, "rejected stale site content write");
            return Err(StoreError::Conflict { expected, actual });
        };

        let updated_at: DateTime<Utc> = row
            .try_get(UPDATED_FIELD_NAME)
            .map_err(|e| StoreError::Write(format!("Failed to parse {}: {}", UPDATED_FIELD_NAME, e)))?;
        let row_version: i64 = row
            .try_get(ROW_VERSION_FIELD_NAME)
            .map_err(|e| StoreError::Write(format!("Failed to parse {}: {}", ROW_VERSION_FIELD_NAME, e)))?;

        Ok(FlatContent {
            updated_at: Some(updated_at),
            row_version,
            ..record
        })
    }
}

fn row_to_content(row: &PgRow) -> Result<FlatContent, StoreError> {
    let text = |column: &str| -> Result<Option<String>, StoreError> {
        row.try_get(column)
            .map_err(|e| StoreError::Read(format!("Failed to parse {}: {}", column, e)))
    };

    let extra_content: Option<Json<Value>> = row
        .try_get(EXTRA_CONTENT_FIELD_NAME)
        .map_err(|e| StoreError::Read(format!("Failed to parse {}: {}", EXTRA_CONTENT_FIELD_NAME, e)))?;
    let extra_content = match extra_content.map(|json| json.0) {
        Some(Value::Object(fields)) => fields,
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            tracing::warn!("{} is not a JSON object, ignoring it", EXTRA_CONTENT_FIELD_NAME);
            Map::new()
        }
    };

    let updated_at: Option<DateTime<Utc>> = row
        .try_get(UPDATED_FIELD_NAME)
        .map_err(|e| StoreError::Read(format!("Failed to parse {}: {}", UPDATED_FIELD_NAME, e)))?;
    let row_version: i64 = row
        .try_get(ROW_VERSION_FIELD_NAME)
        .map_err(|e| StoreError::Read(format!("Failed to parse {}: {}", ROW_VERSION_FIELD_NAME, e)))?;

    Ok(FlatContent {
        vision: text(VISION_FIELD_NAME)?,
        mission: text(MISSION_FIELD_NAME)?,
        history: text(HISTORY_FIELD_NAME)?,
        contact_email: text(CONTACT_EMAIL_FIELD_NAME)?,
        contact_phone: text(CONTACT_PHONE_FIELD_NAME)?,
        extra_content,
        updated_at,
        row_version,
    })
}
