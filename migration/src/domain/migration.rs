use std::future::Future;

use crate::domain::tables::{Column, Table, Tables, required_tables};

pub trait Migration: Send + Sync + Clone + 'static {
    fn migrate(&self) -> impl Future<Output = Result<(), anyhow::Error>>;
}

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// Steps creating every required table that is missing.
pub async fn migration_steps(
    database_schema: &str,
    tables: &impl Tables,
) -> Result<Vec<CreateTableStep>, anyhow::Error> {
    let actual_schema = tables.load().await?;

    let mut result = Vec::new();
    for table in required_tables() {
        if actual_schema.contains(&table.name) {
            tracing::info!("table {} already exists", table.name);
        } else {
            result.push(CreateTableStep::new(database_schema, &table));
        }
    }

    Ok(result)
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    vec![table_ddl]
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    sql
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Clone)]
    struct KnownTables(Vec<&'static str>);

    impl Tables for KnownTables {
        async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
            Ok(self.0.iter().map(|name| name.to_string()).collect())
        }
    }

    #[test]
    fn site_content_ddl() {
        let table = required_tables().remove(0);
        let ddls = create_table_ddl("public", &table);

        assert_eq!(ddls.len(), 1);
        let ddl = &ddls[0];
        assert!(ddl.starts_with("CREATE TABLE \"public\".\"site_content\""));
        assert!(ddl.contains("\"extra_content\" JSONB NOT NULL DEFAULT '{}'::jsonb"));
        assert!(ddl.contains("\"row_version\" BIGINT NOT NULL DEFAULT 0"));
        assert!(ddl.contains("PRIMARY KEY(\"site_id\")"));
    }

    #[tokio::test]
    async fn existing_tables_are_skipped() {
        let steps = migration_steps("public", &KnownTables(vec!["site_content"]))
            .await
            .unwrap();
        assert!(steps.is_empty());
    }

    #[tokio::test]
    async fn missing_tables_are_created() {
        let steps = migration_steps("public", &KnownTables(vec!["other"]))
            .await
            .unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].ctx(), "CREATE TABLE");
    }
}
