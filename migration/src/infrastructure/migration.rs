use site_common::database::Database;

use crate::{
    domain::migration::{Migration, MigrationStep, migration_steps},
    infrastructure::tables::TablesAdapter,
};

#[derive(Clone)]
pub struct MigrationAdapter {
    tables: TablesAdapter,
    database: &'static Database,
}

impl MigrationAdapter {
    pub fn new(tables: TablesAdapter, database: &'static Database) -> Self {
        Self { tables, database }
    }
}

impl Migration for MigrationAdapter {
    async fn migrate(&self) -> Result<(), anyhow::Error> {
        let database_schema = self.database.database_schema();
        let steps = migration_steps(database_schema, &self.tables).await?;

        for step in steps {
            let ctx = step.ctx();
            self.database.execute_in_transaction(step.ddls(), ctx).await?;
        }

        Ok(())
    }
}
