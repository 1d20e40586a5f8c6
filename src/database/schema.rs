// Database schema initialization and table creation

use super::*;
use anyhow::Result;
use tracing::debug;

impl ParamDatabase {
    pub(super) fn initialize_schema(&mut self) -> Result<()> {
        debug!("Creating database schema");

        self.create_modules_table()?;
        self.create_module_params_table()?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Module catalog: one row per procedure/function of a target database
    fn create_modules_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS modules (
                database_name TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('P', 'FN')),
                definition TEXT NOT NULL,
                PRIMARY KEY (database_name, object_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_modules_name ON modules(database_name, name)",
            [],
        )?;

        debug!("Created modules table and indexes");
        Ok(())
    }

    /// Extracted parameters; a repeated name within one module keeps its last row
    fn create_module_params_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS module_params (
                database_name TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                default_value TEXT NOT NULL DEFAULT '',
                extracted_at INTEGER NOT NULL,
                PRIMARY KEY (database_name, object_id, name)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_module_params_object ON module_params(object_id)",
            [],
        )?;

        debug!("Created module_params table and indexes");
        Ok(())
    }
}
