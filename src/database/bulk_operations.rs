// Bulk writes: module catalog and extracted parameters

use super::*;
use crate::discovery::Routine;
use anyhow::Result;
use paramparser_scanner::ParameterRecord;
use rusqlite::params;
use tracing::{debug, info};

impl ParamDatabase {
    /// Replace every stored parameter of `database_name` with `records`.
    ///
    /// Runs in one transaction. Rows are keyed by (database, object, name), so
    /// a name repeated within one routine keeps the later record.
    pub fn bulk_store_params(
        &mut self,
        database_name: &str,
        records: &[ParameterRecord],
    ) -> Result<usize> {
        let start_time = std::time::Instant::now();
        let extracted_at = chrono::Utc::now().timestamp();

        info!(
            "Storing {} parameter records for database {}",
            records.len(),
            database_name
        );

        let tx = self.conn.transaction()?;

        let cleared = tx.execute(
            "DELETE FROM module_params WHERE database_name = ?1",
            params![database_name],
        )?;
        debug!("Cleared {} previous parameter rows", cleared);

        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO module_params
                 (database_name, object_id, name, default_value, extracted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for record in records {
                stmt.execute(params![
                    database_name,
                    record.object_id.0,
                    record.name,
                    record.default_value,
                    extracted_at
                ])?;
                written += 1;

                if written % 5000 == 0 {
                    debug!("Bulk insert progress: {}/{} records", written, records.len());
                }
            }
        }

        tx.commit()?;

        info!(
            "Stored {} parameter records in {:.2}ms",
            written,
            start_time.elapsed().as_secs_f64() * 1000.0
        );
        Ok(written)
    }

    /// Insert or update catalog rows for `routines`
    pub fn store_modules(&mut self, database_name: &str, routines: &[Routine]) -> Result<usize> {
        if routines.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO modules
                 (database_name, object_id, name, type, definition)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for routine in routines {
                stmt.execute(params![
                    database_name,
                    routine.object_id.0,
                    routine.name,
                    routine.kind.as_code(),
                    routine.definition
                ])?;
            }
        }
        tx.commit()?;

        debug!(
            "Stored {} modules for database {}",
            routines.len(),
            database_name
        );
        Ok(routines.len())
    }
}
