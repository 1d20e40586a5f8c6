// Catalog and parameter queries

use super::*;
use crate::discovery::{Routine, RoutineKind};
use anyhow::Result;
use paramparser_scanner::ObjectId;
use rusqlite::{Row, params};

impl ParamDatabase {
    /// Procedures and functions of `database_name` that may declare parameters,
    /// ordered by object id
    pub fn get_modules_with_params(&self, database_name: &str) -> Result<Vec<Routine>> {
        let mut stmt = self.conn.prepare(
            "SELECT object_id, name, type, definition
             FROM modules
             WHERE database_name = ?1
               AND type IN ('P', 'FN')
               AND instr(definition, '@') > 0
             ORDER BY object_id",
        )?;

        let rows = stmt.query_map(params![database_name], row_to_routine)?;

        let mut routines = Vec::new();
        for row in rows {
            routines.push(row?);
        }
        Ok(routines)
    }

    /// Stored parameters of `database_name` in object and name order
    pub fn get_params(&self, database_name: &str) -> Result<Vec<StoredParam>> {
        let mut stmt = self.conn.prepare(
            "SELECT database_name, object_id, name, default_value, extracted_at
             FROM module_params
             WHERE database_name = ?1
             ORDER BY object_id, name",
        )?;

        let rows = stmt.query_map(params![database_name], |row| {
            Ok(StoredParam {
                database_name: row.get(0)?,
                object_id: ObjectId(row.get(1)?),
                name: row.get(2)?,
                default_value: row.get(3)?,
                extracted_at: row.get(4)?,
            })
        })?;

        let mut stored = Vec::new();
        for row in rows {
            stored.push(row?);
        }
        Ok(stored)
    }

    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let total_modules: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM modules", [], |row| row.get(0))?;

        let total_params: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM module_params", [], |row| row.get(0))?;

        let params_with_defaults: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM module_params WHERE default_value <> ''",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT database_name FROM modules
             UNION
             SELECT database_name FROM module_params
             ORDER BY database_name",
        )?;
        let database_names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(DatabaseStats {
            total_modules,
            total_params,
            params_with_defaults,
            database_names,
        })
    }
}

fn row_to_routine(row: &Row) -> rusqlite::Result<Routine> {
    let code: String = row.get(2)?;
    let kind = RoutineKind::from_code(&code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown module type '{}'", code).into(),
        )
    })?;

    Ok(Routine {
        object_id: ObjectId(row.get(0)?),
        name: row.get(1)?,
        kind,
        definition: row.get(3)?,
    })
}
