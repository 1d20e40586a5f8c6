// Database tests: catalog storage, parameter persistence, stats

use crate::database::ParamDatabase;
use crate::discovery::{Routine, RoutineKind};
use paramparser_scanner::{ObjectId, ParameterRecord};
use tempfile::TempDir;

fn record(object_id: i64, name: &str, default_value: &str) -> ParameterRecord {
    ParameterRecord {
        object_id: ObjectId(object_id),
        name: name.to_string(),
        default_value: default_value.to_string(),
    }
}

fn routine(object_id: i64, name: &str, kind: RoutineKind, definition: &str) -> Routine {
    Routine {
        object_id: ObjectId(object_id),
        name: name.to_string(),
        kind,
        definition: definition.to_string(),
    }
}

fn open_temp_db() -> (TempDir, ParamDatabase) {
    let temp = TempDir::new().unwrap();
    let db = ParamDatabase::new(temp.path().join("params.db")).unwrap();
    (temp, db)
}

#[test]
fn test_new_database_is_empty() {
    let (_temp, db) = open_temp_db();
    let stats = db.get_stats().unwrap();
    assert_eq!(stats.total_modules, 0);
    assert_eq!(stats.total_params, 0);
    assert!(stats.database_names.is_empty());
}

#[test]
fn test_reopen_keeps_schema_and_rows() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("params.db");

    {
        let mut db = ParamDatabase::new(&path).unwrap();
        db.bulk_store_params("Sales", &[record(1, "@a", "5")]).unwrap();
    }

    let db = ParamDatabase::new(&path).unwrap();
    assert_eq!(db.get_params("Sales").unwrap().len(), 1);
    assert_eq!(db.file_path(), path.as_path());
}

#[test]
fn test_bulk_store_params_round_trip() {
    let (_temp, mut db) = open_temp_db();

    let written = db
        .bulk_store_params(
            "Sales",
            &[record(2, "@b", ""), record(1, "@a", "'x'"), record(2, "@c", "NULL")],
        )
        .unwrap();
    assert_eq!(written, 3);

    let stored = db.get_params("Sales").unwrap();
    let rows: Vec<(i64, &str, &str)> = stored
        .iter()
        .map(|p| (p.object_id.0, p.name.as_str(), p.default_value.as_str()))
        .collect();
    assert_eq!(rows, vec![(1, "@a", "'x'"), (2, "@b", ""), (2, "@c", "NULL")]);
    assert!(stored.iter().all(|p| p.database_name == "Sales"));
    assert!(stored.iter().all(|p| p.extracted_at > 0));
}

#[test]
fn test_repeated_name_keeps_last_record() {
    let (_temp, mut db) = open_temp_db();

    db.bulk_store_params("Sales", &[record(1, "@a", "1"), record(1, "@a", "2")])
        .unwrap();

    let stored = db.get_params("Sales").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].default_value, "2");
}

#[test]
fn test_store_replaces_previous_run_for_same_database_only() {
    let (_temp, mut db) = open_temp_db();

    db.bulk_store_params("Sales", &[record(1, "@old", "")]).unwrap();
    db.bulk_store_params("Hr", &[record(9, "@keep", "1")]).unwrap();
    db.bulk_store_params("Sales", &[record(1, "@new", "3")]).unwrap();

    let sales = db.get_params("Sales").unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].name, "@new");
    assert_eq!(db.get_params("Hr").unwrap().len(), 1);
}

#[test]
fn test_store_modules_and_query_modules_with_params() {
    let (_temp, mut db) = open_temp_db();

    let routines = vec![
        routine(30, "dbo.p3", RoutineKind::Procedure, "CREATE PROCEDURE dbo.p3 @a INT AS SELECT 1"),
        routine(10, "dbo.f1", RoutineKind::Function, "CREATE FUNCTION dbo.f1(@x INT) RETURNS INT AS BEGIN RETURN @x END"),
        routine(20, "dbo.none", RoutineKind::Procedure, "CREATE PROCEDURE dbo.none AS SELECT 1"),
    ];
    assert_eq!(db.store_modules("Sales", &routines).unwrap(), 3);
    assert_eq!(db.store_modules("Sales", &[]).unwrap(), 0);

    let found = db.get_modules_with_params("Sales").unwrap();
    let ids: Vec<i64> = found.iter().map(|r| r.object_id.0).collect();
    assert_eq!(ids, vec![10, 30]);
    assert_eq!(found[0], routines[1]);
    assert_eq!(found[1].kind, RoutineKind::Procedure);
}

#[test]
fn test_store_modules_updates_existing_definition() {
    let (_temp, mut db) = open_temp_db();

    db.store_modules("Sales", &[routine(1, "p", RoutineKind::Procedure, "CREATE PROCEDURE p AS SELECT 1")])
        .unwrap();
    assert!(db.get_modules_with_params("Sales").unwrap().is_empty());

    db.store_modules("Sales", &[routine(1, "p", RoutineKind::Procedure, "CREATE PROCEDURE p @a INT AS SELECT 1")])
        .unwrap();
    assert_eq!(db.get_modules_with_params("Sales").unwrap().len(), 1);
}

#[test]
fn test_stats_count_rows_and_names() {
    let (_temp, mut db) = open_temp_db();

    db.store_modules("Sales", &[routine(1, "p", RoutineKind::Procedure, "CREATE PROCEDURE p @a INT = 1 AS SELECT 1")])
        .unwrap();
    db.bulk_store_params("Sales", &[record(1, "@a", "1"), record(1, "@b", "")])
        .unwrap();
    db.bulk_store_params("Archive", &[record(5, "@c", "")]).unwrap();

    let stats = db.get_stats().unwrap();
    assert_eq!(stats.total_modules, 1);
    assert_eq!(stats.total_params, 3);
    assert_eq!(stats.params_with_defaults, 1);
    assert_eq!(stats.database_names, vec!["Archive", "Sales"]);
}

#[test]
fn test_checkpoint_wal_succeeds() {
    let (_temp, mut db) = open_temp_db();
    db.bulk_store_params("Sales", &[record(1, "@a", "")]).unwrap();
    let (busy, _, _) = db.checkpoint_wal().unwrap();
    assert_eq!(busy, 0);
}

#[test]
fn test_open_existing_requires_the_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.db");

    assert!(ParamDatabase::open_existing(&path).is_err());
    assert!(!path.exists());

    ParamDatabase::new(&path).unwrap();
    let db = ParamDatabase::open_existing(&path).unwrap();
    assert_eq!(db.get_stats().unwrap().total_modules, 0);
}
