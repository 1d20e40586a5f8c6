// Command flows: scan, file, catalog, init with captured stdout

use crate::cli::commands::{run_catalog, run_file, run_init, run_scan};
use crate::cli::output::OutputFormat;
use crate::config::ParamParserConfig;
use crate::database::ParamDatabase;
use crate::discovery::routines_from_script;
use crate::tests::routines_fixture_dir;
use paramparser_scanner::ParameterRecord;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn sales_config() -> ParamParserConfig {
    ParamParserConfig {
        database_name: "Sales".to_string(),
        threads: Some(2),
        batch_size: 2,
        ..ParamParserConfig::default()
    }
}

fn output_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
#[serial]
fn test_catalog_missing_database_is_an_error_and_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("typo.db");
    let mut out = Vec::new();

    let err = run_catalog(&missing, &sales_config(), false, &mut out).unwrap_err();

    assert!(format!("{:#}", err).contains("Source not found"));
    assert!(!missing.exists());
    assert!(out.is_empty());
}

#[test]
#[serial]
fn test_catalog_without_modules_reports_none_found() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("catalog.db");
    ParamDatabase::new(&db_path).unwrap();

    let mut out = Vec::new();
    let report = run_catalog(&db_path, &sales_config(), false, &mut out).unwrap();

    assert!(report.is_none());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "No relevant modules found in Sales.\n"
    );
}

#[test]
#[serial]
fn test_catalog_saves_parameters_back_and_prints_success() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("catalog.db");
    let script = fs::read_to_string(routines_fixture_dir().join("orders.sql")).unwrap();
    {
        let mut db = ParamDatabase::new(&db_path).unwrap();
        db.store_modules("Sales", &routines_from_script("orders.sql", &script))
            .unwrap();
    }

    let mut out = Vec::new();
    let report = run_catalog(&db_path, &sales_config(), false, &mut out)
        .unwrap()
        .unwrap();
    assert_eq!(report.routines, 2);
    assert_eq!(report.records.len(), 7);

    let lines = output_lines(&out);
    assert_eq!(lines.len(), 2);
    let summary: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(summary["database_name"], "Sales");
    assert_eq!(summary["routines"], 2);
    assert_eq!(summary["parameters"], 7);
    assert_eq!(summary["with_defaults"], 5);
    assert_eq!(lines[1], "Success.");

    let db = ParamDatabase::open_existing(&db_path).unwrap();
    let stored = db.get_params("Sales").unwrap();
    assert_eq!(stored.len(), 7);
    assert!(
        stored
            .iter()
            .any(|p| p.name == "@Status" && p.default_value == "'open'")
    );
}

#[test]
#[serial]
fn test_scan_into_database_stores_modules_and_parameters() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("scan.db");

    let mut out = Vec::new();
    let report = run_scan(
        &routines_fixture_dir(),
        Some(&db_path),
        OutputFormat::Json,
        &sales_config(),
        false,
        &mut out,
    )
    .unwrap();
    assert_eq!(report.routines, 4);

    let lines = output_lines(&out);
    assert_eq!(lines.len(), 1);
    let summary: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(summary["routines"], 4);
    assert_eq!(summary["parameters"], 11);

    let db = ParamDatabase::open_existing(&db_path).unwrap();
    let stats = db.get_stats().unwrap();
    assert_eq!(stats.total_modules, 4);
    assert_eq!(stats.total_params, 11);
    assert_eq!(db.get_modules_with_params("Sales").unwrap().len(), 4);
}

#[test]
#[serial]
fn test_scan_to_stdout_as_ndjson() {
    let mut out = Vec::new();
    run_scan(
        &routines_fixture_dir(),
        None,
        OutputFormat::Ndjson,
        &sales_config(),
        false,
        &mut out,
    )
    .unwrap();

    let records: Vec<ParameterRecord> = output_lines(&out)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 11);
    assert_eq!(records[0].name, "@Amount");
    assert_eq!(records[10].name, "@DryRun");
}

#[test]
#[serial]
fn test_file_command_prints_json_array() {
    let mut out = Vec::new();
    run_file(
        &routines_fixture_dir().join("functions").join("tax.sql"),
        OutputFormat::Json,
        &mut out,
    )
    .unwrap();

    let records: Vec<ParameterRecord> = serde_json::from_slice(&out).unwrap();
    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.name.as_str(), r.default_value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("@Amount", ""),
            ("@Rate", "0.07"),
            ("@Days", "30"),
            ("@Region", "N'EU'")
        ]
    );
}

#[test]
fn test_init_writes_loadable_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("paramparser.toml");

    run_init(&path).unwrap();

    assert_eq!(
        ParamParserConfig::load(&path).unwrap(),
        ParamParserConfig::default()
    );
}
