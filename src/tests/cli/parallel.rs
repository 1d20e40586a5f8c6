// Parallel scanning: ordering, batching, file scans, diagnostics

use crate::cli::parallel::{ParallelScanner, ScanConfig};
use crate::discovery::{DirectorySource, Routine, RoutineKind, RoutineSource};
use crate::config::ParamParserConfig;
use crate::tests::routines_fixture_dir;
use paramparser_scanner::{ObjectId, ParameterRecord, extract_parameters};
use serial_test::serial;

fn scanner(num_threads: usize, batch_size: usize) -> ParallelScanner {
    ParallelScanner::new(ScanConfig {
        num_threads,
        batch_size,
        show_progress: false,
    })
}

fn synthetic_routines(count: usize) -> Vec<Routine> {
    (0..count)
        .map(|i| Routine {
            object_id: ObjectId(i as i64),
            name: format!("dbo.p{}", i),
            kind: RoutineKind::Procedure,
            definition: format!(
                "CREATE PROCEDURE dbo.p{i} @first INT = {i}, @second NVARCHAR(10) = N'v{i}', @third BIT AS SELECT 1"
            ),
        })
        .collect()
}

fn sequential(routines: &[Routine]) -> Vec<ParameterRecord> {
    routines
        .iter()
        .flat_map(|r| extract_parameters(r.object_id, &r.definition).records)
        .collect()
}

#[test]
#[serial]
fn test_output_order_matches_input_for_any_batching() {
    let routines = synthetic_routines(57);
    let expected = sequential(&routines);
    assert_eq!(expected.len(), 57 * 3);

    for (threads, batch_size) in [(1, 1), (2, 5), (4, 16), (8, 100)] {
        let records = scanner(threads, batch_size).scan_routines(&routines).unwrap();
        assert_eq!(records, expected, "threads={} batch_size={}", threads, batch_size);
    }
}

#[test]
#[serial]
fn test_report_counts_routines() {
    let routines = synthetic_routines(5);
    let report = scanner(2, 2).scan_report(&routines).unwrap();
    assert_eq!(report.routines, 5);
    assert_eq!(report.records.len(), 15);
    assert_eq!(report.partial_routines, 0);
    assert_eq!(report.records[1].default_value, "N'v0'");
}

#[test]
#[serial]
fn test_empty_input() {
    let report = scanner(2, 10).scan_report(&[]).unwrap();
    assert_eq!(report.routines, 0);
    assert!(report.records.is_empty());
}

#[test]
#[serial]
fn test_lexer_failure_marks_routine_partial() {
    let routines = vec![Routine {
        object_id: ObjectId(1),
        name: "broken".to_string(),
        kind: RoutineKind::Procedure,
        definition: "CREATE PROCEDURE broken @a INT = 4 AS SELECT 'unterminated".to_string(),
    }];

    let report = scanner(1, 1).scan_report(&routines).unwrap();
    assert_eq!(report.partial_routines, 1);
}

#[test]
#[serial]
fn test_scan_fixture_directory() {
    let source =
        DirectorySource::new(routines_fixture_dir(), &ParamParserConfig::default()).unwrap();
    let routines = source.routines().unwrap();
    let records = scanner(4, 1).scan_routines(&routines).unwrap();

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
            ("@Region", "N'EU'"),
            ("@CustomerId", ""),
            ("@Status", "'open'"),
            ("@Limit", "100"),
            ("@Since", "NULL"),
            ("@Before", ""),
            ("@BatchSize", "500"),
            ("@DryRun", "1"),
        ]
    );
}

#[test]
#[serial]
fn test_scan_file_uses_every_batch() {
    let path = routines_fixture_dir().join("orders.sql");
    let records = scanner(2, 10).scan_file(&path).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["@CustomerId", "@Status", "@Limit", "@Since", "@Before", "@BatchSize", "@DryRun"]
    );
    assert!(scanner(1, 1).scan_file(&routines_fixture_dir().join("missing.sql")).is_err());
}
