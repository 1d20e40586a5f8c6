// Progress reporting

use crate::cli::progress::{ProgressEvent, ProgressReporter};

#[test]
fn test_first_report_is_emitted() {
    let mut reporter = ProgressReporter::silent(10);
    assert_eq!(
        reporter.report(3),
        Some(ProgressEvent::Progress {
            processed: 3,
            total: 10
        })
    );
}

#[test]
fn test_rapid_reports_are_throttled_until_done() {
    let mut reporter = ProgressReporter::silent(100);
    assert!(reporter.report(10).is_some());
    assert!(reporter.report(20).is_none());
    // The final count is always reported
    assert!(reporter.report(100).is_some());
}

#[test]
fn test_complete_reports_parameter_total() {
    let reporter = ProgressReporter::silent(2);
    match reporter.complete(7) {
        ProgressEvent::Completed { total_params, .. } => assert_eq!(total_params, 7),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_printing_reporter_runs() {
    let mut reporter = ProgressReporter::new(0);
    reporter.report(0);
    reporter.complete(0);
}
