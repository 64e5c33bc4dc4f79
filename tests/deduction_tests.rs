//! Tests for mapping case outcomes to point deductions.

use std::{path::PathBuf, time::Duration};

use autograde::{
    deduct::{self, PointPolicy},
    runner::{CaseOutcome, CaseStatus},
    suite::TestSuite,
};

fn suite() -> TestSuite {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("test_asg0.py");
    TestSuite::from_file(path).expect("build suite")
}

fn outcome(name: &str, status: CaseStatus, trace: Option<&str>) -> CaseOutcome {
    CaseOutcome {
        name:   name.to_string(),
        status,
        trace:  trace.map(str::to_string),
    }
}

#[test]
fn passed_cases_emit_nothing() {
    let outcomes = vec![
        outcome("test_simple_1", CaseStatus::Passed, None),
        outcome("test_add", CaseStatus::Passed, None),
    ];

    let deductions =
        deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Lenient).expect("map outcomes");
    assert!(deductions.is_empty());
}

#[test]
fn failed_case_costs_its_declared_points() {
    let outcomes = vec![
        outcome("test_simple_1", CaseStatus::Passed, None),
        outcome(
            "test_simple_2",
            CaseStatus::Failed,
            Some("AssertionError: False is not true"),
        ),
    ];

    let deductions =
        deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Lenient).expect("map outcomes");

    assert_eq!(deductions.len(), 1);
    assert_eq!(deductions[0].points, 4.0);
    assert!(deductions[0].summary.starts_with("test_simple_2"));
    assert!(deductions[0].trace.contains("AssertionError"));
    assert!(deductions[0].trace.contains("source:"));
    assert!(deductions[0].trace.contains("is_mammal('dog')"));
}

#[test]
fn summary_carries_first_doc_line() {
    let outcomes = vec![outcome(
        "test_simple_1",
        CaseStatus::Errored,
        Some("NameError: name 'is_mammal' is not defined"),
    )];

    let deductions =
        deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Lenient).expect("map outcomes");

    assert_eq!(
        deductions[0].summary,
        "test_simple_1: Checks a common mammal."
    );
}

#[test]
fn deductions_follow_registration_order() {
    // Emission order reversed relative to the suite source.
    let outcomes = vec![
        outcome("test_add", CaseStatus::Failed, Some("boom")),
        outcome("test_simple_1", CaseStatus::Failed, Some("boom")),
    ];

    let deductions =
        deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Lenient).expect("map outcomes");

    assert_eq!(deductions.len(), 2);
    assert!(deductions[0].summary.starts_with("test_simple_1"));
    assert!(deductions[1].summary.starts_with("test_add"));
}

#[test]
fn unregistered_failing_case_is_lenient_zero() {
    let outcomes = vec![outcome(
        "test_inherited",
        CaseStatus::Failed,
        Some("AssertionError"),
    )];

    let deductions =
        deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Lenient).expect("map outcomes");

    assert_eq!(deductions.len(), 1);
    assert_eq!(deductions[0].points, 0.0);
    assert_eq!(deductions[0].summary, "test_inherited");
}

#[test]
fn unregistered_failing_case_is_strict_error() {
    let outcomes = vec![outcome("test_inherited", CaseStatus::Failed, Some("boom"))];

    let err = deduct::deduct_failures(&suite(), &outcomes, PointPolicy::Strict).unwrap_err();
    assert!(err.to_string().contains("test_inherited"));
}

#[test]
fn load_failure_costs_everything() {
    let deduction = deduct::load_failure("asg0/asg0.py", "SyntaxError: invalid syntax", 20.0);

    assert_eq!(deduction.points, 20.0);
    assert_eq!(deduction.summary, "cannot import asg0/asg0.py");
    assert!(deduction.trace.contains("SyntaxError"));
}

#[test]
fn timeout_costs_everything() {
    let deduction = deduct::timed_out(Duration::from_secs(60), 20.0);

    assert_eq!(deduction.points, 20.0);
    assert_eq!(deduction.summary, "evaluation timed out after 60s");
}
