#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Mapping of test outcomes and load failures to point deductions.

use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    runner::{CaseOutcome, CaseStatus},
    suite::TestSuite,
    util::first_line,
};

/// A point penalty tied to one failing test case or a manual adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    /// Case name plus the first line of its documentation, or the reason
    /// for a manual adjustment.
    pub summary: String,
    /// Diagnostic trace, augmented with the failing case's source when the
    /// case is registered in the suite table.
    pub trace:   String,
    /// Points lost. Never negative.
    pub points:  f64,
}

impl Deduction {
    /// A manual deduction supplied by the grader (late penalty, override).
    pub fn manual(points: f64, reason: &str) -> Self {
        Self {
            summary: reason.trim().to_string(),
            trace: String::new(),
            points,
        }
    }
}

/// How to treat a failing case whose docstring declares no `@points` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointPolicy {
    /// Record a zero-point deduction, so the failure stays visible in the
    /// grade record without costing anything.
    #[default]
    Lenient,
    /// Treat the missing declaration as a suite-authoring error.
    Strict,
}

/// The deduction recorded when a subject file cannot be imported: the full
/// point total, and the suite is never run.
pub fn load_failure(subject: &str, trace: &str, possible_points: f64) -> Deduction {
    Deduction {
        summary: format!("cannot import {subject}"),
        trace:   trace.to_string(),
        points:  possible_points,
    }
}

/// The deduction recorded when a student's worker exceeds its deadline.
pub fn timed_out(limit: Duration, possible_points: f64) -> Deduction {
    Deduction {
        summary: format!("evaluation timed out after {}s", limit.as_secs()),
        trace:   String::new(),
        points:  possible_points,
    }
}

/// Builds one deduction for a failing case, resolving its point value and
/// source through the suite's registration table.
fn deduction_for(
    suite: &TestSuite,
    outcome: &CaseOutcome,
    policy: PointPolicy,
) -> Result<Deduction> {
    let case = suite.case(&outcome.name);

    let points = match case.and_then(|case| case.points) {
        Some(points) => points,
        None => match policy {
            PointPolicy::Lenient => 0.0,
            PointPolicy::Strict => {
                bail!("case {} declares no @points value", outcome.name)
            }
        },
    };

    let summary = match case.and_then(|case| case.doc.as_deref()).and_then(first_line) {
        Some(line) => format!("{}: {}", outcome.name, line),
        None => outcome.name.clone(),
    };

    let diagnostic = outcome.trace.clone().unwrap_or_default();
    let trace = match case {
        Some(case) if !case.source.is_empty() => {
            format!("{}\nsource:\n{}", diagnostic, case.source)
        }
        _ => diagnostic,
    };

    Ok(Deduction {
        summary,
        trace,
        points,
    })
}

/// Accumulates one deduction per failed or errored case. Passed cases emit
/// nothing. Deductions follow the suite's registration order, so execution
/// order inside the worker never affects the output; outcomes the table
/// does not know (e.g. inherited test methods) are appended afterwards.
pub fn deduct_failures(
    suite: &TestSuite,
    outcomes: &[CaseOutcome],
    policy: PointPolicy,
) -> Result<Vec<Deduction>> {
    let mut deductions = Vec::new();

    for case in suite.cases() {
        if let Some(outcome) = outcomes.iter().find(|o| o.name == case.name)
            && outcome.status != CaseStatus::Passed
        {
            deductions.push(deduction_for(suite, outcome, policy)?);
        }
    }

    for outcome in outcomes {
        if outcome.status != CaseStatus::Passed && suite.case(&outcome.name).is_none() {
            deductions.push(deduction_for(suite, outcome, policy)?);
        }
    }

    Ok(deductions)
}
