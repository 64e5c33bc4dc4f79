#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Drives the evaluation worker for one student and collects per-case
//! outcomes.

use std::time::Duration;

use anyhow::{Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::{config, constants::WORKER_HARNESS, loader::EvaluationContext, process, util};

/// Outcome classification for a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// The case ran to completion.
    Passed,
    /// An assertion failed.
    Failed,
    /// The case raised outside its expected failure mechanism.
    Errored,
}

/// One case's reported result.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Method name, as `unittest` reports it.
    pub name:   String,
    /// How the case finished.
    pub status: CaseStatus,
    /// Diagnostic traceback for failed or errored cases.
    pub trace:  Option<String>,
}

/// What one student's evaluation produced.
#[derive(Debug)]
pub enum SubjectReport {
    /// A subject (or the test module) could not be imported; the suite was
    /// never run.
    LoadFailed {
        /// The subpath or file that failed to import.
        subject: String,
        /// Import diagnostic.
        trace:   String,
    },
    /// The worker exceeded its deadline and was killed.
    TimedOut {
        /// The deadline that was enforced.
        limit: Duration,
    },
    /// Every collected case was attempted.
    Completed {
        /// Per-case outcomes, in emission order.
        outcomes: Vec<CaseOutcome>,
    },
}

/// Wire format of the events the worker emits, one JSON object per line.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WorkerEvent {
    /// A subject or test-module import failed.
    LoadError {
        /// The subpath or file that failed to import.
        subject: String,
        /// Import diagnostic.
        trace:   String,
    },
    /// A test case finished.
    Case {
        /// Method name.
        name:   String,
        /// How the case finished.
        status: CaseStatus,
        /// Traceback, for failed and errored cases.
        trace:  Option<String>,
    },
    /// The suite ran to completion.
    Done,
}

/// Runs the evaluation worker for one student and folds its event stream
/// into a report. Every case the suite collects is attempted regardless of
/// other cases' outcomes; a missing subject file short-circuits without
/// spawning an interpreter.
pub async fn run(context: &EvaluationContext) -> Result<SubjectReport> {
    if let Err(load) = context.probe() {
        return Ok(SubjectReport::LoadFailed {
            subject: load.subject().to_string(),
            trace:   load.to_string(),
        });
    }

    let python = util::python_path()?;
    let limit = config::get().timeout;
    debug!(
        "evaluating {} (units {:?})",
        context.student_id(),
        context.unit_names()
    );

    let collected = process::run_collect(
        &python,
        &context.worker_args(),
        WORKER_HARNESS.as_bytes().to_vec(),
        None,
        limit,
    )
    .await?;

    let collected = match collected {
        Some(collected) => collected,
        None => {
            debug!("worker for {} hit the {:?} deadline", context.student_id(), limit);
            return Ok(SubjectReport::TimedOut { limit });
        }
    };

    parse_events(context, &collected)
}

/// Parses the worker's stdout into a report. Student code is free to print
/// to stdout, so lines that do not parse as events are skipped.
fn parse_events(
    context: &EvaluationContext,
    collected: &process::Collected,
) -> Result<SubjectReport> {
    let stdout = String::from_utf8_lossy(&collected.stdout);

    let mut outcomes = Vec::new();
    let mut done = false;

    for line in stdout.lines() {
        let event: WorkerEvent = match serde_json::from_str(line.trim()) {
            Ok(event) => event,
            Err(_) => continue,
        };

        match event {
            WorkerEvent::LoadError { subject, trace } => {
                return Ok(SubjectReport::LoadFailed { subject, trace });
            }
            WorkerEvent::Case {
                name,
                status,
                trace,
            } => outcomes.push(CaseOutcome {
                name,
                status,
                trace,
            }),
            WorkerEvent::Done => done = true,
        }
    }

    if !done {
        let stderr = String::from_utf8_lossy(&collected.stderr);
        bail!(
            "worker for {} exited ({}) without completing the evaluation protocol:\n{}",
            context.student_id(),
            collected.status,
            stderr.trim()
        );
    }

    Ok(SubjectReport::Completed { outcomes })
}
