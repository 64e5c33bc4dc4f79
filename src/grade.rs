#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grade aggregation: one record per student, produced lazily in roster
//! order so callers can persist each record as it completes.

use std::{collections::HashMap, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tabled::Tabled;
use tracing::{error, info};
use typed_builder::TypedBuilder;

use crate::{
    deduct::{self, Deduction, PointPolicy},
    loader::EvaluationContext,
    roster::Student,
    runner::{self, SubjectReport},
    suite::TestSuite,
};

/// The persisted per-student, per-assignment evaluation outcome.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRecord {
    /// The student this record belongs to.
    pub student:         Student,
    /// Relative paths of the files that were tested.
    pub assignment:      Vec<String>,
    /// Wall-clock time the record was produced.
    pub time_graded:     String,
    /// Maximum points for the assignment.
    pub possible_points: f64,
    /// Itemized deductions, automatic first, then manual.
    pub deductions:      Vec<Deduction>,
    /// Final grade: `max(0, possible_points - Σ points)`.
    pub grade:           f64,
}

/// Grades students one at a time, in roster order.
#[derive(TypedBuilder)]
pub struct Grader {
    /// The parsed test suite.
    suite:    TestSuite,
    /// Students to grade, in input order.
    students: Vec<Student>,
    /// Directory holding the student submission trees.
    workdir:  PathBuf,
    /// Manual deductions keyed by student identifier.
    #[builder(default)]
    extra:    HashMap<String, Vec<Deduction>>,
    /// Policy for failing cases with no declared point value.
    #[builder(default)]
    policy:   PointPolicy,
    /// Index of the next student to grade.
    #[builder(default, setter(skip))]
    cursor:   usize,
}

impl Grader {
    /// Grades the next student and returns their record, or `None` once the
    /// roster is exhausted. Never drops a student: when an evaluation fails
    /// unexpectedly, the record documents the failure as a full deduction.
    pub async fn next_record(&mut self) -> Option<GradeRecord> {
        let student = self.students.get(self.cursor)?.clone();
        self.cursor += 1;

        info!("grading {}", student.id);
        let possible = self.suite.metadata().possible_points;

        let mut deductions = match self.evaluate(&student).await {
            Ok(deductions) => deductions,
            Err(err) => {
                error!("evaluation of {} failed: {err:#}", student.id);
                vec![Deduction {
                    summary: "evaluation failed".to_string(),
                    trace:   format!("{err:#}"),
                    points:  possible,
                }]
            }
        };

        if let Some(manual) = self.extra.get(&student.id) {
            deductions.extend(manual.iter().cloned());
        }

        let lost: f64 = deductions.iter().map(|d| d.points).sum();

        Some(GradeRecord {
            student,
            assignment: self.suite.metadata().files_to_test.clone(),
            time_graded: chrono::Local::now()
                .format("%a %b %e %H:%M:%S %Y")
                .to_string(),
            possible_points: possible,
            deductions,
            grade: (possible - lost).max(0.0),
        })
    }

    /// Evaluates one student inside a fresh context and maps the report to
    /// automatic deductions.
    async fn evaluate(&self, student: &Student) -> Result<Vec<Deduction>> {
        let possible = self.suite.metadata().possible_points;
        let context = EvaluationContext::new(student, &self.workdir, &self.suite);

        let report = runner::run(&context).await?;
        Ok(match report {
            SubjectReport::LoadFailed { subject, trace } => {
                vec![deduct::load_failure(&subject, &trace, possible)]
            }
            SubjectReport::TimedOut { limit } => {
                vec![deduct::timed_out(limit, possible)]
            }
            SubjectReport::Completed { outcomes } => {
                deduct::deduct_failures(&self.suite, &outcomes, self.policy)?
            }
        })
    }
}

/// Appends one record to the line-delimited JSON output and flushes, so a
/// mid-run failure loses nothing already graded.
pub fn write_record(out: &mut impl Write, record: &GradeRecord) -> Result<()> {
    let json = serde_json::to_string(record).context("Could not serialize grade record")?;
    writeln!(out, "{json}").context("Could not write grade record")?;
    out.flush().context("Could not flush grade output")?;
    Ok(())
}

/// One row of the end-of-run summary table.
#[derive(Tabled)]
pub struct GradeRow {
    /// Student identifier.
    #[tabled(rename = "Student")]
    student:    String,
    /// Grade as `earned/possible`.
    #[tabled(rename = "Grade")]
    grade:      String,
    /// Number of recorded deductions.
    #[tabled(rename = "Deductions")]
    deductions: usize,
}

impl From<&GradeRecord> for GradeRow {
    fn from(record: &GradeRecord) -> Self {
        Self {
            student:    record.student.id.clone(),
            grade:      format!("{:.2}/{:.2}", record.grade, record.possible_points),
            deductions: record.deductions.len(),
        }
    }
}
