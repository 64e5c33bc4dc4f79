#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # autograde
//!
//! Grades Python assignment submissions against an instructor-authored
//! `unittest` file and separately ranks submission pairs by content
//! similarity.
//!
//! Each student's code runs in its own short-lived worker interpreter with
//! a hard deadline, so a broken or hanging submission costs that student
//! their points, never the run.

use std::{collections::HashMap, fs::File, path::PathBuf};

use anyhow::{Context, Result};
use autograde::{
    deduct::PointPolicy,
    grade::{GradeRow, Grader, write_record},
    roster, similarity,
    suite::TestSuite,
    util,
};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use tabled::{Table, settings::Style};
use tracing::{Level, info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Arguments of the `grade` subcommand.
#[derive(Debug, Clone)]
struct GradeArgs {
    /// Test-specification file.
    test:          PathBuf,
    /// Students TSV file.
    students:      PathBuf,
    /// Grade output file (line-delimited JSON).
    output:        PathBuf,
    /// Directory holding student submission trees.
    workdir:       PathBuf,
    /// Optional extra-deductions TSV file.
    extra:         Option<PathBuf>,
    /// Reject the suite when a case declares no point value.
    strict_points: bool,
}

/// Arguments of the `cheat` subcommand.
#[derive(Debug, Clone)]
struct CheatArgs {
    /// Test-specification file.
    test:     PathBuf,
    /// Students TSV file.
    students: PathBuf,
    /// Similarity output file (tab-separated).
    output:   PathBuf,
    /// Directory holding student submission trees.
    workdir:  PathBuf,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade every student and write grade records.
    Grade(GradeArgs),
    /// Rank submission pairs by similarity.
    Cheat(CheatArgs),
}

/// Parses the test-specification option, shared by both subcommands.
fn test_file() -> impl Parser<PathBuf> {
    long("test")
        .short('t')
        .help("File containing Python tests for grading")
        .argument::<PathBuf>("FILE")
}

/// Parses the students-file option, shared by both subcommands.
fn students_file() -> impl Parser<PathBuf> {
    long("students")
        .short('s')
        .help("Students TSV file [default: students.tsv]")
        .argument::<PathBuf>("FILE")
        .fallback(PathBuf::from("students.tsv"))
}

/// Parses the work-directory option, shared by both subcommands.
fn workdir() -> impl Parser<PathBuf> {
    long("workdir")
        .short('w')
        .help("Directory storing student submissions [default: students]")
        .argument::<PathBuf>("DIR")
        .fallback(PathBuf::from("students"))
}

/// Parses the output-file option with a per-command default.
fn output(default: &'static str) -> impl Parser<PathBuf> {
    long("output")
        .short('o')
        .help("Output file")
        .argument::<PathBuf>("FILE")
        .fallback(PathBuf::from(default))
}

/// Builds the `grade` argument parser.
fn grade_args() -> impl Parser<GradeArgs> {
    let test = test_file();
    let students = students_file();
    let output = output("grades.json");
    let workdir = workdir();
    let extra = long("extra")
        .short('e')
        .help("File containing extra deductions, tab-separated: id points reason")
        .argument::<PathBuf>("FILE")
        .optional();
    let strict_points = long("strict-points")
        .help("Reject the test file if any case declares no @points value")
        .switch();
    construct!(GradeArgs {
        test,
        students,
        output,
        workdir,
        extra,
        strict_points
    })
}

/// Builds the `cheat` argument parser.
fn cheat_args() -> impl Parser<CheatArgs> {
    let test = test_file();
    let students = students_file();
    let output = output("cheats.tsv");
    let workdir = workdir();
    construct!(CheatArgs {
        test,
        students,
        output,
        workdir
    })
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    let grade = grade_args()
        .to_options()
        .command("grade")
        .help("Grade an assignment, writing one JSON record per student")
        .map(Cmd::Grade);

    let cheat = cheat_args()
        .to_options()
        .command("cheat")
        .help("Rank submission pairs by content similarity")
        .map(Cmd::Cheat);

    construct!([grade, cheat])
        .to_options()
        .descr("Autograder for Python assignments")
        .run()
}

/// Runs the grading pipeline, persisting each record as it completes.
async fn run_grade(args: GradeArgs) -> Result<()> {
    let suite = TestSuite::from_file(&args.test)?;
    let policy = if args.strict_points {
        suite.require_declared_points()?;
        PointPolicy::Strict
    } else {
        PointPolicy::Lenient
    };

    let students = roster::read_students(&args.students)?;
    info!("read {} students", students.len());

    let extra = match args.extra.as_ref() {
        Some(path) => roster::read_extra_deductions(path)?,
        None => HashMap::new(),
    };

    // Fail before touching any student if there is no interpreter to run
    // the workers with.
    util::python_path()?;

    let mut out = File::create(&args.output)
        .with_context(|| format!("Could not create {}", args.output.display()))?;

    let mut grader = Grader::builder()
        .suite(suite)
        .students(students)
        .workdir(args.workdir.clone())
        .extra(extra)
        .policy(policy)
        .build();

    let mut rows = Vec::new();
    while let Some(record) = grader.next_record().await {
        write_record(&mut out, &record)?;
        rows.push(GradeRow::from(&record));
    }

    info!("saved results in {}", args.output.display());

    println!("{}", "Grading summary".bold());
    let mut table = Table::new(&rows);
    table.with(Style::sharp());
    println!("{table}");

    Ok(())
}

/// Runs the similarity pipeline.
fn run_cheat(args: CheatArgs) -> Result<()> {
    let suite = TestSuite::from_file(&args.test)?;
    let students = roster::read_students(&args.students)?;
    info!("read {} students", students.len());

    let corpus =
        similarity::collect_corpus(&students, &suite.metadata().files_to_test, &args.workdir);
    let vectors = similarity::vectorize(&corpus);
    let pairs = similarity::rank(&vectors);

    let mut out = File::create(&args.output)
        .with_context(|| format!("Could not create {}", args.output.display()))?;
    similarity::write_pairs(&mut out, &pairs)?;

    info!("saved results in {}", args.output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Grade(args) => run_grade(args).await,
        Cmd::Cheat(args) => run_cheat(args),
    }
}
