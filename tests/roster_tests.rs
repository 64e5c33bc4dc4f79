//! Tests for roster reading and manual deductions.

use std::{fs, path::PathBuf};

use autograde::roster::{read_extra_deductions, read_students};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("autograde-roster-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn reads_students_with_extra_columns() {
    let root = temp_root();
    let path = root.join("students.tsv");
    fs::write(
        &path,
        "id\trepo\tsection\nalice\thttps://github.com/c/alice-repo\tA\nbob\thttps://github.com/c/bob-repo\tB\n",
    )
    .expect("write roster");

    let students = read_students(&path).expect("read students");

    assert_eq!(students.len(), 2);
    assert_eq!(students[0].id, "alice");
    assert_eq!(students[0].repo, "https://github.com/c/alice-repo");
    assert_eq!(students[0].extra.get("section").map(String::as_str), Some("A"));
    assert_eq!(students[1].id, "bob");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn resolves_local_repo_from_basename() {
    let root = temp_root();
    let path = root.join("students.tsv");
    fs::write(&path, "id\trepo\ncarol\thttps://github.com/c/carol-repo/\n").expect("write roster");

    let students = read_students(&path).expect("read students");
    let repo = students[0].local_repo(&root.join("work"));

    assert_eq!(repo, root.join("work").join("carol-repo"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_required_column_is_fatal() {
    let root = temp_root();
    let path = root.join("students.tsv");
    fs::write(&path, "id\tsection\nalice\tA\n").expect("write roster");

    let err = read_students(&path).unwrap_err();
    assert!(err.to_string().contains("repo"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn duplicate_identifiers_are_fatal() {
    let root = temp_root();
    let path = root.join("students.tsv");
    fs::write(&path, "id\trepo\nalice\tr1\nalice\tr2\n").expect("write roster");

    let err = read_students(&path).unwrap_err();
    assert!(err.to_string().contains("alice"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn reads_extra_deductions_per_student() {
    let root = temp_root();
    let path = root.join("extras.tsv");
    fs::write(
        &path,
        "alice\t2\tlate submission\nalice\t1\tmissing README\nbob\t5\tfixed compile error to run tests\n",
    )
    .expect("write extras");

    let extras = read_extra_deductions(&path).expect("read extras");

    let alice = extras.get("alice").expect("alice extras");
    assert_eq!(alice.len(), 2);
    assert_eq!(alice[0].points, 2.0);
    assert_eq!(alice[0].summary, "late submission");
    assert_eq!(alice[0].trace, "");
    assert_eq!(extras.get("bob").expect("bob extras")[0].points, 5.0);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn malformed_extra_points_are_fatal() {
    let root = temp_root();
    let path = root.join("extras.tsv");
    fs::write(&path, "alice\ttwo\tlate submission\n").expect("write extras");

    assert!(read_extra_deductions(&path).is_err());

    let _ = fs::remove_dir_all(root);
}
