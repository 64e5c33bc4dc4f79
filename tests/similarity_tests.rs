//! Tests for the similarity engine.

use std::{fs, path::PathBuf};

use autograde::similarity::{collect_corpus, rank, vectorize, write_pairs};
use uuid::Uuid;

fn corpus(texts: &[(&str, &str)]) -> Vec<(String, String)> {
    texts
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect()
}

#[test]
fn identical_documents_have_distance_zero() {
    let corpus = corpus(&[
        ("a.py", "def add(x, y):\n    return x + y\n"),
        ("b.py", "def add(x, y):\n    return x + y\n"),
        ("c.py", "import sys\nprint(sys.argv)\n"),
    ]);

    let pairs = rank(&vectorize(&corpus));

    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0].first, "a.py");
    assert_eq!(pairs[0].second, "b.py");
    assert!(pairs[0].distance.abs() < 1e-9);
}

#[test]
fn ranking_is_ascending_and_symmetric() {
    let forward = corpus(&[
        ("a.py", "x = 1\ny = 2\nz = x + y\n"),
        ("b.py", "x = 1\ny = 2\nz = x * y\n"),
        ("c.py", "import json\nprint(json.dumps({}))\n"),
    ]);
    let mut reversed = forward.clone();
    reversed.reverse();

    let pairs = rank(&vectorize(&forward));
    let mirrored = rank(&vectorize(&reversed));

    for window in pairs.windows(2) {
        assert!(window[0].distance <= window[1].distance);
    }

    // Pair identity and distance do not depend on corpus order.
    for pair in &pairs {
        let twin = mirrored
            .iter()
            .find(|p| p.first == pair.first && p.second == pair.second)
            .expect("pair present both ways");
        assert!((twin.distance - pair.distance).abs() < 1e-9);
    }
}

#[test]
fn disjoint_documents_are_maximally_distant() {
    let corpus = corpus(&[
        ("a.py", "alpha beta gamma"),
        ("b.py", "delta epsilon zeta"),
        ("c.py", "eta theta iota"),
    ]);

    let pairs = rank(&vectorize(&corpus));

    for pair in &pairs {
        assert!((pair.distance - 1.0).abs() < 1e-9);
    }
}

#[test]
fn tokenization_is_case_insensitive() {
    let corpus = corpus(&[
        ("a.py", "Alpha BETA"),
        ("b.py", "alpha beta"),
        ("c.py", "unrelated words entirely"),
    ]);

    let pairs = rank(&vectorize(&corpus));

    assert_eq!(pairs[0].first, "a.py");
    assert_eq!(pairs[0].second, "b.py");
    assert!(pairs[0].distance.abs() < 1e-9);
}

#[test]
fn absent_submissions_are_excluded_from_the_corpus() {
    let root = std::env::temp_dir().join(format!("autograde-sim-{}", Uuid::new_v4()));
    fs::create_dir_all(root.join("alice-repo").join("asg0")).expect("create submission dir");
    fs::write(
        root.join("alice-repo").join("asg0").join("asg0.py"),
        "def add(x, y):\n    return x + y\n",
    )
    .expect("write submission");

    let roster_path = root.join("students.tsv");
    fs::write(&roster_path, "id\trepo\nalice\talice-repo\nbob\tbob-repo\n")
        .expect("write roster");
    let students = autograde::roster::read_students(&roster_path).expect("read students");

    let corpus = collect_corpus(&students, &["asg0/asg0.py".to_string()], &root);

    // bob has no submission; the corpus holds only the available file.
    assert_eq!(corpus.len(), 1);
    assert!(corpus[0].0.ends_with("asg0.py"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn writes_tab_separated_rows() {
    let corpus = corpus(&[
        ("a.py", "alpha beta"),
        ("b.py", "alpha beta"),
        ("c.py", "something else here"),
    ]);
    let pairs = rank(&vectorize(&corpus));

    let mut buffer = Vec::new();
    write_pairs(&mut buffer, &pairs).expect("write pairs");
    let text = String::from_utf8(buffer).expect("utf8 output");

    let first = text.lines().next().expect("at least one row");
    assert_eq!(first, "0.0000\ta.py\tb.py");
}
