#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Pairwise submission similarity.
//!
//! Submissions are stripped of comments, vectorized with term-frequency /
//! inverse-document-frequency weighting over word tokens, and compared by
//! cosine distance. The most similar pairs sort first.

use std::{
    collections::{HashMap, HashSet},
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::{debug, info};

use crate::{constants::WORD_TOKEN, normalize, roster::Student};

/// A scored pair of submission files. Unordered: `first` and `second` are
/// stored in a canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityPair {
    /// Cosine distance between the two documents; 0 means identical term
    /// weights.
    pub distance: f64,
    /// One file of the pair.
    pub first:    String,
    /// The other file of the pair.
    pub second:   String,
}

/// A document's L2-normalized term weights.
#[derive(Debug, Clone)]
pub struct DocumentVector {
    /// Display name of the document (its path on disk).
    name:    String,
    /// Term weights, unit length unless the document had no tokens.
    weights: HashMap<String, f64>,
}

impl DocumentVector {
    /// Display name of the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dot product with another vector; cosine similarity, since both are
    /// unit length.
    fn dot(&self, other: &DocumentVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };

        small
            .iter()
            .filter_map(|(term, weight)| large.get(term).map(|w| w * weight))
            .sum()
    }
}

/// Reads and normalizes every available subject file for every student.
/// A student whose file is absent is simply excluded: the corpus size is
/// the count of available files, not the count of students.
pub fn collect_corpus(
    students: &[Student],
    files_to_test: &[String],
    workdir: &Path,
) -> Vec<(String, String)> {
    let mut corpus = Vec::new();

    for student in students {
        let root = student.local_repo(workdir);
        for subpath in files_to_test {
            let path = root.join(subpath);
            match std::fs::read_to_string(&path) {
                Ok(source) => {
                    corpus.push((path.display().to_string(), normalize::strip(&source)));
                }
                Err(_) => {
                    debug!("skipping absent submission {}", path.display());
                }
            }
        }
    }

    info!("read {} files", corpus.len());
    corpus
}

/// Vectorizes a corpus of (name, normalized text) documents: lowercased
/// word tokens, raw term frequency weighted by smoothed inverse document
/// frequency `ln((1 + n) / (1 + df)) + 1`, L2-normalized.
pub fn vectorize(corpus: &[(String, String)]) -> Vec<DocumentVector> {
    let n = corpus.len() as f64;

    let counts: Vec<HashMap<String, f64>> = corpus
        .iter()
        .map(|(_, text)| {
            let mut tf: HashMap<String, f64> = HashMap::new();
            for token in WORD_TOKEN.find_iter(&text.to_lowercase()) {
                *tf.entry(token.as_str().to_string()).or_insert(0.0) += 1.0;
            }
            tf
        })
        .collect();

    let mut df: HashMap<&str, f64> = HashMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *df.entry(term.as_str()).or_insert(0.0) += 1.0;
        }
    }

    corpus
        .iter()
        .zip(&counts)
        .map(|((name, _), tf)| {
            let mut weights: HashMap<String, f64> = tf
                .iter()
                .map(|(term, count)| {
                    let idf = ((1.0 + n) / (1.0 + df[term.as_str()])).ln() + 1.0;
                    (term.clone(), count * idf)
                })
                .collect();

            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in weights.values_mut() {
                    *weight /= norm;
                }
            }

            DocumentVector {
                name: name.clone(),
                weights,
            }
        })
        .collect()
}

/// Computes cosine distance for every unordered pair of distinct documents,
/// deduplicated, sorted ascending so the most similar pairs come first.
pub fn rank(vectors: &[DocumentVector]) -> Vec<SimilarityPair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for (a, b) in (0..vectors.len()).tuple_combinations() {
        let (first, second) = if vectors[a].name <= vectors[b].name {
            (vectors[a].name.clone(), vectors[b].name.clone())
        } else {
            (vectors[b].name.clone(), vectors[a].name.clone())
        };

        if first == second || !seen.insert((first.clone(), second.clone())) {
            continue;
        }

        let distance = (1.0 - vectors[a].dot(&vectors[b])).max(0.0);
        pairs.push(SimilarityPair {
            distance,
            first,
            second,
        });
    }

    pairs.sort_by(|x, y| {
        x.distance
            .total_cmp(&y.distance)
            .then_with(|| x.first.cmp(&y.first))
            .then_with(|| x.second.cmp(&y.second))
    });
    pairs
}

/// Writes ranked pairs as tab-separated `distance  first  second` lines.
pub fn write_pairs(out: &mut impl Write, pairs: &[SimilarityPair]) -> Result<()> {
    for pair in pairs {
        writeln!(out, "{:.4}\t{}\t{}", pair.distance, pair.first, pair.second)
            .context("Could not write similarity pair")?;
    }
    Ok(())
}
