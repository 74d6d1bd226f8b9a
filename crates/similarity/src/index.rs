//! TF-IDF similarity index.
//!
//! ## Algorithm
//! 1. Tokenize every document (see `tokenizer`)
//! 2. Vocabulary = every surviving term, columns in lexicographic order
//! 3. Weight = raw count × smoothed idf, `ln((1 + n) / (1 + df)) + 1`
//! 4. L2-normalise each row
//!
//! Rows stay aligned with the input documents, so row `i` of the index
//! is catalog row `i`.

use crate::sparse::{cosine_similarity, SparseVector};
use crate::tokenizer::tokenize;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, instrument};

/// One TF-IDF row per document plus the vocabulary that names its columns
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vectors: Vec<SparseVector>,
    /// Column index -> term
    terms: Vec<String>,
    /// Idf weight per column
    idf: Vec<f64>,
}

impl SimilarityIndex {
    /// Build the index over a corpus.
    ///
    /// Deterministic: the same documents always give the same vectors,
    /// regardless of how rayon schedules the work.
    #[instrument(skip(documents), fields(documents = documents.len()))]
    pub fn build<S: AsRef<str> + Sync>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        // Document frequency per term; BTreeMap gives the sorted column order
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let terms: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let columns: HashMap<&str, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(col, term)| (*term, col))
            .collect();

        let vectors: Vec<SparseVector> = tokenized
            .par_iter()
            .map(|tokens| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for token in tokens {
                    if let Some(&col) = columns.get(token.as_str()) {
                        *counts.entry(col).or_insert(0.0) += 1.0;
                    }
                }
                let mut vector = SparseVector::from_pairs(
                    counts
                        .into_iter()
                        .map(|(col, count)| (col, count * idf[col]))
                        .collect(),
                );
                vector.normalize();
                vector
            })
            .collect();

        info!(
            "Built similarity index: {} rows, {} terms",
            vectors.len(),
            terms.len()
        );

        Self {
            vectors,
            terms,
            idf,
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    pub fn vector(&self, row: usize) -> Option<&SparseVector> {
        self.vectors.get(row)
    }

    /// Idf weight of a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.terms
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
            .map(|col| self.idf[col])
    }

    /// Cosine similarity of `row` against every row (itself included).
    ///
    /// Empty when `row` is out of range.
    pub fn scores(&self, row: usize) -> Vec<f64> {
        let Some(query) = self.vectors.get(row) else {
            return Vec::new();
        };
        self.vectors
            .par_iter()
            .map(|other| cosine_similarity(query, other))
            .collect()
    }

    /// The `top_n` rows most similar to `row`, best first.
    ///
    /// The sort is stable, so equal scores keep catalog order. The query
    /// row itself is never returned.
    pub fn most_similar(&self, row: usize, top_n: usize) -> Vec<(usize, f64)> {
        self.most_similar_where(row, top_n, |_| true)
    }

    /// Like [`most_similar`](Self::most_similar), but only rows for which
    /// `keep` holds are candidates. Filtering happens before truncation.
    pub fn most_similar_where<F>(&self, row: usize, top_n: usize, keep: F) -> Vec<(usize, f64)>
    where
        F: Fn(usize) -> bool,
    {
        let mut ranked: Vec<(usize, f64)> = self
            .scores(row)
            .into_iter()
            .enumerate()
            .filter(|&(other, _)| other != row && keep(other))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);

        debug!("Ranked {} neighbours for row {}", ranked.len(), row);
        ranked
    }

    /// Highest-weighted terms of a row
    pub fn top_terms(&self, row: usize, n: usize) -> Vec<(&str, f64)> {
        let Some(vector) = self.vectors.get(row) else {
            return Vec::new();
        };
        let mut weighted: Vec<(&str, f64)> = vector
            .entries()
            .iter()
            .map(|&(col, w)| (self.terms[col].as_str(), w))
            .collect();
        weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        weighted.truncate(n);
        weighted
    }

    /// Terms two rows have in common, ordered by their combined contribution
    /// to the similarity score
    pub fn shared_terms(&self, a: usize, b: usize, n: usize) -> Vec<&str> {
        let (Some(va), Some(vb)) = (self.vectors.get(a), self.vectors.get(b)) else {
            return Vec::new();
        };
        let weights_b: HashMap<usize, f64> = vb.entries().iter().copied().collect();
        let mut shared: Vec<(usize, f64)> = va
            .entries()
            .iter()
            .filter_map(|&(col, wa)| weights_b.get(&col).map(|wb| (col, wa * wb)))
            .collect();
        shared.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));
        shared
            .into_iter()
            .take(n)
            .map(|(col, _)| self.terms[col].as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn corpus() -> Vec<&'static str> {
        vec![
            "A thief steals corporate secrets through dream sharing technology.",
            "Batman fights the Joker, a criminal mastermind who spreads chaos in Gotham.",
            "A thief enters dreams to plant an idea in a target's mind.",
            "",
            "Gotham faces a new threat as Batman returns.",
        ]
    }

    #[test]
    fn test_rows_align_with_documents() {
        let index = SimilarityIndex::build(&corpus());
        assert_eq!(index.len(), 5);
        assert!(index.vector(3).unwrap().is_zero());
        assert!(index.vector(5).is_none());
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let index = SimilarityIndex::build(&corpus());
        for row in [0, 1, 2, 4] {
            assert!((index.vector(row).unwrap().norm() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let index = SimilarityIndex::build(&corpus());
        let scores = index.scores(1);
        assert!((scores[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_smoothed_idf() {
        let index = SimilarityIndex::build(&corpus());
        // "batman" appears in 2 of 5 documents
        let expected = (6.0f64 / 3.0).ln() + 1.0;
        assert!((index.idf("batman").unwrap() - expected).abs() < EPS);
        // "thief" appears in 2, "joker" in 1
        assert!(index.idf("joker").unwrap() > index.idf("thief").unwrap());
        assert!(index.idf("the").is_none());
    }

    #[test]
    fn test_single_document_weights() {
        // idf is identical for every term, so weights follow raw counts
        let index = SimilarityIndex::build(&["dream dream heist"]);
        let terms = index.top_terms(0, 2);
        assert_eq!(terms[0].0, "dream");
        assert!((terms[0].1 - 2.0 / 5f64.sqrt()).abs() < EPS);
        assert!((terms[1].1 - 1.0 / 5f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_most_similar_excludes_query() {
        let index = SimilarityIndex::build(&corpus());
        let ranked = index.most_similar(0, 10);

        assert_eq!(ranked.len(), 4);
        assert!(ranked.iter().all(|&(row, _)| row != 0));
        assert_eq!(ranked[0].0, 2);
    }

    #[test]
    fn test_most_similar_where_filters_before_truncating() {
        let index = SimilarityIndex::build(&corpus());
        let ranked = index.most_similar_where(0, 2, |other| other != 2);

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|&(row, _)| row != 0 && row != 2));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let index = SimilarityIndex::build(&["alpha beta", "gamma", "delta", "alpha", "epsilon"]);
        let ranked: Vec<usize> = index.most_similar(1, 10).iter().map(|r| r.0).collect();
        // Row 1 shares nothing with anyone: all zeros, original order
        assert_eq!(ranked, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_most_similar_respects_top_n() {
        let index = SimilarityIndex::build(&corpus());
        assert_eq!(index.most_similar(1, 2).len(), 2);
        assert!(index.most_similar(1, 0).is_empty());
        assert!(index.most_similar(42, 5).is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = SimilarityIndex::build(&corpus());
        let b = SimilarityIndex::build(&corpus());
        for row in 0..a.len() {
            assert_eq!(a.vector(row), b.vector(row));
        }
    }

    #[test]
    fn test_shared_terms() {
        let index = SimilarityIndex::build(&corpus());
        let shared = index.shared_terms(1, 4, 5);
        assert!(shared.contains(&"batman"));
        assert!(shared.contains(&"gotham"));
        assert!(!shared.contains(&"joker"));
    }

    #[test]
    fn test_empty_corpus() {
        let index = SimilarityIndex::build::<&str>(&[]);
        assert!(index.is_empty());
        assert_eq!(index.vocabulary_len(), 0);
    }
}
