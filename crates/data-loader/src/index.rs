//! Catalog loading and title lookups.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

/// How well a title matched a search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Substring,
}

/// One hit from `Catalog::search`
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub row: RowIndex,
    pub movie: &'a Movie,
    pub kind: MatchKind,
}

impl Catalog {
    /// Load the catalog from a CSV file
    ///
    /// This is the main entry point for loading data. Rows under
    /// `min_votes` are dropped; the rest keep their file order.
    pub fn load(path: &Path, min_votes: f64) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let movies = parser::parse_catalog(path, min_votes)?;
        let catalog = Catalog::from_movies(movies);

        info!(
            "Loaded {} movies with at least {} votes",
            catalog.len(),
            min_votes
        );
        Ok(catalog)
    }

    /// Case-insensitive exact title match.
    ///
    /// Returns the first matching row when the catalog holds the same
    /// title more than once. A blank query never matches, not even a row
    /// whose title is missing.
    pub fn find_by_title(&self, title: &str) -> Option<RowIndex> {
        if title.trim().is_empty() {
            return None;
        }
        let wanted = title.to_lowercase();
        self.titles_lower.iter().position(|t| *t == wanted)
    }

    /// Whether two rows carry the same title, ignoring case
    pub fn same_title(&self, a: RowIndex, b: RowIndex) -> bool {
        match (self.titles_lower.get(a), self.titles_lower.get(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact matches come first, then higher vote averages.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let query = query.to_lowercase();
        let mut hits: Vec<SearchHit<'_>> = self
            .titles_lower
            .iter()
            .enumerate()
            .filter_map(|(row, title)| {
                let kind = if *title == query {
                    MatchKind::Exact
                } else if title.contains(&query) {
                    MatchKind::Substring
                } else {
                    return None;
                };
                Some(SearchHit {
                    row,
                    movie: &self.movies[row],
                    kind,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.kind.cmp(&b.kind).then_with(|| {
                b.movie
                    .vote_average
                    .partial_cmp(&a.movie.vote_average)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        hits.truncate(limit);
        hits
    }
}
