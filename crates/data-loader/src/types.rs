//! Core domain types for the movie catalog.
//!
//! A `Catalog` is an ordered, immutable list of `Movie` rows. The position
//! of a movie in that list (its row index) is what the similarity index is
//! aligned on, so rows are never reordered once loaded.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// External catalog identifier, used to query the poster service.
///
/// Kept as a string: the source dataset mixes numeric ids with the odd
/// malformed value and the poster service only ever sees it in a URL.
pub type MovieId = String;

/// Position of a movie inside the catalog
pub type RowIndex = usize;

/// Minimum number of votes a movie needs to be kept in the catalog
pub const DEFAULT_MIN_VOTES: f64 = 50.0;

// =============================================================================
// Movie
// =============================================================================

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Plot overview; empty when the dataset has no text for this movie
    pub overview: String,
    pub vote_count: f64,
    pub vote_average: f64,
}

// =============================================================================
// Catalog - The Core In-Memory Table
// =============================================================================

/// The filtered movie table.
///
/// Lookups hand out references (`&Movie`); the catalog owns its rows for
/// the life of the process.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    /// Lowercased titles, aligned with `movies`, for case-insensitive lookups
    pub(crate) titles_lower: Vec<String>,
}

impl Catalog {
    /// Creates a catalog from rows that have already been filtered
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let titles_lower = movies.iter().map(|m| m.title.to_lowercase()).collect();
        Self {
            movies,
            titles_lower,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by row index
    pub fn get(&self, row: RowIndex) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Titles in catalog order, duplicates included (selector contents)
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Overview texts in catalog order (the similarity index corpus)
    pub fn overviews(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.overview.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            overview: String::new(),
            vote_count: 100.0,
            vote_average: 7.0,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get(0).is_none());
        assert_eq!(catalog.titles().count(), 0);
    }

    #[test]
    fn test_rows_keep_their_order() {
        let catalog = Catalog::from_movies(vec![movie("2", "B"), movie("1", "A")]);
        let titles: Vec<&str> = catalog.titles().collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(catalog.get(1).unwrap().id, "1");
    }
}
