//! # Recommender
//!
//! Coordinates the three stages of a recommendation:
//! 1. Find the query title in the catalog (case-insensitive, exact)
//! 2. Rank every other movie by overview similarity
//! 3. Resolve a poster for each of the top N, one request at a time
//!
//! The catalog and similarity index are built once and shared behind
//! `Arc`; nothing here mutates after construction.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::{Catalog, MovieId, RowIndex};
use poster_client::PosterSource;
use similarity::SimilarityIndex;

/// Number of recommendations when the caller doesn't ask for a count
pub const DEFAULT_TOP_N: usize = 5;

/// A ranked neighbour without poster art
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMovie {
    pub row: RowIndex,
    pub score: f64,
}

/// Final recommendation shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Catalog row of the recommended movie
    #[serde(skip)]
    pub row: RowIndex,
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
    /// Empty when no poster could be resolved
    pub poster_url: String,
}

/// Split recommendations into parallel `(titles, posters)` lists
pub fn into_lists(recommendations: Vec<Recommendation>) -> (Vec<String>, Vec<String>) {
    recommendations
        .into_iter()
        .map(|r| (r.title, r.poster_url))
        .unzip()
}

/// Content-based recommender over a loaded catalog
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    index: Arc<SimilarityIndex>,
    posters: Arc<dyn PosterSource>,
}

impl Recommender {
    /// Build the similarity index for `catalog` and wrap both.
    pub fn new(catalog: Catalog, posters: Arc<dyn PosterSource>) -> Self {
        let start = Instant::now();
        let index = SimilarityIndex::build(&catalog.overviews());
        info!(
            "Indexed {} overviews ({} terms) in {:.2?}",
            index.len(),
            index.vocabulary_len(),
            start.elapsed()
        );

        Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            posters,
        }
    }

    /// Load the catalog from disk and index it
    pub fn load(path: &Path, min_votes: f64, posters: Arc<dyn PosterSource>) -> Result<Self> {
        let catalog = Catalog::load(path, min_votes)
            .with_context(|| format!("Failed to load movie catalog from {}", path.display()))?;
        Ok(Self::new(catalog, posters))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    /// Rank the movies most similar to `title`, without posters.
    ///
    /// Unknown titles give an empty list. Rows carrying the query title
    /// (duplicates in the catalog) are never returned.
    pub fn rank(&self, title: &str, top_n: usize) -> Vec<RankedMovie> {
        let Some(row) = self.catalog.find_by_title(title) else {
            debug!("Title '{}' not in catalog", title);
            return Vec::new();
        };

        self.index
            .most_similar_where(row, top_n, |other| !self.catalog.same_title(row, other))
            .into_iter()
            .map(|(row, score)| RankedMovie { row, score })
            .collect()
    }

    /// Main entry point: recommendations for a title, posters included.
    ///
    /// Posters are fetched sequentially, one request per result.
    #[instrument(skip(self))]
    pub async fn recommend(&self, title: &str, top_n: usize) -> Vec<Recommendation> {
        let start = Instant::now();
        let ranked = self.rank(title, top_n);

        let mut recommendations = Vec::with_capacity(ranked.len());
        for RankedMovie { row, score } in ranked {
            let Some(movie) = self.catalog.get(row) else {
                continue;
            };
            let poster_url = self.posters.poster_url(&movie.id).await;
            recommendations.push(Recommendation {
                row,
                movie_id: movie.id.clone(),
                title: movie.title.clone(),
                score,
                poster_url,
            });
        }

        info!(
            "Recommended {} movies for '{}' in {:.2?}",
            recommendations.len(),
            title,
            start.elapsed()
        );
        recommendations
    }
}
