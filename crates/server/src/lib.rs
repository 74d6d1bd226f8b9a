//! Server crate for the movie recommender.
//!
//! This crate contains the recommender that ties the catalog, the
//! similarity index and the poster client together, and the web UI
//! that presents its results.

pub mod recommender;
pub mod web;

pub use recommender::{into_lists, RankedMovie, Recommendation, Recommender, DEFAULT_TOP_N};
pub use web::{create_router, serve, AppState};
