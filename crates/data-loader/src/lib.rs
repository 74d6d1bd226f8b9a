//! # Data Loader Crate
//!
//! This crate loads the movie catalog: a TMDB metadata CSV filtered down to
//! movies with enough votes to be worth recommending.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Catalog)
//! - **parser**: Parse the CSV into Rust structs
//! - **index**: Load the catalog and look titles up
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, DEFAULT_MIN_VOTES};
//! use std::path::Path;
//!
//! let catalog = Catalog::load(Path::new("movies_metadata.csv"), DEFAULT_MIN_VOTES)?;
//!
//! if let Some(row) = catalog.find_by_title("inception") {
//!     println!("{}", catalog.get(row).unwrap().overview);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{MatchKind, SearchHit};
pub use types::{Catalog, Movie, MovieId, RowIndex, DEFAULT_MIN_VOTES};
