//! # Similarity Crate
//!
//! Content-based similarity over movie overviews.
//!
//! ## Components
//!
//! - **tokenizer**: lowercase word tokens minus English stop words
//! - **sparse**: sparse vectors and cosine similarity
//! - **index**: the TF-IDF matrix, one row per catalog movie
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::SimilarityIndex;
//!
//! let index = SimilarityIndex::build(&catalog.overviews());
//! for (row, score) in index.most_similar(query_row, 5) {
//!     println!("{} {:.3}", catalog.get(row).unwrap().title, score);
//! }
//! ```

pub mod index;
pub mod sparse;
pub mod tokenizer;

pub use index::SimilarityIndex;
pub use sparse::{cosine_similarity, SparseVector};
pub use tokenizer::tokenize;
