use crate::recommender::{Recommender, DEFAULT_TOP_N};

/// Upper bound on `top_n` accepted from clients
pub const MAX_TOP_N: usize = 50;

/// Shared application state.
///
/// The recommender (catalog + index) is built once before the server starts
/// and then shared read-only by every request. `Recommender` keeps its parts
/// behind `Arc`, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub default_top_n: usize,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender,
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n.clamp(1, MAX_TOP_N);
        self
    }
}
