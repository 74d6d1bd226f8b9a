use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::recommender::Recommendation;

use super::page::{self, Outcome};
use super::state::MAX_TOP_N;
use super::{AppError, AppResult, AppState};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<Recommendation>,
}

pub async fn health_check() -> &'static str {
    "ok"
}

/// The page as first opened: selector and button only
pub async fn index_page(State(state): State<AppState>) -> Html<String> {
    let catalog = state.recommender.catalog();
    Html(page::render(catalog.titles(), None, Outcome::Idle))
}

/// The page after pressing "Recommend"
pub async fn recommend_page(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Html<String> {
    let title = query.title.unwrap_or_default();
    let selected = Some(title.as_str()).filter(|t| !t.trim().is_empty());
    let top_n = query
        .top_n
        .unwrap_or(state.default_top_n)
        .clamp(1, MAX_TOP_N);

    let recommendations = state.recommender.recommend(&title, top_n).await;
    let catalog = state.recommender.catalog();
    Html(page::render(
        catalog.titles(),
        selected,
        Outcome::Results(&recommendations),
    ))
}

pub async fn get_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .recommender
            .catalog()
            .titles()
            .map(str::to_string)
            .collect(),
    )
}

pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<RecommendResponse>> {
    let title = query
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing 'title' parameter".to_string()))?;

    let top_n = query.top_n.unwrap_or(state.default_top_n);
    if top_n == 0 || top_n > MAX_TOP_N {
        return Err(AppError::InvalidInput(format!(
            "'top_n' must be between 1 and {}",
            MAX_TOP_N
        )));
    }

    let recommendations = state.recommender.recommend(&title, top_n).await;
    Ok(Json(RecommendResponse {
        query: title,
        recommendations,
    }))
}
