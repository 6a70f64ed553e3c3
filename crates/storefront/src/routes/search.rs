//! Domain search handler.

use axum::{
    Json,
    extract::{Query, State},
};
use domain_shop_core::search::SearchResults;
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Availability and pricing for every candidate suffix.
///
/// A blank query yields empty `featured` and `other` lists.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    let results = state.search().search(&query.q).unwrap_or_default();
    tracing::debug!(results = results.len(), "Domain search");
    Json(results)
}
