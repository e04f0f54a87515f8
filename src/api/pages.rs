//! Aggregate page handlers.

use super::{ApiError, AppState};
use crate::metrics;
use crate::pages::Page;
use axum::{
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;

/// Response header carrying the UI poll interval hint.
pub const POLL_INTERVAL_HEADER: &str = "x-poll-interval-ms";

/// `GET` route serving one page.
pub fn route(page: Page) -> MethodRouter<Arc<AppState>> {
    get(move |State(state): State<Arc<AppState>>| async move { serve(&state, page).await })
}

/// Settle the page's plan, apply its policy and shape the snapshot.
pub async fn serve(state: &AppState, page: Page) -> Result<Response, ApiError> {
    let plan = page.plan(&state.catalog, Utc::now());
    let span = tracing::info_span!("aggregate", page = %page);

    let snapshot = match state.aggregator.aggregate(&plan).instrument(span).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            metrics::record_aggregate_failure(page.name());
            tracing::error!(page = %page, error = %e, "Page aggregate rejected");
            return Err(ApiError::page_failure(page));
        }
    };

    let mut response = Json(page.render(&snapshot)).into_response();
    let hint = state.settings.refresh_rate_ms().to_string();
    if let Ok(value) = HeaderValue::from_str(&hint) {
        response.headers_mut().insert(POLL_INTERVAL_HEADER, value);
    }
    Ok(response)
}
