//! Settings endpoints.

use super::{ApiError, AppState};
use crate::settings::{Settings, Theme};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Current settings plus the resolved accent theme.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: Settings,
    pub theme: Theme,
}

impl SettingsResponse {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            theme: settings.theme(),
            settings: settings.clone(),
        }
    }
}

/// `GET /api/settings`
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse::from_settings(&state.settings.current()))
}

/// `PUT /api/settings`: validate, persist and publish a full settings record.
///
/// Omitted fields take their defaults; `theme` in the body is ignored.
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let Json(settings) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let service = Arc::clone(&state.settings);
    let saved = tokio::task::spawn_blocking(move || service.update(settings))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Settings update task failed");
            ApiError::internal("Failed to save settings")
        })??;

    Ok(Json(SettingsResponse::from_settings(&saved)))
}
