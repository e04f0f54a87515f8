//! Error responses for the HTTP API.

use crate::pages::Page;
use crate::settings::SettingsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Fallback body for an aggregate rejected on a page that declares no
/// failure message of its own.
const DEFAULT_FAILURE_MESSAGE: &str = "Aggregate Failed";

/// A fixed `{ "error": "<message>" }` body plus status code.
///
/// The message never carries upstream URLs, keys or raw failure reasons;
/// those are logged where the failure is observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
        }
    }

    /// 500 with the page's fixed failure message.
    pub fn page_failure(page: Page) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            page.failure_message().unwrap_or(DEFAULT_FAILURE_MESSAGE),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Invalid(message) => ApiError::bad_request(message),
            other => {
                tracing::error!(error = %other, "Failed to persist settings");
                ApiError::internal("Failed to save settings")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_failure_uses_fixed_message() {
        let err = ApiError::page_failure(Page::Nas);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Telemetry Failed");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Telemetry Failed"}));
    }

    #[test]
    fn test_page_without_message_gets_default() {
        assert_eq!(
            ApiError::page_failure(Page::Minecraft).message(),
            DEFAULT_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_settings_errors_map_to_status() {
        let invalid: ApiError = SettingsError::Invalid("refreshRate too low".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "refreshRate too low");

        let io: ApiError = SettingsError::Io {
            path: "/etc/secret/settings.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!io.message().contains("/etc/secret"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
