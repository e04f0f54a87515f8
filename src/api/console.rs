//! Console command endpoint.

use super::AppState;
use crate::shape::{shape_command, CommandOutcome};
use crate::upstream::UpstreamResult;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// `POST /api/minecraft/command`: forward one command verbatim over RCON.
///
/// The body is always `{ success, response }`. A malformed request answers
/// 400 and a failed call answers 500.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CommandRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let outcome = CommandOutcome {
                success: false,
                response: format!("Error: {}", rejection.body_text()),
            };
            return (StatusCode::BAD_REQUEST, Json(outcome)).into_response();
        }
    };

    let target = state.catalog.minecraft_command(&request.command);
    let result = state.upstream.invoke(&target).await;
    if let UpstreamResult::Failure(reason) = &result {
        tracing::warn!(command = %request.command, reason = %reason, "Console command failed");
    }

    let outcome = shape_command(&request.command, &result);
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(outcome)).into_response()
}
