//! Failure taxonomy for upstream invocations.

use thiserror::Error;

/// Why a single upstream invocation failed.
///
/// The set is exhaustive: every transport maps its errors onto one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The call did not settle within its target timeout
    #[error("request timed out")]
    Timeout,

    /// Nothing accepted the connection
    #[error("connection refused")]
    ConnectionRefused,

    /// The upstream answered with a non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Anything else: malformed body, missing configuration, protocol violation
    #[error("protocol error: {0}")]
    ProtocolError(String),
}

impl FailureReason {
    /// Short, label-safe name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::ConnectionRefused => "connection_refused",
            FailureReason::HttpError(_) => "http_error",
            FailureReason::ProtocolError(_) => "protocol_error",
        }
    }

    /// Failure for a configuration key that was never set.
    pub fn not_configured(key: &str) -> Self {
        FailureReason::ProtocolError(format!("{} not configured", key))
    }

    /// Classify a reqwest error.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            FailureReason::Timeout
        } else if e.is_connect() {
            FailureReason::ConnectionRefused
        } else if let Some(status) = e.status() {
            FailureReason::HttpError(status.as_u16())
        } else {
            FailureReason::ProtocolError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FailureReason::Timeout.to_string(), "request timed out");
        assert_eq!(FailureReason::HttpError(503).to_string(), "HTTP error: 503");
        assert_eq!(
            FailureReason::not_configured("sonarr.url").to_string(),
            "protocol error: sonarr.url not configured"
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(FailureReason::Timeout.kind(), "timeout");
        assert_eq!(FailureReason::ConnectionRefused.kind(), "connection_refused");
        assert_eq!(FailureReason::HttpError(404).kind(), "http_error");
        assert_eq!(
            FailureReason::ProtocolError("x".into()).kind(),
            "protocol_error"
        );
    }
}
