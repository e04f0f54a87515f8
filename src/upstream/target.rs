//! Upstream call descriptors and their outcomes.

use super::error::FailureReason;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// One external call: a logical name, how to reach it, and how long to wait.
///
/// Immutable once built. Targets are created per aggregate request by
/// [`crate::catalog::TargetCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamTarget {
    name: String,
    transport: Transport,
    timeout: Duration,
}

/// How a target is reached.
#[derive(Debug, Clone, PartialEq)]
pub enum Transport {
    /// A JSON-over-HTTP request
    Http(HttpCall),
    /// One or more console commands sent over a single RCON connection
    Rcon(RconCall),
    /// A host telemetry reading
    Host(HostQuery),
}

/// HTTP request descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpCall {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    /// Set when a configuration key this call needs was never provided.
    /// The client reports it as a protocol error instead of sending anything.
    pub missing_config: Option<String>,
}

impl HttpCall {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            missing_config: None,
        }
    }

    /// A call that can never be sent because `key` is not configured.
    pub fn unconfigured(key: impl Into<String>) -> Self {
        Self {
            missing_config: Some(key.into()),
            ..Self::get("")
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Commands sent, in order, over one RCON connection.
///
/// Replies are keyed by command text, so each command appears once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconCall {
    pub commands: Vec<String>,
}

/// Which host reading to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostQuery {
    /// CPU, memory, disks, OS and primary interface throughput
    Overview,
    /// Interfaces, throughput and open sockets
    Network,
}

impl UpstreamTarget {
    pub fn http(name: impl Into<String>, call: HttpCall, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            transport: Transport::Http(call),
            timeout,
        }
    }

    pub fn rcon<I, S>(name: impl Into<String>, commands: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for command in commands.into_iter().map(Into::into) {
            if !unique.contains(&command) {
                unique.push(command);
            }
        }
        Self {
            name: name.into(),
            transport: Transport::Rcon(RconCall { commands: unique }),
            timeout,
        }
    }

    pub fn host(name: impl Into<String>, query: HostQuery, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            transport: Transport::Host(query),
            timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Outcome of invoking one [`UpstreamTarget`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    /// Structured payload, uninterpreted until the shaper reads it
    Success(Value),
    Failure(FailureReason),
}

impl UpstreamResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UpstreamResult::Success(_))
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            UpstreamResult::Success(v) => Some(v),
            UpstreamResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            UpstreamResult::Success(_) => None,
            UpstreamResult::Failure(r) => Some(r),
        }
    }
}
