//! Upstream client: one bounded call to one external service.
//!
//! [`UpstreamClient::invoke`] never returns an error. Network errors, non-2xx
//! statuses, timeouts, malformed bodies and missing configuration all come
//! back as [`UpstreamResult::Failure`] carrying a [`FailureReason`].

mod error;
pub mod rcon;
mod target;

pub use error::FailureReason;
pub use target::{HostQuery, HttpCall, RconCall, Transport, UpstreamResult, UpstreamTarget};

use crate::config::MinecraftConfig;
use crate::telemetry::HostProbe;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Anything that can settle an [`UpstreamTarget`].
///
/// The aggregator only depends on this trait, so tests can drive it with
/// scripted upstreams.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    async fn invoke(&self, target: &UpstreamTarget) -> UpstreamResult;
}

/// Production upstream client over HTTP, RCON and the host probe.
pub struct UpstreamClient {
    http: reqwest::Client,
    console: MinecraftConfig,
    probe: Arc<dyn HostProbe>,
}

impl UpstreamClient {
    /// Create a client with its own connection-pooled HTTP client.
    pub fn new(console: MinecraftConfig, probe: Arc<dyn HostProbe>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .user_agent(concat!("homelab-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, console, probe))
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(
        http: reqwest::Client,
        console: MinecraftConfig,
        probe: Arc<dyn HostProbe>,
    ) -> Self {
        Self {
            http,
            console,
            probe,
        }
    }

    async fn dispatch(&self, target: &UpstreamTarget) -> Result<Value, FailureReason> {
        match target.transport() {
            Transport::Http(call) => self.send_http(call, target.timeout()).await,
            Transport::Rcon(call) => self.send_rcon(call).await,
            Transport::Host(query) => self.read_host(*query).await,
        }
    }

    async fn send_http(&self, call: &HttpCall, timeout: Duration) -> Result<Value, FailureReason> {
        if let Some(key) = &call.missing_config {
            return Err(FailureReason::not_configured(key));
        }

        let mut request = self
            .http
            .request(call.method.clone(), &call.url)
            .timeout(timeout);
        for (name, value) in &call.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FailureReason::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureReason::HttpError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FailureReason::from_reqwest(&e))?;
        serde_json::from_slice(&body)
            .map_err(|e| FailureReason::ProtocolError(format!("invalid JSON body: {}", e)))
    }

    async fn send_rcon(&self, call: &RconCall) -> Result<Value, FailureReason> {
        if self.console.host.is_empty() {
            return Err(FailureReason::not_configured("services.minecraft.host"));
        }
        let replies = rcon::run_session(
            &self.console.host,
            self.console.port,
            &self.console.password,
            &call.commands,
        )
        .await?;

        let map = call
            .commands
            .iter()
            .cloned()
            .zip(replies.into_iter().map(Value::String))
            .collect::<serde_json::Map<_, _>>();
        Ok(Value::Object(map))
    }

    async fn read_host(&self, query: HostQuery) -> Result<Value, FailureReason> {
        let reading = match query {
            HostQuery::Overview => self.probe.overview().await.map(serde_json::to_value),
            HostQuery::Network => self.probe.network().await.map(serde_json::to_value),
        };
        reading
            .map_err(|e| FailureReason::ProtocolError(e.to_string()))?
            .map_err(|e| FailureReason::ProtocolError(e.to_string()))
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn invoke(&self, target: &UpstreamTarget) -> UpstreamResult {
        let start = Instant::now();

        // Expiry drops the in-flight future, which closes its socket
        let outcome = match tokio::time::timeout(target.timeout(), self.dispatch(target)).await {
            Ok(Ok(payload)) => UpstreamResult::Success(payload),
            Ok(Err(reason)) => UpstreamResult::Failure(reason),
            Err(_) => UpstreamResult::Failure(FailureReason::Timeout),
        };

        let latency = start.elapsed();
        crate::metrics::record_upstream(target.name(), &outcome, latency);

        match &outcome {
            UpstreamResult::Success(_) => tracing::debug!(
                upstream = %target.name(),
                latency_ms = latency.as_millis() as u64,
                "Upstream call succeeded"
            ),
            UpstreamResult::Failure(reason) => tracing::warn!(
                upstream = %target.name(),
                latency_ms = latency.as_millis() as u64,
                reason = %reason,
                "Upstream call failed"
            ),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{HostNetwork, HostOverview, ProbeError};

    struct StaticProbe;

    #[async_trait]
    impl HostProbe for StaticProbe {
        async fn overview(&self) -> Result<HostOverview, ProbeError> {
            let mut o = HostOverview::default();
            o.cpu.load = 42.0;
            Ok(o)
        }

        async fn network(&self) -> Result<HostNetwork, ProbeError> {
            Err(ProbeError::Unavailable("no sockets".into()))
        }
    }

    fn client() -> UpstreamClient {
        UpstreamClient::new(MinecraftConfig::default(), Arc::new(StaticProbe)).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_http_is_protocol_error() {
        let target = UpstreamTarget::http(
            "sonarr-queue",
            HttpCall::unconfigured("services.sonarr.url"),
            Duration::from_secs(1),
        );
        let result = client().invoke(&target).await;
        assert!(matches!(
            result,
            UpstreamResult::Failure(FailureReason::ProtocolError(ref m)) if m.contains("sonarr.url")
        ));
    }

    #[tokio::test]
    async fn test_host_overview_payload() {
        let target = UpstreamTarget::host("host", HostQuery::Overview, Duration::from_secs(1));
        let result = client().invoke(&target).await;
        assert_eq!(result.payload().unwrap()["cpu"]["load"], 42.0);
    }

    #[tokio::test]
    async fn test_host_probe_error_is_protocol_error() {
        let target = UpstreamTarget::host("net", HostQuery::Network, Duration::from_secs(1));
        let result = client().invoke(&target).await;
        assert!(matches!(
            result.failure(),
            Some(FailureReason::ProtocolError(_))
        ));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let target = UpstreamTarget::http(
            "dead",
            HttpCall::get(format!("http://127.0.0.1:{}/", port)),
            Duration::from_secs(2),
        );
        let result = client().invoke(&target).await;
        assert_eq!(result.failure(), Some(&FailureReason::ConnectionRefused));
    }
}
