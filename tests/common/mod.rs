//! Shared helpers for integration tests.
//!
//! Routers here run the production [`UpstreamClient`] against wiremock
//! servers, a fake RCON console and a canned host probe.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use homelab::api::{create_router, AppState};
use homelab::config::HubConfig;
use homelab::settings::{MemoryStore, SettingsService};
use homelab::telemetry::{HostNetwork, HostOverview, HostProbe, ProbeError};
use homelab::upstream::rcon::{decode_packet, encode_packet, PACKET_AUTH, PACKET_RESPONSE};
use homelab::upstream::UpstreamClient;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const SONARR_KEY: &str = "sonarr-key";
pub const RADARR_KEY: &str = "radarr-key";
pub const JELLYFIN_KEY: &str = "jellyfin-key";
pub const RCON_PASSWORD: &str = "creeper";

// =============================================================================
// Configuration
// =============================================================================

/// Config with every HTTP service pointed at `base_url`.
pub fn config_for(base_url: &str) -> HubConfig {
    let mut config = HubConfig::default();
    config.services.sonarr.url = Some(base_url.to_string());
    config.services.sonarr.api_key = Some(SONARR_KEY.to_string());
    config.services.radarr.url = Some(base_url.to_string());
    config.services.radarr.api_key = Some(RADARR_KEY.to_string());
    config.services.jellyfin.url = Some(base_url.to_string());
    config.services.jellyfin.api_key = Some(JELLYFIN_KEY.to_string());
    config
}

/// Point the console at a local fake RCON server.
pub fn with_console(mut config: HubConfig, port: u16) -> HubConfig {
    config.services.minecraft.host = "127.0.0.1".to_string();
    config.services.minecraft.port = port;
    config.services.minecraft.password = RCON_PASSWORD.to_string();
    config
}

// =============================================================================
// Host probe
// =============================================================================

/// Canned host readings; `network` fails unless enabled.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    pub overview: HostOverview,
    pub network_available: bool,
}

impl StaticProbe {
    pub fn with_load(load: f32) -> Self {
        let mut overview = HostOverview::default();
        overview.cpu.load = load;
        Self {
            overview,
            network_available: false,
        }
    }
}

#[async_trait]
impl HostProbe for StaticProbe {
    async fn overview(&self) -> Result<HostOverview, ProbeError> {
        Ok(self.overview.clone())
    }

    async fn network(&self) -> Result<HostNetwork, ProbeError> {
        if self.network_available {
            Ok(HostNetwork::default())
        } else {
            Err(ProbeError::Unavailable("no network readings".into()))
        }
    }
}

// =============================================================================
// App builders
// =============================================================================

pub fn client(config: &HubConfig, probe: StaticProbe) -> UpstreamClient {
    UpstreamClient::new(config.services.minecraft.clone(), Arc::new(probe)).unwrap()
}

/// Router over the production client with in-memory settings.
pub fn create_app(config: HubConfig, probe: StaticProbe) -> axum::Router {
    let upstream = Arc::new(client(&config, probe));
    let settings = SettingsService::load(Box::new(MemoryStore::new()));
    let state = AppState::new(Arc::new(config), upstream, settings);
    create_router(Arc::new(state))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// =============================================================================
// Fake RCON console
// =============================================================================

/// A console that accepts [`RCON_PASSWORD`] and answers each command with
/// `reply(command)`. Counts accepted connections.
pub struct FakeConsole {
    pub port: u16,
    connections: Arc<AtomicUsize>,
}

impl FakeConsole {
    pub async fn start<F>(reply: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let connections = Arc::new(AtomicUsize::new(0));
        let reply = Arc::new(reply);

        let counter = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = Arc::clone(&reply);
                tokio::spawn(async move {
                    let _ = serve_console(socket, reply.as_ref()).await;
                });
            }
        });

        Self { port, connections }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve_console<F>(mut socket: TcpStream, reply: &F) -> std::io::Result<()>
where
    F: Fn(&str) -> String,
{
    loop {
        let length = socket.read_i32_le().await?;
        let mut frame = vec![0u8; length as usize];
        socket.read_exact(&mut frame).await?;
        let packet = decode_packet(&frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        let response = if packet.kind == PACKET_AUTH {
            let id = if packet.body == RCON_PASSWORD { packet.id } else { -1 };
            encode_packet(id, homelab::upstream::rcon::PACKET_EXEC, "")
        } else {
            encode_packet(packet.id, PACKET_RESPONSE, &reply(&packet.body))
        };
        socket.write_all(&response).await?;
    }
}
