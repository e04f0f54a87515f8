//! homelab - home-lab dashboard back end
//!
//! Gathers telemetry from independent, unreliable upstream services (media
//! queue managers, a media server, a game-server console, the host itself)
//! and turns each dashboard request into one consistent, UI-ready snapshot,
//! tolerating partial failure.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod pages;
pub mod settings;
pub mod shape;
pub mod telemetry;
pub mod upstream;
