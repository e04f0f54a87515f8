//! User preferences.
//!
//! Settings are owned by a [`SettingsService`] that reads them once from an
//! injected [`SettingsStore`] and persists them on explicit update. The
//! aggregation core never reads them; page handlers only take the poll
//! interval hint from here.

mod service;
mod store;

pub use service::SettingsService;
pub use store::{JsonFileStore, MemoryStore, SettingsStore};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Smallest poll interval the UI may request.
pub const MIN_REFRESH_RATE_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Cyan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Comfortable,
    Compact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnit {
    #[default]
    F,
    C,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub server_name: String,
    pub weather_city: String,
    /// UI poll interval hint in milliseconds
    #[serde(rename = "refreshRate")]
    pub refresh_rate_ms: u64,
    pub animations: bool,
    pub accent_color: AccentColor,
    pub density: Density,
    pub show_debug: bool,
    pub temp_unit: TempUnit,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_name: "HOMELAB-01".to_string(),
            weather_city: "Conroe".to_string(),
            refresh_rate_ms: 2000,
            animations: true,
            accent_color: AccentColor::Blue,
            density: Density::Comfortable,
            show_debug: false,
            temp_unit: TempUnit::F,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.refresh_rate_ms < MIN_REFRESH_RATE_MS {
            return Err(SettingsError::Invalid(format!(
                "refreshRate must be at least {} ms",
                MIN_REFRESH_RATE_MS
            )));
        }
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        theme(self.accent_color)
    }
}

/// CSS utility classes for one accent colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub text: String,
    pub bg: String,
    pub border: String,
    pub glow: String,
}

pub fn theme(accent: AccentColor) -> Theme {
    let color = match accent {
        AccentColor::Blue => "blue",
        AccentColor::Purple => "purple",
        AccentColor::Green => "green",
        AccentColor::Orange => "orange",
        AccentColor::Cyan => "cyan",
    };
    Theme {
        text: format!("text-{}-400", color),
        bg: format!("bg-{}-500", color),
        border: format!("border-{}-500/30", color),
        glow: format!("shadow-{}-500/50", color),
    }
}
