use serde::Deserialize;

use crate::models::WidgetDefaults;

/// Which library collaborator backs the widgets
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LibraryBackend {
    /// Live Kodi instance over JSON-RPC
    Kodi,
    /// JSON snapshot file loaded at startup
    Snapshot,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Library backend to query
    #[serde(default = "default_backend")]
    pub library_backend: LibraryBackend,

    /// Kodi JSON-RPC endpoint
    #[serde(default = "default_kodi_url")]
    pub kodi_url: String,

    /// Kodi web server credentials
    #[serde(default)]
    pub kodi_username: Option<String>,
    #[serde(default)]
    pub kodi_password: Option<String>,

    /// Path of the JSON library snapshot (snapshot backend only)
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Widget size when a request does not pass `limit`
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Size driver for recently-watched reference sets
    #[serde(default = "default_num_recent_similar")]
    pub num_recent_similar: usize,

    #[serde(default)]
    pub extended_info: bool,

    #[serde(default)]
    pub exp_recommended: bool,

    #[serde(default)]
    pub hide_watched_similar: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend() -> LibraryBackend {
    LibraryBackend::Kodi
}

fn default_kodi_url() -> String {
    "http://localhost:8080/jsonrpc".to_string()
}

fn default_limit() -> usize {
    25
}

fn default_num_recent_similar() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Widget option defaults applied to requests that leave fields unset
    pub fn widget_defaults(&self) -> WidgetDefaults {
        WidgetDefaults {
            limit: self.default_limit,
            num_recent_similar: self.num_recent_similar,
            extended_info: self.extended_info,
            exp_recommended: self.exp_recommended,
            hide_watched_similar: self.hide_watched_similar,
        }
    }
}
