//! Kalshi exchange configuration.

use serde::Deserialize;

/// Kalshi endpoints and HTTP client settings (`[exchange]`).
#[derive(Debug, Clone, Deserialize)]
pub struct KalshiConfig {
    /// REST API base URL, including the version prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Streaming feed URL.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub http_connect_timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".into()
}

fn default_ws_url() -> String {
    "wss://api.elections.kalshi.com/trade-api/ws/v2".into()
}

const fn default_http_timeout_ms() -> u64 {
    5000
}

const fn default_http_connect_timeout_ms() -> u64 {
    2000
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ws_url: default_ws_url(),
            http_timeout_ms: default_http_timeout_ms(),
            http_connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}

/// API credential location (`[credentials]`).
///
/// The key id usually comes from the `API_KEY` environment variable rather
/// than the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub key_id: String,
    /// Path to a PEM-encoded RSA private key.
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,
}

fn default_private_key_path() -> String {
    "rsa_private_key.txt".into()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            private_key_path: default_private_key_path(),
        }
    }
}
