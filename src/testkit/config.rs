//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use std::time::Duration;

use crate::domain::QuoteParams;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::EngineSettings;

/// Minimal valid TOML: only the key id is required.
pub const MINIMAL_TOML: &str = r#"
[credentials]
key_id = "test-key"
"#;

/// A valid config with a key id and the default everything else.
pub fn config() -> Config {
    let mut config = Config::default();
    config.credentials.key_id = "test-key".into();
    config
}

/// Engine settings with default quoting and short delays.
pub fn engine_settings() -> EngineSettings {
    EngineSettings {
        quote: QuoteParams::default(),
        reconnect_delay: Duration::from_millis(50),
        poll_interval: Duration::from_millis(100),
    }
}
