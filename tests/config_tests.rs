mod support;

use fairquote::error::{ConfigError, Error};
use fairquote::infrastructure::config::settings::Config;
use fairquote::infrastructure::orchestration::EngineSettings;
use fairquote::testkit::config::MINIMAL_TOML;

use support::config::write_temp_config;

#[test]
fn loads_full_config_file() {
    let file = write_temp_config(
        r#"
[exchange]
api_url = "https://demo-api.kalshi.co/trade-api/v2"
ws_url = "wss://demo-api.kalshi.co/trade-api/ws/v2"
http_timeout_ms = 3000

[credentials]
key_id = "abc"
private_key_path = "keys/demo.pem"

[market]
ticker = "KXHIGHNY-26OCT17-T70"
auto_select = false

[strategy]
spread_cents = 3
order_size = 5

[feed]
reconnect_delay_ms = 2000

[inventory]
poll_interval_ms = 15000

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(file.path()).expect("valid config");

    assert_eq!(config.exchange.ws_url, "wss://demo-api.kalshi.co/trade-api/ws/v2");
    assert_eq!(config.exchange.http_timeout_ms, 3000);
    assert_eq!(config.credentials.private_key_path, "keys/demo.pem");
    assert_eq!(
        config.market.ticker().map(|t| t.to_string()).as_deref(),
        Some("KXHIGHNY-26OCT17-T70")
    );
    assert!(!config.market.auto_select);
    assert!(config.logging.is_json());

    let settings = EngineSettings::from(&config);
    assert_eq!(settings.quote.spread_cents, 3);
    assert_eq!(settings.quote.order_size, 5);
    assert_eq!(settings.reconnect_delay.as_millis(), 2000);
    assert_eq!(settings.poll_interval.as_secs(), 15);
}

#[test]
fn minimal_file_takes_defaults() {
    let file = write_temp_config(MINIMAL_TOML);
    let config = Config::parse_toml(&std::fs::read_to_string(file.path()).unwrap()).unwrap();

    let settings = EngineSettings::from(&config);
    assert_eq!(settings.quote.spread_cents, 2);
    assert_eq!(settings.quote.order_size, 2);
    assert_eq!(settings.reconnect_delay.as_secs(), 5);
    assert_eq!(settings.poll_interval.as_secs(), 10);
}

#[test]
fn unreadable_path_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn rejects_zero_order_size() {
    let toml = format!("{MINIMAL_TOML}\n[strategy]\norder_size = 0\n");
    match Config::parse_toml(&toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "order_size",
            ..
        })) => {}
        other => panic!("expected invalid order_size, got {other:?}"),
    }
}

#[test]
fn rejects_empty_ws_url() {
    let toml = format!("{MINIMAL_TOML}\n[exchange]\nws_url = \"\"\n");
    assert!(matches!(
        Config::parse_toml(&toml),
        Err(Error::Config(ConfigError::MissingField { field: "ws_url" }))
    ));
}

#[test]
fn unknown_sections_are_tolerated() {
    let toml = format!("{MINIMAL_TOML}\n[dashboard]\nport = 8080\n");
    assert!(Config::parse_toml(&toml).is_ok());
}
