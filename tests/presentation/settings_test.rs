use std::time::Duration;

use vitrine::presentation::Environment;
use vitrine::presentation::config::{
    DatabaseProvider, DatabaseSettings, LlmSettings, LoggingSettings, RateLimitSettings,
    ScraperSettings, ServerSettings, Settings,
};

fn valid_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseSettings {
            provider: DatabaseProvider::Memory,
            url: String::new(),
            max_connections: 5,
            run_migrations: false,
        },
        scraper: ScraperSettings {
            base_url: "http://localhost:3002".to_string(),
            api_key: "fc-key".to_string(),
            timeout_secs: 30,
        },
        llm: LlmSettings {
            base_url: "http://localhost:8080".to_string(),
            api_key: "sk-key".to_string(),
            model: "claude-test".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        },
        rate_limit: RateLimitSettings {
            tokens_per_window: 36_000,
            window_secs: 60,
            chars_per_token: 4,
        },
        logging: LoggingSettings {
            level: "info".to_string(),
            enable_json: false,
        },
    }
}

#[test]
fn given_complete_settings_when_validating_then_succeeds() {
    assert!(valid_settings().validate().is_ok());
}

#[test]
fn given_zero_token_budget_when_validating_then_names_offending_key() {
    let mut settings = valid_settings();
    settings.rate_limit.tokens_per_window = 0;

    let error = settings.validate().unwrap_err();

    assert!(error.to_string().contains("rate_limit.tokens_per_window"));
}

#[test]
fn given_zero_llm_timeout_when_validating_then_fails() {
    let mut settings = valid_settings();
    settings.llm.timeout_secs = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn given_rate_limit_settings_when_building_gate_config_then_converts_window() {
    let config = valid_settings().rate_limit.gate_config();

    assert_eq!(config.capacity, 36_000);
    assert_eq!(config.window, Duration::from_secs(60));
    assert_eq!(config.chars_per_token, 4);
}

#[test]
fn given_no_overrides_when_loading_then_uses_shipped_defaults() {
    let settings = Settings::load(Environment::Test).expect("settings should load");

    assert_eq!(settings.rate_limit.tokens_per_window, 36_000);
    assert_eq!(settings.rate_limit.window_secs, 60);
    assert_eq!(settings.rate_limit.chars_per_token, 4);
    assert!(settings.llm.base_url.starts_with("https://"));
}
