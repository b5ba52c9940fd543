//! `LegitmarkConfig::from_env` reads process-wide variables, so every case lives in a
//! single test in its own binary.

use std::env;

use legitmark::error::ErrorKind;
use legitmark::LegitmarkConfig;

const VARS: [&str; 4] = [
    "LEGITMARK_API_KEY",
    "LEGITMARK_TIMEOUT_MS",
    "LEGITMARK_BASE_URL",
    "LEGITMARK_MAX_RETRIES",
];

fn clear_vars() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_from_env_layers_variables_over_defaults() {
    clear_vars();

    let error = LegitmarkConfig::from_env().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConfigurationError);
    assert!(!error.is_retryable());
    assert!(error.message().contains("LEGITMARK_API_KEY"));

    env::set_var("LEGITMARK_API_KEY", "   ");
    let error = LegitmarkConfig::from_env().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConfigurationError);

    env::set_var("LEGITMARK_API_KEY", "lm_env_key");
    env::set_var("LEGITMARK_TIMEOUT_MS", "5000");
    let config = LegitmarkConfig::from_env().unwrap();
    assert_eq!(config.api_key, "lm_env_key");
    assert_eq!(config.timeout_ms, 5000);
    assert_eq!(config.base_url, LegitmarkConfig::default().base_url);
    assert_eq!(config.max_retries, 3);

    env::set_var("LEGITMARK_BASE_URL", "https://sandbox.legitmark.example");
    env::set_var("LEGITMARK_MAX_RETRIES", "0");
    let config = LegitmarkConfig::from_env().unwrap();
    assert_eq!(config.base_url, "https://sandbox.legitmark.example");
    assert_eq!(config.max_retries, 0);

    env::set_var("LEGITMARK_TIMEOUT_MS", "0");
    let error = LegitmarkConfig::from_env().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ConfigurationError);

    clear_vars();
}
