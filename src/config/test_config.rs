use super::app_config::AppConfig;
use crate::application::startup::StartupMode;
use std::time::Duration;

/// Config pointing at `addr` with a short timeout, for tests against a local
/// mock broker.
pub fn create_test_config(addr: &str, startup_mode: StartupMode) -> AppConfig {
    AppConfig {
        bootstrap_server: addr.to_string(),
        client_id: "test-client".to_string(),
        request_timeout: Duration::from_secs(2),
        startup_mode,
        startup_timestamp_ms: match startup_mode {
            StartupMode::Timestamp => Some(0),
            _ => None,
        },
    }
}
