use crate::application::call_bridge::ConsumerCallBridge;
use crate::application::error::ApplicationError;
use crate::application::startup::StartupMode;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, SystemTime};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bootstrap_server: String,
    pub client_id: String,
    pub request_timeout: Duration,
    pub startup_mode: StartupMode,
    pub startup_timestamp_ms: Option<i64>,
}

impl AppConfig {
    pub fn new(bootstrap_server: impl Into<String>) -> Self {
        Self {
            bootstrap_server: bootstrap_server.into(),
            client_id: default_client_id(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            startup_mode: StartupMode::default(),
            startup_timestamp_ms: None,
        }
    }

    /// Loads a Kafka-style `.properties` file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApplicationError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_properties(&content)
    }

    pub fn from_properties(content: &str) -> Result<Self> {
        let props = parse_properties(content);

        let bootstrap_server = props
            .get("bootstrap.servers")
            .and_then(|servers| servers.split(',').map(str::trim).find(|s| !s.is_empty()))
            .ok_or_else(|| ApplicationError::Config("bootstrap.servers is required".to_string()))?;

        let mut config = Self::new(bootstrap_server);

        if let Some(client_id) = props.get("client.id") {
            config.client_id = client_id.clone();
        }
        if let Some(timeout) = props.get("request.timeout.ms") {
            let millis = timeout.parse::<u64>().map_err(|_| {
                ApplicationError::Config(format!("invalid request.timeout.ms: {}", timeout))
            })?;
            config.request_timeout = Duration::from_millis(millis);
        }
        if let Some(mode) = props.get("startup.mode") {
            config.startup_mode = mode.parse()?;
        }
        if let Some(timestamp) = props.get("startup.timestamp.ms") {
            let millis = timestamp.parse::<i64>().map_err(|_| {
                ApplicationError::Config(format!("invalid startup.timestamp.ms: {}", timestamp))
            })?;
            config.startup_timestamp_ms = Some(millis);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.startup_mode == StartupMode::Timestamp && self.startup_timestamp_ms.is_none() {
            return Err(ApplicationError::Config(
                "startup.mode=timestamp requires startup.timestamp.ms".to_string(),
            ));
        }
        if matches!(self.startup_timestamp_ms, Some(ts) if ts < 0) {
            return Err(ApplicationError::Config(
                "startup.timestamp.ms must not be negative".to_string(),
            ));
        }
        if self.client_id.len() > i16::MAX as usize {
            return Err(ApplicationError::Config(format!(
                "client.id must not exceed {} bytes",
                i16::MAX
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ApplicationError::Config(
                "request.timeout.ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Bridge fixed at the configured startup timestamp, or at the current time
    /// when none is set.
    pub fn call_bridge(&self) -> ConsumerCallBridge {
        match self.startup_timestamp_ms {
            Some(ts) => ConsumerCallBridge::from_timestamp_millis(ts),
            None => ConsumerCallBridge::new(SystemTime::now()),
        }
    }
}

fn default_client_id() -> String {
    format!("kafka-bridge-{}", uuid::Uuid::new_v4())
}

// key=value 또는 key: value, '#' / '!' 로 시작하는 줄은 주석
fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let idx = line.find(|c: char| c == '=' || c == ':')?;
            let (key, value) = line.split_at(idx);
            Some((key.trim().to_string(), value[1..].trim().to_string()))
        })
        .collect()
}
