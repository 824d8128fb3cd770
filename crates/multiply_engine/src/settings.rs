use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api/state";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Full URL of the durable store's state record.
    pub api_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// How long a stopping worker waits for queued persistence calls.
    pub drain_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            drain_timeout: Duration::from_secs(2),
        }
    }
}

impl SyncSettings {
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}
