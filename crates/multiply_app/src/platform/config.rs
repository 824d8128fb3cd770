use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use multiply_engine::{SyncSettings, DEFAULT_API_URL, STATE_PATH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "multiply.ron";

pub const USAGE: &str = "usage: multiply_app [--serve] [--local] [--bind <addr>] [--api-url <url>]";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown argument {0:?}")]
    UnknownArgument(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    /// Host the store in-process on `bind`; `api_url` then points at it.
    pub serve: bool,
    pub bind: String,
    /// Skip the background context and compute in the UI thread.
    pub force_local: bool,
    pub log_destination: LogDestination,
    pub request_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            serve: false,
            bind: "127.0.0.1:3000".to_string(),
            force_local: false,
            log_destination: LogDestination::File,
            request_timeout_ms: 10_000,
        }
    }
}

impl AppConfig {
    pub fn sync_settings(&self) -> SyncSettings {
        let api_url = if self.serve {
            format!("http://{}{}", client_host(&self.bind), STATE_PATH)
        } else {
            self.api_url.clone()
        };
        SyncSettings {
            api_url,
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..SyncSettings::default()
        }
    }
}

/// A wildcard bind address is reachable from this process via loopback.
fn client_host(bind: &str) -> String {
    match bind.parse::<SocketAddr>() {
        Ok(addr) if addr.ip().is_unspecified() => {
            let loopback = match addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            SocketAddr::new(loopback, addr.port()).to_string()
        }
        _ => bind.to_string(),
    }
}

/// Reads `multiply.ron` from `dir`. A missing file means defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path,
        message: err.to_string(),
    })
}

/// Command line flags override the file.
pub fn apply_args(
    mut config: AppConfig,
    args: impl IntoIterator<Item = String>,
) -> Result<AppConfig, ConfigError> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serve" => config.serve = true,
            "--local" => config.force_local = true,
            "--bind" => config.bind = args.next().ok_or(ConfigError::MissingValue("--bind"))?,
            "--api-url" => {
                config.api_url = args.next().ok_or(ConfigError::MissingValue("--api-url"))?
            }
            _ => return Err(ConfigError::UnknownArgument(arg)),
        }
    }
    Ok(config)
}
