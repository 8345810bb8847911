//! Application configuration
//!
//! Values are layered: built-in defaults, then a TOML file, then `VW_`
//! environment variables (`VW_MONITOR__LIMIT_GIB=500`), then command line
//! flags applied by the binary. The result is built once at startup and
//! passed to the server and the monitor explicitly.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::collectors::vnstat::{DEFAULT_DASHBOARD_ARGS, DEFAULT_VNSTAT_BIN};
use crate::formatting::gib_to_bytes;
use crate::monitor::{ActionCommand, DEFAULT_ACTION, DEFAULT_POLL_INTERVAL, MonitorConfig};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:7007";

/// Base name of the optional config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vw";

/// Effectively unlimited; the monitor only matters once a real limit is set
pub const DEFAULT_LIMIT_GIB: u64 = 0x8FF_FFFF;

pub const DEFAULT_INTERVAL_SECS: u64 = DEFAULT_POLL_INTERVAL.as_secs();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorSettings {
    /// Interface to watch; empty disables the monitor
    pub interface: String,
    /// Monthly transfer limit in GiB
    pub limit_gib: u64,
    /// Command line executed once the limit is reached
    pub command: String,
    /// Seconds between polls
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub listen_addr: String,
    pub vnstat_bin: String,
    /// Extra arguments for the dashboard invocation, `["-ru"]` by default
    #[serde(default)]
    pub dashboard_args: Vec<String>,
    pub monitor: MonitorSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            vnstat_bin: DEFAULT_VNSTAT_BIN.to_string(),
            dashboard_args: DEFAULT_DASHBOARD_ARGS.iter().map(|a| a.to_string()).collect(),
            monitor: MonitorSettings {
                interface: String::new(),
                limit_gib: DEFAULT_LIMIT_GIB,
                command: DEFAULT_ACTION.to_string(),
                interval_secs: DEFAULT_INTERVAL_SECS,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path` (required) or `vw.toml` (optional)
    /// and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            .set_default("listen_addr", defaults.listen_addr)?
            .set_default("vnstat_bin", defaults.vnstat_bin)?
            .set_default("dashboard_args", defaults.dashboard_args)?
            .set_default("monitor.interface", defaults.monitor.interface)?
            .set_default("monitor.limit_gib", defaults.monitor.limit_gib)?
            .set_default("monitor.command", defaults.monitor.command)?
            .set_default("monitor.interval_secs", defaults.monitor.interval_secs)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix("VW")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("dashboard_args")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("listen address '{}': {}", self.listen_addr, e)))
    }

    /// Monitor configuration, or `None` when no interface is configured
    pub fn monitor_config(&self) -> Result<Option<MonitorConfig>, ConfigError> {
        let settings = &self.monitor;
        let interface = settings.interface.trim();
        if interface.is_empty() {
            return Ok(None);
        }

        if settings.interval_secs == 0 {
            return Err(ConfigError::Invalid("monitor interval must be at least one second".to_string()));
        }

        let action = ActionCommand::parse(&settings.command)
            .map_err(|e| ConfigError::Invalid(format!("monitor command: {e}")))?;

        Ok(Some(MonitorConfig {
            interface: interface.to_string(),
            limit_bytes: gib_to_bytes(settings.limit_gib),
            action,
            interval: Duration::from_secs(settings.interval_secs),
        }))
    }
}
