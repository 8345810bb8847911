//! Core vnstat collector implementation
//!
//! This module contains the `StatsProvider` trait consumed by the HTTP
//! facade and the limit monitor, and `VnstatCollector`, its implementation
//! on top of the vnstat command line tool.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::collectors::vnstat::errors::CollectionError;
use crate::collectors::vnstat::runner::{CommandRunner, SystemCommandRunner};
use crate::models::{InterfaceRecord, parse_report};

/// Default vnstat executable, resolved through `PATH`
pub const DEFAULT_VNSTAT_BIN: &str = "vnstat";

/// Dashboard arguments appended after `-i <iface>`; `-ru` shows rates in bytes
pub const DEFAULT_DASHBOARD_ARGS: &[&str] = &["-ru"];

/// File name of the single SQLite database used by vnstat 2.x
const SQLITE_DATABASE: &str = "vnstat.db";

/// Source of traffic statistics
///
/// Each call is independent and touches no shared state, so a provider can
/// be used from any number of tasks at once.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Fetches and parses the structured report for `interface`
    async fn fetch_report(&self, interface: &str) -> Result<InterfaceRecord, CollectionError>;

    /// Fetches vnstat's human-readable summary for `interface`, verbatim
    async fn fetch_dashboard(&self, interface: &str) -> Result<String, CollectionError>;

    /// Lists the interfaces vnstat keeps a database for
    async fn list_interfaces(&self) -> Result<Vec<String>, CollectionError>;

    /// Bytes sent plus received during the most recent month, 0 without data
    async fn fetch_cumulative_monthly_transfer(
        &self,
        interface: &str,
    ) -> Result<u64, CollectionError> {
        let record = self.fetch_report(interface).await?;
        Ok(record.traffic.cumulative_monthly_transfer())
    }
}

/// Collects statistics by invoking the vnstat binary
#[derive(Debug, Clone)]
pub struct VnstatCollector<R = SystemCommandRunner> {
    /// Path or name of the vnstat executable
    program: String,
    /// Extra arguments appended to the dashboard invocation
    dashboard_args: Vec<String>,
    runner: R,
}

impl Default for VnstatCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl VnstatCollector {
    /// Creates a collector that runs `vnstat` from `PATH`
    pub fn new() -> Self {
        Self::with_runner(
            DEFAULT_VNSTAT_BIN,
            DEFAULT_DASHBOARD_ARGS.iter().map(|a| a.to_string()).collect(),
            SystemCommandRunner,
        )
    }
}

impl<R: CommandRunner> VnstatCollector<R> {
    /// Creates a collector with a custom executable and process runner
    pub fn with_runner(program: impl Into<String>, dashboard_args: Vec<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            dashboard_args,
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn vnstat(&self, args: &[String]) -> Result<String, CollectionError> {
        self.runner.run(&self.program, args).await.inspect_err(|e| {
            warn!("vnstat invocation {:?} failed: {}", args, e);
        })
    }

    async fn database_dir(&self) -> Result<PathBuf, CollectionError> {
        let config = self.vnstat(&["--showconfig".to_string()]).await?;
        parse_database_dir(&config)
            .ok_or_else(|| CollectionError::malformed("no DatabaseDir entry in vnstat configuration"))
    }

    /// Interfaces known to a vnstat 2.x SQLite database
    async fn database_interfaces(&self) -> Result<Vec<String>, CollectionError> {
        let listing = self
            .vnstat(&["--dbiflist".to_string(), "1".to_string()])
            .await?;
        Ok(normalize_interface_names(listing.lines()))
    }
}

#[async_trait]
impl<R: CommandRunner> StatsProvider for VnstatCollector<R> {
    async fn fetch_report(&self, interface: &str) -> Result<InterfaceRecord, CollectionError> {
        let raw = self
            .vnstat(&["-i".to_string(), interface.to_string(), "--json".to_string()])
            .await?;

        let record = parse_report(&raw, interface).map_err(|e| {
            warn!("Unparsable vnstat report for {}: {}", interface, e);
            CollectionError::from(e)
        })?;

        debug!(
            "Collected report for {}: {} days, {} months, {} hours, {} tops",
            record.id,
            record.traffic.days.len(),
            record.traffic.months.len(),
            record.traffic.hours.len(),
            record.traffic.tops.len()
        );
        Ok(record)
    }

    async fn fetch_dashboard(&self, interface: &str) -> Result<String, CollectionError> {
        let mut args = vec!["-i".to_string(), interface.to_string()];
        args.extend(self.dashboard_args.iter().cloned());
        self.vnstat(&args).await
    }

    async fn list_interfaces(&self) -> Result<Vec<String>, CollectionError> {
        let dir = self.database_dir().await?;
        let entries = read_dir_names(&dir).await?;

        if entries.iter().any(|name| name == SQLITE_DATABASE) {
            debug!("{} holds a SQLite database, asking vnstat for its interfaces", dir.display());
            return self.database_interfaces().await;
        }

        let names = normalize_interface_names(entries.iter().map(String::as_str));
        debug!("Found {} interfaces in {}", names.len(), dir.display());
        Ok(names)
    }
}

/// Extracts the `DatabaseDir` value from `vnstat --showconfig` output
///
/// Accepts both `DatabaseDir "/var/lib/vnstat"` and the unquoted form.
pub fn parse_database_dir(config: &str) -> Option<PathBuf> {
    config.lines().find_map(|line| {
        let line = line.trim();
        let rest = line.strip_prefix("DatabaseDir")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let value = rest.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    })
}

/// Trims names, drops blanks and hidden entries, sorts and deduplicates
pub fn normalize_interface_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with('.'))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

async fn read_dir_names(dir: &Path) -> Result<Vec<String>, CollectionError> {
    let unavailable = |source| CollectionError::DatabaseUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
