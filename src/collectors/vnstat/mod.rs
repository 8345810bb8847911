//! vnstat collection module
//!
//! Everything that talks to the vnstat command line tool lives here.
//!
//! ## Module Organization
//!
//! - `collector`: `StatsProvider` trait and the `VnstatCollector` implementation
//! - `errors`: `CollectionError` and its machine-readable kinds
//! - `runner`: process boundary (`CommandRunner`) so tests never spawn vnstat
//!
//! ## Usage
//!
//! ```no_run
//! use vnstat_watcher::collectors::vnstat::{StatsProvider, VnstatCollector};
//!
//! # async fn demo() -> Result<(), vnstat_watcher::collectors::vnstat::CollectionError> {
//! let collector = VnstatCollector::new();
//! let used = collector.fetch_cumulative_monthly_transfer("eth0").await?;
//! println!("eth0 moved {used} bytes this month");
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod errors;
pub mod runner;

pub use collector::{
    DEFAULT_DASHBOARD_ARGS, DEFAULT_VNSTAT_BIN, StatsProvider, VnstatCollector, normalize_interface_names,
    parse_database_dir,
};
pub use errors::CollectionError;
pub use runner::{CommandRunner, SystemCommandRunner};

#[cfg(test)]
pub mod tests;
