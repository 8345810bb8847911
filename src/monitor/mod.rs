//! Bandwidth limit monitoring
//!
//! - `limit_monitor`: the polling state machine and its task spawner
//! - `action`: the command executed when the limit is reached

pub mod action;
pub mod limit_monitor;

pub use action::{ActionCommand, ActionError, ActionRunner, CommandActionRunner, DEFAULT_ACTION};
pub use limit_monitor::{
    DEFAULT_POLL_INTERVAL, LimitMonitor, MonitorConfig, MonitorState, TickOutcome, spawn_monitor,
};
