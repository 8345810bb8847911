//! Monthly transfer limit monitor
//!
//! The monitor polls the cumulative transfer of one interface at a fixed
//! interval. Once usage reaches the limit it runs the configured action a
//! single time and stops for good.
//!
//! ## Poll failures
//!
//! A poll that fails (vnstat missing, unparsable output, ...) is counted as
//! zero usage for that tick: the action is not run and polling continues.
//! Each failure is logged with the number of consecutive failures, and from
//! `FAILURE_ESCALATION_THRESHOLD` onwards at error level, so a permanently
//! broken tool shows up in the logs instead of silently disarming the limit.

use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::collectors::vnstat::{CollectionError, StatsProvider};
use crate::formatting::{format_bytes, percent_of};
use crate::monitor::action::{ActionCommand, ActionError, ActionRunner};

/// Pause between the end of one poll and the start of the next
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Consecutive failed polls after which failures are logged as errors
pub const FAILURE_ESCALATION_THRESHOLD: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Interface whose monthly transfer is watched
    pub interface: String,
    /// Limit in bytes, compared with `>=`
    pub limit_bytes: u64,
    /// Command executed once the limit is reached
    pub action: ActionCommand,
    pub interval: Duration,
}

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Created but never polled
    Idle,
    /// Polling on every tick
    Polling,
    /// Action has run; terminal
    Triggered,
}

/// Result of a single tick
#[derive(Debug)]
pub enum TickOutcome {
    /// Usage stayed under the limit
    BelowLimit { used: u64 },
    /// The poll failed and was counted as zero usage
    PollFailed {
        error: CollectionError,
        consecutive_failures: u32,
    },
    /// Usage reached the limit and the action was executed
    Triggered {
        used: u64,
        action_result: Result<String, ActionError>,
    },
    /// The monitor had already triggered; nothing was polled
    Finished,
}

/// Polling state machine, generic over the stats source and action runner
pub struct LimitMonitor<P: ?Sized, A> {
    config: MonitorConfig,
    provider: Arc<P>,
    action_runner: A,
    state: MonitorState,
    consecutive_failures: u32,
    polls: u64,
}

impl<P, A> LimitMonitor<P, A>
where
    P: StatsProvider + ?Sized,
    A: ActionRunner,
{
    pub fn new(config: MonitorConfig, provider: Arc<P>, action_runner: A) -> Self {
        Self {
            config,
            provider,
            action_runner,
            state: MonitorState::Idle,
            consecutive_failures: 0,
            polls: 0,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Number of polls performed so far
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Performs one poll and, if the limit is reached, runs the action
    pub async fn tick(&mut self) -> TickOutcome {
        if self.state == MonitorState::Triggered {
            return TickOutcome::Finished;
        }
        self.state = MonitorState::Polling;
        self.polls += 1;

        let used = match self
            .provider
            .fetch_cumulative_monthly_transfer(&self.config.interface)
            .await
        {
            Ok(used) => {
                self.consecutive_failures = 0;
                used
            }
            Err(error) => return self.record_failure(error),
        };

        if used < self.config.limit_bytes {
            info!(
                "Current transfer on {}: {} of {} ({:.1}%)",
                self.config.interface,
                format_bytes(used),
                format_bytes(self.config.limit_bytes),
                percent_of(used, self.config.limit_bytes)
            );
            return TickOutcome::BelowLimit { used };
        }

        warn!(
            "Bandwidth limit exceeded on {}: {} >= {}, running '{}'",
            self.config.interface,
            format_bytes(used),
            format_bytes(self.config.limit_bytes),
            self.config.action
        );
        self.state = MonitorState::Triggered;

        let action_result = self.action_runner.execute(&self.config.action).await;
        match &action_result {
            Ok(output) => info!("Action result: {}", output.trim()),
            Err(e) => error!("Action failed: {}", e),
        }

        TickOutcome::Triggered {
            used,
            action_result,
        }
    }

    fn record_failure(&mut self, error: CollectionError) -> TickOutcome {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        if self.consecutive_failures >= FAILURE_ESCALATION_THRESHOLD {
            error!(
                "Poll of {} failed {} times in a row, counting as zero usage: {}",
                self.config.interface, self.consecutive_failures, error
            );
        } else {
            warn!(
                "Poll of {} failed ({} consecutive), counting as zero usage: {}",
                self.config.interface, self.consecutive_failures, error
            );
        }

        TickOutcome::PollFailed {
            error,
            consecutive_failures: self.consecutive_failures,
        }
    }

    /// Polls until the action has run, sleeping `interval` between polls
    pub async fn run(mut self) -> MonitorState {
        info!(
            "Starting monitor for {} with a limit of {}",
            self.config.interface,
            format_bytes(self.config.limit_bytes)
        );

        loop {
            if let TickOutcome::Triggered { .. } | TickOutcome::Finished = self.tick().await {
                return self.state;
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }
}

/// Runs `monitor` on its own task until it triggers
pub fn spawn_monitor<P, A>(monitor: LimitMonitor<P, A>) -> JoinHandle<MonitorState>
where
    P: StatsProvider + ?Sized + 'static,
    A: ActionRunner + 'static,
{
    tokio::spawn(monitor.run())
}
