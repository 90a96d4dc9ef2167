use std::time::Duration;

use crate::config::{AdvancedConfig, PollConfig};
use crate::provider::{TaskSnapshot, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    pub poll_interval: Duration,
    /// Back-to-back failures tolerated; reaching it aborts polling. Never below 1.
    pub max_consecutive_errors: u32,
    /// Overall cutoff. `None` polls until a terminal status.
    pub max_wait: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from_app(&PollConfig::default())
    }
}

impl PollOptions {
    pub fn from_app(app: &PollConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(app.interval_ms),
            max_consecutive_errors: app.max_consecutive_errors.max(1),
            max_wait: app.max_wait_ms.map(Duration::from_millis),
        }
    }

    /// Provider-level `advanced` settings win over the process-wide fallbacks.
    pub fn resolve(app: &PollConfig, advanced: &AdvancedConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(
                advanced.poll_interval.unwrap_or(app.interval_ms),
            ),
            max_consecutive_errors: advanced
                .max_error_retries
                .unwrap_or(app.max_consecutive_errors)
                .max(1),
            max_wait: advanced
                .max_wait_time
                .or(app.max_wait_ms)
                .map(Duration::from_millis),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_consecutive_errors(mut self, max: u32) -> Self {
        self.max_consecutive_errors = max.max(1);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Succeeded,
    Failed,
    Aborted,
}

impl PollState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
        }
    }

    /// Next state after observing `status`.
    pub fn after(status: &TaskStatus) -> Self {
        match status {
            TaskStatus::Succeeded => Self::Succeeded,
            TaskStatus::Failed => Self::Failed,
            _ => Self::Polling,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Polling)
    }
}

/// Terminal result of a poll loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub state: PollState,
    pub snapshot: TaskSnapshot,
    /// Status queries issued, failed ones included.
    pub queries: u32,
}

impl PollOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == PollState::Succeeded
    }
}
