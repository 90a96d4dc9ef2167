use thiserror::Error;

use super::ProviderError;

#[derive(Error, Debug)]
pub enum PollError {
    /// The consecutive-error ceiling was reached.
    #[error(
        "status query failed {attempts} consecutive times, check network connectivity and provider configuration (last error: {last_error})"
    )]
    PollingExhausted {
        attempts: u32,
        #[source]
        last_error: ProviderError,
    },

    /// Credentials were rejected before any request was sent.
    #[error("config error: {0}")]
    Config(String),

    /// Only produced when an overall wait cutoff was configured.
    #[error("task {task_id} not finished after {waited_ms}ms")]
    TimedOut { task_id: String, waited_ms: u64 },

    #[error("polling aborted: {0}")]
    Aborted(String),
}
