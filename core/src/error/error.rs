use thiserror::Error;

use super::{PollError, ProviderError, RegistryError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("polling error: {0}")]
    Poll(#[from] PollError),
    #[error("task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },
    #[error("command failed: {0}")]
    Command(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
