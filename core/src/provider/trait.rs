use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::provider::types::{GenerationOptions, TaskHandle, TaskSnapshot, ValidationResult};

/// Capability contract every video generation backend satisfies.
///
/// Implementations translate between the generic types in this crate and one
/// vendor's wire format. They never retry; retry policy belongs to the poller.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Short vendor name used in logs, e.g. `volcengine`.
    fn name(&self) -> &str;

    /// The configuration this instance was built from.
    fn config(&self) -> &ProviderConfig;

    /// Submit one generation job. Exactly one remote job exists per `Ok`.
    ///
    /// Fails with [`ProviderError::Config`] before any network access when the
    /// credentials are structurally invalid.
    async fn create_task(&self, options: &GenerationOptions) -> Result<TaskHandle, ProviderError>;

    /// Read-only, point-in-time status query.
    async fn get_task_status(&self, task_id: &str) -> Result<TaskSnapshot, ProviderError>;

    /// Structural credential check; no network access.
    fn validate_config(&self) -> ValidationResult;

    /// Turn a failed validation into the error both remote calls return.
    fn ensure_valid_config(&self) -> Result<(), ProviderError> {
        let result = self.validate_config();
        if result.valid {
            Ok(())
        } else {
            Err(ProviderError::Config(result.errors.join("; ")))
        }
    }
}
