//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `framecast_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, AdvancedConfig, AppConfig, LoggingConfig, PollConfig, ProviderConfig,
    RegistryConfig, VideoConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
pub use crate::error::{CliError, NetworkErrorKind, PollError, ProviderError, RegistryError};
pub use crate::poller::{wait_for_task, PollOptions, PollOutcome, PollState, Poller};
pub use crate::provider::{
    AspectRatio, GenerationOptions, ProviderFactory, ProviderType, Resolution, TaskHandle,
    TaskSnapshot, TaskStatus, ValidationResult, VideoProvider,
};
pub use crate::registry::{
    ConfigStore, JsonFileStore, MemoryStore, ProviderConfigPatch, ProviderRegistry,
    StoredProviderConfig, STORAGE_KEY,
};
