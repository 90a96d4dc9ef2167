//! Configured provider instances, the single default pointer, and their persistence.

mod manager;
mod store;
mod types;

pub use manager::ProviderRegistry;
pub use store::{ConfigStore, JsonFileStore, MemoryStore, STORAGE_KEY};
pub use types::{ProviderConfigPatch, StoredProviderConfig};
