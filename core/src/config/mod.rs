mod load;
mod provider;
mod types;

pub use load::{get_framecast_data_dir, load_default, load_from_path};
pub use provider::{AdvancedConfig, ProviderConfig, VideoConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use types::{AppConfig, LoggingConfig, PollConfig, RegistryConfig};
