pub mod factory;
pub mod r#trait;
pub mod types;

pub use factory::{ProviderFactory, ProviderType};
pub use r#trait::VideoProvider;
pub use types::{
    AspectRatio, GenerationOptions, Resolution, TaskHandle, TaskSnapshot, TaskStatus,
    ValidationResult,
};
