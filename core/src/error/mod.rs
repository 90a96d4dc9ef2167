#[allow(clippy::module_inception)]
pub mod error;
pub mod poll;
pub mod provider;
pub mod registry;

pub use error::CliError;
pub use poll::PollError;
pub use provider::{NetworkErrorKind, ProviderError};
pub use registry::RegistryError;
