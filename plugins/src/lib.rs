pub mod factory;
mod http;
pub mod volcengine;

pub use factory::{build_provider, PluginProviderFactory};
