use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unsupported provider type: {0}")]
    UnsupportedProviderType(String),

    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    #[error("no default provider configured")]
    NoDefaultConfigured,

    /// The default pointer names an entry that has no live instance.
    #[error("default provider {0} is missing")]
    DefaultProviderMissing(String),

    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
}
