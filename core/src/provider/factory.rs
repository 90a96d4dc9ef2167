use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::RegistryError;
use crate::provider::VideoProvider;

/// Known backend names. Unknown strings read from storage land in `Other`
/// instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    Volcengine,
    OpenAi,
    Runway,
    Other(String),
}

impl ProviderType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Volcengine => "volcengine",
            Self::OpenAi => "openai",
            Self::Runway => "runway",
            Self::Other(s) => s,
        }
    }

    pub fn known() -> [ProviderType; 3] {
        [Self::Volcengine, Self::OpenAi, Self::Runway]
    }
}

impl From<&str> for ProviderType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "volcengine" => Self::Volcengine,
            "openai" => Self::OpenAi,
            "runway" => Self::Runway,
            _ => Self::Other(value.to_string()),
        }
    }
}

impl From<String> for ProviderType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ProviderType> for String {
    fn from(value: ProviderType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a provider type plus its config to a live instance.
///
/// The registry only talks to this seam; concrete vendors are wired in by
/// whoever builds the registry.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        provider_type: &ProviderType,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn VideoProvider>, RegistryError>;

    fn supported_types(&self) -> Vec<ProviderType> {
        ProviderType::known().to_vec()
    }

    fn is_implemented(&self, provider_type: &ProviderType) -> bool;
}
