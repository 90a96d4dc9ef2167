use serde::{Deserialize, Serialize};

use crate::config::{AdvancedConfig, ProviderConfig, VideoConfig};
use crate::provider::ProviderType;

/// A provider config plus registry bookkeeping, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProviderConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Unix milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub config: ProviderConfig,
}

/// Partial update for [`crate::registry::ProviderRegistry::update`].
/// Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default)]
    pub video_config: VideoConfig,
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

impl ProviderConfigPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply(&self, stored: &mut StoredProviderConfig) {
        if let Some(name) = &self.name {
            stored.name = name.clone();
        }
        let cfg = &mut stored.config;
        if let Some(v) = &self.api_key {
            cfg.api_key = v.clone();
        }
        if let Some(v) = &self.endpoint {
            cfg.endpoint = Some(v.clone());
        }
        if let Some(v) = &self.model {
            cfg.model = Some(v.clone());
        }
        if let Some(v) = &self.relay_url {
            cfg.relay_url = Some(v.clone());
        }
        cfg.video_config.merge(&self.video_config);
        cfg.advanced.merge(&self.advanced);
    }
}
