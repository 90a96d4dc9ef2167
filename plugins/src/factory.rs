use std::sync::Arc;

use framecast_core::api::{
    ProviderConfig, ProviderFactory, ProviderType, RegistryError, VideoProvider,
};

use crate::volcengine::VolcengineProvider;

pub fn build_provider(
    provider_type: &ProviderType,
    config: &ProviderConfig,
) -> Result<Arc<dyn VideoProvider>, RegistryError> {
    match provider_type {
        ProviderType::Volcengine => {
            let provider = VolcengineProvider::new(config.clone())
                .map_err(|e| RegistryError::InvalidConfig(e.to_string()))?;
            Ok(Arc::new(provider))
        }
        // Declared so stored records keep their type, but not built yet.
        ProviderType::OpenAi | ProviderType::Runway | ProviderType::Other(_) => Err(
            RegistryError::UnsupportedProviderType(provider_type.to_string()),
        ),
    }
}

/// Factory handed to the registry by the binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginProviderFactory;

impl ProviderFactory for PluginProviderFactory {
    fn create(
        &self,
        provider_type: &ProviderType,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn VideoProvider>, RegistryError> {
        build_provider(provider_type, config)
    }

    fn is_implemented(&self, provider_type: &ProviderType) -> bool {
        matches!(provider_type, ProviderType::Volcengine)
    }
}
