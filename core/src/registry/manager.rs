use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::store::{ConfigStore, STORAGE_KEY};
use super::types::{ProviderConfigPatch, StoredProviderConfig};
use crate::config::ProviderConfig;
use crate::error::RegistryError;
use crate::provider::{ProviderFactory, ProviderType, VideoProvider};

/// Holds every configured provider, at most one of which is the default.
///
/// Built once at startup with [`ProviderRegistry::load`] and passed to callers
/// explicitly. All mutations are synchronous and persist the full ordered list;
/// hand out `Arc` instances with [`ProviderRegistry::get`] before awaiting on
/// them.
pub struct ProviderRegistry {
    factory: Arc<dyn ProviderFactory>,
    store: Box<dyn ConfigStore>,
    configs: Vec<StoredProviderConfig>,
    providers: HashMap<String, Arc<dyn VideoProvider>>,
    default_id: Option<String>,
}

impl ProviderRegistry {
    /// Restore from `store`. Unreadable documents and entries are logged and
    /// skipped; loading itself never fails.
    pub fn load(factory: Arc<dyn ProviderFactory>, store: Box<dyn ConfigStore>) -> Self {
        let mut registry = Self {
            factory,
            store,
            configs: Vec::new(),
            providers: HashMap::new(),
            default_id: None,
        };

        match registry.store.read() {
            Ok(Some(raw)) => registry.restore(&raw),
            Ok(None) => {
                tracing::debug!(target: "framecast.registry", stage = "registry.load.empty");
            }
            Err(e) => {
                tracing::error!(
                    target: "framecast.registry",
                    stage = "registry.load.read",
                    error = %e,
                    "failed to read provider store"
                );
            }
        }

        registry
    }

    fn restore(&mut self, raw: &str) {
        let doc = match serde_json::from_str::<Value>(raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::error!(
                    target: "framecast.registry",
                    stage = "registry.load.parse",
                    error = %e,
                    "provider store is not valid JSON"
                );
                return;
            }
        };

        let entries = match doc {
            Value::Object(mut map) => match map.remove(STORAGE_KEY) {
                Some(Value::Array(entries)) => entries,
                _ => {
                    tracing::error!(
                        target: "framecast.registry",
                        stage = "registry.load.parse",
                        key = STORAGE_KEY,
                        "provider store has no provider list"
                    );
                    return;
                }
            },
            Value::Array(entries) => entries,
            _ => {
                tracing::error!(
                    target: "framecast.registry",
                    stage = "registry.load.parse",
                    "provider store has unexpected shape"
                );
                return;
            }
        };

        for (idx, entry) in entries.into_iter().enumerate() {
            let stored = match serde_json::from_value::<StoredProviderConfig>(entry) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!(
                        target: "framecast.registry",
                        stage = "registry.load.entry",
                        index = idx,
                        error = %e,
                        "skipping malformed provider entry"
                    );
                    continue;
                }
            };
            if self.position(&stored.id).is_some() {
                tracing::warn!(
                    target: "framecast.registry",
                    stage = "registry.load.entry",
                    id = %stored.id,
                    "skipping duplicate provider id"
                );
                continue;
            }

            match self.factory.create(&stored.provider_type, &stored.config) {
                Ok(provider) => {
                    self.providers.insert(stored.id.clone(), provider);
                }
                Err(e) => {
                    tracing::error!(
                        target: "framecast.registry",
                        stage = "registry.load.instantiate",
                        id = %stored.id,
                        provider_type = %stored.provider_type,
                        error = %e,
                        "cannot create provider instance"
                    );
                }
            }

            if stored.is_default {
                self.default_id = Some(stored.id.clone());
            }
            self.configs.push(stored);
        }

        // Last flagged entry wins; the flags must agree with the pointer.
        if let Some(default_id) = self.default_id.clone() {
            for cfg in &mut self.configs {
                cfg.is_default = cfg.id == default_id;
            }
        }

        tracing::info!(
            target: "framecast.registry",
            stage = "registry.load.done",
            providers = self.configs.len(),
            live = self.providers.len(),
            default_id = ?self.default_id
        );
    }

    /// Register a provider and return its generated id (`<type>_<createdAtMs>`).
    pub fn add(
        &mut self,
        provider_type: ProviderType,
        config: ProviderConfig,
        name: impl Into<String>,
        is_default: bool,
    ) -> Result<String, RegistryError> {
        if !self.factory.is_implemented(&provider_type) {
            return Err(RegistryError::UnsupportedProviderType(
                provider_type.to_string(),
            ));
        }

        let provider = self.factory.create(&provider_type, &config)?;
        let now = now_ms();
        let id = self.generate_id(&provider_type, now);
        let name = name.into();

        tracing::info!(
            target: "framecast.registry",
            stage = "registry.add",
            id = %id,
            provider_type = %provider_type,
            name = %name,
            is_default = is_default
        );

        self.configs.push(StoredProviderConfig {
            id: id.clone(),
            provider_type,
            name,
            is_default: false,
            created_at: now,
            updated_at: now,
            config,
        });
        self.providers.insert(id.clone(), provider);
        if is_default {
            self.mark_default(&id);
        }

        self.persist();
        Ok(id)
    }

    /// Delete a provider. Removing the default clears the pointer; no other
    /// entry is promoted.
    pub fn remove(&mut self, id: &str) -> Result<StoredProviderConfig, RegistryError> {
        let idx = self
            .position(id)
            .ok_or_else(|| RegistryError::ProviderNotFound(id.to_string()))?;
        let removed = self.configs.remove(idx);
        self.providers.remove(id);
        if self.default_id.as_deref() == Some(id) {
            self.default_id = None;
        }

        tracing::info!(
            target: "framecast.registry",
            stage = "registry.remove",
            id = %id,
            was_default = removed.is_default
        );

        self.persist();
        Ok(removed)
    }

    pub fn set_default(&mut self, id: &str) -> Result<(), RegistryError> {
        if self.position(id).is_none() {
            return Err(RegistryError::ProviderNotFound(id.to_string()));
        }
        self.mark_default(id);

        tracing::info!(target: "framecast.registry", stage = "registry.set_default", id = %id);

        self.persist();
        Ok(())
    }

    /// Merge `patch` into the stored config and rebuild the live instance.
    /// Nothing changes if the rebuilt config cannot be instantiated.
    pub fn update(&mut self, id: &str, patch: &ProviderConfigPatch) -> Result<(), RegistryError> {
        let idx = self
            .position(id)
            .ok_or_else(|| RegistryError::ProviderNotFound(id.to_string()))?;

        let mut candidate = self.configs[idx].clone();
        patch.apply(&mut candidate);
        candidate.updated_at = now_ms().max(candidate.updated_at);

        let provider = self
            .factory
            .create(&candidate.provider_type, &candidate.config)
            .inspect_err(|e| {
                tracing::error!(
                    target: "framecast.registry",
                    stage = "registry.update",
                    id = %id,
                    error = %e,
                    "cannot rebuild provider, keeping previous config"
                );
            })?;

        self.configs[idx] = candidate;
        self.providers.insert(id.to_string(), provider);

        tracing::info!(target: "framecast.registry", stage = "registry.update", id = %id);

        self.persist();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn VideoProvider>, RegistryError> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::ProviderNotFound(id.to_string()))
    }

    pub fn get_default(&self) -> Result<Arc<dyn VideoProvider>, RegistryError> {
        let id = self
            .default_id
            .as_deref()
            .ok_or(RegistryError::NoDefaultConfigured)?;
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::DefaultProviderMissing(id.to_string()))
    }

    /// `get(id)` when an id is given, otherwise the default provider.
    pub fn resolve(&self, id: Option<&str>) -> Result<Arc<dyn VideoProvider>, RegistryError> {
        match id {
            Some(id) => self.get(id),
            None => self.get_default(),
        }
    }

    /// Stored configs in insertion order.
    pub fn list(&self) -> &[StoredProviderConfig] {
        &self.configs
    }

    pub fn info(&self, id: &str) -> Result<&StoredProviderConfig, RegistryError> {
        self.configs
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| RegistryError::ProviderNotFound(id.to_string()))
    }

    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    pub fn factory(&self) -> &Arc<dyn ProviderFactory> {
        &self.factory
    }

    /// Drop every provider and the default pointer.
    pub fn clear(&mut self) {
        let removed = self.configs.len();
        self.configs.clear();
        self.providers.clear();
        self.default_id = None;

        tracing::info!(target: "framecast.registry", stage = "registry.clear", removed = removed);

        self.persist();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.configs.iter().position(|c| c.id == id)
    }

    fn mark_default(&mut self, id: &str) {
        for cfg in &mut self.configs {
            cfg.is_default = cfg.id == id;
        }
        self.default_id = Some(id.to_string());
    }

    fn generate_id(&self, provider_type: &ProviderType, now: i64) -> String {
        let mut stamp = now;
        loop {
            let id = format!("{}_{}", provider_type, stamp);
            if self.position(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }

    fn persist(&self) {
        let list = match serde_json::to_value(&self.configs) {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(
                    target: "framecast.registry",
                    stage = "registry.save",
                    error = %e,
                    "failed to serialize provider configs"
                );
                return;
            }
        };
        let mut doc = Map::new();
        doc.insert(STORAGE_KEY.to_string(), list);

        let result = serde_json::to_string_pretty(&Value::Object(doc))
            .map_err(anyhow::Error::from)
            .and_then(|s| self.store.write(&s));
        if let Err(e) = result {
            tracing::error!(
                target: "framecast.registry",
                stage = "registry.save",
                error = %e,
                "failed to save provider configs"
            );
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
