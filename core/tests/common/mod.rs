#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use framecast_core::api::{
    GenerationOptions, ProviderConfig, ProviderError, ProviderFactory, ProviderType,
    RegistryError, TaskHandle, TaskSnapshot, TaskStatus, ValidationResult, VideoProvider,
};
use framecast_core::error::NetworkErrorKind;

/// Provider whose status responses are played back from a script.
pub struct ScriptedProvider {
    config: ProviderConfig,
    script: Mutex<VecDeque<Result<TaskSnapshot, ProviderError>>>,
    status_calls: AtomicU32,
    create_calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<TaskSnapshot, ProviderError>>) -> Self {
        Self {
            config: ProviderConfig::new("scripted-key-0123456789"),
            script: Mutex::new(script.into()),
            status_calls: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
        }
    }

    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn create_task(&self, _options: &GenerationOptions) -> Result<TaskHandle, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TaskHandle::new("t1"))
    }

    async fn get_task_status(&self, _task_id: &str) -> Result<TaskSnapshot, ProviderError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Decode("script exhausted".into())))
    }

    fn validate_config(&self) -> ValidationResult {
        ValidationResult::from_errors(vec![])
    }
}

pub fn snap(status: &str) -> Result<TaskSnapshot, ProviderError> {
    Ok(TaskSnapshot::new("t1", TaskStatus::parse(status)))
}

pub fn succeeded(url: &str) -> Result<TaskSnapshot, ProviderError> {
    Ok(TaskSnapshot::new("t1", TaskStatus::Succeeded).with_video_url(url))
}

pub fn net_err() -> Result<TaskSnapshot, ProviderError> {
    Err(ProviderError::network(
        NetworkErrorKind::Connect,
        "connection refused",
    ))
}

pub fn remote_err(status: u16) -> Result<TaskSnapshot, ProviderError> {
    Err(ProviderError::remote(status, "upstream unavailable"))
}

/// Factory that only knows `volcengine` and hands out empty scripted providers.
pub struct ScriptedFactory;

impl ProviderFactory for ScriptedFactory {
    fn create(
        &self,
        provider_type: &ProviderType,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn VideoProvider>, RegistryError> {
        if !self.is_implemented(provider_type) {
            return Err(RegistryError::UnsupportedProviderType(
                provider_type.to_string(),
            ));
        }
        Ok(Arc::new(
            ScriptedProvider::new(vec![]).with_config(config.clone()),
        ))
    }

    fn is_implemented(&self, provider_type: &ProviderType) -> bool {
        *provider_type == ProviderType::Volcengine
    }
}
