use serde::{Deserialize, Serialize};

use super::types::{default_max_consecutive_errors, default_poll_interval_ms};
use crate::provider::{AspectRatio, Resolution};

pub const DEFAULT_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3";
pub const DEFAULT_MODEL: &str = "doubao-seedance-1-0-pro-250528";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 300_000;

/// Credentials, endpoint and per-job defaults owned by exactly one provider instance.
///
/// Stored on disk as camelCase JSON, flattened into the registry record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Route requests through a credential-attaching relay instead of the vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,

    #[serde(default)]
    pub video_config: VideoConfig,

    #[serde(default)]
    pub advanced: AdvancedConfig,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<AspectRatio>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_fixed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<bool>,
}

impl VideoConfig {
    /// Defaults applied to providers registered from the command line.
    pub fn recommended() -> Self {
        Self {
            resolution: Some(Resolution::P1080),
            duration: Some(5),
            ratio: Some(AspectRatio::Landscape),
            camera_fixed: Some(false),
            watermark: Some(false),
        }
    }

    /// Overwrite every field that is set in `other`.
    pub fn merge(&mut self, other: &VideoConfig) {
        if other.resolution.is_some() {
            self.resolution = other.resolution;
        }
        if other.duration.is_some() {
            self.duration = other.duration;
        }
        if other.ratio.is_some() {
            self.ratio = other.ratio;
        }
        if other.camera_fixed.is_some() {
            self.camera_fixed = other.camera_fixed;
        }
        if other.watermark.is_some() {
            self.watermark = other.watermark;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    /// Delay between status queries, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// Consecutive status-query failures tolerated before polling gives up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_error_retries: Option<u32>,

    /// Overall wait cutoff in milliseconds. Absent means no cutoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_time: Option<u64>,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

impl AdvancedConfig {
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval.unwrap_or_else(default_poll_interval_ms)
    }

    pub fn max_error_retries(&self) -> u32 {
        self.max_error_retries
            .unwrap_or_else(default_max_consecutive_errors)
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }

    pub fn merge(&mut self, other: &AdvancedConfig) {
        if other.poll_interval.is_some() {
            self.poll_interval = other.poll_interval;
        }
        if other.max_error_retries.is_some() {
            self.max_error_retries = other.max_error_retries;
        }
        if other.max_wait_time.is_some() {
            self.max_wait_time = other.max_wait_time;
        }
        if other.request_timeout.is_some() {
            self.request_timeout = other.request_timeout;
        }
    }
}
