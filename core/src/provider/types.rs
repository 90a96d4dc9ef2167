use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque job identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub id: String,
}

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Job status as reported by the vendor.
///
/// Unrecognized vendor strings are kept verbatim in `Other` and count as
/// still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Processing,
    Running,
    Succeeded,
    Failed,
    Other(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "running" => Self::Running,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }

    /// Only `succeeded` and `failed` end a job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one job at one point in time.
///
/// `status` alone decides whether the job is finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Vendor attributes surfaced for display only.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl TaskSnapshot {
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            status,
            video_url: None,
            error: None,
            created_at: None,
            updated_at: None,
            metadata: Map::new(),
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Drop fields that contradict `status`: a video URL only accompanies
    /// `succeeded`, an error only accompanies `failed`.
    pub fn normalized(mut self) -> Self {
        if self.status != TaskStatus::Succeeded {
            self.video_url = None;
        }
        if self.status != TaskStatus::Failed {
            self.error = None;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "2k")]
    K2,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::K2 => "2k",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "720p" => Ok(Self::P720),
            "1080p" => Ok(Self::P1080),
            "2k" => Ok(Self::K2),
            other => Err(format!("unknown resolution: {other} (expected 720p, 1080p or 2k)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            "1:1" => Ok(Self::Square),
            other => Err(format!("unknown ratio: {other} (expected 16:9, 9:16 or 1:1)")),
        }
    }
}

/// What the caller asks for. Per-call video settings override the provider defaults.
///
/// A request carrying only one of the two frame URLs is accepted as a
/// single-frame image-to-video job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_frame_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<AspectRatio>,
}

impl GenerationOptions {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_frames(mut self, first: Option<String>, last: Option<String>) -> Self {
        self.first_frame_url = first;
        self.last_frame_url = last;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_succeeded_and_failed_are_terminal() {
        for raw in ["pending", "processing", "running", "queued", ""] {
            assert!(!TaskStatus::parse(raw).is_terminal(), "{raw} is not terminal");
        }
        assert!(TaskStatus::parse("succeeded").is_terminal());
        assert!(TaskStatus::parse("failed").is_terminal());
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = TaskStatus::parse("queued");
        assert_eq!(status, TaskStatus::Other("queued".into()));
        assert_eq!(status.to_string(), "queued");

        let v: TaskStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(v.as_str(), "cancelled");
        assert_eq!(serde_json::to_string(&TaskStatus::Running).unwrap(), "\"running\"");
    }

    #[test]
    fn normalized_drops_fields_inconsistent_with_status() {
        let running = TaskSnapshot::new("t1", TaskStatus::Running)
            .with_video_url("https://x/video.mp4")
            .with_error("boom")
            .normalized();
        assert_eq!(running.video_url, None);
        assert_eq!(running.error, None);

        let done = TaskSnapshot::new("t1", TaskStatus::Succeeded)
            .with_video_url("https://x/video.mp4")
            .normalized();
        assert_eq!(done.video_url.as_deref(), Some("https://x/video.mp4"));

        let failed = TaskSnapshot::new("t1", TaskStatus::Failed)
            .with_error("content policy")
            .normalized();
        assert_eq!(failed.error.as_deref(), Some("content policy"));
    }

    #[test]
    fn resolution_and_ratio_parse_from_cli_strings() {
        assert_eq!("1080P".parse::<Resolution>().unwrap(), Resolution::P1080);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
        assert!("4k".parse::<Resolution>().is_err());
        assert_eq!(serde_json::to_string(&Resolution::K2).unwrap(), "\"2k\"");
    }

    #[test]
    fn validation_result_is_valid_without_errors() {
        assert!(ValidationResult::from_errors(vec![]).valid);
        assert!(!ValidationResult::from_errors(vec!["API key is empty".into()]).valid);
    }
}
