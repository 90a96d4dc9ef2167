use framecast_core::api::{GenerationOptions, TaskSnapshot, TaskStatus, VideoConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::error_text;

/// One entry of the vendor `content` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ContentPart {
    fn image(url: &str) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.to_string(),
            },
        }
    }
}

/// Append the vendor's inline parameter flags to the prompt.
///
/// Per-call options win over the provider's stored video defaults. A zero
/// duration is treated as unset.
pub fn build_prompt(options: &GenerationOptions, defaults: &VideoConfig) -> String {
    let mut prompt = options.prompt.clone();

    if let Some(resolution) = options.resolution.or(defaults.resolution) {
        prompt.push_str(&format!(" --resolution {resolution}"));
    }
    if let Some(ratio) = options.ratio.or(defaults.ratio) {
        prompt.push_str(&format!(" --ratio {ratio}"));
    }
    if let Some(duration) = options.duration.or(defaults.duration).filter(|d| *d > 0) {
        prompt.push_str(&format!(" --duration {duration}"));
    }
    if let Some(fixed) = defaults.camera_fixed {
        prompt.push_str(&format!(" --camerafixed {fixed}"));
    }
    if let Some(watermark) = defaults.watermark {
        prompt.push_str(&format!(" --watermark {watermark}"));
    }

    prompt
}

/// Text first, then the first frame, then the last frame. Either frame may
/// be absent on its own.
pub fn build_content(options: &GenerationOptions, defaults: &VideoConfig) -> Vec<ContentPart> {
    let mut content = vec![ContentPart::Text {
        text: build_prompt(options, defaults),
    }];
    let frames = [
        options.first_frame_url.as_deref(),
        options.last_frame_url.as_deref(),
    ];
    content.extend(
        frames
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ContentPart::image),
    );
    content
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTaskRequest<'a> {
    pub model: &'a str,
    pub content: &'a [ContentPart],
}

/// Body accepted by the credential-attaching relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RelayCreateRequest<'a> {
    pub api_key: &'a str,
    pub endpoint: &'a str,
    pub model: &'a str,
    pub content: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskResponse {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResultContent {
    #[serde(default)]
    pub video_url: Option<String>,
}

const METADATA_FIELDS: [&str; 6] = [
    "resolution",
    "duration",
    "framespersecond",
    "ratio",
    "seed",
    "usage",
];

#[derive(Debug, Deserialize)]
pub(crate) struct TaskResponse {
    #[serde(default)]
    pub id: String,
    /// Missing status reads as an empty, non-terminal status.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub content: Option<ResultContent>,
    #[serde(default)]
    pub error: Value,
    /// Advisory. Kept as raw JSON so an unexpected shape never fails the parse.
    #[serde(default)]
    pub created_at: Value,
    #[serde(default)]
    pub updated_at: Value,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl TaskResponse {
    /// `requested_id` stands in when the body omits the task id.
    pub(crate) fn into_snapshot(self, requested_id: &str) -> TaskSnapshot {
        let mut metadata = Map::new();
        for key in METADATA_FIELDS {
            if let Some(value) = self.rest.get(key).filter(|v| !v.is_null()) {
                metadata.insert(key.to_string(), value.clone());
            }
        }
        let created_at = timestamp(self.created_at, "created_at", &mut metadata);
        let updated_at = timestamp(self.updated_at, "updated_at", &mut metadata);

        let id = if self.id.trim().is_empty() {
            requested_id.to_string()
        } else {
            self.id
        };

        TaskSnapshot {
            id,
            status: TaskStatus::parse(&self.status),
            video_url: self.content.and_then(|c| c.video_url),
            error: error_text(&self.error),
            created_at,
            updated_at,
            metadata,
        }
        .normalized()
    }
}

/// Integer timestamps are lifted; any other non-null shape lands in metadata verbatim.
fn timestamp(raw: Value, key: &str, metadata: &mut Map<String, Value>) -> Option<i64> {
    match raw {
        Value::Null => None,
        Value::Number(ref n) if n.is_i64() => n.as_i64(),
        other => {
            metadata.insert(key.to_string(), other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecast_core::api::{AspectRatio, Resolution};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn frames(first: Option<&str>, last: Option<&str>) -> GenerationOptions {
        GenerationOptions::text("waves")
            .with_frames(first.map(str::to_string), last.map(str::to_string))
    }

    #[test]
    fn content_order_is_text_then_first_then_last() {
        let defaults = VideoConfig::default();

        let none = build_content(&frames(None, None), &defaults);
        assert_eq!(none.len(), 1);

        let both = build_content(&frames(Some("https://f"), Some("https://l")), &defaults);
        assert_eq!(
            both,
            vec![
                ContentPart::Text {
                    text: "waves".into()
                },
                ContentPart::image("https://f"),
                ContentPart::image("https://l"),
            ]
        );

        let last_only = build_content(&frames(None, Some("https://l")), &defaults);
        assert_eq!(last_only.len(), 2);
        assert_eq!(last_only[1], ContentPart::image("https://l"));
    }

    #[test]
    fn content_serializes_in_vendor_shape() {
        let parts = build_content(&frames(Some("https://f"), None), &VideoConfig::default());
        assert_eq!(
            serde_json::to_value(&parts).unwrap(),
            json!([
                {"type": "text", "text": "waves"},
                {"type": "image_url", "image_url": {"url": "https://f"}}
            ])
        );
    }

    #[test]
    fn prompt_flags_prefer_call_options() {
        let defaults = VideoConfig::recommended();
        let mut opts = GenerationOptions::text("a cat");
        opts.resolution = Some(Resolution::P720);
        opts.ratio = Some(AspectRatio::Square);

        assert_eq!(
            build_prompt(&opts, &defaults),
            "a cat --resolution 720p --ratio 1:1 --duration 5 --camerafixed false --watermark false"
        );
    }

    #[test]
    fn prompt_skips_unset_and_zero_flags() {
        let defaults = VideoConfig {
            duration: Some(0),
            watermark: Some(true),
            ..VideoConfig::default()
        };
        assert_eq!(
            build_prompt(&GenerationOptions::text("a cat"), &defaults),
            "a cat --watermark true"
        );
    }

    #[test]
    fn task_response_lifts_url_and_collects_metadata() {
        let raw = json!({
            "id": "cgt-1",
            "model": "doubao-seedance-1-0-pro-250528",
            "status": "succeeded",
            "content": {"video_url": "https://cdn/v.mp4"},
            "created_at": 1718000000,
            "updated_at": 1718000060,
            "resolution": "1080p",
            "duration": 5,
            "framespersecond": 24,
            "ratio": "16:9",
            "seed": 42,
            "usage": {"completion_tokens": 246840}
        });
        let snapshot = serde_json::from_value::<TaskResponse>(raw)
            .unwrap()
            .into_snapshot("t0");

        assert_eq!(snapshot.status, TaskStatus::Succeeded);
        assert_eq!(snapshot.video_url.as_deref(), Some("https://cdn/v.mp4"));
        assert_eq!(snapshot.created_at, Some(1718000000));
        assert_eq!(snapshot.metadata.len(), 6);
        assert_eq!(snapshot.metadata["framespersecond"], json!(24));
        assert!(!snapshot.metadata.contains_key("model"));
    }

    #[test]
    fn non_integer_timestamps_do_not_break_a_finished_task() {
        let raw = json!({
            "id": "t1",
            "status": "succeeded",
            "content": {"video_url": "https://x/video.mp4"},
            "created_at": "2025-06-10T08:00:00Z",
            "updated_at": 1718000060.5
        });
        let snapshot = serde_json::from_value::<TaskResponse>(raw)
            .unwrap()
            .into_snapshot("t1");

        assert_eq!(snapshot.status, TaskStatus::Succeeded);
        assert_eq!(snapshot.video_url.as_deref(), Some("https://x/video.mp4"));
        assert_eq!(snapshot.created_at, None);
        assert_eq!(snapshot.updated_at, None);
        assert_eq!(
            snapshot.metadata["created_at"],
            json!("2025-06-10T08:00:00Z")
        );
        assert_eq!(snapshot.metadata["updated_at"], json!(1718000060.5));
    }

    #[test]
    fn missing_status_and_id_read_as_in_progress() {
        let snapshot = serde_json::from_value::<TaskResponse>(json!({}))
            .unwrap()
            .into_snapshot("t7");
        assert_eq!(snapshot.id, "t7");
        assert!(!snapshot.status.is_terminal());
    }

    #[test]
    fn unknown_status_passes_through_verbatim() {
        let raw = json!({"id": "cgt-2", "status": "queued"});
        let snapshot = serde_json::from_value::<TaskResponse>(raw)
            .unwrap()
            .into_snapshot("t0");
        assert_eq!(snapshot.status, TaskStatus::Other("queued".into()));
        assert!(snapshot.metadata.is_empty());
    }

    #[test]
    fn failed_task_carries_structured_error() {
        let raw = json!({
            "id": "cgt-3",
            "status": "failed",
            "error": {"code": "OutputVideoSensitiveContentDetected", "message": "blocked"}
        });
        let snapshot = serde_json::from_value::<TaskResponse>(raw)
            .unwrap()
            .into_snapshot("t0");
        assert_eq!(
            snapshot.error.as_deref(),
            Some("OutputVideoSensitiveContentDetected: blocked")
        );
        assert_eq!(snapshot.video_url, None);
    }
}
