use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Word used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn accept(&self) -> &'static str {
        match self {
            MediaType::Image => "image/*",
            MediaType::Video => "video/*",
        }
    }
}

/// Server verdict. Only the exact string `REAL` is real, everything else is fake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "REAL")]
    Real,
    #[serde(rename = "FAKE")]
    Fake,
}

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        if label == "REAL" {
            Verdict::Real
        } else {
            Verdict::Fake
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::Fake => "FAKE",
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Verdict::from_label(&raw))
    }
}

/// Accepts `"97.12%"` as well as a bare number, keeping the server's text.
fn verbatim_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// One frame flagged by video analysis, before and after the heatmap overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousFrame {
    pub original_b64: String,
    pub overlaid_b64: String,
}

/// Response of `/predict`, and the `result` of a completed video job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub verdict: Verdict,
    #[serde(deserialize_with = "verbatim_text")]
    pub confidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_face_b64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap_b64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlaid_b64: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspicious_frames: Vec<SuspiciousFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        JobId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub job_id: JobId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Complete,
    Error,
    /// Any status this client does not know; treated as not finished.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

/// Body of `/results/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobResponse {
    pub fn prediction(&self) -> Option<PredictionResponse> {
        self.result
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The server's message for a failed job: `result.error`, then `error`.
    pub fn error_message(&self) -> String {
        self.result
            .as_ref()
            .and_then(|value| value.get("error"))
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Video analysis failed".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_name: String,
    pub trainable_parameters: u64,
}

/// An unlabeled sample awaiting a human decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationItem {
    pub path: String,
    pub image_b64: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    pub fn title(&self) -> &'static str {
        match self {
            Label::Real => "Real",
            Label::Fake => "Fake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRequest {
    pub path: String,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_verdict_is_fake() {
        let payload: PredictionResponse =
            serde_json::from_value(json!({"verdict": "real", "confidence": "51.00%"})).unwrap();
        assert_eq!(payload.verdict, Verdict::Fake);
        assert!(payload.original_face_b64.is_none());
        assert!(payload.suspicious_frames.is_empty());
    }

    #[test]
    fn numeric_confidence_is_kept_as_text() {
        let payload: PredictionResponse =
            serde_json::from_value(json!({"verdict": "REAL", "confidence": 0.97})).unwrap();
        assert_eq!(payload.verdict, Verdict::Real);
        assert_eq!(payload.confidence, "0.97");
    }

    #[test]
    fn job_error_message_prefers_result_error() {
        let job: JobResponse = serde_json::from_value(json!({
            "status": "error",
            "result": {"error": "No face detected in video"},
            "error": "outer"
        }))
        .unwrap();
        assert_eq!(job.error_message(), "No face detected in video");

        let job: JobResponse =
            serde_json::from_value(json!({"status": "error", "error": "outer"})).unwrap();
        assert_eq!(job.error_message(), "outer");
    }

    #[test]
    fn unexpected_status_is_not_terminal() {
        let job: JobResponse = serde_json::from_value(json!({"status": "processing"})).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn label_request_wire_format() {
        let body = serde_json::to_value(LabelRequest {
            path: "unlabeled/0001.jpg".into(),
            label: Label::Fake,
        })
        .unwrap();
        assert_eq!(body, json!({"path": "unlabeled/0001.jpg", "label": "fake"}));
        assert_eq!(Label::Fake.as_ref(), "fake");
    }
}
