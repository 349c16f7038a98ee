use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 3000;
/// 30 minutes at the default interval.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 600;

/// Remote endpoints of the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    PredictImage,
    PredictVideo,
    JobResult(String),
    Status,
    UnlabeledImage,
    LabelImage,
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::PredictImage => "/predict".to_string(),
            Endpoint::PredictVideo => "/predict_video".to_string(),
            Endpoint::JobResult(job_id) => format!("/results/{}", job_id),
            Endpoint::Status => "/status".to_string(),
            Endpoint::UnlabeledImage => "/get_unlabeled_image".to_string(),
            Endpoint::LabelImage => "/label_image".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u32,
    /// `None` polls until the job reaches a terminal state.
    pub max_poll_attempts: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: Some(DEFAULT_MAX_POLL_ATTEMPTS),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ClientError::Config("api_base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                base
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ClientError::Config("poll_interval_ms must be positive".into()));
        }
        if self.max_poll_attempts == Some(0) {
            return Err(ClientError::Config(
                "max_poll_attempts must be positive or null".into(),
            ));
        }
        Ok(())
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.api_base_url.trim().trim_end_matches('/'), endpoint.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_server() {
        let config = ClientConfig::default();
        assert_eq!(config.url(&Endpoint::PredictImage), "http://127.0.0.1:5000/predict");
        assert_eq!(config.poll_interval_ms, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"api_base_url": "https://detect.example.org/"}"#)
            .expect("valid config");
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(
            config.url(&Endpoint::JobResult("abc".into())),
            "https://detect.example.org/results/abc"
        );
    }

    #[test]
    fn null_attempt_bound_means_unbounded() {
        let config = ClientConfig::from_json(r#"{"max_poll_attempts": null}"#).expect("valid");
        assert_eq!(config.max_poll_attempts, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ClientConfig::from_json(r#"{"poll_interval_ms": 0}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"api_base_url": "ftp://x"}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"max_poll_attempts": 0}"#).is_err());
        assert!(matches!(
            ClientConfig::from_json("not json"),
            Err(ClientError::Config(_))
        ));
    }
}
