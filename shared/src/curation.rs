//! Human labeling of unlabeled samples.
//!
//! A [`CurationSession`] owns the sample on screen; the UI never keeps the
//! current path anywhere else. [`label_and_fetch_next`] is the only way a
//! decision reaches the server, and it always asks for the next sample
//! exactly once after a successful label.

use crate::api::DetectionApi;
use crate::error::{ClientError, Result};
use crate::models::{CurationItem, Label, LabelRequest};
use crate::render::{CurationCard, render_curation_item};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CurationState {
    #[default]
    Idle,
    Loading,
    Ready(CurationItem),
    /// Label sent for this item; controls stay disabled.
    Labeling(CurationItem),
    /// Nothing left to label. Not an error.
    Exhausted(String),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelOutcome {
    Labeled { next: Result<CurationItem> },
    Failed(ClientError),
}

pub async fn label_and_fetch_next<A: DetectionApi>(api: &A, request: &LabelRequest) -> LabelOutcome {
    match api.submit_label(request).await {
        Ok(()) => LabelOutcome::Labeled {
            next: api.fetch_unlabeled_sample().await,
        },
        Err(err) => LabelOutcome::Failed(err),
    }
}

#[derive(Debug, Default)]
pub struct CurationSession {
    state: CurationState,
    /// Shown as a blocking alert, then cleared with [`CurationSession::take_alert`].
    alert: Option<String>,
    labeled: u32,
}

impl CurationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CurationState {
        &self.state
    }

    pub fn labeled_count(&self) -> u32 {
        self.labeled
    }

    pub fn current(&self) -> Option<&CurationItem> {
        match &self.state {
            CurationState::Ready(item) | CurationState::Labeling(item) => Some(item),
            _ => None,
        }
    }

    pub fn card(&self) -> Option<CurationCard> {
        self.current().map(render_curation_item)
    }

    pub fn controls_enabled(&self) -> bool {
        matches!(self.state, CurationState::Ready(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, CurationState::Loading | CurationState::Labeling(_))
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Returns `false` if a request is already in flight.
    pub fn start_fetch(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = CurationState::Loading;
        true
    }

    pub fn sample_loaded(&mut self, sample: Result<CurationItem>) {
        self.state = match sample {
            Ok(item) => {
                log::debug!("Curation sample {}", item.path);
                CurationState::Ready(item)
            }
            Err(ClientError::NoSampleAvailable(message)) => {
                log::info!("Curation queue exhausted after {} labels", self.labeled);
                CurationState::Exhausted(message)
            }
            Err(err) => {
                log::warn!("Could not fetch curation sample: {}", err);
                CurationState::Unavailable(err.user_message())
            }
        };
    }

    /// Locks the controls and returns the request to send, if a sample is ready.
    pub fn decide(&mut self, label: Label) -> Option<LabelRequest> {
        let item = match std::mem::take(&mut self.state) {
            CurationState::Ready(item) => item,
            other => {
                log::debug!("Ignoring {} decision, no sample ready", label.as_ref());
                self.state = other;
                return None;
            }
        };
        let request = LabelRequest {
            path: item.path.clone(),
            label,
        };
        self.state = CurationState::Labeling(item);
        Some(request)
    }

    pub fn label_finished(&mut self, outcome: LabelOutcome) {
        let item = match std::mem::take(&mut self.state) {
            CurationState::Labeling(item) => item,
            other => {
                log::warn!("Label result arrived with no label in flight");
                self.state = other;
                return;
            }
        };
        match outcome {
            LabelOutcome::Labeled { next } => {
                self.labeled += 1;
                self.sample_loaded(next);
            }
            LabelOutcome::Failed(err) => {
                log::error!("Labeling {} failed: {}", item.path, err);
                self.alert = Some(if err.is_connection() {
                    "Connection error while saving the label. Please try again.".to_string()
                } else {
                    err.user_message()
                });
                self.state = CurationState::Ready(item);
            }
        }
    }
}
