//! Framework-independent core of the deepfake detection client: wire types,
//! the API client, the video poll loop, and the upload and curation workflows.

pub mod api;
pub mod config;
pub mod curation;
pub mod error;
pub mod models;
pub mod poll;
pub mod render;
pub mod workflow;

pub use api::{DetectionApi, RemoteApi, Transport};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{
    CurationItem, JobId, JobResponse, JobStatus, Label, LabelRequest, MediaType, ModelStatus,
    PredictionResponse, SuspiciousFrame, Verdict,
};
pub use strum::IntoEnumIterator;
