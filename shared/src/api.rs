//! Client for the prediction service.
//!
//! [`RemoteApi`] builds requests and interprets responses. The raw HTTP exchange
//! is delegated to a [`Transport`], which the browser build implements with
//! `gloo-net`. Decoding lives in plain functions so every status/body rule can
//! be exercised without a network.

use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Endpoint};
use crate::error::{ClientError, Result};
use crate::models::{
    CurationItem, ErrorBody, JobId, JobResponse, JobSubmission, LabelRequest, ModelStatus,
    PredictionResponse,
};

/// Multipart field the server reads the upload from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody<F> {
    Empty,
    Multipart { field: &'static str, file: F },
    Json(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest<F> {
    pub method: Method,
    pub url: String,
    pub body: RequestBody<F>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw HTTP exchange. `Err` means the request never got a response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type File: Clone;

    async fn send(&self, request: HttpRequest<Self::File>) -> Result<RawResponse>;
}

/// The operations the workflows need from the service.
#[allow(async_fn_in_trait)]
pub trait DetectionApi {
    type File: Clone;

    async fn submit_image(&self, file: &Self::File) -> Result<PredictionResponse>;

    async fn submit_video(&self, file: &Self::File) -> Result<JobId>;

    /// `Ok(None)` when the server answered but the result is not ready.
    async fn poll_job(&self, job_id: &JobId) -> Result<Option<JobResponse>>;

    async fn fetch_model_status(&self) -> Result<ModelStatus>;

    async fn fetch_unlabeled_sample(&self) -> Result<CurationItem>;

    async fn submit_label(&self, request: &LabelRequest) -> Result<()>;
}

pub struct RemoteApi<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> RemoteApi<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get(&self, endpoint: Endpoint) -> Result<RawResponse> {
        let url = self.config.url(&endpoint);
        log::debug!("GET {}", url);
        self.transport
            .send(HttpRequest {
                method: Method::Get,
                url,
                body: RequestBody::Empty,
            })
            .await
    }

    async fn post(&self, endpoint: Endpoint, body: RequestBody<T::File>) -> Result<RawResponse> {
        let url = self.config.url(&endpoint);
        log::debug!("POST {}", url);
        self.transport
            .send(HttpRequest {
                method: Method::Post,
                url,
                body,
            })
            .await
    }

    fn upload(file: &T::File) -> RequestBody<T::File> {
        RequestBody::Multipart {
            field: UPLOAD_FIELD,
            file: file.clone(),
        }
    }
}

impl<T: Transport> DetectionApi for RemoteApi<T> {
    type File = T::File;

    async fn submit_image(&self, file: &Self::File) -> Result<PredictionResponse> {
        let response = self.post(Endpoint::PredictImage, Self::upload(file)).await?;
        decode_json(&response)
    }

    async fn submit_video(&self, file: &Self::File) -> Result<JobId> {
        let response = self.post(Endpoint::PredictVideo, Self::upload(file)).await?;
        let submission: JobSubmission = decode_json(&response)?;
        log::info!("Video accepted as job {}", submission.job_id);
        Ok(submission.job_id)
    }

    async fn poll_job(&self, job_id: &JobId) -> Result<Option<JobResponse>> {
        let response = self
            .get(Endpoint::JobResult(job_id.as_str().to_string()))
            .await?;
        decode_poll(&response)
    }

    async fn fetch_model_status(&self) -> Result<ModelStatus> {
        let response = self.get(Endpoint::Status).await?;
        decode_json(&response)
    }

    async fn fetch_unlabeled_sample(&self) -> Result<CurationItem> {
        let response = self.get(Endpoint::UnlabeledImage).await?;
        decode_unlabeled(&response)
    }

    async fn submit_label(&self, request: &LabelRequest) -> Result<()> {
        let body = serde_json::to_string(request).map_err(|e| ClientError::Request(e.to_string()))?;
        let response = self.post(Endpoint::LabelImage, RequestBody::Json(body)).await?;
        if response.ok() {
            log::info!("Labeled {} as {}", request.path, request.label.as_ref());
            Ok(())
        } else {
            Err(server_error(&response))
        }
    }
}

/// Builds a [`ClientError::Server`] from a non-ok response.
pub fn server_error(response: &RawResponse) -> ClientError {
    let message = match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) => body.error,
        Err(_) if response.body.trim().is_empty() => format!("HTTP {}", response.status),
        Err(_) => response.body.trim().to_string(),
    };
    ClientError::server(response.status, message)
}

pub fn decode_json<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    if !response.ok() {
        return Err(server_error(response));
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Non-ok or undecodable poll responses mean "not ready yet" and are not
/// errors. Only a transport failure stops the poll loop.
pub fn decode_poll(response: &RawResponse) -> Result<Option<JobResponse>> {
    if !response.ok() {
        log::debug!("Poll answered {}, treating as not ready", response.status);
        return Ok(None);
    }
    match serde_json::from_str(&response.body) {
        Ok(job) => Ok(Some(job)),
        Err(e) => {
            log::warn!("Undecodable poll body ({}), treating as not ready", e);
            Ok(None)
        }
    }
}

/// A 404, or a successful body carrying only `error`, means the queue is empty.
pub fn decode_unlabeled(response: &RawResponse) -> Result<CurationItem> {
    if response.status == 404 {
        let message = match server_error(response) {
            ClientError::Server { message, .. } => message,
            other => other.to_string(),
        };
        return Err(ClientError::NoSampleAvailable(message));
    }
    if response.ok() {
        if let Ok(item) = serde_json::from_str::<CurationItem>(&response.body) {
            return Ok(item);
        }
        if let Ok(body) = serde_json::from_str::<ErrorBody>(&response.body) {
            return Err(ClientError::NoSampleAvailable(body.error));
        }
    }
    decode_json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, Verdict};

    #[test]
    fn server_error_uses_error_field() {
        let err = decode_json::<PredictionResponse>(&RawResponse::new(
            400,
            r#"{"error": "No face detected"}"#,
        ))
        .unwrap_err();
        assert_eq!(err, ClientError::server(400, "No face detected"));
    }

    #[test]
    fn server_error_falls_back_to_body_or_status() {
        assert_eq!(
            server_error(&RawResponse::new(502, "Bad Gateway\n")),
            ClientError::server(502, "Bad Gateway")
        );
        assert_eq!(
            server_error(&RawResponse::new(500, "")),
            ClientError::server(500, "HTTP 500")
        );
    }

    #[test]
    fn malformed_success_body_is_decode_error() {
        let err = decode_json::<PredictionResponse>(&RawResponse::new(200, "{}")).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn decodes_prediction() {
        let payload: PredictionResponse = decode_json(&RawResponse::new(
            200,
            r#"{"verdict": "REAL", "confidence": "97.00%", "heatmap_b64": "aGk="}"#,
        ))
        .unwrap();
        assert_eq!(payload.verdict, Verdict::Real);
        assert_eq!(payload.heatmap_b64.as_deref(), Some("aGk="));
    }

    #[test]
    fn poll_non_ok_is_not_ready() {
        assert_eq!(decode_poll(&RawResponse::new(404, "")).unwrap(), None);
        assert_eq!(decode_poll(&RawResponse::new(503, "busy")).unwrap(), None);

        let job = decode_poll(&RawResponse::new(200, r#"{"status": "pending"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let warming = RawResponse::new(200, "<html>proxy warming up</html>");
        assert_eq!(decode_poll(&warming).unwrap(), None);
    }

    #[test]
    fn empty_curation_queue_is_distinct() {
        let err = decode_unlabeled(&RawResponse::new(
            404,
            r#"{"error": "No unlabeled images left"}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ClientError::NoSampleAvailable("No unlabeled images left".into())
        );

        let err = decode_unlabeled(&RawResponse::new(200, r#"{"error": "All done"}"#)).unwrap_err();
        assert_eq!(err, ClientError::NoSampleAvailable("All done".into()));

        let err = decode_unlabeled(&RawResponse::new(500, r#"{"error": "disk"}"#)).unwrap_err();
        assert_eq!(err, ClientError::server(500, "disk"));
    }

    #[test]
    fn decodes_curation_item() {
        let item = decode_unlabeled(&RawResponse::new(
            200,
            r#"{"path": "pool/a.jpg", "image_b64": "AAAA"}"#,
        ))
        .unwrap();
        assert_eq!(item.path, "pool/a.jpg");
    }
}
