use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared::api::{HttpRequest, Method, RawResponse, RequestBody};
use shared::poll::Timer;
use shared::{ClientConfig, ClientError, RemoteApi, Result, Transport};
use wasm_bindgen::JsValue;
use web_sys::FormData;

pub type HttpApi = RemoteApi<GlooTransport>;

pub fn build_api(config: ClientConfig) -> HttpApi {
    log::info!("Prediction API at {}", config.api_base_url);
    RemoteApi::new(GlooTransport, config)
}

/// `fetch`-backed transport.
pub struct GlooTransport;

fn js_error(err: JsValue) -> ClientError {
    ClientError::Request(format!("{:?}", err))
}

impl Transport for GlooTransport {
    type File = GlooFile;

    async fn send(&self, request: HttpRequest<GlooFile>) -> Result<RawResponse> {
        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };

        let prepared = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Multipart { field, file } => {
                let form_data = FormData::new().map_err(js_error)?;
                form_data
                    .append_with_blob_and_filename(field, file.as_ref(), &file.name())
                    .map_err(js_error)?;
                builder.body(form_data)
            }
            RequestBody::Json(body) => builder
                .header("Content-Type", "application/json")
                .body(body),
        }
        .map_err(|e| ClientError::Request(e.to_string()))?;

        let response = prepared.send().await.map_err(|e| {
            log::error!("{} failed: {}", request.url, e);
            ClientError::Connection(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        if !response.ok() {
            log::warn!("{} answered {}", request.url, status);
        }
        Ok(RawResponse::new(status, body))
    }
}

pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, millis: u32) {
        TimeoutFuture::new(millis).await;
    }
}
