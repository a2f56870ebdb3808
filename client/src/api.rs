use common::{LISTING_PATH, UPLOAD_FIELD, UPLOAD_PATH};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, FormData, Request, RequestInit, RequestMode, Response};

use crate::error::{js_message, MediaError};

/// One user-selected file, sent once and then dropped
#[derive(Debug, Clone)]
pub struct UploadRequest<F> {
    pub file: F,
    pub file_name: String,
}

/// Network seam between the page and the media endpoints
#[allow(async_fn_in_trait)]
pub trait MediaApi {
    type File;

    /// POST the file as multipart field `file`; returns the parsed JSON reply
    async fn upload(&self, request: &UploadRequest<Self::File>) -> Result<Value, MediaError>;

    /// GET the raw listing JSON
    async fn list(&self) -> Result<Value, MediaError>;
}

/// `MediaApi` over the browser's `fetch`
#[derive(Debug, Clone)]
pub struct HttpMediaApi {
    origin: String,
}

impl HttpMediaApi {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into() }
    }

    /// Target the origin the page was served from
    pub fn from_window() -> Result<Self, MediaError> {
        let window = window().ok_or_else(|| MediaError::Network("No window".into()))?;
        let origin = window
            .location()
            .origin()
            .map_err(|_| MediaError::Network("No origin".into()))?;
        Ok(Self::new(origin))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

impl MediaApi for HttpMediaApi {
    type File = web_sys::File;

    async fn upload(&self, request: &UploadRequest<web_sys::File>) -> Result<Value, MediaError> {
        let form = FormData::new()?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &request.file, &request.file_name)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::SameOrigin);
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&self.url(UPLOAD_PATH), &opts)?;
        fetch_json(&request).await
    }

    async fn list(&self) -> Result<Value, MediaError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(&self.url(LISTING_PATH), &opts)?;
        request.headers().set("Accept", "application/json")?;
        fetch_json(&request).await
    }
}

/// Issue the request and parse the body as JSON, whatever the status code
async fn fetch_json(request: &Request) -> Result<Value, MediaError> {
    let window = window().ok_or_else(|| MediaError::Network("No window".into()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(request)).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| MediaError::Network("fetch did not yield a Response".into()))?;

    log::debug!("{} {} -> {}", request.method(), request.url(), resp.status());

    let text = JsFuture::from(resp.text()?)
        .await
        .map_err(|e| MediaError::Decode(js_message(&e)))?
        .as_string()
        .ok_or_else(|| MediaError::Decode("response body is not text".into()))?;

    Ok(serde_json::from_str(&text)?)
}
