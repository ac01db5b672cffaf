//! HTTP calls against the stylization service.
//!
//! Both operations are single-shot request/response: no retries, no backoff,
//! no timeouts. The polling loop owns whatever retry policy exists.

use thiserror::Error;

use super::types::{error_message, StatusResponse, StylizeResponse};
use super::ApiConfig;
use crate::core::uploads::UploadedImage;

const UPLOAD_FALLBACK: &str = "Failed to stylize image";
const POLL_FALLBACK: &str = "Failed to check prediction status";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Submit failed; aborts the remainder of the batch being processed.
    #[error("{0}")]
    Upload(String),
    /// A status check failed; the caller retries on its next tick.
    #[error("{0}")]
    Poll(String),
}

/// Submits one outfit as a multipart body. The response carries one job
/// handle per occasion.
pub async fn submit_outfit(
    config: &ApiConfig,
    image: &UploadedImage,
) -> Result<StylizeResponse, ClientError> {
    #[cfg(target_arch = "wasm32")]
    {
        use gloo_net::http::Request;
        use wasm_bindgen::JsValue;

        let form = multipart_form(image).map_err(ClientError::Upload)?;
        let response = Request::post(&config.stylize_url())
            .body(JsValue::from(form))
            .map_err(|err| ClientError::Upload(err.to_string()))?
            .send()
            .await
            .map_err(|err| ClientError::Upload(err.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upload(error_message(&body, UPLOAD_FALLBACK)));
        }

        response
            .json::<StylizeResponse>()
            .await
            .map_err(|err| ClientError::Upload(err.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name("outfit.jpg")
            .mime_str(&image.mime)
            .map_err(|err| ClientError::Upload(err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = reqwest::Client::new()
            .post(config.stylize_url())
            .multipart(form)
            .send()
            .await
            .map_err(|err| ClientError::Upload(err.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Upload(error_message(&body, UPLOAD_FALLBACK)));
        }

        response
            .json::<StylizeResponse>()
            .await
            .map_err(|err| ClientError::Upload(err.to_string()))
    }
}

/// Fetches the current state of one stylization job.
pub async fn prediction_status(
    config: &ApiConfig,
    prediction_id: &str,
) -> Result<StatusResponse, ClientError> {
    #[cfg(target_arch = "wasm32")]
    {
        use gloo_net::http::Request;

        let response = Request::get(&config.status_url(prediction_id))
            .send()
            .await
            .map_err(|err| ClientError::Poll(err.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Poll(error_message(&body, POLL_FALLBACK)));
        }

        response
            .json::<StatusResponse>()
            .await
            .map_err(|err| ClientError::Poll(err.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let response = reqwest::get(config.status_url(prediction_id))
            .await
            .map_err(|err| ClientError::Poll(err.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Poll(error_message(&body, POLL_FALLBACK)));
        }

        response
            .json::<StatusResponse>()
            .await
            .map_err(|err| ClientError::Poll(err.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn multipart_form(image: &UploadedImage) -> Result<web_sys::FormData, String> {
    use web_sys::{Blob, BlobPropertyBag, FormData};

    let array = js_sys::Uint8Array::from(image.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let mut options = BlobPropertyBag::new();
    options.type_(&image.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|_| "Unable to build image blob".to_string())?;

    let form = FormData::new().map_err(|_| "Unable to build form data".to_string())?;
    form.append_with_blob_and_filename("image", &blob, "outfit.jpg")
        .map_err(|_| "Unable to attach image".to_string())?;
    Ok(form)
}
