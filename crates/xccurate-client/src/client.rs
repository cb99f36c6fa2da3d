//! HTTP calls to the backend.

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use xccurate_overlay::{SegmentationResult, SliceResult};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{ClassifyResponse, ErrorBody, StatusResponse};
use crate::upload::{Upload, UploadKind};

/// Client for the classification and segmentation backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client for `config.base_url`. A trailing slash is
    /// ignored.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unavailable`] if the backend cannot be
    /// reached, [`ClientError::Backend`] if it answers with an error
    /// status, and [`ClientError::InvalidResponse`] for an unknown body.
    pub async fn status(&self) -> Result<StatusResponse> {
        let url = self.url("status");
        let request = self.http.get(&url);
        call(request, url, "status", "Model not loaded").await
    }

    /// `POST /classify` with the scan in the `file` field.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUpload`] without sending anything if
    /// `image` is not an image file; otherwise as [`status`](Self::status).
    pub async fn classify(&self, image: Upload) -> Result<ClassifyResponse> {
        image.validate(UploadKind::Image)?;
        tracing::debug!(file = %image.file_name, "classifying");

        let url = self.url("classify");
        let form = Form::new().part("file", part(image));
        let request = self.http.post(&url).multipart(form);
        call(request, url, "classify", "Prediction failed").await
    }

    /// `POST /segment` with the FLAIR and T1CE volumes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUpload`] without sending anything if
    /// either file is not a NIfTI volume, and [`ClientError::Result`] if
    /// the backend returns no slices; otherwise as
    /// [`status`](Self::status).
    pub async fn segment(&self, flair: Upload, t1ce: Upload) -> Result<SegmentationResult> {
        flair.validate(UploadKind::Nifti)?;
        t1ce.validate(UploadKind::Nifti)?;
        tracing::debug!(flair = %flair.file_name, t1ce = %t1ce.file_name, "segmenting");

        let url = self.url("segment");
        let form = Form::new()
            .part("flair_file", part(flair))
            .part("t1ce_file", part(t1ce));
        let request = self.http.post(&url).multipart(form);
        let slices: Vec<SliceResult> =
            call(request, url, "segment", "Segmentation failed").await?;
        Ok(SegmentationResult::from_slices(slices)?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

/// Send `request` and decode a JSON body.
///
/// Non-success statuses carry `{"error": "..."}`; `fallback` is used when
/// that field is missing.
async fn call<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: String,
    endpoint: &'static str,
    fallback: &str,
) -> Result<T> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(source) => {
            tracing::warn!(%url, "backend unreachable: {source}");
            return Err(ClientError::Unavailable { url, source });
        }
    };
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| ClientError::Unavailable { url, source })?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| fallback.to_owned());
        tracing::warn!(endpoint, status = status.as_u16(), "backend error: {message}");
        return Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body)
        .map_err(|source| ClientError::InvalidResponse { endpoint, source })
}

fn part(upload: Upload) -> Part {
    Part::bytes(upload.bytes).file_name(upload.file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = Client::new(&ClientConfig::with_base_url("http://backend:5000/"));
        assert_eq!(client.base_url(), "http://backend:5000");
        assert_eq!(client.url("segment"), "http://backend:5000/segment");
    }
}
