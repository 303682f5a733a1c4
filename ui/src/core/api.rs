//! HTTP client for the analysis API.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::config::AppConfig;
use crate::core::model::{AnalysisRecord, UploadReport};

/// Errors surfaced by the analysis and account services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (network down, DNS, CORS).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server error {status}: {message}")]
    Status { status: u16, message: String },
    /// The body could not be decoded as the expected payload.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

/// Thin wrapper over `reqwest` that knows the analysis API routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: AppConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AppConfig::from_env())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Every recorded analysis; `limit` caps the result server-side.
    pub async fn fetch_analyses(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<AnalysisRecord>, ApiError> {
        let mut url = self.config.api_url("/ia/datas");
        if let Some(limit) = limit {
            url = format!("{url}?limit={limit}");
        }
        let response = self.http.get(&url).send().await.map_err(transport)?;
        decode_json(response).await
    }

    /// One analysis by record id.
    pub async fn fetch_analysis(&self, id: &str) -> Result<AnalysisRecord, ApiError> {
        let url = self.config.api_url(&format!("/ia/data/{id}"));
        let response = self.http.get(&url).send().await.map_err(transport)?;
        decode_json(response).await
    }

    /// Uploads a WAV sample for classification. The service expects a
    /// multipart form with the audio under the `file` field.
    pub async fn submit_audio(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReport, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("audio/wav")
            .map_err(transport)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = self.config.api_url("/ia/insert_audio");
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        decode_json(response).await
    }

    /// Raw bytes of a stored artifact, used by the download action.
    pub async fn fetch_artifact(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.artifact_url(path);
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    /// Public URL of a stored artifact.
    pub fn artifact_url(&self, path: &str) -> String {
        self.config.artifact_url(path)
    }
}

pub(crate) fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Passes successful responses through and turns everything else into
/// [`ApiError::Status`] with the message dug out of the body.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Digs a human-readable message out of an error body. The services ship
/// errors as `{"error": ...}` or `{"message": ...}`; anything else is
/// passed through trimmed.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_prefer_the_error_key() {
        assert_eq!(
            error_message(r#"{"error": "invalid credentials", "message": "nope"}"#),
            "invalid credentials"
        );
    }

    #[test]
    fn error_messages_fall_back_to_the_message_key() {
        assert_eq!(
            error_message(r#"{"message": "file too large"}"#),
            "file too large"
        );
    }

    #[test]
    fn plain_bodies_pass_through_trimmed() {
        assert_eq!(error_message("  internal failure \n"), "internal failure");
    }

    #[test]
    fn empty_bodies_get_a_placeholder() {
        assert_eq!(error_message(""), "no response body");
        assert_eq!(error_message("   \n"), "no response body");
    }

    #[test]
    fn blank_error_keys_fall_back_to_the_raw_body() {
        assert_eq!(error_message(r#"{"error": ""}"#), r#"{"error": ""}"#);
    }

    #[test]
    fn status_errors_render_with_their_code() {
        let err = ApiError::Status {
            status: 404,
            message: "record not found".to_string(),
        };
        assert_eq!(err.to_string(), "server error 404: record not found");
    }
}
