//! Gemini API client module
//!
//! Uploads staged images through the Files API and requests schema-constrained
//! JSON from `generateContent`.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::config::GeminiConfig;
use crate::core::staging::StagedImage;
use crate::errors::RemediError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// File handle returned by the Files API after upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

/// The external structured-extraction service.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn upload_file(
        &self,
        image: &StagedImage,
        display_name: &str,
    ) -> Result<UploadedFile, RemediError>;

    /// Returns the raw model text for `instruction` applied to `file`,
    /// constrained to `schema`.
    async fn generate_structured(
        &self,
        instruction: &str,
        file: &UploadedFile,
        schema: &Value,
    ) -> Result<String, RemediError>;
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model_name: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.api_key.clone(),
            model_name: config.model.clone(),
        }
    }

    fn auth_headers(&self) -> Result<HeaderMap, RemediError> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(&self.api_key)
            .map_err(|e| RemediError::HttpError(format!("Invalid x-goog-api-key header: {e}")))?;
        headers.insert("x-goog-api-key", key_value);
        Ok(headers)
    }

    async fn error_from_response(context: &str, response: reqwest::Response) -> RemediError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|e| {
            format!("Failed to read error response body (status {status}): {e}")
        });
        RemediError::GeminiError(format!("{context} (status {status}): {error_text}"))
    }
}

#[async_trait]
impl ExtractionService for GeminiClient {
    async fn upload_file(
        &self,
        image: &StagedImage,
        display_name: &str,
    ) -> Result<UploadedFile, RemediError> {
        info!(
            display_name = %display_name,
            mime_type = %image.mime_type(),
            bytes = image.len(),
            "Uploading file to Gemini API"
        );

        let bytes = tokio::fs::read(image.path()).await?;

        let mut start_headers = self.auth_headers()?;
        start_headers.insert("X-Goog-Upload-Protocol", HeaderValue::from_static("resumable"));
        start_headers.insert("X-Goog-Upload-Command", HeaderValue::from_static("start"));
        start_headers.insert(
            "X-Goog-Upload-Header-Content-Length",
            HeaderValue::from(bytes.len()),
        );
        let mime_value = HeaderValue::from_str(image.mime_type())
            .map_err(|e| RemediError::HttpError(format!("Invalid upload content type: {e}")))?;
        start_headers.insert("X-Goog-Upload-Header-Content-Type", mime_value);
        start_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let start = self
            .http
            .post(format!("{GEMINI_API_BASE}/upload/v1beta/files"))
            .headers(start_headers)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;

        if !start.status().is_success() {
            return Err(Self::error_from_response("Gemini upload start failed", start).await);
        }

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                RemediError::GeminiError("Upload session did not return an upload URL".to_string())
            })?;

        let mut upload_headers = HeaderMap::new();
        upload_headers.insert("X-Goog-Upload-Offset", HeaderValue::from_static("0"));
        upload_headers.insert(
            "X-Goog-Upload-Command",
            HeaderValue::from_static("upload, finalize"),
        );

        let finalize = self
            .http
            .post(upload_url)
            .headers(upload_headers)
            .body(bytes)
            .send()
            .await?;

        if !finalize.status().is_success() {
            return Err(Self::error_from_response("Gemini upload failed", finalize).await);
        }

        let uploaded: UploadResponse = finalize.json().await.map_err(|e| {
            RemediError::GeminiError(format!("Failed to parse upload response: {e}"))
        })?;

        info!(file = %uploaded.file.name, "File uploaded successfully to Gemini");
        Ok(uploaded.file)
    }

    async fn generate_structured(
        &self,
        instruction: &str,
        file: &UploadedFile,
        schema: &Value,
    ) -> Result<String, RemediError> {
        info!(model = %self.model_name, "Generating content with Gemini API");

        let request_body = build_generate_request(instruction, file, schema);

        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http
            .post(format!(
                "{GEMINI_API_BASE}/v1beta/models/{}:generateContent",
                self.model_name
            ))
            .headers(headers)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("Gemini generateContent failed", response).await);
        }

        let response_json: Value = response.json().await.map_err(|e| {
            RemediError::GeminiError(format!("Failed to parse Gemini response: {e}"))
        })?;

        info!("Successfully received response from Gemini API");
        extract_response_text(&response_json)
    }
}

pub(crate) fn build_generate_request(
    instruction: &str,
    file: &UploadedFile,
    schema: &Value,
) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "text": instruction },
                { "file_data": { "mime_type": file.mime_type, "file_uri": file.uri } }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
            "temperature": 0
        }
    })
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn extract_response_text(response_json: &Value) -> Result<String, RemediError> {
    let Some(candidate) = response_json
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
    else {
        let reason = response_json
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("no candidates returned");
        return Err(RemediError::GeminiError(format!(
            "Gemini returned no content: {reason}"
        )));
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(RemediError::GeminiError(format!(
            "Gemini response contained no text (finishReason {finish})"
        )));
    }

    Ok(text)
}
