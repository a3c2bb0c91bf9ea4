/// HTTP client for the personalization service
///
/// Three endpoints: multipart photo upload, JSON generation request, and the
/// read-only gallery listing. Errors come back as plain strings because they
/// cross back into the UI inside messages, which must be cheap to clone.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::api::types::{GenerateRequest, PersonalizedImage, UploadedPhoto};

/// Environment variable overriding the service base URL
const BASE_URL_ENV: &str = "MAGIC_PORTRAIT_API";

/// Default service address for local development
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Image generation can take a while, so the timeout is generous
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the upload/generate/gallery endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    /// Create a client pointed at `MAGIC_PORTRAIT_API`, or the local default
    pub fn from_env() -> Self {
        let base = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    /// Create a client for the given base URL (trailing slashes are trimmed)
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();

        // If this fails, we panic because the app cannot talk to the service at all
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        ApiClient { http, base }
    }

    /// The base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Upload a photo as a single multipart `file` field
    ///
    /// Returns the service's opaque photo id plus its face-detection flag.
    pub async fn upload(&self, path: PathBuf) -> Result<UploadedPhoto, String> {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        let mime = mime_guess::from_path(&path).first_or_octet_stream();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| format!("Invalid media type: {}", e))?;

        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/upload", self.base))
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        read_json(response).await
    }

    /// Ask the service to generate an illustration from an uploaded photo
    ///
    /// `photo_id` must come from a previous successful upload. Calling this
    /// again with the same id produces a fresh, independent illustration.
    pub async fn generate(
        &self,
        photo_id: String,
        prompt: String,
    ) -> Result<PersonalizedImage, String> {
        let body = GenerateRequest { photo_id, prompt };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base))
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        read_json(response).await
    }

    /// Fetch all past creations, newest first
    pub async fn gallery(&self) -> Result<Vec<PersonalizedImage>, String> {
        let response = self
            .http
            .get(format!("{}/api/gallery", self.base))
            .send()
            .await
            .map_err(request_error)?;

        read_json(response).await
    }
}

/// Translate transport-level failures into user-readable messages
fn request_error(error: reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout - the service took too long to respond".to_string()
    } else if error.is_connect() {
        "Connection error - unable to reach the service".to_string()
    } else {
        format!("Network error: {}", error)
    }
}

/// Check the status and decode the body, surfacing the service's `detail`
/// message verbatim on error responses
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_detail(&body)
            .unwrap_or_else(|| format!("Service error ({}) - please try again", status.as_u16())));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse service response: {}", e))
}

/// Extract the `detail` field from an error payload, if there is one
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(String::from)
}
