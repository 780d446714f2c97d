//! HTTP client for the cloud recognition service
//!
//! Two calls per recognition: a client-credentials token request, then a
//! form-encoded image upload to the category endpoint. Both are fire-once.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use super::category::Category;
use super::error::RecognitionError;
use crate::config::{CredentialsConfig, ServiceConfig};

/// Token endpoint path relative to the service base URL
const TOKEN_PATH: &str = "/oauth/2.0/token";

/// Image formats the service accepts
const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// Token endpoint reply, success or failure
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn failure_reason(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "no access_token in response".to_string())
    }
}

/// Client for the token and recognition endpoints
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialsConfig,
}

impl ApiClient {
    /// Create a client for the configured service
    pub fn new(
        service: &ServiceConfig,
        credentials: CredentialsConfig,
    ) -> Result<Self, RecognitionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = service.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: service.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Request a fresh access token with the client credentials
    pub async fn fetch_access_token(&self) -> Result<String, RecognitionError> {
        if !self.credentials.is_complete() {
            return Err(RecognitionError::Auth(
                "API key and secret key are not configured".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.api_key.as_str()),
                ("client_secret", self.credentials.secret_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RecognitionError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RecognitionError::Auth(format!("failed to read token response: {e}")))?;

        let token_resp: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            RecognitionError::Auth(format!("invalid token response ({status}): {e}"))
        })?;

        if !status.is_success() {
            return Err(RecognitionError::Auth(format!(
                "token endpoint returned {status}: {}",
                token_resp.failure_reason()
            )));
        }

        match token_resp.access_token {
            Some(token) if !token.is_empty() => {
                debug!("Access token acquired");
                Ok(token)
            }
            _ => Err(RecognitionError::Auth(token_resp.failure_reason())),
        }
    }

    /// Upload a base64 image to the category endpoint and return the JSON body
    pub async fn submit_image(
        &self,
        category: Category,
        access_token: &str,
        image_b64: &str,
    ) -> Result<Value, RecognitionError> {
        let url = format!("{}{}", self.base_url, category.endpoint_path());

        let mut form = vec![("image", image_b64)];
        form.extend_from_slice(category.extra_form_fields());

        debug!(
            "POST {} ({} bytes of encoded image)",
            category.endpoint_path(),
            image_b64.len()
        );

        let resp = self
            .client
            .post(&url)
            .query(&[("access_token", access_token)])
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body = resp.text().await?;
        debug!("Response body: {}", body);

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| RecognitionError::malformed(format!("response is not JSON: {e}")))?;

        check_service_error(&data)?;
        Ok(data)
    }
}

/// The service reports failures in-band with `error_code` / `error_msg`
fn check_service_error(data: &Value) -> Result<(), RecognitionError> {
    match data.get("error_code").and_then(Value::as_i64) {
        Some(code) if code != 0 => Err(RecognitionError::Service {
            code,
            message: data
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

/// Read an image file and return its base64 encoding
pub fn load_image_base64(path: &Path) -> Result<String, RecognitionError> {
    let bytes = std::fs::read(path).map_err(|source| RecognitionError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    match image::guess_format(&bytes) {
        Ok(format) if ACCEPTED_FORMATS.contains(&format) => {
            debug!("Read {:?} image, {} bytes", format, bytes.len());
            Ok(STANDARD.encode(&bytes))
        }
        _ => Err(RecognitionError::UnsupportedImage {
            path: path.to_path_buf(),
        }),
    }
}
