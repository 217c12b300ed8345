//! File storage over a Supabase-compatible storage REST API.
//!
//! Used by the admin for product and event images. Objects live in a single
//! bucket; uploads overwrite an existing object at the same path.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the storage API.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Object path is empty or tries to leave the bucket.
    #[error("Invalid object path: {0}")]
    InvalidPath(String),
}

/// Client for one storage bucket.
#[derive(Debug, Clone)]
pub struct FileStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl FileStorage {
    /// Create a client for `bucket` at `base_url` (the project URL, without
    /// the `/storage/v1` suffix).
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(
        base_url: &str,
        bucket: impl Into<String>,
        service_key: &SecretString,
    ) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", service_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| StorageError::Parse(format!("Invalid service key format: {e}")))?,
        );
        headers.insert(
            "apikey",
            HeaderValue::from_str(service_key.expose_secret())
                .map_err(|e| StorageError::Parse(format!("Invalid service key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            bucket: bucket.into(),
        })
    }

    /// Public URL of an object in a public bucket.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    /// Store `bytes` at `path` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns error if the path is invalid or the upload is rejected.
    #[tracing::instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = object_path(path)?;
        let url = format!(
            "{}/storage/v1/object/{}/{path}",
            self.base_url, self.bucket
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        check(response).await?;

        tracing::info!(%path, "File uploaded");
        Ok(self.public_url(path))
    }

    /// Time-limited URL for an object in a private bucket.
    ///
    /// # Errors
    ///
    /// Returns error if the path is invalid or the API refuses to sign.
    pub async fn signed_url(&self, path: &str, ttl: Duration) -> Result<String, StorageError> {
        let path = object_path(path)?;
        let url = format!(
            "{}/storage/v1/object/sign/{}/{path}",
            self.base_url, self.bucket
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "expiresIn": ttl.as_secs() }))
            .send()
            .await?;
        let response = check(response).await?;

        let signed: SignResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Parse(e.to_string()))?;
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::Api {
        status: status.as_u16(),
        message,
    })
}

fn object_path(path: &str) -> Result<&str, StorageError> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }
    Ok(path)
}
