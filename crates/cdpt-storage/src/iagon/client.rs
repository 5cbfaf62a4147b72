// Iagon storage gateway client (v2 HTTP API)

use async_trait::async_trait;
use cdpt_types::StoredFile;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Result, StorageError};
use crate::traits::{FileRef, StorageGateway};

pub const IAGON_API_BASE: &str = "https://gw.iagon.com/api/v2";

const API_KEY_HEADER: &str = "x-api-key";
const PASSWORD_HEADER: &str = "password";

/// Iagon client (HTTP direct, no SDK)
///
/// Every request carries the `x-api-key` header. Downloads by storage id
/// additionally send the account password when one is configured.
#[derive(Debug)]
pub struct IagonClient {
    http_client: reqwest::Client,
    base_url: Url,
    password: Option<HeaderValue>,
}

#[derive(Debug, Deserialize)]
struct DirectoryListing {
    data: DirectoryContents,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryContents {
    #[serde(default)]
    files: Vec<StoredFile>,
}

impl IagonClient {
    pub fn builder() -> IagonClientBuilder {
        IagonClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// Stored names are caller-chosen, so `?`, `#` and `%` must not leak
    /// into the query or fragment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::Config(format!("Iagon base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read a response body, turning non-success statuses into `Upstream`.
    async fn read_body(response: reqwest::Response, operation: &str) -> Result<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(
                operation,
                status = status.as_u16(),
                body = %body,
                "Iagon request failed"
            );
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(operation, status = status.as_u16(), "Iagon request successful");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl StorageGateway for IagonClient {
    async fn upload(&self, filename: &str, contents: Vec<u8>) -> Result<Value> {
        let part = Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str("application/json")?;
        let form = Form::new()
            .part("file", part)
            .text("filename", filename.to_string())
            .text("visibility", "public");

        let response = self
            .http_client
            .post(self.url(&["storage", "upload"])?)
            .multipart(form)
            .send()
            .await?;

        let body = Self::read_body(response, "upload").await?;
        serde_json::from_slice(&body)
            .map_err(|e| StorageError::Decode(format!("invalid upload receipt: {}", e)))
    }

    async fn download(&self, file: FileRef<'_>) -> Result<Vec<u8>> {
        let target = match file {
            FileRef::Name(name) => name,
            FileRef::Id(id) => id,
        };

        let mut request = self
            .http_client
            .get(self.url(&["storage", "download", target])?);
        if let (FileRef::Id(_), Some(password)) = (file, &self.password) {
            request = request.header(PASSWORD_HEADER, password.clone());
        }

        tracing::debug!(file = target, "Downloading from Iagon");
        let response = request.send().await?;
        Self::read_body(response, "download").await
    }

    async fn list_public_files(&self) -> Result<Vec<StoredFile>> {
        let response = self
            .http_client
            .get(self.url(&["storage", "directory"])?)
            .query(&[("visibility", "public"), ("listingType", "index")])
            .send()
            .await?;

        let body = Self::read_body(response, "list_directory").await?;
        let listing: DirectoryListing = serde_json::from_slice(&body)
            .map_err(|e| StorageError::Decode(format!("invalid directory listing: {}", e)))?;

        Ok(listing.data.files)
    }
}

/// Builder for IagonClient
#[derive(Default)]
pub struct IagonClientBuilder {
    api_key: Option<String>,
    password: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl IagonClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Account password sent when downloading by storage id
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Override the API base URL (defaults to [`IAGON_API_BASE`])
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<IagonClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| StorageError::Config("Iagon API key is required".to_string()))?;

        let base_url = self.base_url.as_deref().unwrap_or(IAGON_API_BASE);
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| StorageError::Config(format!("Invalid Iagon base URL {:?}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&api_key)
                .map_err(|_| StorageError::Config("Invalid Iagon API key format".to_string()))?,
        );

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .map(|p| {
                HeaderValue::from_str(&p)
                    .map_err(|_| StorageError::Config("Invalid Iagon password format".to_string()))
            })
            .transpose()?;

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(IagonClient {
            http_client,
            base_url,
            password,
        })
    }
}
