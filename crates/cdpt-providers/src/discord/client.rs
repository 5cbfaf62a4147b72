// Discord OAuth2 and entitlements client

use reqwest::header::{HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::response::read_json;

pub const DISCORD_API_BASE: &str = "https://discord.com/api";

const PROVIDER: &str = "Discord";

/// Optional filters forwarded to the entitlements endpoint
///
/// Values are passed through as strings; Discord does the validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitlementQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_ended: Option<String>,
}

/// Discord client (HTTP direct, no SDK)
///
/// Only brokers the OAuth2 code exchange and entitlement lookups; the
/// protocol itself is Discord's.
#[derive(Debug)]
pub struct DiscordClient {
    http_client: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl DiscordClient {
    pub fn builder() -> DiscordClientBuilder {
        DiscordClientBuilder::default()
    }

    /// Public application id, safe to hand to the frontend.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Returns Discord's token payload unchanged.
    pub async fn exchange_code(&self, code: &str) -> Result<Value> {
        if code.is_empty() {
            return Err(ProviderError::InvalidInput("code is required".to_string()));
        }

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        tracing::info!(redirect_uri = %self.redirect_uri, "Requesting Discord token");

        let response = self
            .http_client
            .post(format!("{}/oauth2/token", self.api_base))
            .form(&params)
            .send()
            .await?;

        read_json(response, PROVIDER, "token").await
    }

    /// List entitlements of this application visible to `access_token`.
    pub async fn entitlements(&self, access_token: &str, query: &EntitlementQuery) -> Result<Value> {
        if access_token.is_empty() {
            return Err(ProviderError::InvalidInput("accessToken is required".to_string()));
        }

        tracing::info!(user_id = ?query.user_id, "Requesting Discord entitlements");

        let response = self
            .http_client
            .get(format!(
                "{}/v10/applications/{}/entitlements",
                self.api_base, self.client_id
            ))
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;

        read_json(response, PROVIDER, "entitlements").await
    }
}

/// Builder for DiscordClient
#[derive(Default)]
pub struct DiscordClientBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    api_base: Option<String>,
    timeout: Option<Duration>,
}

impl DiscordClientBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Must match the redirect registered for the Discord application
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<DiscordClient> {
        let client_id = required(self.client_id, "Discord client id")?;
        let client_secret = required(self.client_secret, "Discord client secret")?;
        let redirect_uri = required(self.redirect_uri, "Discord redirect URI")?;
        let api_base = self
            .api_base
            .unwrap_or_else(|| DISCORD_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(DiscordClient {
            http_client,
            api_base,
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::Config(format!("{} is required", what)))
}
