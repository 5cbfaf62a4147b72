// Maestro market-price and chain-data client

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::{ProviderError, Result};
use crate::response::read_json;

pub const MAESTRO_MARKET_BASE: &str = "https://api.maestro.com";
pub const MAESTRO_CARDANO_BASE: &str = "https://mainnet.gomaestro-api.org/v1";
pub const MAESTRO_BITCOIN_BASE: &str = "https://xbt-mainnet.gomaestro-api.org/v0";
pub const MAESTRO_DOGECOIN_BASE: &str = "https://xdg-mainnet.gomaestro-api.org/v0";

const PROVIDER: &str = "Maestro";
const API_KEY_HEADER: &str = "api-key";

/// UTXO chains served by Maestro's RPC-style API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtxoChain {
    Bitcoin,
    Dogecoin,
}

impl fmt::Display for UtxoChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtxoChain::Bitcoin => write!(f, "bitcoin"),
            UtxoChain::Dogecoin => write!(f, "dogecoin"),
        }
    }
}

/// Base URL plus the auth headers one Maestro API expects
#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    headers: HeaderMap,
}

impl Endpoint {
    fn new(base_url: String, auth_name: reqwest::header::HeaderName, auth_value: HeaderValue) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(auth_name, auth_value);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Maestro client (HTTP direct, no SDK)
///
/// Responses are returned as received. The market-price API authenticates
/// with a bearer token, the chain APIs with an `api-key` header.
#[derive(Debug)]
pub struct MaestroClient {
    http_client: reqwest::Client,
    market: Endpoint,
    cardano: Endpoint,
    bitcoin: Endpoint,
    dogecoin: Endpoint,
}

impl MaestroClient {
    pub fn builder() -> MaestroClientBuilder {
        MaestroClientBuilder::default()
    }

    async fn get(&self, endpoint: &Endpoint, path: &str, operation: &str) -> Result<Value> {
        let url = endpoint.url(path);
        tracing::info!(operation, url = %url, "Fetching from Maestro");

        let response = self
            .http_client
            .get(&url)
            .headers(endpoint.headers.clone())
            .send()
            .await?;

        read_json(response, PROVIDER, operation).await
    }

    /// Spot price of `symbol` quoted in `currency`.
    ///
    /// Returns only the `price` field of the market response.
    pub async fn market_price(&self, symbol: &str, currency: &str) -> Result<Value> {
        if currency.is_empty() {
            return Err(ProviderError::InvalidInput("currency is required".to_string()));
        }
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProviderError::InvalidInput(format!("invalid symbol: {:?}", symbol)));
        }

        let url = self.market.url(&format!("market-price/{}", symbol.to_ascii_lowercase()));
        tracing::info!(symbol, currency, "Fetching market price from Maestro");

        let response = self
            .http_client
            .get(&url)
            .headers(self.market.headers.clone())
            .query(&[("currency", currency)])
            .send()
            .await?;

        let body = read_json(response, PROVIDER, "market_price").await?;
        body.get("price")
            .cloned()
            .ok_or_else(|| ProviderError::Decode {
                provider: PROVIDER,
                message: "market price response has no price field".to_string(),
            })
    }

    /// Current Cardano epoch details.
    pub async fn current_epoch(&self) -> Result<Value> {
        self.get(&self.cardano, "epochs/current", "current_epoch").await
    }

    /// Latest block of a UTXO chain.
    pub async fn latest_block(&self, chain: UtxoChain) -> Result<Value> {
        let operation = format!("{}_latest_block", chain);
        self.get(self.chain(chain), "rpc/block/latest", &operation).await
    }

    /// General chain info (height, difficulty, ...) of a UTXO chain.
    pub async fn chain_info(&self, chain: UtxoChain) -> Result<Value> {
        let operation = format!("{}_chain_info", chain);
        self.get(self.chain(chain), "rpc/general/info", &operation).await
    }

    fn chain(&self, chain: UtxoChain) -> &Endpoint {
        match chain {
            UtxoChain::Bitcoin => &self.bitcoin,
            UtxoChain::Dogecoin => &self.dogecoin,
        }
    }
}

/// Builder for MaestroClient
///
/// Only the Cardano API key is required; network-specific keys fall back
/// to it when unset.
#[derive(Default)]
pub struct MaestroClientBuilder {
    api_key: Option<String>,
    bitcoin_api_key: Option<String>,
    dogecoin_api_key: Option<String>,
    market_base: Option<String>,
    cardano_base: Option<String>,
    bitcoin_base: Option<String>,
    dogecoin_base: Option<String>,
    timeout: Option<Duration>,
}

impl MaestroClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn bitcoin_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.bitcoin_api_key = Some(api_key.into());
        self
    }

    pub fn dogecoin_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.dogecoin_api_key = Some(api_key.into());
        self
    }

    pub fn market_base(mut self, url: impl Into<String>) -> Self {
        self.market_base = Some(url.into());
        self
    }

    pub fn cardano_base(mut self, url: impl Into<String>) -> Self {
        self.cardano_base = Some(url.into());
        self
    }

    pub fn bitcoin_base(mut self, url: impl Into<String>) -> Self {
        self.bitcoin_base = Some(url.into());
        self
    }

    pub fn dogecoin_base(mut self, url: impl Into<String>) -> Self {
        self.dogecoin_base = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<MaestroClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::Config("Maestro API key is required".to_string()))?;
        let bitcoin_key = non_empty_or(self.bitcoin_api_key, &api_key);
        let dogecoin_key = non_empty_or(self.dogecoin_api_key, &api_key);

        let api_key_header = reqwest::header::HeaderName::from_static(API_KEY_HEADER);
        let market = Endpoint::new(
            self.market_base.unwrap_or_else(|| MAESTRO_MARKET_BASE.to_string()),
            AUTHORIZATION,
            header_value(&format!("Bearer {}", api_key))?,
        );
        let cardano = Endpoint::new(
            self.cardano_base.unwrap_or_else(|| MAESTRO_CARDANO_BASE.to_string()),
            api_key_header.clone(),
            header_value(&api_key)?,
        );
        let bitcoin = Endpoint::new(
            self.bitcoin_base.unwrap_or_else(|| MAESTRO_BITCOIN_BASE.to_string()),
            api_key_header.clone(),
            header_value(&bitcoin_key)?,
        );
        let dogecoin = Endpoint::new(
            self.dogecoin_base.unwrap_or_else(|| MAESTRO_DOGECOIN_BASE.to_string()),
            api_key_header,
            header_value(&dogecoin_key)?,
        );

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(MaestroClient {
            http_client,
            market,
            cardano,
            bitcoin,
            dogecoin,
        })
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ProviderError::Config("Invalid Maestro API key format".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}
