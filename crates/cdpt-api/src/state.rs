use std::sync::Arc;
use std::time::Duration;

use cdpt_providers::{DiscordClient, MaestroClient};
use cdpt_storage::{ChatArchive, IagonClient, StorageGateway};

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state passed to all handlers
///
/// Read-only after startup. Each client owns a pooled `reqwest::Client`,
/// so cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub archive: Arc<ChatArchive>,
    pub discord: Arc<DiscordClient>,
    pub maestro: Arc<MaestroClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        archive: ChatArchive,
        discord: DiscordClient,
        maestro: MaestroClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            archive: Arc::new(archive),
            discord: Arc::new(discord),
            maestro: Arc::new(maestro),
        }
    }

    /// Build every outbound client from configuration.
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        let mut iagon = IagonClient::builder()
            .api_key(&config.iagon_api_key)
            .base_url(&config.storage.base_url);
        if let Some(password) = &config.iagon_password {
            iagon = iagon.password(password);
        }
        if let Some(secs) = config.storage.timeout_secs {
            iagon = iagon.timeout(Duration::from_secs(secs));
        }
        let gateway: Arc<dyn StorageGateway> =
            Arc::new(iagon.build().map_err(|e| ApiError::Config(e.to_string()))?);

        let archive = ChatArchive::builder()
            .gateway(gateway)
            .load_strategy(config.storage.load_strategy)
            .encoding(config.storage.encoding)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let mut discord = DiscordClient::builder()
            .client_id(&config.client_id)
            .client_secret(&config.client_secret)
            .redirect_uri(&config.discord.redirect_uri)
            .api_base(&config.discord.api_base);
        if let Some(secs) = config.discord.timeout_secs {
            discord = discord.timeout(Duration::from_secs(secs));
        }
        let discord = discord.build().map_err(|e| ApiError::Config(e.to_string()))?;

        let mut maestro = MaestroClient::builder()
            .api_key(&config.maestro_api_key)
            .market_base(&config.maestro.market_base)
            .cardano_base(&config.maestro.cardano_base)
            .bitcoin_base(&config.maestro.bitcoin_base)
            .dogecoin_base(&config.maestro.dogecoin_base);
        if let Some(key) = &config.maestro_bitcoin_api_key {
            maestro = maestro.bitcoin_api_key(key);
        }
        if let Some(key) = &config.maestro_dogecoin_api_key {
            maestro = maestro.dogecoin_api_key(key);
        }
        if let Some(secs) = config.maestro.timeout_secs {
            maestro = maestro.timeout(Duration::from_secs(secs));
        }
        let maestro = maestro.build().map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self::new(config, archive, discord, maestro))
    }
}
