use cdpt_providers::{
    discord::DISCORD_API_BASE,
    maestro::{MAESTRO_BITCOIN_BASE, MAESTRO_CARDANO_BASE, MAESTRO_DOGECOIN_BASE, MAESTRO_MARKET_BASE},
};
use cdpt_storage::{iagon::IAGON_API_BASE, LoadStrategy, PayloadEncoding};
use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub maestro: MaestroConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub iagon_api_key: String,
    #[serde(default)]
    pub iagon_password: Option<String>,
    #[serde(default)]
    pub maestro_api_key: String,
    #[serde(default)]
    pub maestro_bitcoin_api_key: Option<String>,
    #[serde(default)]
    pub maestro_dogecoin_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for one request, outbound calls included
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_static_dir")]
    pub dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_static_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_static_dir() -> String {
    "dist".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_iagon_base")]
    pub base_url: String,
    #[serde(default)]
    pub load_strategy: LoadStrategy,
    #[serde(default)]
    pub encoding: PayloadEncoding,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_iagon_base(),
            load_strategy: LoadStrategy::default(),
            encoding: PayloadEncoding::default(),
            timeout_secs: None,
        }
    }
}

fn default_iagon_base() -> String {
    IAGON_API_BASE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_discord_base")]
    pub api_base: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: default_discord_base(),
            redirect_uri: default_redirect_uri(),
            timeout_secs: None,
        }
    }
}

fn default_discord_base() -> String {
    DISCORD_API_BASE.to_string()
}

fn default_redirect_uri() -> String {
    "https://long-sky-3951.iagon.io/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaestroConfig {
    #[serde(default = "default_market_base")]
    pub market_base: String,
    #[serde(default = "default_cardano_base")]
    pub cardano_base: String,
    #[serde(default = "default_bitcoin_base")]
    pub bitcoin_base: String,
    #[serde(default = "default_dogecoin_base")]
    pub dogecoin_base: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for MaestroConfig {
    fn default() -> Self {
        Self {
            market_base: default_market_base(),
            cardano_base: default_cardano_base(),
            bitcoin_base: default_bitcoin_base(),
            dogecoin_base: default_dogecoin_base(),
            timeout_secs: None,
        }
    }
}

fn default_market_base() -> String {
    MAESTRO_MARKET_BASE.to_string()
}

fn default_cardano_base() -> String {
    MAESTRO_CARDANO_BASE.to_string()
}

fn default_bitcoin_base() -> String {
    MAESTRO_BITCOIN_BASE.to_string()
}

fn default_dogecoin_base() -> String {
    MAESTRO_DOGECOIN_BASE.to_string()
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. `CDPT_`-prefixed environment variables, `__` between levels
    ///    (e.g. `CDPT_STORAGE__LOAD_STRATEGY=most_recent`)
    /// 4. `PORT` and the secret variables read by [`Config::apply_env`]
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("CDPT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.origins"),
            );

        let config = builder.build()?;
        let mut cfg: Config = config.try_deserialize()?;

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Fill secrets and the listen port from an environment lookup.
    ///
    /// `CLIENT_ID`, `CLIENT_SECRET`, `IAGON_API_KEY` and `MAESTRO_API_KEY`
    /// are required; the rest are optional.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::Message(format!("{} environment variable is required", key)))
        };

        self.client_id = required("CLIENT_ID")?;
        self.client_secret = required("CLIENT_SECRET")?;
        self.iagon_api_key = required("IAGON_API_KEY")?;
        self.maestro_api_key = required("MAESTRO_API_KEY")?;

        self.iagon_password = lookup("IAGON_PASSWORD").filter(|v| !v.is_empty());
        self.maestro_bitcoin_api_key = lookup("MAESTRO_BITCOIN_API_KEY").filter(|v| !v.is_empty());
        self.maestro_dogecoin_api_key = lookup("MAESTRO_DOGECOIN_API_KEY").filter(|v| !v.is_empty());

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
        }

        Ok(())
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}
