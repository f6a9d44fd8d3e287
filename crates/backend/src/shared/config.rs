use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::SyncError;

/// Лимит OZON на одну пачку цен
pub const MAX_PRICE_CHUNK: usize = 1000;
/// Лимит OZON на одну пачку остатков
pub const MAX_STOCK_CHUNK: usize = 100;
/// Куда пишется backend.log (логирование поднимается до чтения config.toml)
pub const DEFAULT_LOG_DIR: &str = "target/logs";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub ozon: OzonConfig,
    pub remnants: RemnantsConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OzonConfig {
    pub base_url: String,
    /// Размер страницы /v2/product/list
    pub page_limit: u32,
    /// Защита от бесконечной пагинации
    pub max_pages: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemnantsConfig {
    pub url: String,
    /// Имя таблицы внутри архива
    pub file_name: String,
    /// Сколько строк шапки пропустить до заголовка таблицы
    pub header_row: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatchConfig {
    pub price_chunk: usize,
    pub stock_chunk: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub dir: String,
    /// Файл для сырых запросов/ответов OZON
    pub request_log: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub mode: SyncMode,
}

/// Что выгружать за один запуск
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Остатки, затем цены
    #[default]
    All,
    Stocks,
    Prices,
}

impl FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "stocks" => Ok(Self::Stocks),
            "prices" => Ok(Self::Prices),
            other => Err(SyncError::config(format!(
                "unknown sync mode '{}', expected all, stocks or prices",
                other
            ))),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[ozon]
base_url = "https://api-seller.ozon.ru"
page_limit = 1000
max_pages = 1000
timeout_secs = 30

[remnants]
url = "https://timeworld.ru/upload/files/ostatki.zip"
file_name = "ostatki.xls"
header_row = 17

[batch]
price_chunk = 900
stock_chunk = 100

[logging]
dir = "target/logs"
request_log = "ozon_api_requests.log"

[sync]
mode = "all"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                config.validate()?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config = default_config()?;
    Ok(config)
}

pub fn default_config() -> Result<Config, SyncError> {
    let config: Config = toml::from_str(DEFAULT_CONFIG)
        .map_err(|e| SyncError::config(format!("embedded config is invalid: {}", e)))?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.ozon.page_limit == 0 || self.ozon.page_limit > 1000 {
            return Err(SyncError::config(format!(
                "ozon.page_limit must be in 1..=1000, got {}",
                self.ozon.page_limit
            )));
        }
        if self.ozon.max_pages == 0 {
            return Err(SyncError::config("ozon.max_pages must be positive"));
        }
        if self.batch.price_chunk == 0 || self.batch.price_chunk > MAX_PRICE_CHUNK {
            return Err(SyncError::config(format!(
                "batch.price_chunk must be in 1..={}, got {}",
                MAX_PRICE_CHUNK, self.batch.price_chunk
            )));
        }
        if self.batch.stock_chunk == 0 || self.batch.stock_chunk > MAX_STOCK_CHUNK {
            return Err(SyncError::config(format!(
                "batch.stock_chunk must be in 1..={}, got {}",
                MAX_STOCK_CHUNK, self.batch.stock_chunk
            )));
        }
        Ok(())
    }
}

impl BatchConfig {
    pub fn price_chunk(&self) -> Result<NonZeroUsize, SyncError> {
        NonZeroUsize::new(self.price_chunk)
            .ok_or_else(|| SyncError::config("batch.price_chunk must be positive"))
    }

    pub fn stock_chunk(&self) -> Result<NonZeroUsize, SyncError> {
        NonZeroUsize::new(self.stock_chunk)
            .ok_or_else(|| SyncError::config("batch.stock_chunk must be positive"))
    }
}

/// Ключи доступа к OZON Seller API
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("api_key", &"****")
            .finish()
    }
}

impl Credentials {
    /// Читает CLIENT_ID и SELLER_TOKEN из окружения
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let client_id = lookup("CLIENT_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SyncError::config("CLIENT_ID is required for OZON API"))?;
        let api_key = lookup("SELLER_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SyncError::config("SELLER_TOKEN is required for OZON API"))?;

        Ok(Self { client_id, api_key })
    }
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}
