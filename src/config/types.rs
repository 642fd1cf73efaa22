use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub translator: TranslatorConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Bot API token. Taken from the `BOT_TOKEN` environment variable when
    /// not set in the config file.
    #[serde(default)]
    pub token: String,

    /// Base URL of the bot API.
    #[serde(default = "default_bot_api_base")]
    pub api_base: String,

    /// Seconds to wait between empty update polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Bearer token for the catalog API. Taken from the `TMDB_ACCESS_TOKEN`
    /// environment variable when not set in the config file.
    #[serde(default)]
    pub access_token: String,

    /// Catalog account id (`TMDB_ACCOUNT_ID`). Accepted for parity with the
    /// deployment environment; no operation currently uses it.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Base URL of the catalog API.
    #[serde(default = "default_catalog_base")]
    pub base_url: String,

    /// Freshness window for cached result lists, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslatorConfig {
    /// Base URL of the translation endpoint.
    #[serde(default = "default_translator_base")]
    pub base_url: String,

    /// ISO-639-1 target language for genre and synopsis text.
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Base URL of the image relay posters are downloaded through.
    #[serde(default = "default_relay_base")]
    pub relay_base: String,

    /// Base URL prepended to catalog poster paths.
    #[serde(default = "default_image_base")]
    pub image_base: String,

    /// Directory for transient poster files. Defaults to the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream URL prefix the relay will agree to fetch.
    #[serde(default = "default_image_host_prefix")]
    pub allowed_prefix: String,
}

fn default_bot_api_base() -> String {
    "https://botapi.rubika.ir/v3".to_string()
}
fn default_poll_interval() -> u64 {
    2
}
fn default_catalog_base() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_cache_ttl() -> u64 {
    24 * 60 * 60
}
fn default_translator_base() -> String {
    "https://translate.googleapis.com".to_string()
}
fn default_language() -> String {
    "fa".to_string()
}
fn default_relay_base() -> String {
    "https://images.weserv.nl".to_string()
}
fn default_image_base() -> String {
    "https://image.tmdb.org/t/p/original".to_string()
}
fn default_image_host_prefix() -> String {
    "https://image.tmdb.org/".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: default_bot_api_base(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            account_id: None,
            base_url: default_catalog_base(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_translator_base(),
            language: default_language(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            relay_base: default_relay_base(),
            image_base: default_image_base(),
            temp_dir: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_prefix: default_image_host_prefix(),
        }
    }
}
