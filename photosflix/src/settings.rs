use config::{Config, ConfigError, File};
use photos_api::{ClientConfig, BASE_URL, DEFAULT_MAX_PAGES};
use photos_auth::browser::BrowserProviderSettings;
use photos_auth::GatewayConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub use_live_api: bool,

    #[serde(default)]
    pub client_id: String,

    pub client_secret: Option<String>,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    #[serde(default = "default_sign_in_timeout_secs")]
    pub sign_in_timeout_secs: u64,

    #[serde(default)]
    pub redirect_port: u16,

    #[serde(default = "default_open_browser")]
    pub open_browser: bool,

    #[serde(default = "default_album_page_size")]
    pub album_page_size: u32,

    #[serde(default = "default_item_page_size")]
    pub item_page_size: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/photoslibrary.readonly".to_string(),
        "openid".to_string(),
        "email".to_string(),
    ]
}

fn default_api_base_url() -> String {
    BASE_URL.to_string()
}

fn default_token_ttl_minutes() -> i64 {
    55
}

fn default_sign_in_timeout_secs() -> u64 {
    300
}

fn default_open_browser() -> bool {
    true
}

fn default_album_page_size() -> u32 {
    50
}

fn default_item_page_size() -> u32 {
    100
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = std::env::var("PHOTOSFLIX_CONFIG")
            .unwrap_or_else(|_| "photosflix.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("PHOTOSFLIX").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.use_live_api && self.client_id.trim().is_empty() {
            return Err("client_id is required when use_live_api is enabled".to_string());
        }
        if !self.api_base_url.starts_with("http") {
            return Err("api_base_url must be a valid HTTP(S) URL".to_string());
        }
        if self.token_ttl_minutes <= 0 {
            return Err("token_ttl_minutes must be positive".to_string());
        }
        if self.sign_in_timeout_secs == 0 {
            return Err("sign_in_timeout_secs must be positive".to_string());
        }
        if self.album_page_size == 0 || self.item_page_size == 0 {
            return Err("album_page_size and item_page_size must be at least 1".to_string());
        }
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::new(self.client_id.clone(), self.scopes.clone());
        config.token_ttl = chrono::Duration::minutes(self.token_ttl_minutes);
        config.sign_in_timeout = Duration::from_secs(self.sign_in_timeout_secs);
        config
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            live: self.use_live_api,
            album_page_size: self.album_page_size,
            item_page_size: self.item_page_size,
            max_pages: self.max_pages,
        }
    }

    pub fn provider_settings(&self) -> BrowserProviderSettings {
        BrowserProviderSettings {
            client_secret: self.client_secret.clone(),
            redirect_port: self.redirect_port,
            open_browser: self.open_browser,
            ..Default::default()
        }
    }
}
