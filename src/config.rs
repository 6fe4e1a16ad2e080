use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default = "default_appdir")]
    pub appdir: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            appdir: default_appdir(),
            environment: Environment::default(),
            cors: CorsConfig::default(),
            tmdb: TmdbConfig::default(),
            logging: LoggingConfig::default(),
            debug_logs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Some(Environment::Production),
            "development" => Some(Environment::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_appdir() -> String {
    "./web".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Load the config file if one is given, fall back to defaults otherwise,
    /// then apply environment overrides and validate the result.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    pub fn load_with<F>(path: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides: `PORT`, `TMDB_API_KEY` and `APP_ENV`.
    /// Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(port) = lookup("PORT") {
            self.listen.port = port.trim().to_string();
        }
        if let Some(key) = lookup("TMDB_API_KEY") {
            self.tmdb.api_key = key.trim().to_string();
        }
        if let Some(env) = lookup("APP_ENV").and_then(|v| Environment::parse(&v)) {
            self.environment = env;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tmdb.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.environment == Environment::Production && self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::NoAllowedOrigins);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = self.listen.address.as_deref().unwrap_or("[::]");
        let addr = format!("{}:{}", address, self.listen.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Certificate and key paths, when both are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        self.listen
            .tlscert
            .as_deref()
            .zip(self.listen.tlskey.as_deref())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("TMDB API key is not set (tmdb.api_key or TMDB_API_KEY)")]
    MissingApiKey,
    #[error("Production mode requires at least one entry in cors.allowed_origins")]
    NoAllowedOrigins,
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}
