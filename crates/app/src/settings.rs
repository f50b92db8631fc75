//! Handles settings for the application. Configuration is read from
//! `settings.toml` and overridden by `MOIM__*` environment variables, e.g.
//! `MOIM__SERVER__PORT=8080`.
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    #[serde(default = "default_pin_ttl")]
    pub pin_session_ttl_secs: u64,
    #[serde(default = "default_pin_lockout")]
    pub pin_lockout_secs: u64,
    pub database: Database,
}

fn default_pin_ttl() -> u64 {
    600
}

fn default_pin_lockout() -> u64 {
    300
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("settings")
    }

    fn from_file(name: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("MOIM").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
