use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Default counterparty (DAO treasury) used when the config file does not
/// override it.
pub const DEFAULT_DAO: &str = "0x4d3f2b1a90c85e7d6b2a41f08c93d5a7e2b61c04";

/// A token offered in the form dropdowns. Selection only affects the symbol
/// and decimal scale attached to a request.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSpec {
    pub symbol: String,
    pub decimals: Option<u8>,
}

impl TokenSpec {
    pub fn decimals_or_default(&self) -> u8 {
        self.decimals.unwrap_or(18)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ws: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    #[serde(default)]
    pub tokens: Vec<TokenSpec>,

    /// Counterparty (DAO/member) address attached to borrow and collateral
    /// calls.
    pub dao: Option<String>,

    pub confirm_timeout_secs: Option<u64>,
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PLEDGE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("pledge").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("pledge").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "pledge", "pledge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("pledge"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("pledge"));
    }
    directories::ProjectDirs::from("io", "pledge", "pledge")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("pledge.log"))
}
