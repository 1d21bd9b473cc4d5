//! # Configuration Module
//!
//! Startup configuration read once from the environment. Credentials are
//! required: the service refuses to start without them instead of running
//! with an unusable transport.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::line::client::DEFAULT_API_BASE;
use crate::query::QueryKeywords;

pub const DEFAULT_DATA_PATH: &str = "data/急診醫院清單_台北新北基隆.json";
pub const DEFAULT_PORT: u16 = 5000;

/// Immutable application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub channel_access_token: String,
    pub channel_secret: String,
    /// Facility dataset (JSON array)
    pub data_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub line_api_base: String,
    /// Reply language tag, e.g. `zh-TW` or `en`
    pub language: Option<String>,
    /// Messages that open the interactive menu
    pub root_menu_keywords: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::MissingVar(name));

        let channel_access_token = required("CHANNEL_ACCESS_TOKEN")?;
        let channel_secret = required("CHANNEL_SECRET")?;

        let bind_addr = match var("BIND_ADDR") {
            Some(addr) => addr.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidVar {
                    name: "BIND_ADDR",
                    reason: e.to_string(),
                }
            })?,
            None => {
                let port = match var("PORT") {
                    Some(port) => port.parse().map_err(|e: std::num::ParseIntError| {
                        ConfigError::InvalidVar {
                            name: "PORT",
                            reason: e.to_string(),
                        }
                    })?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let root_menu_keywords = match var("ROOT_MENU_KEYWORDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            None => QueryKeywords::default().root_menu,
        };

        Ok(Self {
            channel_access_token,
            channel_secret,
            data_path: var("FACILITY_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            bind_addr,
            line_api_base: var("LINE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            language: var("BOT_LANGUAGE"),
            root_menu_keywords,
        })
    }

    pub fn query_keywords(&self) -> QueryKeywords {
        QueryKeywords {
            root_menu: self.root_menu_keywords.clone(),
            ..QueryKeywords::default()
        }
    }
}
