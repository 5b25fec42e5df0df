//! Layered settings for the `metalens` binary.
//!
//! Precedence, lowest first:
//!
//! 1. built-in defaults
//! 2. `metalens.toml` in the working directory (optional)
//! 3. `METALENS__*` environment variables (e.g. `METALENS__LOG_LEVEL=debug`,
//!    `METALENS__FALLBACK_ROUTES=document,image`)
//! 4. command-line flags, applied by the caller
//!
//! ## Example `metalens.toml`
//!
//! ```toml
//! api_url = "http://analyzer.lan:8000"
//! log_level = "debug"
//! log_format = "json"
//! fallback_routes = ["document"]
//! ```

use std::path::Path;

use analysis::{ClientConfig, MediaKind};
use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend base address override. Blank counts as unset.
    #[serde(default)]
    pub api_url: Option<String>,

    /// `EnvFilter` directive, e.g. `info` or `analysis=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Media kinds that get the trailing-slash retry. `None` keeps the client default.
    #[serde(default)]
    pub fallback_routes: Option<Vec<MediaKind>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            fallback_routes: None,
        }
    }
}

impl Settings {
    /// Load settings from `metalens.toml` (if present) and the environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Like [`load`](Self::load), but reads `path` instead of `metalens.toml`.
    /// An explicit file must exist.
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("metalens").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("METALENS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("fallback_routes")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Client configuration for these settings. `api_url` wins over the file
    /// value when given (command-line flag or `METALENS_API_URL`).
    pub fn client_config(&self, api_url: Option<&str>) -> ClientConfig {
        let address = api_url
            .filter(|value| !value.trim().is_empty())
            .or(self.api_url.as_deref());
        let config = ClientConfig::resolve(address);
        match &self.fallback_routes {
            Some(kinds) => config.with_fallback_routes(kinds.iter().copied()),
            None => config,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
