//! Engine configuration.

use serde::{Deserialize, Serialize};

use satur_lexer::Delimiters;

use crate::SaturError;

/// Default port of the development reload socket.
pub const DEFAULT_WS_PORT: u16 = 5501;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Templates recompile on every render; errors carry source snippets;
    /// pages get the reload script.
    #[default]
    Development,
    /// Templates compile once per process.
    Production,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub open_delimiter: String,
    pub close_delimiter: String,
    /// Template file extension, without the dot.
    pub ext: String,
    /// Root the cache keys are made relative to.
    pub views: String,
    /// Application version. Required.
    pub version: Option<String>,
    pub ws_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Development,
            open_delimiter: "{{".to_owned(),
            close_delimiter: "}}".to_owned(),
            ext: "html".to_owned(),
            views: "views".to_owned(),
            version: None,
            ws_port: DEFAULT_WS_PORT,
        }
    }
}

impl Config {
    /// Defaults overridden by `SATUR_ENV` and `SATUR_WS_PORT`.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(env) = std::env::var("SATUR_ENV") {
            config.mode = parse_mode(&env);
        }
        if let Ok(port) = std::env::var("SATUR_WS_PORT") {
            match port.trim().parse() {
                Ok(port) => config.ws_port = port,
                Err(_) => tracing::warn!(%port, "ignoring invalid SATUR_WS_PORT"),
            }
        }
        config
    }

    /// Parse a JSON configuration; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SaturError> {
        serde_json::from_str(json).map_err(|e| SaturError::Config(e.to_string()))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open_delimiter = open.into();
        self.close_delimiter = close.into();
        self
    }

    #[must_use]
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into();
        self
    }

    #[must_use]
    pub fn with_views(mut self, views: impl Into<String>) -> Self {
        self.views = views.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_ws_port(mut self, port: u16) -> Self {
        self.ws_port = port;
        self
    }

    pub fn is_dev(&self) -> bool {
        self.mode == Mode::Development
    }

    pub fn delimiters(&self) -> Delimiters {
        Delimiters::new(self.open_delimiter.as_str(), self.close_delimiter.as_str())
    }

    pub fn validate(&self) -> Result<(), SaturError> {
        if self.version.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(SaturError::MissingVersion);
        }
        if self.open_delimiter.is_empty() || self.close_delimiter.is_empty() {
            return Err(SaturError::InvalidDelimiters {
                reason: "delimiters must not be empty".to_owned(),
            });
        }
        if self.open_delimiter == self.close_delimiter {
            return Err(SaturError::InvalidDelimiters {
                reason: "open and close delimiters must differ".to_owned(),
            });
        }
        Ok(())
    }
}

fn parse_mode(value: &str) -> Mode {
    match value.trim().to_ascii_lowercase().as_str() {
        "dev" | "development" => Mode::Development,
        _ => Mode::Production,
    }
}
