//! Layered service configuration
//!
//! Sources, lowest to highest precedence: serde defaults, an optional TOML
//! file, `ELARA__SECTION__KEY` environment variables, then the Gemini
//! variables read by [`LlmConfig::from_env`].

use crate::error::{ElaraError, Result};
use crate::llm::LlmConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ElaraError::Configuration(format!("invalid listen address: {e}")))
    }
}

/// Caller policy around the matching engine
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Tutors reported after the primary match
    #[serde(default = "default_alternate_count")]
    pub alternate_count: usize,

    /// Reject calibrations that skip questions
    #[serde(default = "default_require_complete")]
    pub require_complete: bool,
}

fn default_alternate_count() -> usize {
    2
}

fn default_require_complete() -> bool {
    true
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            alternate_count: default_alternate_count(),
            require_complete: default_require_complete(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from `.env`, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is normal outside development
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();

        // An explicitly named file must exist
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix("ELARA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        let config = Config {
            llm: config.llm.from_env(),
            ..config
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.body_limit_bytes == 0 {
            return Err(ElaraError::Configuration(
                "server.body_limit_bytes must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ElaraError::Configuration(format!(
                "llm.temperature {} outside 0.0..=2.0",
                self.llm.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ElaraError::Configuration(format!(
                "llm.top_p {} outside 0.0..=1.0",
                self.llm.top_p
            )));
        }
        Ok(())
    }
}
