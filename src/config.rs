use serde::Deserialize;
use std::env;
use std::path::Path;

use std::str::FromStr;

use crate::error::{Result, VvpError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub vvp: VvpConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VvpConfig {
    pub hostname: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::build(None)
    }

    /// Load a TOML file and layer environment overrides on top of it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(Some(path.as_ref()))
    }

    fn build(path: Option<&Path>) -> Result<Self> {
        // Try to load from .env file
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("vvp.hostname", "localhost")?
            .set_default("vvp.port", 8080)?
            .set_default("http.timeout_secs", 30)?
            .set_default("logging.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        if let Ok(hostname) = env::var("VVP_HOST") {
            builder = builder.set_override("vvp.hostname", hostname)?;
        }

        if let Ok(port) = env::var("VVP_PORT") {
            builder = builder.set_override("vvp.port", parse_override::<u16>("VVP_PORT", &port)?)?;
        }

        if let Ok(timeout) = env::var("VVP_HTTP_TIMEOUT_SECS") {
            builder = builder.set_override(
                "http.timeout_secs",
                parse_override::<u64>("VVP_HTTP_TIMEOUT_SECS", &timeout)?,
            )?;
        }

        if let Ok(log_level) = env::var("RUST_LOG") {
            builder = builder.set_override("logging.level", log_level)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.vvp.hostname, self.vvp.port)
    }
}

fn parse_override<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| VvpError::Config(format!("Invalid {} value {:?}: {}", name, value, e)))
}
