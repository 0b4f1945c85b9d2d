use serde_json::Value;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, VvpError>;

/// Errors surfaced by the session registry, the SQL pipeline and the transport
#[derive(Debug, Error)]
pub enum VvpError {
    #[error("Session {0} already exists. Use force to overwrite it.")]
    SessionAlreadyExists(String),

    #[error("No session available: {0}")]
    NoSessionAvailable(String),

    #[error("SQL request failed: {message}")]
    SqlRequestFailed {
        sql: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid or unsupported SQL statement: {message}")]
    SqlSyntaxOrUnsupported {
        sql: String,
        message: String,
        details: Option<Value>,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VvpError {
    /// SQL text the error refers to, if it came out of the submission pipeline
    pub fn sql(&self) -> Option<&str> {
        match self {
            VvpError::SqlRequestFailed { sql, .. } | VvpError::SqlSyntaxOrUnsupported { sql, .. } => {
                Some(sql)
            }
            _ => None,
        }
    }

    /// Decoded validation body attached to a rejected statement
    pub fn details(&self) -> Option<&Value> {
        match self {
            VvpError::SqlSyntaxOrUnsupported { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// HTTP status code of a failed SQL request, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            VvpError::SqlRequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for VvpError {
    fn from(err: reqwest::Error) -> Self {
        VvpError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for VvpError {
    fn from(err: serde_json::Error) -> Self {
        VvpError::InvalidResponse(err.to_string())
    }
}

impl From<config::ConfigError> for VvpError {
    fn from(err: config::ConfigError) -> Self {
        VvpError::Config(err.to_string())
    }
}
