use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named binding of a VVP base URL and a namespace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub name: String,
    pub base_url: String,
    pub namespace: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(name: String, base_url: String, namespace: Option<String>) -> Self {
        Self {
            name,
            base_url,
            namespace,
            created_at: Utc::now(),
        }
    }

    /// Namespace segment used in endpoint paths; empty when unset
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Full URL for a path relative to the session's base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
