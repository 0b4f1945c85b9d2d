use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Result, VvpError};
use crate::models::Session;
use crate::services::transport::VvpTransport;

/// Namespace listing endpoint, relative to a VVP base URL
pub const NAMESPACES_ENDPOINT: &str = "/namespaces/v1/namespaces";

/// Prefix VVP puts on namespace resource names
const NAMESPACE_RESOURCE_PREFIX: &str = "namespaces/";

/// Named sessions plus a pointer to the default one.
///
/// The default is always the most recently created session. The registry is a
/// plain owned value; callers hand it around by reference and tests build
/// their own instances.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
    default_session_name: Option<String>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session, or replace an existing one when `force` is set.
    /// The new session becomes the default.
    pub fn create(
        &mut self,
        base_url: &str,
        namespace: Option<&str>,
        name: &str,
        force: bool,
    ) -> Result<&Session> {
        if self.sessions.contains_key(name) {
            if !force {
                return Err(VvpError::SessionAlreadyExists(name.to_string()));
            }
            tracing::info!("Overwriting session {}", name);
        }

        let session = Session::new(
            name.to_string(),
            base_url.to_string(),
            namespace.map(str::to_string),
        );

        tracing::info!(
            "Created session {} for {} (namespace: {})",
            name,
            base_url,
            session.namespace()
        );

        self.default_session_name = Some(name.to_string());
        self.sessions.insert(name.to_string(), session);
        self.get(Some(name))
    }

    /// Look up a session by name, or the default session when `name` is `None`
    pub fn get(&self, name: Option<&str>) -> Result<&Session> {
        let name = match name.or(self.default_session_name.as_deref()) {
            Some(name) => name,
            None => {
                return Err(VvpError::NoSessionAvailable(
                    "no session name given and no default session exists".to_string(),
                ))
            }
        };

        self.sessions.get(name).ok_or_else(|| {
            VvpError::NoSessionAvailable(format!("session {} does not exist", name))
        })
    }

    pub fn default_session_name(&self) -> Option<&str> {
        self.default_session_name.as_deref()
    }

    /// Session names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session and the default pointer
    pub fn clear(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        self.default_session_name = None;
        tracing::debug!("Cleared {} sessions", count);
    }

    /// List the namespaces known to the VVP instance at `base_url`
    pub async fn namespaces(transport: &dyn VvpTransport, base_url: &str) -> Result<Vec<String>> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), NAMESPACES_ENDPOINT);
        let response = transport.get(&url).await?;

        if !response.is_ok() {
            return Err(VvpError::Http(format!(
                "Failed to list namespaces: HTTP {}",
                response.status_code
            )));
        }

        Self::parse_namespaces(&response.json()?)
    }

    /// Accepts either a bare list of names or VVP's
    /// `{"namespaces": [{"name": "namespaces/<ns>"}]}` listing.
    fn parse_namespaces(body: &Value) -> Result<Vec<String>> {
        let items = match body {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("namespaces") {
                Some(Value::Array(items)) => items,
                None => return Ok(Vec::new()),
                Some(other) => {
                    return Err(VvpError::InvalidResponse(format!(
                        "Unexpected namespaces field: {}",
                        other
                    )))
                }
            },
            other => {
                return Err(VvpError::InvalidResponse(format!(
                    "Unexpected namespace listing: {}",
                    other
                )))
            }
        };

        items
            .iter()
            .map(|item| {
                let name = match item {
                    Value::String(name) => name.as_str(),
                    Value::Object(map) => map.get("name").and_then(Value::as_str).ok_or_else(|| {
                        VvpError::InvalidResponse(format!("Namespace without a name: {}", item))
                    })?,
                    other => {
                        return Err(VvpError::InvalidResponse(format!(
                            "Unexpected namespace entry: {}",
                            other
                        )))
                    }
                };
                Ok(name
                    .strip_prefix(NAMESPACE_RESOURCE_PREFIX)
                    .unwrap_or(name)
                    .to_string())
            })
            .collect()
    }
}
