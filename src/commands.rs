// Caller-facing commands
//
// `connect_vvp` and `flink_sql` take structured option records and work on an
// explicit session registry, so any front end (the CLI binary, tests, an
// embedding application) can drive them the same way.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, VvpError};
use crate::models::{Session, SqlOutcome};
use crate::services::{SessionRegistry, SqlService, VvpTransport};

/// Options for `connect_vvp`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectOptions {
    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Namespace to bind; when absent the namespaces are listed instead
    #[serde(default)]
    pub namespace: Option<String>,

    /// Session name; defaults to the registry's default session
    #[serde(default)]
    pub session: Option<String>,

    /// Overwrite an existing session of the same name
    #[serde(default)]
    pub force: bool,
}

fn default_port() -> u16 {
    8080
}

impl ConnectOptions {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: default_port(),
            namespace: None,
            session: None,
            force: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// `http://{hostname}:{port}`, rejected if it does not form a valid URL
    pub fn base_url(&self) -> Result<String> {
        let base_url = format!("http://{}:{}", self.hostname, self.port);
        let parsed = Url::parse(&base_url)
            .map_err(|e| VvpError::InvalidArgument(format!("Invalid VVP address {}: {}", base_url, e)))?;

        if parsed.host_str().map_or(true, str::is_empty) || parsed.path() != "/" {
            return Err(VvpError::InvalidArgument(format!(
                "Invalid VVP hostname: {}",
                self.hostname
            )));
        }

        Ok(base_url)
    }
}

/// Options for `flink_sql`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SqlOptions {
    /// Session to run in; defaults to the registry's default session
    #[serde(default)]
    pub session: Option<String>,
}

impl SqlOptions {
    pub fn with_session(session: impl Into<String>) -> Self {
        Self {
            session: Some(session.into()),
        }
    }
}

/// Result of `connect_vvp`
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
    Session(Session),
    Namespaces(Vec<String>),
}

/// Bind a session to a namespace, or list namespaces when none is given
pub async fn connect_vvp(
    registry: &mut SessionRegistry,
    transport: &dyn VvpTransport,
    options: &ConnectOptions,
) -> Result<ConnectOutcome> {
    let base_url = options.base_url()?;

    let Some(namespace) = options.namespace.as_deref().filter(|ns| !ns.is_empty()) else {
        let namespaces = SessionRegistry::namespaces(transport, &base_url).await?;
        return Ok(ConnectOutcome::Namespaces(namespaces));
    };

    let session_name = options
        .session
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| registry.default_session_name().map(str::to_string))
        .ok_or_else(|| {
            VvpError::NoSessionAvailable("no session name given and none already exist".to_string())
        })?;

    let session = registry.create(&base_url, Some(namespace), &session_name, options.force)?;
    Ok(ConnectOutcome::Session(session.clone()))
}

/// Run `cell` in the session selected by `options`
pub async fn flink_sql(
    registry: &SessionRegistry,
    service: &SqlService,
    options: &SqlOptions,
    cell: &str,
) -> Result<SqlOutcome> {
    let session = registry.get(options.session.as_deref())?;
    service.submit(session, cell).await
}
