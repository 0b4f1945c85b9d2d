use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, VvpError};
use crate::models::{ExecuteRequest, Session, SqlOutcome, ValidateRequest, ValidationResponse};
use crate::services::converter::ResultTableConverter;
use crate::services::transport::VvpTransport;

pub fn sql_validate_endpoint(namespace: &str) -> String {
    format!("/sql/v1beta1/namespaces/{}/sqlscripts:validate", namespace)
}

pub fn sql_execute_endpoint(namespace: &str) -> String {
    format!("/sql/v1beta1/namespaces/{}/sqlscripts:execute", namespace)
}

/// Submits SQL to a VVP session: validate, then execute what the backend
/// classifies as a DDL or command statement.
pub struct SqlService {
    transport: Arc<dyn VvpTransport>,
}

impl SqlService {
    pub fn new(transport: Arc<dyn VvpTransport>) -> Self {
        Self { transport }
    }

    /// Validate and, if supported, execute `sql` against `session`.
    ///
    /// # Returns
    /// * `SqlOutcome::NoOp` for an empty statement, without contacting the backend
    /// * `SqlOutcome::Table` when the execute response carries a `resultTable`
    /// * `SqlOutcome::Raw` with the decoded execute response otherwise
    pub async fn submit(&self, session: &Session, sql: &str) -> Result<SqlOutcome> {
        if sql.is_empty() {
            tracing::debug!("Empty statement for session {}, nothing to do", session.name);
            return Ok(SqlOutcome::NoOp);
        }

        let validation = self.validate(session, sql).await?;

        if !validation.result.is_known() {
            tracing::warn!(
                "Unknown validation result from {}: {}",
                session.base_url,
                validation.result.as_str()
            );
            return Err(VvpError::SqlRequestFailed {
                sql: sql.to_string(),
                status: None,
                message: format!("Unknown validation result: {}", validation.result.as_str()),
            });
        }

        if !validation.result.is_supported() {
            return Err(VvpError::SqlSyntaxOrUnsupported {
                sql: sql.to_string(),
                message: validation.error_message.unwrap_or_default(),
                details: Some(validation.raw),
            });
        }

        tracing::info!(
            "Executing {} in namespace {} of session {}",
            validation.result.as_str(),
            session.namespace(),
            session.name
        );

        let response = self.execute(session, sql).await?;
        match ResultTableConverter::reshape(&response)? {
            Some(table) => Ok(SqlOutcome::Table(table)),
            None => Ok(SqlOutcome::Raw(response)),
        }
    }

    async fn validate(&self, session: &Session, sql: &str) -> Result<ValidationResponse> {
        let url = session.url(&sql_validate_endpoint(session.namespace()));
        let body = serde_json::to_value(ValidateRequest { script: sql })?;
        let json = self.post(&url, &body, sql).await?;
        Ok(ValidationResponse::from_json(json))
    }

    async fn execute(&self, session: &Session, sql: &str) -> Result<Value> {
        let url = session.url(&sql_execute_endpoint(session.namespace()));
        let body = serde_json::to_value(ExecuteRequest { statement: sql })?;
        self.post(&url, &body, sql).await
    }

    async fn post(&self, url: &str, body: &Value, sql: &str) -> Result<Value> {
        let response = self.transport.post_json(url, body).await?;

        if !response.is_ok() {
            return Err(VvpError::SqlRequestFailed {
                sql: sql.to_string(),
                status: Some(response.status_code),
                message: format!("Bad HTTP request, return code {}", response.status_code),
            });
        }

        response.json()
    }
}
