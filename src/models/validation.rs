// Validation results reported by the VVP sqlscripts:validate endpoint.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Backend classification of a submitted SQL script
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    ValidDdlStatement,
    ValidCommandStatement,
    Invalid,
    InvalidQuery,
    UnsupportedQuery,
    ValidInsertQuery,
    ValidSelectQuery,
    /// Anything the backend returns that is not listed above
    Unknown(String),
}

impl ValidationResult {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationResult::ValidDdlStatement => "VALIDATION_RESULT_VALID_DDL_STATEMENT",
            ValidationResult::ValidCommandStatement => "VALIDATION_RESULT_VALID_COMMAND_STATEMENT",
            ValidationResult::Invalid => "VALIDATION_RESULT_INVALID",
            ValidationResult::InvalidQuery => "VALIDATION_RESULT_INVALID_QUERY",
            ValidationResult::UnsupportedQuery => "VALIDATION_RESULT_UNSUPPORTED_QUERY",
            ValidationResult::ValidInsertQuery => "VALIDATION_RESULT_VALID_INSERT_QUERY",
            ValidationResult::ValidSelectQuery => "VALIDATION_RESULT_VALID_SELECT_QUERY",
            ValidationResult::Unknown(raw) => raw,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "VALIDATION_RESULT_VALID_DDL_STATEMENT" => ValidationResult::ValidDdlStatement,
            "VALIDATION_RESULT_VALID_COMMAND_STATEMENT" => ValidationResult::ValidCommandStatement,
            "VALIDATION_RESULT_INVALID" => ValidationResult::Invalid,
            "VALIDATION_RESULT_INVALID_QUERY" => ValidationResult::InvalidQuery,
            "VALIDATION_RESULT_UNSUPPORTED_QUERY" => ValidationResult::UnsupportedQuery,
            "VALIDATION_RESULT_VALID_INSERT_QUERY" => ValidationResult::ValidInsertQuery,
            "VALIDATION_RESULT_VALID_SELECT_QUERY" => ValidationResult::ValidSelectQuery,
            other => ValidationResult::Unknown(other.to_string()),
        }
    }

    /// Whether the statement may be sent to the execute endpoint.
    ///
    /// Only DDL and command statements are executed; SELECT and INSERT
    /// queries validate but are rejected.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            ValidationResult::ValidDdlStatement | ValidationResult::ValidCommandStatement
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ValidationResult::Unknown(_))
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValidationResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ValidationResult::from_str(&raw))
    }
}

/// Decoded body of a validate response
#[derive(Debug, Clone)]
pub struct ValidationResponse {
    pub result: ValidationResult,
    pub error_message: Option<String>,
    pub raw: Value,
}

impl ValidationResponse {
    /// Read `validationResult` and `errorDetails.message` out of a decoded body.
    /// A missing or non-string result is reported as `Unknown`.
    pub fn from_json(raw: Value) -> Self {
        let result = match raw.get("validationResult") {
            Some(Value::String(s)) => ValidationResult::from_str(s),
            Some(other) => ValidationResult::Unknown(other.to_string()),
            None => ValidationResult::Unknown(String::new()),
        };

        let error_message = raw
            .get("errorDetails")
            .and_then(|details| details.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            result,
            error_message,
            raw,
        }
    }
}
