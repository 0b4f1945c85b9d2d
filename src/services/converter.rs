// Result table converter
//
// Turns the `resultTable` part of an execute response into a `Table`. Headers
// and cells are lists of single-key objects; the value of each object is taken
// in list order.

use serde_json::Value;

use crate::error::{Result, VvpError};
use crate::models::Table;

pub struct ResultTableConverter;

impl ResultTableConverter {
    /// Reshape an execute response. Returns `None` when it has no `resultTable`.
    pub fn reshape(json: &Value) -> Result<Option<Table>> {
        let Some(table) = json.get("resultTable") else {
            return Ok(None);
        };

        let columns = Self::array_field(table, "headers")?
            .iter()
            .map(|header| Self::object_values(header, "header"))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .map(Self::column_name)
            .collect();

        let rows = Self::array_field(table, "rows")?
            .iter()
            .map(|row| {
                Self::array_field(row, "cells")?
                    .iter()
                    .map(|cell| Self::object_values(cell, "cell"))
                    .collect::<Result<Vec<_>>>()
                    .map(|cells| cells.into_iter().flatten().cloned().collect::<Vec<Value>>())
            })
            .collect::<Result<Vec<Vec<Value>>>>()?;

        Ok(Some(Table { columns, rows }))
    }

    /// A missing field is an empty list
    fn array_field<'a>(value: &'a Value, field: &str) -> Result<&'a [Value]> {
        match value.get(field) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(VvpError::InvalidResponse(format!(
                "Expected `{}` to be a list, got {}",
                field, other
            ))),
        }
    }

    fn object_values<'a>(value: &'a Value, what: &str) -> Result<Vec<&'a Value>> {
        match value {
            Value::Object(map) => Ok(map.values().collect()),
            other => Err(VvpError::InvalidResponse(format!(
                "Expected {} to be an object, got {}",
                what, other
            ))),
        }
    }

    fn column_name(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
