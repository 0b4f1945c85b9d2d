use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of a sqlscripts:validate request
#[derive(Debug, Serialize)]
pub struct ValidateRequest<'a> {
    pub script: &'a str,
}

/// Body of a sqlscripts:execute request
#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    pub statement: &'a str,
}

/// Tabular result reshaped from an execute response's `resultTable`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NULL".to_string(),
        other => other.to_string(),
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            format!(" {:<width$} ", cell, width = width)
        })
        .collect();
    writeln!(f, "{}", line.join("|").trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rendered {
            for (idx, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(idx) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");

        write_line(f, &widths, &self.columns)?;
        writeln!(f, "{}", separator)?;
        for row in &rendered {
            write_line(f, &widths, row)?;
        }
        write!(f, "({} rows)", self.row_count())
    }
}

/// Result of submitting a SQL text
#[derive(Debug, Clone, PartialEq)]
pub enum SqlOutcome {
    /// Execute response carried a result table
    Table(Table),
    /// Execute response without a result table, unchanged
    Raw(Value),
    /// Empty SQL text; nothing was sent
    NoOp,
}

impl SqlOutcome {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            SqlOutcome::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, SqlOutcome::NoOp)
    }
}
