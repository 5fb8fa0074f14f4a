//! Core data models for the repository catalog.

use serde::{Deserialize, Serialize};

use crate::document;
use crate::error::{KbError, KbResult};

/// One repository entry, one row of the record section.
///
/// No field may contain `|` or a line break: the row encoding has no
/// escaping, so either character would shift or truncate cells on the next
/// parse. Nor may the row read back as table structure (a `_` or column-title
/// name, placeholder text, separator-like cells). [`Record::validate`]
/// enforces both before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub summary: String,
    pub local_path: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        local_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            local_path: local_path.into(),
        }
    }

    pub fn validate(&self) -> KbResult<()> {
        check_cell("name", &self.name)?;
        check_cell("summary", &self.summary)?;
        check_cell("local_path", &self.local_path)?;
        if !document::row_round_trips(self) {
            return Err(KbError::ReservedRow {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

fn check_cell(field: &'static str, value: &str) -> KbResult<()> {
    if value.contains(['|', '\n', '\r']) {
        return Err(KbError::MalformedField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Result of a catalog search, shaped for the `find` JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub found: bool,
    pub matches: Vec<Record>,
    pub exact_match: Option<Record>,
}
