//! Error taxonomy for catalog operations.
//!
//! Not-found is deliberately absent: lookups that match nothing return empty
//! results instead of failing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KbError {
    /// A required field was missing or empty at the boundary.
    #[error("{0}")]
    InvalidArgument(String),

    /// A field would break the table encoding on the next parse.
    #[error("{field} must not contain '|' or line breaks: {value:?}")]
    MalformedField { field: &'static str, value: String },

    /// A record whose row would be read back as table structure rather than
    /// data (reserved first cell, placeholder text, or separator-like cells).
    #[error("record {name:?} would be read back as table structure, not data")]
    ReservedRow { name: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KbError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KbError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors the CLI reports as a single line with exit status 1.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            KbError::InvalidArgument(_)
                | KbError::MalformedField { .. }
                | KbError::ReservedRow { .. }
        )
    }
}

pub type KbResult<T> = std::result::Result<T, KbError>;
