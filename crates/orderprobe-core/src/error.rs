//! Error types for the orderprobe-core library.

use serde::Serialize;
use thiserror::Error;

/// Main error type for the orderprobe library.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// A locator could not be built.
    #[error("locator error: {0}")]
    Locator(#[from] LocatorError),

    /// A terminal table lookup outcome.
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building locators.
///
/// These surface when a probe is constructed, never while a document is
/// being read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The structural path is malformed.
    #[error("invalid structural path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The CSS selector does not parse.
    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A table column index is out of range.
    #[error("invalid column for {field}: columns are 1-based")]
    InvalidColumn { field: &'static str },
}

/// Terminal outcomes of a table extraction.
///
/// Both variants halt the call. Their messages name the precondition the
/// operator should check before retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableError {
    /// No element matched the table selector.
    #[error("could not find refund form table (selector {selector:?}). {}", guidance_text(TableError::TABLE_NOT_FOUND_GUIDANCE))]
    TableNotFound { selector: String },

    /// The table exists but has no body rows.
    #[error("no data rows found in table. {}", guidance_text(TableError::NO_ROWS_GUIDANCE))]
    NoRowsFound { headers: Vec<String> },
}

impl TableError {
    const TABLE_NOT_FOUND_GUIDANCE: &'static [&'static str] = &[
        "Are on an order page",
        "Have clicked \"Partial Refund\" to open the form",
    ];

    const NO_ROWS_GUIDANCE: &'static [&'static str] = &[
        "Have the refund form populated with the order's cards",
        "Saved the page after the form finished loading",
    ];

    /// Preconditions the operator should verify for this outcome.
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            Self::TableNotFound { .. } => Self::TABLE_NOT_FOUND_GUIDANCE,
            Self::NoRowsFound { .. } => Self::NO_ROWS_GUIDANCE,
        }
    }
}

fn guidance_text(steps: &[&str]) -> String {
    let numbered: Vec<String> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect();
    format!("Make sure you: {}", numbered.join("; "))
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for `ProbeConfig`.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for the orderprobe library.
pub type Result<T> = std::result::Result<T, ProbeError>;
