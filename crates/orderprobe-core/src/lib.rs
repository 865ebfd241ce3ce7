//! Core library for order page probing.
//!
//! This crate provides:
//! - Single-field lookup through a locator chain with a keyword fallback scan
//! - Refund table extraction (card name, price, quantity input per row)
//! - Order widget matching on card name, set and condition
//! - Result models and JSON configuration shared by the CLI and WASM bindings

pub mod dom;
pub mod error;
pub mod locator;
pub mod models;
pub mod probe;
pub mod table;
pub mod widget;

pub use error::{ConfigError, LocatorError, ProbeError, Result, TableError};
pub use locator::{CssLocator, FieldLocator, KeywordScan, Locator, StructuralPath};
pub use models::config::{FieldConfig, ProbeConfig, TableConfig, TableLayout, WidgetConfig};
pub use models::result::{Candidate, FieldResult, RowRecord, ShippingRegion, TableSnapshot};
pub use probe::{OrderPageProbe, PageReport};
pub use table::{LocatedTable, TableRowExtractor, parse_price};
pub use widget::{CardQuery, WidgetMatch, WidgetMatcher, expand_condition};

/// Re-export of the document type the probes read.
pub use scraper::Html;
