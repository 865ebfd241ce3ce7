//! Data models for orderprobe.

pub mod config;
pub mod result;

pub use config::{FieldConfig, ProbeConfig, TableConfig, TableLayout, WidgetConfig};
pub use result::{Candidate, FieldResult, NAME_PLACEHOLDER, RowRecord, ShippingRegion, TableSnapshot};
