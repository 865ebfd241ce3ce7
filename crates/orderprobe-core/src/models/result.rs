//! Result structures returned by the probes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Placeholder used when a row has no name cell.
pub const NAME_PLACEHOLDER: &str = "N/A";

/// Outcome of a single-field lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Whether a primary locator resolved.
    pub found: bool,
    /// Trimmed text of the resolved element.
    pub value: Option<String>,
    /// Fallback containers that look related, only when `found` is false.
    pub candidates: Vec<Candidate>,
}

impl FieldResult {
    /// A resolved field.
    pub fn found(value: impl Into<String>) -> Self {
        Self {
            found: true,
            value: Some(value.into()),
            candidates: Vec::new(),
        }
    }

    /// An unresolved field with the fallback scan's near-matches.
    pub fn not_found(candidates: Vec<Candidate>) -> Self {
        Self {
            found: false,
            value: None,
            candidates,
        }
    }

    /// Classify the value as a shipping country code.
    ///
    /// Returns `None` when the field was not found, so callers can tell an
    /// unknown destination apart from a domestic one.
    pub fn shipping_region(&self) -> Option<ShippingRegion> {
        self.value.as_deref().map(ShippingRegion::from_country_code)
    }
}

/// A fallback container whose text mentions one of the scan keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// 0-based index among all fallback containers in the document.
    pub index: usize,
    /// Leading characters of the container's text content.
    pub excerpt: String,
}

/// Whether an order ships inside the home country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingRegion {
    Domestic,
    International,
}

impl ShippingRegion {
    /// Home country code; anything else is international.
    pub const HOME_COUNTRY: &'static str = "US";

    pub fn from_country_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case(Self::HOME_COUNTRY) {
            Self::Domestic
        } else {
            Self::International
        }
    }

    pub fn is_international(self) -> bool {
        self == Self::International
    }
}

/// Header and rows read from the refund table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Header cell texts in column order; empty when the table has no header row.
    pub headers: Vec<String>,
    /// Body rows in document order.
    pub rows: Vec<RowRecord>,
}

impl TableSnapshot {
    /// First named row whose name contains `query`, ignoring case.
    ///
    /// Rows without a name cell never match, whatever the query.
    pub fn find_by_name(&self, query: &str) -> Option<&RowRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .filter(|row| row.has_name())
            .find(|row| row.name.to_lowercase().contains(&needle))
    }

    /// Sum of every parsed price. Rows without a price are skipped.
    pub fn total_price(&self) -> Decimal {
        self.rows.iter().filter_map(|row| row.parsed_price).sum()
    }
}

/// One body row of the refund table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    /// 1-based display position.
    pub position: usize,
    /// Card name, or [`NAME_PLACEHOLDER`] when the cell is absent.
    pub name: String,
    /// Trimmed text of the price cell.
    pub raw_price_text: Option<String>,
    /// Price parsed from `raw_price_text`, two decimal places.
    pub parsed_price: Option<Decimal>,
    /// `name` (or `id`) of the quantity input.
    pub quantity_field_id: Option<String>,
}

impl RowRecord {
    pub fn has_name(&self) -> bool {
        self.name != NAME_PLACEHOLDER
    }

    /// Raw price text is present but did not parse.
    pub fn price_unparseable(&self) -> bool {
        self.raw_price_text.is_some() && self.parsed_price.is_none()
    }
}
