//! Refund table extraction.
//!
//! [`TableRowExtractor`] finds the table, reads the optional header row and
//! maps each body row to a [`RowRecord`]. Cells are read independently: a
//! missing name, price or quantity cell nulls that field only.

mod price;

pub use price::{PRICE_PATTERN, parse_price};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::dom::{parse_selector, trimmed_text};
use crate::error::{LocatorError, TableError};
use crate::models::{NAME_PLACEHOLDER, RowRecord, TableConfig, TableLayout, TableSnapshot};

/// Extracts card rows from the refund form table.
#[derive(Debug, Clone)]
pub struct TableRowExtractor {
    table_source: String,
    table: Selector,
    header_row: Selector,
    header_cell: Selector,
    row: Selector,
    name_cell: Selector,
    price_cell: Selector,
    quantity_input: Selector,
}

impl TableRowExtractor {
    /// Build an extractor from configuration.
    pub fn from_config(config: &TableConfig) -> Result<Self, LocatorError> {
        let TableLayout {
            name_column,
            price_column,
            quantity_column,
        } = config.layout;

        for (field, column) in [
            ("name_column", name_column),
            ("price_column", price_column),
            ("quantity_column", quantity_column),
        ] {
            if column == 0 {
                return Err(LocatorError::InvalidColumn { field });
            }
        }

        Ok(Self {
            table_source: config.table_selector.clone(),
            table: parse_selector(&config.table_selector)?,
            header_row: parse_selector(&config.header_row_selector)?,
            header_cell: parse_selector("th, td")?,
            row: parse_selector(&config.row_selector)?,
            name_cell: parse_selector(&format!("td:nth-child({name_column})"))?,
            price_cell: parse_selector(&format!("td:nth-child({price_column})"))?,
            quantity_input: parse_selector(&format!("td:nth-child({quantity_column}) input"))?,
        })
    }

    /// The first table matching the selector.
    pub fn locate<'a, 'e>(&'e self, document: &'a Html) -> Result<LocatedTable<'a, 'e>, TableError> {
        let element = document
            .select(&self.table)
            .next()
            .ok_or_else(|| TableError::TableNotFound {
                selector: self.table_source.clone(),
            })?;

        info!("Found refund form table");
        Ok(LocatedTable {
            element,
            extractor: self,
        })
    }

    /// Read the header and every body row.
    pub fn extract(&self, document: &Html) -> Result<TableSnapshot, TableError> {
        let table = self.locate(document)?;
        let headers = table.headers();
        let rows: Vec<RowRecord> = table.rows().collect();

        if rows.is_empty() {
            return Err(TableError::NoRowsFound { headers });
        }

        info!("Extracted {} row(s) from table", rows.len());
        Ok(TableSnapshot { headers, rows })
    }

    /// Map one body row to a record. Never fails.
    pub fn extract_row(&self, position: usize, row: ElementRef<'_>) -> RowRecord {
        let name = match row.select(&self.name_cell).next() {
            Some(cell) => trimmed_text(cell),
            None => {
                debug!("Row {}: name cell missing", position);
                NAME_PLACEHOLDER.to_string()
            }
        };

        let raw_price_text = row.select(&self.price_cell).next().map(trimmed_text);
        let parsed_price = raw_price_text.as_deref().and_then(parse_price);
        match (&raw_price_text, parsed_price) {
            (None, _) => debug!("Row {}: price cell missing", position),
            (Some(text), None) => warn!("Row {}: could not parse price from {:?}", position, text),
            _ => {}
        }

        let quantity_field_id = row.select(&self.quantity_input).next().map(|input| {
            let attrs = input.value();
            attrs
                .attr("name")
                .or_else(|| attrs.attr("id"))
                .unwrap_or_default()
                .to_string()
        });
        if quantity_field_id.is_none() {
            debug!("Row {}: quantity input missing", position);
        }

        RowRecord {
            position,
            name,
            raw_price_text,
            parsed_price,
            quantity_field_id,
        }
    }
}

/// A table found in a document.
#[derive(Debug, Clone, Copy)]
pub struct LocatedTable<'a, 'e> {
    element: ElementRef<'a>,
    extractor: &'e TableRowExtractor,
}

impl<'a, 'e> LocatedTable<'a, 'e> {
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// Trimmed header cell texts, empty without a header row.
    pub fn headers(&self) -> Vec<String> {
        self.element
            .select(&self.extractor.header_row)
            .next()
            .map(|row| row.select(&self.extractor.header_cell).map(trimmed_text).collect())
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.element.select(&self.extractor.row).count()
    }

    /// Body rows in document order, extracted on demand.
    pub fn rows(&self) -> impl Iterator<Item = RowRecord> {
        let extractor = self.extractor;
        self.element
            .select(&extractor.row)
            .enumerate()
            .map(move |(i, row)| extractor.extract_row(i + 1, row))
    }
}
