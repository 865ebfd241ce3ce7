//! Order page probe combining the country lookup and the refund table.

use std::borrow::Cow;
use std::path::Path;

use scraper::Html;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{LocatorError, Result, TableError};
use crate::locator::FieldLocator;
use crate::models::{FieldResult, ProbeConfig, RowRecord, TableSnapshot};
use crate::table::TableRowExtractor;
use crate::widget::{CardQuery, WidgetMatch, WidgetMatcher};

/// Both probes built from one configuration.
pub struct OrderPageProbe {
    country: FieldLocator,
    table: TableRowExtractor,
    widgets: WidgetMatcher,
}

/// Everything the probe reads from one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub country: FieldResult,
    pub table: std::result::Result<TableSnapshot, TableError>,
}

impl OrderPageProbe {
    pub fn new(config: &ProbeConfig) -> std::result::Result<Self, LocatorError> {
        Ok(Self {
            country: FieldLocator::from_config(&config.field)?,
            table: TableRowExtractor::from_config(&config.table)?,
            widgets: WidgetMatcher::from_config(&config.widget)?,
        })
    }

    /// Build a probe from a JSON configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = ProbeConfig::from_file(path)?;
        Ok(Self::new(&config)?)
    }

    pub fn country_locator(&self) -> &FieldLocator {
        &self.country
    }

    pub fn table_extractor(&self) -> &TableRowExtractor {
        &self.table
    }

    pub fn widget_matcher(&self) -> &WidgetMatcher {
        &self.widgets
    }

    /// Parse a saved page.
    pub fn parse(html: &str) -> Html {
        debug!("Parsing document ({} bytes)", html.len());
        Html::parse_document(html)
    }

    /// Read and parse a saved page from disk.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD so a page
    /// saved in another encoding still yields whatever it can.
    pub fn load(path: &Path) -> Result<Html> {
        info!("Loading page {}", path.display());
        let bytes = std::fs::read(path)?;
        let html = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = html {
            warn!("{} is not valid UTF-8; invalid bytes replaced", path.display());
        }
        Ok(Self::parse(&html))
    }

    /// Shipping country code lookup.
    pub fn country(&self, document: &Html) -> FieldResult {
        self.country.locate(document)
    }

    /// Refund table rows.
    pub fn table(&self, document: &Html) -> std::result::Result<TableSnapshot, TableError> {
        self.table.extract(document)
    }

    /// The first table row whose card name contains `name`, ignoring case.
    pub fn find_row(&self, document: &Html, name: &str) -> Result<Option<RowRecord>> {
        let snapshot = self.table(document)?;
        let row = snapshot.find_by_name(name).cloned();
        match &row {
            Some(r) => info!("Found card {:?} in row {}", name, r.position),
            None => info!("Card {:?} not found in table", name),
        }
        Ok(row)
    }

    /// The order widget holding this card, matched on name, set and condition.
    pub fn find_widget(&self, document: &Html, query: &CardQuery) -> Option<WidgetMatch> {
        let found = self.widgets.find(document, query);
        match &found {
            Some(w) => info!("Matched widget {} for {:?}", w.index, query.name),
            None => info!(
                "No widget with card={:?} set={:?} condition={:?}",
                query.name,
                query.set,
                query.full_condition()
            ),
        }
        found
    }

    /// Run both probes.
    pub fn report(&self, document: &Html) -> PageReport {
        PageReport {
            country: self.country(document),
            table: self.table(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::models::ShippingRegion;
    use std::io::Write;

    #[test]
    fn test_report_on_empty_page() {
        let probe = OrderPageProbe::new(&ProbeConfig::default()).unwrap();
        let document = OrderPageProbe::parse("<html><body><p>Loading…</p></body></html>");

        let report = probe.report(&document);

        assert!(!report.country.found);
        assert!(report.country.candidates.is_empty());
        assert_eq!(report.country.shipping_region(), None::<ShippingRegion>);
        assert!(matches!(report.table, Err(TableError::TableNotFound { .. })));
    }

    #[test]
    fn test_find_row() {
        let probe = OrderPageProbe::new(&ProbeConfig::default()).unwrap();
        let document = OrderPageProbe::parse(
            "<form><table><tbody>\
             <tr><td></td><td>Sol Ring</td></tr>\
             <tr><td></td><td>Counterspell (Foil)</td></tr>\
             </tbody></table></form>",
        );

        let row = probe.find_row(&document, "counterspell").unwrap();
        assert_eq!(row.map(|r| r.position), Some(2));
        assert_eq!(probe.find_row(&document, "Island").unwrap(), None);
    }

    #[test]
    fn test_find_row_ignores_rows_without_name_cell() {
        let probe = OrderPageProbe::new(&ProbeConfig::default()).unwrap();
        let document = OrderPageProbe::parse(
            "<form><table><tbody>\
             <tr><td>only</td></tr>\
             <tr><td></td><td>Nissa, Who Shakes the World</td></tr>\
             </tbody></table></form>",
        );

        let row = probe.find_row(&document, "n").unwrap();
        assert_eq!(row.map(|r| (r.position, r.name)), Some((2, "Nissa, Who Shakes the World".to_string())));
    }

    #[test]
    fn test_find_row_without_table() {
        let probe = OrderPageProbe::new(&ProbeConfig::default()).unwrap();
        let document = OrderPageProbe::parse("<p>no form</p>");

        let err = probe.find_row(&document, "Sol Ring").unwrap_err();
        assert!(matches!(err, ProbeError::Table(TableError::TableNotFound { .. })));
    }

    #[test]
    fn test_load_and_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("order.html");
        let mut file = std::fs::File::create(&page).unwrap();
        write!(file, "<html><body><p>ok</p></body></html>").unwrap();

        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "field": { "primary_path": "/html/body/p" } }"#).unwrap();

        let probe = OrderPageProbe::from_config_file(&config_path).unwrap();
        let document = OrderPageProbe::load(&page).unwrap();

        assert_eq!(probe.country(&document).value.as_deref(), Some("ok"));
    }

    #[test]
    fn test_load_page_with_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("latin1.html");
        let mut bytes = b"<form><table><tbody><tr><td></td><td>Pok".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"mon Booster</td><td></td><td></td><td>$3.50</td></tr></tbody></table></form>");
        std::fs::write(&page, bytes).unwrap();

        let probe = OrderPageProbe::new(&ProbeConfig::default()).unwrap();
        let document = OrderPageProbe::load(&page).unwrap();
        let snapshot = probe.table(&document).unwrap();

        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].name, "Pok\u{FFFD}mon Booster");
        assert_eq!(snapshot.rows[0].raw_price_text.as_deref(), Some("$3.50"));
        assert!(snapshot.find_by_name("booster").is_some());
    }

    #[test]
    fn test_load_missing_page() {
        let err = OrderPageProbe::load(Path::new("/nonexistent/order.html")).unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
    }

    #[test]
    fn test_bad_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let err = OrderPageProbe::from_config_file(&config_path).err().unwrap();
        assert!(matches!(err, ProbeError::Config(_)));
    }
}
