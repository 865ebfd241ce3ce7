//! Single-field lookup with a heuristic fallback.
//!
//! A [`FieldLocator`] holds an ordered chain of [`Locator`] strategies. The
//! first strategy that resolves an element wins. When every strategy misses,
//! a [`KeywordScan`] over broader containers produces candidates for a human
//! to inspect.

mod css;
mod path;
mod scan;

pub use css::CssLocator;
pub use path::StructuralPath;
pub use scan::KeywordScan;

use scraper::{ElementRef, Html};
use tracing::{debug, info};

use crate::dom::trimmed_text;
use crate::error::LocatorError;
use crate::models::{FieldConfig, FieldResult};

/// A strategy that resolves one element in a document.
pub trait Locator {
    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;

    /// The element this strategy points at, if present.
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;
}

/// Resolves a scalar field through a strategy chain.
pub struct FieldLocator {
    strategies: Vec<Box<dyn Locator + Send + Sync>>,
    scan: KeywordScan,
}

impl FieldLocator {
    /// Start a chain with `primary` and a default table keyword scan.
    pub fn new(primary: impl Locator + Send + Sync + 'static) -> Result<Self, LocatorError> {
        Ok(Self {
            strategies: vec![Box::new(primary)],
            scan: KeywordScan::new("table")?,
        })
    }

    /// Append a strategy tried after the existing ones.
    pub fn with_strategy(mut self, strategy: impl Locator + Send + Sync + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Replace the fallback scan.
    pub fn with_scan(mut self, scan: KeywordScan) -> Self {
        self.scan = scan;
        self
    }

    /// Build a locator from configuration.
    pub fn from_config(config: &FieldConfig) -> Result<Self, LocatorError> {
        let primary: StructuralPath = config.primary_path.parse()?;
        let scan = KeywordScan::new(&config.container_selector)?
            .with_keywords(&config.keywords)
            .with_excerpt_len(config.excerpt_len);

        let mut locator = Self::new(primary)?.with_scan(scan);
        if let Some(css) = &config.css_fallback {
            locator = locator.with_strategy(CssLocator::new(css)?);
        }
        Ok(locator)
    }

    pub fn scan(&self) -> &KeywordScan {
        &self.scan
    }

    /// Resolve the field. Never fails; a miss is reported through the result.
    pub fn locate(&self, document: &Html) -> FieldResult {
        for strategy in &self.strategies {
            if let Some(element) = strategy.locate(document) {
                let value = trimmed_text(element);
                info!("Field found via {}: {:?}", strategy.describe(), value);
                return FieldResult::found(value);
            }
            debug!("No element for {}", strategy.describe());
        }

        info!(
            "Field not found, scanning {} elements for {:?}",
            self.scan.container(),
            self.scan.keywords()
        );
        FieldResult::not_found(self.scan.scan(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use pretty_assertions::assert_eq;

    const COUNTRY_PATH: &str = "/html/body/div[2]/table/tbody/tr[2]/td[2]";

    fn page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
                <div><table><tr><td>Order</td><td>251020-402C</td></tr></table></div>
                <div><table>{rows}</table></div>
            </body></html>"#
        ))
    }

    fn locator() -> FieldLocator {
        FieldLocator::new(COUNTRY_PATH.parse::<StructuralPath>().unwrap()).unwrap()
    }

    #[test]
    fn test_primary_path_hit() {
        let document = page("<tr><td>Name</td><td>Jane</td></tr><tr><td>Country</td><td>\n CA \n</td></tr>");

        let result = locator().locate(&document);

        assert_eq!(result, FieldResult::found("CA"));
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_miss_reports_keyword_candidates() {
        let document = page("<tr><td>Ship To</td><td>CA</td></tr>");

        let result = locator().locate(&document);

        assert!(!result.found);
        assert_eq!(result.value, None);
        assert_eq!(
            result.candidates,
            vec![Candidate {
                index: 1,
                excerpt: "Ship ToCA".to_string(),
            }]
        );
    }

    #[test]
    fn test_every_candidate_matches_keywords() {
        // Keyword past the excerpt cutoff: only the full container text has it.
        let filler = "x".repeat(300);
        let document = page(&format!("<tr><td>{filler}</td><td>Address</td></tr>"));
        let locator = locator();
        let containers = scraper::Selector::parse("table").unwrap();

        let result = locator.locate(&document);

        assert_eq!(result.candidates.len(), 1);
        for candidate in &result.candidates {
            let container = document.select(&containers).nth(candidate.index).unwrap();
            assert!(locator.scan().is_match(&crate::dom::text_content(container)));
            assert!(!locator.scan().is_match(&candidate.excerpt));
        }
    }

    #[test]
    fn test_css_fallback_in_chain() {
        let document = page(r#"<tr><td class="country">GB</td></tr>"#);
        let locator = locator().with_strategy(CssLocator::new("td.country").unwrap());

        assert_eq!(locator.locate(&document), FieldResult::found("GB"));
    }

    #[test]
    fn test_from_config() {
        let config = FieldConfig {
            primary_path: "/html/body/div[9]".to_string(),
            css_fallback: Some("td.country".to_string()),
            ..FieldConfig::default()
        };
        let document = page(r#"<tr><td class="country">DE</td></tr>"#);

        let locator = FieldLocator::from_config(&config).unwrap();

        assert_eq!(locator.locate(&document).value.as_deref(), Some("DE"));
    }

    #[test]
    fn test_from_config_rejects_bad_path() {
        let config = FieldConfig {
            primary_path: "body/div".to_string(),
            ..FieldConfig::default()
        };

        assert!(matches!(
            FieldLocator::from_config(&config),
            Err(LocatorError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_locate_is_idempotent() {
        let document = page("<tr><td>Shipping</td></tr>");
        let locator = locator();

        assert_eq!(locator.locate(&document), locator.locate(&document));
    }
}
