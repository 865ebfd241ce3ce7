//! CSS selector locator.

use scraper::{ElementRef, Html, Selector};

use super::Locator;
use crate::dom::parse_selector;
use crate::error::LocatorError;

/// Locates the first element matching a CSS selector.
#[derive(Debug, Clone)]
pub struct CssLocator {
    source: String,
    selector: Selector,
}

impl CssLocator {
    pub fn new(selector: &str) -> Result<Self, LocatorError> {
        Ok(Self {
            source: selector.to_string(),
            selector: parse_selector(selector)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Locator for CssLocator {
    fn describe(&self) -> String {
        format!("selector {}", self.source)
    }

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}
