//! Order widget matching on card name, set and condition.
//!
//! An order page lists each sub-order in its own widget. The same card can
//! appear in several widgets (different sets or conditions), so a name alone
//! does not pick one. Conditions arrive as abbreviations (`NM`, `LPF`, `DMH`)
//! while widgets spell them out, hence [`expand_condition`].

use std::borrow::Cow;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{excerpt, parse_selector, text_content};
use crate::error::LocatorError;
use crate::models::WidgetConfig;

/// Spell out a condition abbreviation.
///
/// Unknown codes are returned unchanged, so full names pass through.
pub fn expand_condition(code: &str) -> Cow<'_, str> {
    let full = match code.trim().to_ascii_uppercase().as_str() {
        "NM" => "Near Mint",
        "LP" => "Lightly Played",
        "MP" => "Moderately Played",
        "HP" => "Heavily Played",
        "DM" => "Damaged",
        "NMF" => "Near Mint Foil",
        "LPF" => "Lightly Played Foil",
        "MPF" => "Moderately Played Foil",
        "HPF" => "Heavily Played Foil",
        "DMF" => "Damaged Foil",
        "NMH" => "Near Mint Holofoil",
        "LPH" => "Lightly Played Holofoil",
        "MPH" => "Moderately Played Holofoil",
        "HPH" => "Heavily Played Holofoil",
        "DMH" => "Damaged Holofoil",
        _ => return Cow::Borrowed(code.trim()),
    };
    Cow::Borrowed(full)
}

/// What identifies one line of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardQuery {
    pub name: String,
    /// Set name; empty matches any set.
    pub set: String,
    /// Condition, abbreviated or spelled out; empty matches any condition.
    pub condition: String,
}

impl CardQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = set.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn full_condition(&self) -> Cow<'_, str> {
        expand_condition(&self.condition)
    }

    /// Whether a widget's text mentions the card, set and condition, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        let condition = self.full_condition();
        [self.name.trim(), self.set.trim(), condition.as_ref()]
            .iter()
            .all(|part| text.contains(&part.to_lowercase()))
    }
}

/// A widget that satisfied a [`CardQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMatch {
    /// 0-based index among all widgets on the page.
    pub index: usize,
    /// Condition text that was searched for, after expansion.
    pub condition: String,
    /// `href` of the widget's partial refund link.
    pub refund_link: Option<String>,
    /// Leading characters of the widget's text.
    pub excerpt: String,
}

/// Finds the order widget for a card.
#[derive(Debug, Clone)]
pub struct WidgetMatcher {
    container: Selector,
    refund_link: Selector,
    excerpt_len: usize,
}

impl WidgetMatcher {
    pub fn from_config(config: &WidgetConfig) -> Result<Self, LocatorError> {
        Ok(Self {
            container: parse_selector(&config.container_selector)?,
            refund_link: parse_selector(&config.refund_link_selector)?,
            excerpt_len: config.excerpt_len,
        })
    }

    /// Every widget matching `query`, in document order.
    pub fn find_all(&self, document: &Html, query: &CardQuery) -> Vec<WidgetMatch> {
        if query.name.trim().is_empty() {
            return Vec::new();
        }
        let condition = query.full_condition().into_owned();

        document
            .select(&self.container)
            .enumerate()
            .filter_map(|(index, widget)| {
                let text = text_content(widget);
                if !query.matches(&text) {
                    return None;
                }
                debug!("Widget {} matches {:?}", index, query.name);
                Some(WidgetMatch {
                    index,
                    condition: condition.clone(),
                    refund_link: widget
                        .select(&self.refund_link)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string),
                    excerpt: excerpt(&text, self.excerpt_len),
                })
            })
            .collect()
    }

    /// The widget for `query`. When several match, the last one on the page wins.
    pub fn find(&self, document: &Html, query: &CardQuery) -> Option<WidgetMatch> {
        let mut matches = self.find_all(document, query);
        if matches.len() > 1 {
            debug!("{} widgets match {:?}; using the last", matches.len(), query.name);
        }
        matches.pop()
    }
}
