//! Keyword scan over fallback containers.

use scraper::{Html, Selector};
use tracing::debug;

use crate::dom::{excerpt, parse_selector, text_content};
use crate::error::LocatorError;
use crate::models::Candidate;

/// Reports containers whose text mentions any keyword.
#[derive(Debug, Clone)]
pub struct KeywordScan {
    container_source: String,
    container: Selector,
    keywords: Vec<String>,
    excerpt_len: usize,
}

impl KeywordScan {
    pub const DEFAULT_KEYWORDS: [&'static str; 3] = ["ship", "address", "country"];
    pub const DEFAULT_EXCERPT_LEN: usize = 200;

    /// Scan every `container` element using the default keywords.
    pub fn new(container: &str) -> Result<Self, LocatorError> {
        Ok(Self {
            container_source: container.to_string(),
            container: parse_selector(container)?,
            keywords: Self::DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            excerpt_len: Self::DEFAULT_EXCERPT_LEN,
        })
    }

    /// Replace the keyword set. Matching ignores case.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }

    pub fn container(&self) -> &str {
        &self.container_source
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `text` contains any keyword, ignoring case.
    pub fn is_match(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Matching containers in document order.
    pub fn scan(&self, document: &Html) -> Vec<Candidate> {
        let mut total = 0;
        let candidates: Vec<Candidate> = document
            .select(&self.container)
            .enumerate()
            .inspect(|_| total += 1)
            .filter_map(|(index, element)| {
                let text = text_content(element);
                self.is_match(&text).then(|| Candidate {
                    index,
                    excerpt: excerpt(&text, self.excerpt_len),
                })
            })
            .collect();

        debug!(
            "Scanned {} {} element(s), {} candidate(s)",
            total,
            self.container_source,
            candidates.len()
        );
        candidates
    }
}
