//! Small helpers over the parsed document tree.

use scraper::{ElementRef, Selector};

use crate::error::LocatorError;

/// Concatenated text of every descendant text node.
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// [`text_content`] with surrounding whitespace removed.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    text_content(element).trim().to_string()
}

/// Parse a CSS selector, keeping the source text in the error.
pub fn parse_selector(selector: &str) -> Result<Selector, LocatorError> {
    Selector::parse(selector).map_err(|e| LocatorError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// First `len` characters of `text`, on a char boundary.
pub fn excerpt(text: &str, len: usize) -> String {
    text.chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_text_content_flattens_descendants() {
        let html = Html::parse_fragment("<div> Ship <b>to</b>:\n <i>CA</i> </div>");
        let div = html.select(&parse_selector("div").unwrap()).next().unwrap();

        assert_eq!(text_content(div), " Ship to:\n CA ");
        assert_eq!(trimmed_text(div), "Ship to:\n CA");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("żółw", 2), "żó");
        assert_eq!(excerpt("abc", 10), "abc");
    }

    #[test]
    fn test_invalid_selector() {
        let err = parse_selector("td:nth-child(").unwrap_err();
        assert!(matches!(err, LocatorError::InvalidSelector { .. }));
    }
}
