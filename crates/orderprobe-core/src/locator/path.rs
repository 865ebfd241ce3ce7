//! Absolute positional element paths.
//!
//! Only the subset used to pin a value on a known page layout is supported:
//! `/html/body/div[4]/table/tbody/tr[8]/td[2]`. Each step names a child element
//! (or `*`) with an optional 1-based position among same-named siblings.
//! Unpositioned steps keep every matching child, so the path selects a set of
//! elements and the first in document order is returned.

use std::fmt;
use std::str::FromStr;

use scraper::{ElementRef, Html};

use super::Locator;
use crate::error::LocatorError;

/// A parsed absolute element path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralPath {
    source: String,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    /// Lowercase tag name, `None` for `*`.
    name: Option<String>,
    /// 1-based position among matching siblings.
    position: Option<usize>,
}

impl Step {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        match &self.name {
            Some(name) => element.value().name().eq_ignore_ascii_case(name),
            None => true,
        }
    }

    fn parse(raw: &str, path: &str) -> Result<Self, LocatorError> {
        let invalid = |reason: String| LocatorError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("empty step (descendant axis is not supported)".to_string()));
        }

        let (name, position) = match raw.find('[') {
            Some(open) => {
                let predicate = raw[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| invalid(format!("unterminated predicate in step {raw:?}")))?;
                let position: usize = predicate
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("predicate {predicate:?} is not a position")))?;
                if position == 0 {
                    return Err(invalid("positions are 1-based".to_string()));
                }
                (&raw[..open], Some(position))
            }
            None => (raw, None),
        };

        let name = match name {
            "*" => None,
            n if !n.is_empty()
                && n.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') =>
            {
                Some(n.to_ascii_lowercase())
            }
            n => return Err(invalid(format!("invalid element name {n:?}"))),
        };

        Ok(Self { name, position })
    }
}

impl FromStr for StructuralPath {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let rest = path.strip_prefix('/').ok_or_else(|| LocatorError::InvalidPath {
            path: path.to_string(),
            reason: "path must be absolute".to_string(),
        })?;

        let steps = rest
            .split('/')
            .map(|raw| Step::parse(raw.trim(), path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: path.to_string(),
            steps,
        })
    }
}

impl StructuralPath {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Every element the path selects, in document order.
    pub fn select_all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Vec::new();
        };

        let root = document.root_element();
        if !first.matches(&root) || first.position.is_some_and(|p| p != 1) {
            return Vec::new();
        }

        let mut current = vec![root];
        for step in rest {
            current = current
                .into_iter()
                .flat_map(|parent| {
                    let children = parent
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|child| step.matches(child));
                    match step.position {
                        Some(p) => children.skip(p - 1).take(1).collect::<Vec<_>>(),
                        None => children.collect(),
                    }
                })
                .collect();

            if current.is_empty() {
                break;
            }
        }

        current
    }
}

impl Locator for StructuralPath {
    fn describe(&self) -> String {
        format!("path {}", self.source)
    }

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.select_all(document).into_iter().next()
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::trimmed_text;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><body>
        <div>first</div>
        <div><table>
            <tr><td>Name</td><td>Jane</td></tr>
            <tr><td>Country</td><td> CA </td></tr>
        </table></div>
        <div><p>a</p><p>b</p></div>
        <div><p>c</p></div>
    </body></html>"#;

    fn locate_text(path: &str) -> Option<String> {
        let document = Html::parse_document(PAGE);
        let path: StructuralPath = path.parse().unwrap();
        path.locate(&document).map(trimmed_text)
    }

    #[test]
    fn test_positional_path_resolves() {
        // tbody is inserted by the HTML parser, as in a browser.
        assert_eq!(
            locate_text("/html/body/div[2]/table/tbody/tr[2]/td[2]"),
            Some("CA".to_string())
        );
    }

    #[test]
    fn test_unpositioned_step_returns_first_in_document_order() {
        assert_eq!(locate_text("/html/body/div/p"), Some("a".to_string()));
        assert_eq!(locate_text("/html/body/div/p[2]"), Some("b".to_string()));
        assert_eq!(locate_text("/html/body/*[4]/p"), Some("c".to_string()));
    }

    #[test]
    fn test_missing_step_resolves_nothing() {
        assert_eq!(locate_text("/html/body/div[9]/table"), None);
        assert_eq!(locate_text("/html/body/div[2]/table/tbody/tr[8]/td[2]"), None);
        assert_eq!(locate_text("/body/div"), None);
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for bad in [
            "html/body",
            "//td",
            "/html/body/div[0]",
            "/html/body/div[x]",
            "/html/body/div[2",
            "/html/bo dy",
        ] {
            let err = bad.parse::<StructuralPath>().unwrap_err();
            assert!(
                matches!(err, LocatorError::InvalidPath { .. }),
                "{bad} should be rejected"
            );
        }
    }
}
