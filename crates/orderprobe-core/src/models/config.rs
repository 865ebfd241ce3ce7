//! Configuration structures for the probes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Main configuration for orderprobe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Shipping country lookup.
    pub field: FieldConfig,

    /// Refund table extraction.
    pub table: TableConfig,

    /// Order widget matching.
    pub widget: WidgetConfig,
}

/// Single-field lookup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Absolute structural path tried first.
    pub primary_path: String,

    /// CSS selector tried when the structural path misses.
    pub css_fallback: Option<String>,

    /// Elements scanned for near-matches when every locator misses.
    pub container_selector: String,

    /// Lowercase keywords that mark a container as related.
    pub keywords: Vec<String>,

    /// Characters of container text kept per candidate.
    pub excerpt_len: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            primary_path: "/html/body/div[4]/div/div[6]/div[1]/div[1]/table/tbody/tr[8]/td[2]"
                .to_string(),
            css_fallback: None,
            container_selector: "table".to_string(),
            keywords: vec![
                "ship".to_string(),
                "address".to_string(),
                "country".to_string(),
            ],
            excerpt_len: 200,
        }
    }
}

/// Table extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Selector for the table; the first match is used.
    pub table_selector: String,

    /// Selector for the header row, relative to the table.
    pub header_row_selector: String,

    /// Selector for body rows, relative to the table.
    pub row_selector: String,

    /// Column positions.
    pub layout: TableLayout,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_selector: "form table".to_string(),
            header_row_selector: "thead tr".to_string(),
            row_selector: "tbody tr".to_string(),
            layout: TableLayout::default(),
        }
    }
}

/// Order widget matching configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Selector for one sub-order widget.
    pub container_selector: String,

    /// Selector for the partial refund link, relative to the widget.
    pub refund_link_selector: String,

    /// Characters of widget text kept per match.
    pub excerpt_len: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            container_selector: ".widget".to_string(),
            refund_link_selector: r#"a[href*="partialrefund"]"#.to_string(),
            excerpt_len: 200,
        }
    }
}

/// 1-based column positions of the fields read from each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub name_column: usize,
    pub price_column: usize,
    pub quantity_column: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            name_column: 2,
            price_column: 5,
            quantity_column: 9,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_refund_form_layout() {
        let config = ProbeConfig::default();

        assert_eq!(config.table.table_selector, "form table");
        assert_eq!(config.table.layout.name_column, 2);
        assert_eq!(config.table.layout.price_column, 5);
        assert_eq!(config.table.layout.quantity_column, 9);
        assert_eq!(config.field.keywords, vec!["ship", "address", "country"]);
        assert_eq!(config.field.excerpt_len, 200);
        assert_eq!(config.widget.container_selector, ".widget");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "table": { "layout": { "quantity_column": 8 } } }"#;
        let config: ProbeConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.table.layout.quantity_column, 8);
        assert_eq!(config.table.layout.price_column, 5);
        assert_eq!(config.field, FieldConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ProbeConfig::default();
        config.field.css_fallback = Some("#shipping td.country".to_string());
        config.save(&path).unwrap();

        assert_eq!(ProbeConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ProbeConfig::from_file(Path::new("/nonexistent/orderprobe.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
