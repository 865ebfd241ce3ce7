//! Console narrative for probe results.

use std::fmt::Write;

use console::style;

use orderprobe_core::{CardQuery, FieldResult, RowRecord, TableError, TableSnapshot, WidgetMatch};

const RULE_WIDTH: usize = 80;

pub fn country_report(result: &FieldResult, locator: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Country Detection ===\n");

    match (&result.value, result.shipping_region()) {
        (Some(code), Some(region)) => {
            let _ = writeln!(out, "{} Country code found via {}:", style("✓").green(), locator);
            let _ = writeln!(out, "  Country Code: \"{}\"", code);
            let _ = writeln!(out, "  Is International: {}", region.is_international());
        }
        _ => {
            let _ = writeln!(out, "{} Country element not found via {}\n", style("✗").red(), locator);
            let _ = writeln!(out, "Searching for shipping address table...");
            let _ = writeln!(out, "Found {} candidate table(s)", result.candidates.len());
            for candidate in &result.candidates {
                let _ = writeln!(out, "\nTable {} might be shipping info:", candidate.index);
                let _ = writeln!(out, "{}", candidate.excerpt);
            }
        }
    }

    let _ = write!(out, "\n=== End ===");
    out
}

pub fn table_report(snapshot: &TableSnapshot) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Refund Table Extraction");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{} Found refund form table\n", style("✓").green());

    if !snapshot.headers.is_empty() {
        let _ = writeln!(out, "Table Headers:");
        for (index, header) in snapshot.headers.iter().enumerate() {
            let _ = writeln!(out, "  Column {}: \"{}\"", index + 1, header);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Found {} card(s) in table:\n", snapshot.rows.len());
    for row in &snapshot.rows {
        out.push_str(&row_report(row));
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Total parsed price: ${:.2}", snapshot.total_price());
    let _ = write!(out, "{rule}");
    out
}

pub fn row_report(row: &RowRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Card #{}:", row.position);
    let _ = writeln!(out, "{}", "-".repeat(60));
    let _ = writeln!(out, "  Card Name: {}", row.name);

    match (&row.raw_price_text, row.parsed_price) {
        (Some(text), Some(price)) => {
            let _ = writeln!(out, "  Price Text: \"{}\"", text);
            let _ = writeln!(out, "  {} Extracted Price: ${:.2}", style("✓").green(), price);
        }
        (Some(text), None) => {
            let _ = writeln!(out, "  Price Text: \"{}\"", text);
            let _ = writeln!(out, "  {} Could not parse price from: \"{}\"", style("⚠").yellow(), text);
        }
        (None, _) => {
            let _ = writeln!(out, "  {} Price cell not found", style("✗").red());
        }
    }

    match &row.quantity_field_id {
        Some(name) => {
            let _ = writeln!(out, "  {} Quantity input found: name=\"{}\"", style("✓").green(), name);
        }
        None => {
            let _ = writeln!(out, "  {} Quantity input not found", style("⚠").yellow());
        }
    }
    out
}

pub fn widget_report(query: &CardQuery, found: Option<&WidgetMatch>) -> String {
    let mut out = String::new();
    match found {
        Some(widget) => {
            let _ = writeln!(out, "{} Widget {} holds this card", style("✓").green(), widget.index);
            match &widget.refund_link {
                Some(href) => {
                    let _ = writeln!(out, "  Partial Refund link: {}", href);
                }
                None => {
                    let _ = writeln!(out, "  {} No Partial Refund link in widget", style("⚠").yellow());
                }
            }
            let _ = writeln!(out, "{}", widget.excerpt.trim());
        }
        None => {
            let _ = writeln!(
                out,
                "{} No widget found with card=\"{}\", set=\"{}\", condition=\"{}\"",
                style("✗").red(),
                query.name,
                query.set,
                query.full_condition()
            );
        }
    }
    out.trim_end().to_string()
}

/// Terminal table outcome with the preconditions to check.
pub fn table_error_report(err: &TableError) -> String {
    let mut out = String::new();
    let headline = match err {
        TableError::TableNotFound { .. } => "Could not find refund form table",
        TableError::NoRowsFound { .. } => "No data rows found in table",
    };
    let _ = writeln!(out, "{} ERROR: {}", style("✗").red(), headline);
    let _ = writeln!(out, "Make sure you:");
    for (i, step) in err.guidance().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }
    if let TableError::NoRowsFound { headers } = err {
        if !headers.is_empty() {
            let _ = writeln!(out, "Headers present: {}", headers.join(" | "));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderprobe_core::Candidate;

    fn row(raw: Option<&str>, quantity: Option<&str>) -> RowRecord {
        RowRecord {
            position: 1,
            name: "Sample Card".to_string(),
            raw_price_text: raw.map(str::to_string),
            parsed_price: raw.and_then(orderprobe_core::parse_price),
            quantity_field_id: quantity.map(str::to_string),
        }
    }

    #[test]
    fn test_country_found() {
        let report = country_report(&FieldResult::found("CA"), "path /html/body");

        assert!(report.contains("Country Code: \"CA\""));
        assert!(report.contains("Is International: true"));
    }

    #[test]
    fn test_country_candidates() {
        let result = FieldResult::not_found(vec![Candidate {
            index: 3,
            excerpt: "Shipping Address".to_string(),
        }]);

        let report = country_report(&result, "path /html/body");

        assert!(report.contains("Country element not found"));
        assert!(report.contains("Found 1 candidate table(s)"));
        assert!(report.contains("Table 3 might be shipping info:\nShipping Address"));
    }

    #[test]
    fn test_row_report_variants() {
        let parsed = row_report(&row(Some("$1.23"), Some("q1")));
        assert!(parsed.contains("Extracted Price: $1.23"));
        assert!(parsed.contains("name=\"q1\""));

        let unparsed = row_report(&row(Some("$1.2"), None));
        assert!(unparsed.contains("Could not parse price from: \"$1.2\""));
        assert!(unparsed.contains("Quantity input not found"));

        let missing = row_report(&row(None, None));
        assert!(missing.contains("Price cell not found"));
    }

    #[test]
    fn test_table_report_lists_headers() {
        let snapshot = TableSnapshot {
            headers: vec!["".to_string(), "Name".to_string()],
            rows: vec![row(Some("$2.50"), None)],
        };

        let report = table_report(&snapshot);

        assert!(report.contains("Column 2: \"Name\""));
        assert!(report.contains("Found 1 card(s) in table"));
        assert!(report.contains("Total parsed price: $2.50"));
    }

    #[test]
    fn test_widget_report() {
        let query = CardQuery::new("Lightning Bolt").with_set("M10").with_condition("LPF");

        let missing = widget_report(&query, None);
        assert!(missing.contains(
            "No widget found with card=\"Lightning Bolt\", set=\"M10\", condition=\"Lightly Played Foil\""
        ));

        let widget = WidgetMatch {
            index: 1,
            condition: "Lightly Played Foil".to_string(),
            refund_link: Some("/partialrefund/2".to_string()),
            excerpt: " Lightning Bolt M10 ".to_string(),
        };
        let found = widget_report(&query, Some(&widget));
        assert!(found.contains("Widget 1 holds this card"));
        assert!(found.contains("Partial Refund link: /partialrefund/2"));
    }

    #[test]
    fn test_table_error_report() {
        let report = table_error_report(&TableError::TableNotFound {
            selector: "form table".to_string(),
        });

        assert!(report.contains("Could not find refund form table"));
        assert!(report.contains("1. Are on an order page"));

        let report = table_error_report(&TableError::NoRowsFound {
            headers: vec!["Name".to_string(), "Cost".to_string()],
        });
        assert!(report.contains("Headers present: Name | Cost"));
    }
}
