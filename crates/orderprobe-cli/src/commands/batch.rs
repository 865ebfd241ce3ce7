//! Batch command - probe multiple saved pages.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use serde::Serialize;
use tracing::{debug, error, warn};

use orderprobe_core::{OrderPageProbe, PageReport, TableError};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for saved pages (e.g. "pages/*.html")
    #[arg(required = true)]
    input: String,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue when a page cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// One line of the batch summary.
#[derive(Debug, Serialize)]
struct SummaryRow {
    file: String,
    country: Option<String>,
    international: Option<bool>,
    candidates: usize,
    table: &'static str,
    rows: usize,
    unparsed_prices: usize,
    total_price: Option<String>,
    error: Option<String>,
}

impl SummaryRow {
    fn from_report(path: &Path, report: &PageReport) -> Self {
        let (table, rows, unparsed_prices, total_price) = match &report.table {
            Ok(snapshot) => (
                "ok",
                snapshot.rows.len(),
                snapshot.rows.iter().filter(|r| r.price_unparseable()).count(),
                Some(format!("{:.2}", snapshot.total_price())),
            ),
            Err(TableError::TableNotFound { .. }) => ("table_not_found", 0, 0, None),
            Err(TableError::NoRowsFound { .. }) => ("no_rows_found", 0, 0, None),
        };

        Self {
            file: path.display().to_string(),
            country: report.country.value.clone(),
            international: report.country.shipping_region().map(|r| r.is_international()),
            candidates: report.country.candidates.len(),
            table,
            rows,
            unparsed_prices,
            total_price,
            error: None,
        }
    }

    fn failed(path: &Path, error: String) -> Self {
        Self {
            file: path.display().to_string(),
            country: None,
            international: None,
            candidates: 0,
            table: "unread",
            rows: 0,
            unparsed_prices: 0,
            total_price: None,
            error: Some(error),
        }
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let probe = OrderPageProbe::new(&config)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "html" | "htm")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} page(s) to probe",
        style("ℹ").blue(),
        files.len()
    );

    let mut results = Vec::with_capacity(files.len());
    for path in &files {
        match OrderPageProbe::load(path) {
            Ok(document) => {
                let report = probe.report(&document);
                debug!("Probed {}", path.display());
                results.push(SummaryRow::from_report(path, &report));
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to read {}: {}", path.display(), error_msg);
                    results.push(SummaryRow::failed(path, error_msg));
                } else {
                    error!("Failed to read {}: {}", path.display(), error_msg);
                    anyhow::bail!("Probing failed: {}", error_msg);
                }
            }
        }
    }

    for row in &results {
        let marker = if row.error.is_none() && row.table == "ok" && row.country.is_some() {
            style("✓").green()
        } else {
            style("⚠").yellow()
        };
        println!(
            "{} {}: country={} table={} rows={} unparsed={}",
            marker,
            row.file,
            row.country.as_deref().unwrap_or("?"),
            row.table,
            row.rows,
            row.unparsed_prices
        );
    }

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Probed {} page(s) in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );

    Ok(())
}

fn write_summary(path: &Path, results: &[SummaryRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in results {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
