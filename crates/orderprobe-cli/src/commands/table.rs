//! Table command - extract the refund form table from a saved page.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use orderprobe_core::{TableRowExtractor, TableSnapshot};

use super::{OutputFormat, emit, load_config, load_page, to_json};
use crate::render;

/// Arguments for the table command.
#[derive(Args)]
pub struct TableArgs {
    /// Saved order page (HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Column holding the quantity input (1-based)
    #[arg(long)]
    quantity_column: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: TableArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?.table;
    if let Some(column) = args.quantity_column {
        config.layout.quantity_column = column;
    }

    let extractor = TableRowExtractor::from_config(&config)?;
    let document = load_page(&args.input)?;

    info!("Extracting refund table from {}", args.input.display());
    let snapshot = match extractor.extract(&document) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            if args.format == OutputFormat::Text {
                eprintln!("{}", render::table_error_report(&err));
            }
            return Err(err.into());
        }
    };

    let output = match args.format {
        OutputFormat::Text => render::table_report(&snapshot),
        OutputFormat::Json => to_json(&args.input, &snapshot)?,
        OutputFormat::Csv => rows_csv(&snapshot)?,
    };

    emit(args.output.as_ref(), &output)
}

pub fn rows_csv(snapshot: &TableSnapshot) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in &snapshot.rows {
        wtr.serialize(row)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
