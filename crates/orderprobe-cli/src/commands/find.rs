//! Find command - locate a card's row in the refund form table, or its
//! order widget when a set or condition is given.

use std::path::PathBuf;

use clap::Args;
use console::style;

use orderprobe_core::{CardQuery, Html, OrderPageProbe, ProbeError};

use super::{OutputFormat, emit, load_config, load_page, to_json};
use crate::render;

/// Arguments for the find command.
#[derive(Args)]
pub struct FindArgs {
    /// Saved order page (HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Card name (case-insensitive substring)
    #[arg(long, required = true)]
    card: String,

    /// Set name; matches the order widget instead of a table row
    #[arg(long)]
    set: Option<String>,

    /// Condition, abbreviated (NM, LPF, DMH, ...) or spelled out; matches the order widget
    #[arg(long)]
    condition: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: FindArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let probe = OrderPageProbe::new(&config)?;
    let document = load_page(&args.input)?;

    if args.format == OutputFormat::Csv {
        anyhow::bail!("CSV output is only available for the table command");
    }

    if args.set.is_some() || args.condition.is_some() {
        find_widget(&args, &probe, &document)
    } else {
        find_row(&args, &probe, &document)
    }
}

fn find_widget(args: &FindArgs, probe: &OrderPageProbe, document: &Html) -> anyhow::Result<()> {
    let query = CardQuery::new(&args.card)
        .with_set(args.set.clone().unwrap_or_default())
        .with_condition(args.condition.clone().unwrap_or_default());
    let found = probe.find_widget(document, &query);

    if args.format == OutputFormat::Json {
        return emit(None, &to_json(&args.input, &found)?);
    }

    let report = render::widget_report(&query, found.as_ref());
    if found.is_none() {
        eprintln!("{}", report);
        anyhow::bail!("Card \"{}\" not found in any widget", args.card);
    }
    emit(None, &report)
}

fn find_row(args: &FindArgs, probe: &OrderPageProbe, document: &Html) -> anyhow::Result<()> {
    let row = match probe.find_row(document, &args.card) {
        Ok(row) => row,
        Err(ProbeError::Table(err)) => {
            if args.format == OutputFormat::Text {
                eprintln!("{}", render::table_error_report(&err));
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let output = match (args.format, &row) {
        (OutputFormat::Text, Some(row)) => format!(
            "{} Found card in row {}\n{}",
            style("✓").green(),
            row.position,
            render::row_report(row).trim_end()
        ),
        (OutputFormat::Text, None) => {
            anyhow::bail!("Card \"{}\" not found in table", args.card)
        }
        _ => to_json(&args.input, &row)?,
    };

    emit(None, &output)
}
