//! Country command - look up the shipping country code on a saved page.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use orderprobe_core::FieldLocator;

use super::{OutputFormat, emit, load_config, load_page, to_json};
use crate::render;

/// Arguments for the country command.
#[derive(Args)]
pub struct CountryArgs {
    /// Saved order page (HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Override the structural path to the country cell
    #[arg(short, long)]
    path: Option<String>,

    /// CSS selector tried when the path misses
    #[arg(long)]
    css: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: CountryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?.field;
    if let Some(path) = args.path {
        config.primary_path = path;
    }
    if let Some(css) = args.css {
        config.css_fallback = Some(css);
    }

    let locator = FieldLocator::from_config(&config)?;
    let document = load_page(&args.input)?;

    info!("Looking up country in {}", args.input.display());
    let result = locator.locate(&document);

    let output = match args.format {
        OutputFormat::Text => render::country_report(&result, &config.primary_path),
        OutputFormat::Json => to_json(&args.input, &result)?,
        OutputFormat::Csv => anyhow::bail!("CSV output is only available for table rows"),
    };

    emit(args.output.as_ref(), &output)
}
