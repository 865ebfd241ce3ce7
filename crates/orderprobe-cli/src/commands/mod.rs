//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod country;
pub mod find;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use serde::Serialize;
use tracing::debug;

use orderprobe_core::{Html, OrderPageProbe, ProbeConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text diagnostic report
    Text,
    /// JSON output
    Json,
    /// CSV output (table rows only)
    Csv,
}

/// JSON wrapper naming the page a result came from.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    source: String,
    generated_at: String,
    result: &'a T,
}

pub fn to_json<T: Serialize>(source: &Path, result: &T) -> anyhow::Result<String> {
    let envelope = Envelope {
        source: source.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        result,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Load configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ProbeConfig> {
    if let Some(path) = config_path {
        return Ok(ProbeConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        Ok(ProbeConfig::from_file(&default_path)?)
    } else {
        Ok(ProbeConfig::default())
    }
}

/// Read and parse a saved page, with a readable error for missing files.
pub fn load_page(input: &Path) -> anyhow::Result<Html> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(OrderPageProbe::load(input)?)
}

/// Write to `output` when given, otherwise print.
pub fn emit(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}
