//! Config command - inspect and edit the probe configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use orderprobe_core::ProbeConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write the default configuration to the config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, addressed by dotted key (e.g. "table.layout.quantity_column")
    Get { key: String },

    /// Change one value; values that are not JSON are stored as strings
    Set { key: String, value: String },

    /// Print where the config file lives
    Path,
}

/// `$ORDERPROBE_CONFIG`, else `<config dir>/orderprobe/config.json`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("ORDERPROBE_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orderprobe")
        .join("config.json")
}

/// The config file every subcommand reads and writes.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// `--config` when given, otherwise the default location.
    fn resolve(config_path: Option<&str>) -> Self {
        let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);
        debug!("Config file {}", path.display());
        Self { path }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    /// File contents, or defaults when there is no file yet.
    fn read(&self) -> anyhow::Result<ProbeConfig> {
        if self.exists() {
            Ok(ProbeConfig::from_file(&self.path)?)
        } else {
            Ok(ProbeConfig::default())
        }
    }

    fn write(&self, config: &ProbeConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        config.save(&self.path)?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile::resolve(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !file.exists() {
                eprintln!(
                    "{} {} does not exist; showing defaults",
                    style("ℹ").blue(),
                    file.path().display()
                );
            }
            println!("{}", serde_json::to_string_pretty(&file.read()?)?);
        }
        ConfigCommand::Init { force } => {
            if file.exists() && !force {
                anyhow::bail!(
                    "{} already exists (pass --force to replace it)",
                    file.path().display()
                );
            }
            file.write(&ProbeConfig::default())?;
            println!("{} Wrote defaults to {}", style("✓").green(), file.path().display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(file.read()?)?;
            println!("{}", serde_json::to_string_pretty(lookup(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let mut json = serde_json::to_value(file.read()?)?;
            assign(&mut json, &key, value.clone())?;
            // Round-trip through the typed config so a wrong value type is rejected.
            let config: ProbeConfig = serde_json::from_value(json)?;
            file.write(&config)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let status = if file.exists() {
                style("exists").green()
            } else {
                style("not created, run 'orderprobe config init'").yellow()
            };
            println!("{} ({})", file.path().display(), status);
        }
    }

    Ok(())
}

fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |node, part| {
        node.get(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))
    })
}

/// Replace an existing leaf. Unknown keys are an error rather than silently added.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let mut node = json;
    for part in parent.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
    }

    match node.get_mut(leaf) {
        Some(slot) if !slot.is_object() => {
            *slot = value;
            Ok(())
        }
        Some(_) => anyhow::bail!("{} is a section; set one of its keys instead", key),
        None => anyhow::bail!("Unknown configuration key: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> Value {
        serde_json::to_value(ProbeConfig::default()).unwrap()
    }

    #[test]
    fn test_assign_nested_key() {
        let mut value = defaults();

        assign(&mut value, "table.layout.quantity_column", json!(8)).unwrap();

        let config: ProbeConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.table.layout.quantity_column, 8);
    }

    #[test]
    fn test_assign_rejects_unknown_key_and_sections() {
        let mut value = defaults();

        assert!(assign(&mut value, "table.layout.qty", json!(8)).is_err());
        assert!(assign(&mut value, "nope.key", json!(1)).is_err());
        assert!(assign(&mut value, "table", json!(1)).is_err());
    }

    #[test]
    fn test_lookup() {
        let value = defaults();

        assert_eq!(lookup(&value, "widget.container_selector").unwrap(), &json!(".widget"));
        assert!(lookup(&value, "widget.missing").is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let file = ConfigFile::resolve(Some("/tmp/elsewhere.json"));
        assert_eq!(file.path(), Path::new("/tmp/elsewhere.json"));
    }
}
