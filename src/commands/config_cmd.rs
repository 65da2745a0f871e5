use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::output::OutputFormat;
use crate::config::{Config, ConfigSource};

const TEMPLATE: &str = "\
# Pantry configuration
#
# reject | other
unknown_category: reject
top_expiring_limit: 5
scan_delay_ms: 2000
recipe_delay_ms: 1500
collaborator_timeout_secs: 10
# Relative paths resolve against this file's directory
# seed_file: pantry.yaml
# recipe_catalog: recipes.yaml
";

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write a commented config file with the default values
    Init {
        /// Where to write it (defaults to the standard config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print!("{}", format_config(config)),
                }
                Ok(())
            }
            ConfigSubcommand::Init { path, force } => {
                let path = path.clone().unwrap_or_else(Config::default_config_path);
                write_template(&path, *force)?;
                println!("Wrote {}", path.display());
                Ok(())
            }
        }
    }
}

fn format_config(config: &Config) -> String {
    let mut out = String::from("Configuration\n=============\n\n");

    match &config.config_file {
        Some(path) => out.push_str(&format!("Config file: {}\n\n", path.display())),
        None => out.push_str(&format!(
            "Config file: {} (not found)\n\n",
            Config::default_config_path().display()
        )),
    }

    let optional_path = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    let rows: [(&str, String, &ConfigSource); 7] = [
        (
            "unknown_category",
            config.unknown_category.value.to_string(),
            &config.unknown_category.source,
        ),
        (
            "top_expiring_limit",
            config.top_expiring_limit.value.to_string(),
            &config.top_expiring_limit.source,
        ),
        (
            "scan_delay_ms",
            config.scan_delay_ms.value.to_string(),
            &config.scan_delay_ms.source,
        ),
        (
            "recipe_delay_ms",
            config.recipe_delay_ms.value.to_string(),
            &config.recipe_delay_ms.source,
        ),
        (
            "collaborator_timeout_secs",
            config.collaborator_timeout_secs.value.to_string(),
            &config.collaborator_timeout_secs.source,
        ),
        (
            "seed_file",
            optional_path(&config.seed_file.value),
            &config.seed_file.source,
        ),
        (
            "recipe_catalog",
            optional_path(&config.recipe_catalog.value),
            &config.recipe_catalog.source,
        ),
    ];

    for (name, value, source) in rows {
        out.push_str(&format!("{}: {}\n  source: {}\n", name, value, source));
    }
    out
}

fn write_template(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to replace it)", path.display()).into());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, TEMPLATE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_config_lists_sources() {
        let text = format_config(&Config::default());
        assert!(text.contains("unknown_category: reject\n  source: default"));
        assert!(text.contains("seed_file: (none)"));
        assert!(text.contains("(not found)"));
    }

    #[test]
    fn test_template_loads_as_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");
        write_template(&path, false).unwrap();

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.config_file, Some(path.clone()));
        assert_eq!(config.top_expiring_limit.value, 5);
        assert_eq!(config.top_expiring_limit.source, ConfigSource::File);
        assert_eq!(config.seed_file.value, None);

        assert!(write_template(&path, false).is_err());
        assert!(write_template(&path, true).is_ok());
    }
}
