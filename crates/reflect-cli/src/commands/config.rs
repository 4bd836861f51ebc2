//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use reflect_core::store::check_strftime;
use reflect_core::{Config, Placement};

use crate::output::{Output, OutputFormat};

/// Keys accepted by `config set`
const VALID_KEYS: &str = "data_dir, entries_file, date_format, time_format, json_indent, \
                          cli_placement, server_placement, host, port, templates_dir, static_dir";

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "entries_file": config.entries_file,
                    "entries_path": config.entries_path(),
                    "date_format": config.date_format,
                    "time_format": config.time_format,
                    "json_indent": config.json_indent,
                    "cli_placement": config.cli_placement,
                    "server_placement": config.server_placement,
                    "server": {
                        "host": config.server.host,
                        "port": config.server.port,
                        "templates_dir": config.server.templates_dir,
                        "static_dir": config.server.static_dir
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.entries_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!("  entries_file:     {}", config.entries_file);
            println!("  date_format:      {}", config.date_format);
            println!("  time_format:      {}", config.time_format);
            println!("  json_indent:      {}", config.json_indent);
            println!("  cli_placement:    {}", config.cli_placement);
            println!("  server_placement: {}", config.server_placement);
            println!();
            println!("Server:");
            println!("  host:             {}", config.server.host);
            println!("  port:             {}", config.server.port);
            println!("  templates_dir:    {}", config.server.templates_dir.display());
            println!("  static_dir:       {}", config.server.static_dir.display());
            println!();
            println!("Entries file: {}", config.entries_path().display());
            println!("Config file:  {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a single `key = value` change to `config`
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "entries_file" => {
            if value.is_empty() {
                bail!("entries_file cannot be empty");
            }
            config.entries_file = value.to_string();
        }
        "date_format" => {
            check_strftime("date_format", value)?;
            config.date_format = value.to_string();
        }
        "time_format" => {
            check_strftime("time_format", value)?;
            config.time_format = value.to_string();
        }
        "json_indent" => {
            config.json_indent = value
                .parse()
                .context("Invalid value for json_indent. Use a whole number of spaces.")?;
        }
        "cli_placement" => config.cli_placement = parse_placement(value)?,
        "server_placement" => config.server_placement = parse_placement(value)?,
        "host" => config.server.host = value.to_string(),
        "port" => {
            config.server.port = value
                .parse()
                .context("Invalid value for port. Use a number between 0 and 65535.")?;
        }
        "templates_dir" => config.server.templates_dir = value.into(),
        "static_dir" => config.server.static_dir = value.into(),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\nValid keys: {}",
                key,
                VALID_KEYS
            );
        }
    }
    Ok(())
}

fn parse_placement(value: &str) -> Result<Placement> {
    value.parse::<Placement>().map_err(anyhow::Error::msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "entries_file", "journal.json").unwrap();
        apply(&mut config, "cli_placement", "back").unwrap();
        apply(&mut config, "port", "8080").unwrap();
        apply(&mut config, "json_indent", "2").unwrap();

        assert_eq!(config.entries_file, "journal.json");
        assert_eq!(config.cli_placement, Placement::Back);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.json_indent, 2);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply(&mut config, "port", "http").is_err());
        assert!(apply(&mut config, "server_placement", "middle").is_err());
        assert!(apply(&mut config, "entries_file", "").is_err());
        assert!(apply(&mut config, "date_format", "%Q").is_err());
        assert!(apply(&mut config, "time_format", "%H:%").is_err());
        assert_eq!(config.date_format, "%Y-%m-%d");

        let err = apply(&mut config, "colour", "blue").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_set_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let output = Output::new(OutputFormat::Quiet);

        set(
            "date_format".to_string(),
            "%d.%m.%Y".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("date_format = \"%d.%m.%Y\""));
    }
}
