//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/reflect/config.toml)
//! 3. Environment variables (REFLECT_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::Placement;
use crate::store::{EntryStore, StoreOptions, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};

/// Environment variable prefix
const ENV_PREFIX: &str = "REFLECT";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the entries file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Entries file name, relative to `data_dir` unless absolute
    #[serde(default = "default_entries_file")]
    pub entries_file: String,

    /// strftime pattern for the `date` field of new entries
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// strftime pattern for the `time` field of new entries
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Spaces per indentation level in the entries file
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,

    /// Where the CLI puts new entries
    #[serde(default = "default_cli_placement")]
    pub cli_placement: Placement,

    /// Where the HTTP API puts new entries
    #[serde(default = "default_server_placement")]
    pub server_placement: Placement,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with the page templates (index.html, journal.html, ...)
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            templates_dir: default_templates_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entries_file: default_entries_file(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            json_indent: default_json_indent(),
            cli_placement: default_cli_placement(),
            server_placement: default_server_placement(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (REFLECT_DATA_DIR, REFLECT_ENTRIES_FILE, REFLECT_HOST, ...)
    /// 2. Config file (~/.config/reflect/config.toml or REFLECT_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path (e.g. from `--config`)
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the store can't work with
    pub fn validate(&self) -> Result<()> {
        self.store_options().validate()?;
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_ENTRIES_FILE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.entries_file = val;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_HOST", ENV_PREFIX)) {
            self.server.host = val;
        }

        // An unparseable port keeps the previous value
        if let Ok(val) = std::env::var(format!("{}_PORT", ENV_PREFIX)) {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_TEMPLATES_DIR", ENV_PREFIX)) {
            self.server.templates_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_STATIC_DIR", ENV_PREFIX)) {
            self.server.static_dir = PathBuf::from(val);
        }
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with REFLECT_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reflect")
            .join("config.toml")
    }

    /// Get the path to the entries file
    pub fn entries_path(&self) -> PathBuf {
        // join() replaces the base when entries_file is absolute
        self.data_dir.join(&self.entries_file)
    }

    /// Formatting options for the entry store
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            date_format: self.date_format.clone(),
            time_format: self.time_format.clone(),
            json_indent: self.json_indent,
        }
    }

    /// Build the entry store described by this configuration
    pub fn store(&self) -> EntryStore {
        EntryStore::new(self.entries_path(), self.store_options())
    }

    /// Address the HTTP server binds to, as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reflect")
}

fn default_entries_file() -> String {
    "reflections.json".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_json_indent() -> usize {
    4
}

fn default_cli_placement() -> Placement {
    Placement::Front
}

fn default_server_placement() -> Placement {
    Placement::Back
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "REFLECT_DATA_DIR",
        "REFLECT_ENTRIES_FILE",
        "REFLECT_HOST",
        "REFLECT_PORT",
        "REFLECT_TEMPLATES_DIR",
        "REFLECT_STATIC_DIR",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.ends_with("reflect"));
        assert_eq!(config.entries_file, "reflections.json");
        assert_eq!(config.json_indent, 4);
        assert_eq!(config.cli_placement, Placement::Front);
        assert_eq!(config.server_placement, Placement::Back);
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_entries_path() {
        let mut config = Config::default();
        config.data_dir = PathBuf::from("/data/reflect");
        assert_eq!(
            config.entries_path(),
            PathBuf::from("/data/reflect/reflections.json")
        );

        config.entries_file = "/elsewhere/journal.json".to_string();
        assert_eq!(config.entries_path(), PathBuf::from("/elsewhere/journal.json"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("REFLECT_DATA_DIR", "/tmp/reflect-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/reflect-test"));
    }

    #[test]
    fn test_env_override_port() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("REFLECT_PORT", "8080");
        config.apply_env_overrides();
        assert_eq!(config.server.port, 8080);

        // Garbage is ignored
        env::set_var("REFLECT_PORT", "eighty");
        config.apply_env_overrides();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_env_override_entries_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("REFLECT_ENTRIES_FILE", "journal.json");
        config.apply_env_overrides();
        assert_eq!(config.entries_file, "journal.json");

        // Empty string keeps the current name
        env::set_var("REFLECT_ENTRIES_FILE", "");
        config.apply_env_overrides();
        assert_eq!(config.entries_file, "journal.json");
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        config.data_dir = PathBuf::from("/data/reflect");
        config.cli_placement = Placement::Back;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("cli_placement = \"back\""));
        assert!(toml_str.contains("[server]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.cli_placement, Placement::Back);
        assert_eq!(parsed.server.port, config.server.port);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            date_format = "%x"
            server_placement = "front"

            [server]
            port = 8000
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.date_format, "%x");
        assert_eq!(config.server_placement, Placement::Front);
        assert_eq!(config.server.port, 8000);
        // Unset keys keep their defaults
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.time_format, "%H:%M:%S");
    }

    #[test]
    fn test_load_rejects_bad_date_format() {
        let _guard = EnvGuard::new(ENV_VARS);

        let err = Config::load_from_str(r#"date_format = "%Q""#).unwrap_err();
        assert!(format!("{:#}", err).contains("date_format"));

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "time_format = \"%H:%\"\n").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.entries_file, "reflections.json");
        assert_eq!(config.cli_placement, Placement::Front);
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        config.json_indent = 2;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, temp_dir.path());
        assert_eq!(loaded.json_indent, 2);
    }
}
