use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::schema::Schema;
use crate::store::ImportOptions;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Kiwi configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,

  /// Keys created when the store starts
  #[serde(default)]
  pub schema: Schema,

  /// How imported documents are reconciled with the schema
  #[serde(default)]
  pub import: ImportOptions,
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> anyhow::Result<Self> {
    let config_str = fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file '{}'", path))?;

    let config: Config = toml::from_str(&config_str)
      .with_context(|| format!("Failed to parse config file '{}'", path))?;

    Ok(config)
  }

  /// Check that every schema entry names a type known to `registry`
  pub fn validate(&self, registry: &Registry) -> Result<()> {
    match self
      .schema
      .iter()
      .find(|(_, type_name)| !registry.contains(type_name))
    {
      Some((_, type_name)) => Err(Error::TypeNotRegistered(type_name.to_string())),
      None => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_default_config() {
    let config_str = r#"
[log]
level = "debug"

[schema]
greeting = "str"
queue = "list"

[import]
add_keys = true
"#;

    let config: Config = toml::from_str(config_str).unwrap();
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.file, None);
    assert_eq!(config.schema.get("queue"), Some("list"));
    assert!(config.import.add_keys);
    assert!(!config.import.update_types);
    assert!(config.validate(&Registry::with_builtins()).is_ok());
  }

  #[test]
  fn test_empty_config() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.log.level, "info");
  }

  #[test]
  fn test_unregistered_type() {
    let config: Config = toml::from_str("[schema]\nx = \"str\"\ny = \"tree\"\n").unwrap();
    assert!(matches!(
      config.validate(&Registry::with_builtins()),
      Err(Error::TypeNotRegistered(name)) if name == "tree"
    ));
  }

  #[test]
  fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[log]\nfile = \"/tmp/kiwi.log\"\n\n[schema]\nz = \"zset\"").unwrap();

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.log.file.as_deref(), Some("/tmp/kiwi.log"));
    assert_eq!(config.schema.get("z"), Some("zset"));

    assert!(Config::from_file("/nonexistent/kiwi.toml").is_err());
  }
}
