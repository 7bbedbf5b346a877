use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kiwi::config::{Config, LogConfig};
use kiwi::{Registry, Store};

/// Build a kiwi store from a schema and move its contents through JSON
#[derive(Debug, Parser)]
#[command(name = "kiwi", version)]
struct Args {
  /// TOML configuration file
  #[arg(short, long)]
  config: Option<String>,

  /// JSON document to import into the store
  #[arg(short, long)]
  import: Option<String>,

  /// Print the store as JSON
  #[arg(short, long)]
  export: bool,
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log.level.as_str()));

  match &log.file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
    }
  }

  Ok(())
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let config = match &args.config {
    Some(path) => Config::from_file(path)?,
    None => Config::default(),
  };
  init_logging(&config.log)?;

  info!("Starting kiwi");

  let registry = Registry::shared();
  config.validate(&registry).context("Invalid schema")?;
  let store = Store::from_schema_with_registry(&config.schema, registry)
    .context("Failed to build store from schema")?;
  info!(keys = store.len(), "store ready");

  if let Some(path) = &args.import {
    let data = fs::read(path).with_context(|| format!("Failed to read '{}'", path))?;
    store
      .import(&data, config.import)
      .with_context(|| format!("Failed to import '{}'", path))?;
    info!(path = path.as_str(), keys = store.len(), "imported document");
  }

  if args.export || args.import.is_some() {
    let json = store.export().context("Failed to export store")?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&json)?;
    writeln!(stdout)?;
  }

  Ok(())
}
