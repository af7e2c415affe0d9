mod app;

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use heroic_import_core::config::AppConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Import Heroic launcher library exports into a SQL `games` table.
#[derive(Parser, Debug)]
#[command(name = "heroic-import", version)]
struct Cli {
    /// Config file to use instead of searching parent directories.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `*_library.json` files, overriding `library_path`.
    #[arg(short, long)]
    library_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let library_dir = match cli.library_dir {
        Some(dir) => dir,
        None => config.library_dir()?,
    };

    app::run(&config, &library_dir).await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("heroic-import.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
