//! image-recognizer - Cloud OCR and image classification client
//!
//! Sends a local image to the cloud recognition service and prints the
//! parsed result for the selected document or image category.

mod config;
mod recognition;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use crate::recognition::{Category, RecognizerManager};

/// image-recognizer - recognize cards, licenses, plants, cars and logos
#[derive(Parser, Debug)]
#[command(name = "image-recognizer")]
#[command(about = "Send an image to the cloud recognition service and print the parsed result")]
struct Args {
    /// Image file to recognize (JPEG, PNG, BMP or WebP)
    #[arg(required_unless_present_any = ["list_categories", "init_config"])]
    image: Option<PathBuf>,

    /// Category name or index (see --list-categories)
    #[arg(short, long, default_value = "bank-card")]
    category: String,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Also write the result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the result
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.list_categories {
        println!("Available categories:");
        for category in Category::ALL {
            println!(
                "  [{:>2}] {:<17} {}",
                category.index(),
                category.name(),
                category.display_name()
            );
        }
        return Ok(());
    }

    let config_path = match args.config {
        Some(path) => path,
        None => storage::default_config_path()?,
    };

    if args.init_config {
        init_config(&config_path)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let mut config = load_or_default_config(&config_path);
    config.apply_env_overrides();

    let image = args
        .image
        .context("No image given; pass an image path or --list-categories")?;

    let manager = RecognizerManager::new(&config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let text = runtime.block_on(manager.recognize_selector(&image, &args.category))?;
    println!("{}", text);

    if let Some(output) = args.output {
        write_result(&output, &text)?;
    }

    Ok(())
}

/// Write a default configuration file, refusing to overwrite an existing one
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration file {:?} already exists", path);
    }
    config::save_config(&AppConfig::default(), path)
}

/// Save the recognition result next to the printed copy
fn write_result(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write result to {:?}", path))?;
    info!("Result written to {:?}", path);
    Ok(())
}

/// Load configuration from file or fall back to defaults
fn load_or_default_config(path: &Path) -> AppConfig {
    if path.exists() {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Ignoring unreadable configuration {:?}: {}", path, e),
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
