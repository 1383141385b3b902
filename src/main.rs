//! Binary entry point: CLI, logging, self-update, then the window.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use yt_queue::app::DownloaderApp;
use yt_queue::config::Settings;
use yt_queue::{assets, updater};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file to use instead of the per-user one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start without upgrading the downloader or pulling the app
    #[arg(long)]
    skip_update: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Program entry point: updates, then launches the GUI
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    debug!(?args, "CLI arguments parsed");

    let settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;

    if args.skip_update {
        info!("self-update skipped");
    } else {
        let steps = updater::plan(&settings.update);
        let rt = Runtime::new().context("failed to start async runtime")?;
        rt.block_on(updater::run(&steps));
    }

    let icon = match assets::load_icon(assets::APP_ICON) {
        Ok(icon) => Some(icon),
        Err(error) => {
            warn!(%error, "running without app icon");
            None
        }
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(settings.window.title.clone())
        .with_inner_size([settings.window.width, settings.window.height]);
    if let Some(icon) = icon.clone() {
        viewport = viewport.with_icon(egui::IconData::from(icon));
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    info!("starting window");
    let title = settings.window.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(DownloaderApp::new(cc, &settings, icon.as_ref()))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}

fn init_logging(args: &Args) {
    // RUST_LOG wins over the flags
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
