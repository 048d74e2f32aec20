//! Codeshare - plain-text and code sharing editor
//!
//! Documents live in a remote store keyed by a short random id. Edits are
//! saved automatically after a short pause and anyone with the link can
//! open the same document.

mod app;
mod cli;
mod core;
mod session;
mod store;
mod ui;

use app::CodeshareApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(level)
        .init();

    tracing::info!("Starting Codeshare...");

    let mut config = crate::core::config::AppConfig::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load config, using defaults: {:#}", e);
        crate::core::config::AppConfig::default()
    });
    config.apply_env();
    config.apply_overrides(cli.api_url.clone(), cli.share_url.clone());

    let start = cli.start_document();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Codeshare"),
        ..Default::default()
    };

    eframe::run_native(
        "Codeshare",
        native_options,
        Box::new(|cc| Ok(Box::new(CodeshareApp::new(cc, config, start)?))),
    )
}
