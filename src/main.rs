use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::{egui, CreationContext};
use scan_translator::app::ScanTranslator;
use scan_translator::upload::HttpEndpoint;
use scan_translator::Config;
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(io::stderr)
        .init();

    let endpoint = HttpEndpoint::new(&config).context("Failed to set up the HTTP client")?;
    info!("Sending images to {}", endpoint.process_url());
    let server_label = config.server.to_string();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Image Text Extractor",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(ScanTranslator::new(cc, Arc::new(endpoint), server_label))
        }),
    )
    .map_err(|e| anyhow!("Failed to run the window: {}", e))
}
