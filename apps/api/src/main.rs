mod config;
mod errors;
mod export;
mod layout;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{DownloadSink, ExportOrchestrator, FileSink};
use crate::layout::{PageGeometry, TextMeasurer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting docexport v{}", env!("CARGO_PKG_VERSION"));

    let geometry = PageGeometry::new(config.page_size, config.margin_mm);
    geometry.validate()?;
    info!(
        "Page geometry: {:?} {:.1}x{:.1}pt, margins {}mm, font {:?}",
        config.page_size, geometry.width, geometry.height, config.margin_mm, config.font_family
    );

    // Export directory doubles as the download store
    let files = Arc::new(FileSink::new(&config.export_dir)?);
    info!("Writing exports to {}", files.dir().display());

    // Glyph widths are cached across exports
    let measurer = Arc::new(TextMeasurer::new());

    let exporter = Arc::new(ExportOrchestrator::new(
        geometry,
        config.font_family,
        measurer,
        Arc::clone(&files) as Arc<dyn DownloadSink>,
    ));

    let state = AppState {
        config: config.clone(),
        exporter,
        files,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
