use std::sync::Arc;

use crate::config::Config;
use crate::export::{ExportOrchestrator, FileSink};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// One orchestrator for the whole service, so its busy flag serialises every export.
    pub exporter: Arc<ExportOrchestrator>,
    /// Same directory the orchestrator delivers into; used to serve downloads.
    pub files: Arc<FileSink>,
}
