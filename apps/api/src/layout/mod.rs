// Document composition engine: block model, measurement, wrapping, column
// groups and pagination. Everything here is synchronous and CPU-bound; async
// callers run it inside tokio::task::spawn_blocking.

pub mod blocks;
pub mod columns;
pub mod encoding;
pub mod font_metrics;
pub mod page;
pub mod paginator;
pub mod style;
pub mod wrap;

use thiserror::Error;

// Re-export the public API consumed by the renderer and the export orchestrator.
pub use blocks::Block;
pub use font_metrics::{FontFamily, MeasurementError, TextMeasurer};
pub use page::{Page, PageGeometry, PageSize};
pub use paginator::Paginator;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),
}
