// Export pipeline: busy-flag orchestration, delivery sinks and the HTTP handlers.

pub mod handlers;
pub mod orchestrator;
pub mod sink;

pub use orchestrator::{ExportError, ExportOrchestrator, ExportSummary};
pub use sink::{DownloadSink, FileSink};
