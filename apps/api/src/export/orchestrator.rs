//! Export orchestration: one export at a time per orchestrator.
//!
//! # Flow
//! 1. Claim the busy flag (reject with `Busy` if already held).
//! 2. Paginate and render on the blocking pool; the whole PDF is assembled in memory.
//! 3. Hand the finished bytes to the download sink.
//!
//! The flag is released by a guard on every exit path, including when the
//! caller drops the export future mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::export::sink::{DownloadSink, ExportArtifact};
use crate::layout::{
    Block, FontFamily, LayoutError, MeasurementError, Page, PageGeometry, Paginator, TextMeasurer,
};
use crate::render::{render_pdf, RenderError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("an export is already in progress")]
    Busy,

    #[error(transparent)]
    Measurement(MeasurementError),

    #[error("export failed: {0:#}")]
    Failed(#[source] anyhow::Error),
}

impl From<LayoutError> for ExportError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::Measurement(m) => ExportError::Measurement(m),
            other => ExportError::Failed(anyhow::Error::new(other).context("pagination failed")),
        }
    }
}

impl From<RenderError> for ExportError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Measurement(m) => ExportError::Measurement(m),
            other => ExportError::Failed(anyhow::Error::new(other).context("rendering failed")),
        }
    }
}

/// Result of a completed export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub export_id: Uuid,
    pub filename: String,
    pub page_count: usize,
    pub byte_len: usize,
    pub finished_at: DateTime<Utc>,
}

/// Holds the busy flag for the lifetime of one export.
struct ExportGuard<'a>(&'a AtomicBool);

impl<'a> ExportGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard(flag))
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ExportOrchestrator {
    geometry: PageGeometry,
    family: FontFamily,
    measurer: Arc<TextMeasurer>,
    sink: Arc<dyn DownloadSink>,
    exporting: AtomicBool,
}

impl ExportOrchestrator {
    pub fn new(
        geometry: PageGeometry,
        family: FontFamily,
        measurer: Arc<TextMeasurer>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            geometry,
            family,
            measurer,
            sink,
            exporting: AtomicBool::new(false),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Lays out and renders `blocks`, then delivers the PDF as `filename`.
    ///
    /// Returns `Busy` immediately, without touching the in-flight export, when
    /// another export holds the flag.
    pub async fn export(
        &self,
        blocks: Vec<Block>,
        filename: &str,
    ) -> Result<ExportSummary, ExportError> {
        let _guard = ExportGuard::acquire(&self.exporting).ok_or(ExportError::Busy)?;
        let export_id = Uuid::new_v4();
        info!(
            export_id = %export_id,
            filename,
            blocks = blocks.len(),
            "Export started"
        );

        match self.run(blocks, filename).await {
            Ok((page_count, byte_len)) => {
                info!(
                    export_id = %export_id,
                    filename,
                    pages = page_count,
                    bytes = byte_len,
                    cached_glyphs = self.measurer.cached_glyphs(),
                    "Export finished"
                );
                Ok(ExportSummary {
                    export_id,
                    filename: filename.to_string(),
                    page_count,
                    byte_len,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                warn!(export_id = %export_id, filename, error = %e, "Export aborted");
                Err(e)
            }
        }
    }

    async fn run(&self, blocks: Vec<Block>, filename: &str) -> Result<(usize, usize), ExportError> {
        let geometry = self.geometry;
        let family = self.family;
        let measurer = Arc::clone(&self.measurer);
        let title = filename.trim_end_matches(".pdf").to_string();

        let (page_count, bytes) = tokio::task::spawn_blocking(move || {
            compose(&blocks, geometry, family, &measurer, &title)
        })
        .await
        .map_err(|e| ExportError::Failed(anyhow!("layout task failed: {e}")))??;

        let byte_len = bytes.len();
        self.sink
            .deliver(ExportArtifact {
                filename: filename.to_string(),
                bytes,
            })
            .await
            .context("delivering the document failed")
            .map_err(ExportError::Failed)?;

        Ok((page_count, byte_len))
    }

    /// Paginates without rendering or delivering. Does not take the busy flag.
    pub async fn layout(&self, blocks: Vec<Block>) -> Result<Vec<Page>, ExportError> {
        let geometry = self.geometry;
        let family = self.family;
        let measurer = Arc::clone(&self.measurer);
        let pages = tokio::task::spawn_blocking(move || {
            Paginator::new(geometry, family, &measurer).paginate(&blocks)
        })
        .await
        .map_err(|e| ExportError::Failed(anyhow!("layout task failed: {e}")))??;
        Ok(pages)
    }
}

fn compose(
    blocks: &[Block],
    geometry: PageGeometry,
    family: FontFamily,
    measurer: &TextMeasurer,
    title: &str,
) -> Result<(usize, Vec<u8>), ExportError> {
    let pages = Paginator::new(geometry, family, measurer).paginate(blocks)?;
    let bytes = render_pdf(&pages, geometry, family, measurer, title)?;
    Ok((pages.len(), bytes))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sink::{FileSink, SinkError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Records deliveries; optionally blocks until released.
    #[derive(Default)]
    struct TestSink {
        delivered: Mutex<Vec<ExportArtifact>>,
        entered: Notify,
        release: Option<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl DownloadSink for TestSink {
        async fn deliver(&self, artifact: ExportArtifact) -> Result<(), SinkError> {
            self.entered.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }
            if self.fail {
                return Err(SinkError::Task("disk full".to_string()));
            }
            self.delivered.lock().unwrap().push(artifact);
            Ok(())
        }
    }

    fn orchestrator(sink: Arc<TestSink>) -> ExportOrchestrator {
        ExportOrchestrator::new(
            PageGeometry::default(),
            FontFamily::Helvetica,
            Arc::new(TextMeasurer::new()),
            sink,
        )
    }

    fn cv() -> Vec<Block> {
        vec![
            Block::title("MARIA SOUZA"),
            Block::heading("SUMÁRIO"),
            Block::paragraph("Analista de dados com foco em varejo."),
            Block::heading("EXPERIÊNCIAS"),
            Block::subheading("Empresa X — Analista"),
            Block::bullet("Aumentei vendas em 20%"),
        ]
    }

    #[tokio::test]
    async fn test_export_delivers_complete_pdf() {
        let sink = Arc::new(TestSink::default());
        let exporter = orchestrator(Arc::clone(&sink));

        let summary = exporter.export(cv(), "curriculo-maria.pdf").await.unwrap();
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.filename, "curriculo-maria.pdf");
        assert!(!exporter.is_exporting());

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].filename, "curriculo-maria.pdf");
        assert_eq!(delivered[0].bytes.len(), summary.byte_len);
        assert!(delivered[0].bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_second_export_while_busy_is_rejected() {
        let sink = Arc::new(TestSink {
            release: Some(Notify::new()),
            ..Default::default()
        });
        let exporter = Arc::new(orchestrator(Arc::clone(&sink)));

        let first = {
            let exporter = Arc::clone(&exporter);
            tokio::spawn(async move { exporter.export(cv(), "primeiro.pdf").await })
        };
        sink.entered.notified().await;
        assert!(exporter.is_exporting());

        let second = exporter.export(cv(), "segundo.pdf").await;
        assert!(matches!(second, Err(ExportError::Busy)));

        sink.release.as_ref().unwrap().notify_one();
        let summary = first.await.unwrap().unwrap();
        assert_eq!(summary.filename, "primeiro.pdf");
        assert!(!exporter.is_exporting());

        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].filename, "primeiro.pdf");
    }

    #[tokio::test]
    async fn test_measurement_failure_aborts_and_resets_flag() {
        let sink = Arc::new(TestSink::default());
        let exporter = orchestrator(Arc::clone(&sink));

        let mut blocks = cv();
        blocks.push(Block::bullet("Liderei o lançamento 🚀"));
        let err = exporter.export(blocks, "cv.pdf").await.unwrap_err();
        assert!(matches!(err, ExportError::Measurement(MeasurementError::UnsupportedGlyph { .. })));
        assert!(!exporter.is_exporting());
        assert!(sink.delivered.lock().unwrap().is_empty());

        // The orchestrator is usable again afterwards.
        assert!(exporter.export(cv(), "cv.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn test_sink_failure_surfaces_as_failed_with_cause() {
        let sink = Arc::new(TestSink {
            fail: true,
            ..Default::default()
        });
        let exporter = orchestrator(sink);
        let err = exporter.export(cv(), "cv.pdf").await.unwrap_err();
        match err {
            ExportError::Failed(cause) => assert!(format!("{cause:#}").contains("disk full")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(!exporter.is_exporting());
    }

    #[tokio::test]
    async fn test_invalid_geometry_is_failed() {
        let sink = Arc::new(TestSink::default());
        let exporter = ExportOrchestrator::new(
            PageGeometry::new(crate::layout::PageSize::Letter, 150.0),
            FontFamily::Helvetica,
            Arc::new(TextMeasurer::new()),
            sink,
        );
        let err = exporter.export(cv(), "cv.pdf").await.unwrap_err();
        assert!(matches!(err, ExportError::Failed(_)));
    }

    #[tokio::test]
    async fn test_dropped_export_releases_flag() {
        let sink = Arc::new(TestSink {
            release: Some(Notify::new()),
            ..Default::default()
        });
        let exporter = Arc::new(orchestrator(Arc::clone(&sink)));
        let handle = {
            let exporter = Arc::clone(&exporter);
            tokio::spawn(async move { exporter.export(cv(), "cv.pdf").await })
        };
        sink.entered.notified().await;
        assert!(exporter.is_exporting());

        handle.abort();
        let _ = handle.await;
        assert!(!exporter.is_exporting());
    }

    #[tokio::test]
    async fn test_layout_is_deterministic_and_ignores_busy_flag() {
        let sink = Arc::new(TestSink::default());
        let exporter = orchestrator(sink);
        let a = exporter.layout(cv()).await.unwrap();
        let b = exporter.layout(cv()).await.unwrap();
        assert_eq!(a, b);
        assert!(!exporter.is_exporting());
    }

    #[tokio::test]
    async fn test_export_to_file_sink_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FileSink::new(dir.path()).unwrap());
        let exporter = ExportOrchestrator::new(
            PageGeometry::default(),
            FontFamily::Helvetica,
            Arc::new(TextMeasurer::new()),
            Arc::clone(&sink) as Arc<dyn DownloadSink>,
        );
        exporter.export(cv(), "curriculo.pdf").await.unwrap();

        let bytes = sink.read("curriculo.pdf").await.unwrap().unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(text.contains("MARIA SOUZA"));
    }
}
