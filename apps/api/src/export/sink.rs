//! Delivery of finished documents.
//!
//! A sink receives the complete artifact in one call, after all layout and
//! rendering is done. `FileSink` writes through a temp file in the target
//! directory and renames it into place, so readers never see a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;

/// A fully assembled document ready for delivery.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("delivery task failed: {0}")]
    Task(String),
}

/// Terminal, asynchronous step of an export.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, artifact: ExportArtifact) -> Result<(), SinkError>;
}

// ────────────────────────────────────────────────────────────────────────────
// FileSink
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates the export directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| SinkError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads a delivered document. `Ok(None)` when no such file exists.
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, SinkError> {
        let path = self.dir.join(filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SinkError::Io { path, source }),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError {
    let path = path.to_path_buf();
    move |source| SinkError::Io { path, source }
}

fn write_atomically(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, SinkError> {
    let target = dir.join(&artifact.filename);

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    tmp.write_all(&artifact.bytes).map_err(io_error(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_error(tmp.path()))?;
    tmp.persist(&target)
        .map_err(|e| io_error(&target)(e.error))?;
    Ok(target)
}

#[async_trait]
impl DownloadSink for FileSink {
    async fn deliver(&self, artifact: ExportArtifact) -> Result<(), SinkError> {
        let dir = self.dir.clone();
        let size = artifact.bytes.len();
        let path = tokio::task::spawn_blocking(move || write_atomically(&dir, &artifact))
            .await
            .map_err(|e| SinkError::Task(e.to_string()))??;
        tracing::debug!(path = %path.display(), bytes = size, "Document written");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
