use crate::models::{LogEntry, RunResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors that can occur when persisting results or log lines
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// File-backed sink for the result document and the run log
///
/// Results are replaced whole: the document is written next to the target
/// and renamed over it, so readers see either the old or the new file.
/// The log is only ever appended to.
#[derive(Debug, Clone)]
pub struct ResultStore {
    results_path: PathBuf,
    log_path: PathBuf,
}

impl ResultStore {
    pub fn new(results_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            log_path: log_path.into(),
        }
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Persist the run's result document
    pub async fn write_results(&self, result: &RunResult) -> Result<(), StoreError> {
        self.write_document(result).await
    }

    /// Pretty-print any document to the results path, all or nothing
    pub async fn write_document<T>(&self, document: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let mut bytes = serde_json::to_vec_pretty(document)?;
        bytes.push(b'\n');

        if let Some(parent) = self.results_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp_path = temp_path_for(&self.results_path);
        let written = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&tmp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.results_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&self.results_path, e));
        }

        tracing::debug!("Wrote {} bytes to {:?}", bytes.len(), self.results_path);
        Ok(())
    }

    /// Append one rendered entry to the log file, creating it if needed
    pub async fn append_log(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let mut line = entry.render();
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .map_err(|e| StoreError::io(&self.log_path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.log_path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io(&self.log_path, e))
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "results".into());
    name.push(".tmp");
    path.with_file_name(name)
}
