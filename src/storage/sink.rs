// src/storage/sink.rs

//! Append-only JSONL record sinks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::IssueRecord;

/// Destination for normalized records.
#[async_trait]
pub trait RecordSink: Send {
    /// Append one record. A record is only written after full
    /// normalization succeeded; partial records never reach the sink.
    async fn append(&mut self, record: &IssueRecord) -> Result<()>;
}

/// Append-only JSONL file sink, one JSON object per line.
pub struct JsonlSink {
    file: File,
    path: PathBuf,
}

impl JsonlSink {
    /// Open (or create) the sink file in append mode.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { file, path })
    }

    /// The file this sink appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn append(&mut self, record: &IssueRecord) -> Result<()> {
        // serde_json leaves non-ASCII text unescaped.
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}

/// Concatenate source files into one combined file, byte for byte,
/// in the given order.
pub async fn combine_files(sources: &[PathBuf], dest: impl AsRef<Path>) -> Result<()> {
    let mut out = File::create(dest.as_ref()).await?;
    for source in sources {
        let bytes = tokio::fs::read(source).await?;
        out.write_all(&bytes).await?;
    }
    out.flush().await?;
    Ok(())
}
