// src/storage/checkpoint.rs

//! Durable pagination checkpoints.
//!
//! The checkpoint file is a JSON object mapping project key to
//! `{ "startAt": n }`, the count of issues already consumed for that
//! project. It is read once at startup and rewritten in full after
//! every successfully processed page, so a crash re-fetches at most
//! one page.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Saved pagination state for one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectCheckpoint {
    /// Count of issues already consumed, in ascending-creation order
    #[serde(default, rename = "startAt")]
    pub start_at: u64,
}

/// Store for per-project pagination offsets.
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    entries: HashMap<String, ProjectCheckpoint>,
}

impl CheckpointStore {
    /// Load the checkpoint file, or start empty if it does not exist.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(Self { path, entries })
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved offset for a project, defaulting to 0.
    pub fn offset(&self, project: &str) -> u64 {
        self.entries
            .get(project)
            .map(|c| c.start_at)
            .unwrap_or_default()
    }

    /// Record a new offset for a project. Offsets never move backwards.
    pub fn advance(&mut self, project: &str, offset: u64) {
        let entry = self.entries.entry(project.to_string()).or_default();
        entry.start_at = entry.start_at.max(offset);
    }

    /// Persist the full mapping atomically (write to temp, then rename).
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
