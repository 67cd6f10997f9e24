//! Filesystem-based checkpoint storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::store::{CheckpointID, CheckpointStore, StoredCheckpoint};

/// Filesystem implementation of CheckpointStore trait.
///
/// Stores checkpoints as JSON files named
/// `checkpoint_{phase}_{timestamp}.json` in a directory. The timestamp sorts
/// lexically, so the newest file for a phase is the greatest file name.
pub struct FilesystemStore {
    dir: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore with the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn latest_file(&self, prefix: &str) -> Result<Option<PathBuf>> {
        let mut latest: Option<(String, PathBuf)> = None;

        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read directory: {}", self.dir.display()))?
        {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().to_string();
            if !filename.starts_with(prefix) || !filename.ends_with(".json") {
                continue;
            }
            if latest.as_ref().map_or(true, |(name, _)| filename > *name) {
                latest = Some((filename, entry.path()));
            }
        }

        Ok(latest.map(|(_, path)| path))
    }
}

#[async_trait]
impl CheckpointStore for FilesystemStore {
    async fn store_checkpoint(&self, id: &CheckpointID, checkpoint_data: String) -> Result<()> {
        ensure_dir(&self.dir)?;

        let created_at = Utc::now();
        let stored = StoredCheckpoint {
            checkpoint_data,
            database_type: id.database_type.clone(),
            phase: id.phase,
            created_at,
        };

        let timestamp = created_at.format("%Y%m%dT%H%M%S%.6fZ");
        let filename = self
            .dir
            .join(format!("checkpoint_{}_{}.json", id.phase, timestamp));

        std::fs::write(&filename, serde_json::to_string_pretty(&stored)?)
            .with_context(|| format!("Failed to write checkpoint: {}", filename.display()))?;
        tracing::info!("Stored checkpoint to {}", filename.display());
        Ok(())
    }

    async fn read_checkpoint(&self, id: &CheckpointID) -> Result<Option<StoredCheckpoint>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let prefix = format!("checkpoint_{}_", id.phase);
        match self.latest_file(&prefix)? {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read checkpoint: {}", path.display()))?;
                let stored: StoredCheckpoint = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid checkpoint file: {}", path.display()))?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create checkpoint directory: {}", dir.display()))
}
