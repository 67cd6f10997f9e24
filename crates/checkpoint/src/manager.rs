//! Generic sync manager for checkpoint operations.

use std::sync::Arc;

use crate::{
    store::CheckpointStore, Checkpoint, CheckpointFile, CheckpointID, FilesystemStore, SyncConfig,
    SyncPhase,
};

/// Saves and loads checkpoints for a load run.
///
/// # Example
///
/// ```rust,ignore
/// use checkpoint::{SyncConfig, SyncManager, SyncPhase};
///
/// let manager = SyncManager::new(SyncConfig::with_checkpoints("/tmp/checkpoints"));
///
/// manager.emit_checkpoint(&binlog_checkpoint, SyncPhase::BinlogCaptured).await?;
///
/// let loaded: BinlogCheckpoint = manager.read_checkpoint(SyncPhase::BinlogCaptured).await?;
/// ```
pub struct SyncManager {
    config: SyncConfig,
    store: Option<Arc<dyn CheckpointStore>>,
}

impl SyncManager {
    /// Create a manager backed by a [`FilesystemStore`] in `config.checkpoint_dir`.
    pub fn new(config: SyncConfig) -> Self {
        let store = config
            .checkpoint_dir
            .as_ref()
            .map(|dir| Arc::new(FilesystemStore::new(dir.clone())) as Arc<dyn CheckpointStore>);
        Self { config, store }
    }

    /// Create a manager backed by an arbitrary store.
    pub fn with_store(config: SyncConfig, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            config,
            store: Some(store),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Emit checkpoint for any source-specific checkpoint type.
    ///
    /// Does nothing when checkpoint emission is disabled.
    pub async fn emit_checkpoint<C: Checkpoint>(
        &self,
        checkpoint: &C,
        phase: SyncPhase,
    ) -> anyhow::Result<()> {
        if !self.config.emit_checkpoints {
            return Ok(());
        }

        let store = self.store.as_ref().ok_or_else(|| {
            anyhow::anyhow!("No checkpoint directory configured (checkpoint storage is disabled)")
        })?;

        let id = CheckpointID {
            database_type: C::DATABASE_TYPE.to_string(),
            phase,
        };
        store
            .store_checkpoint(&id, serde_json::to_string(checkpoint)?)
            .await?;

        tracing::info!("Emitted {phase} checkpoint: {}", checkpoint.to_cli_string());
        Ok(())
    }

    /// Read the latest checkpoint of type `C` recorded for `phase`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No checkpoint storage is configured
    /// - No checkpoint was recorded for the phase
    /// - The stored checkpoint belongs to a different source type
    pub async fn read_checkpoint<C: Checkpoint>(&self, phase: SyncPhase) -> anyhow::Result<C> {
        self.read_checkpoint_file::<C>(phase).await?.parse::<C>()
    }

    /// Read the latest [`CheckpointFile`] of type `C` recorded for `phase`.
    pub async fn read_checkpoint_file<C: Checkpoint>(
        &self,
        phase: SyncPhase,
    ) -> anyhow::Result<CheckpointFile> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Checkpoint storage not configured"))?;

        let id = CheckpointID {
            database_type: C::DATABASE_TYPE.to_string(),
            phase,
        };
        let stored = store
            .read_checkpoint(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("No checkpoint found for phase: {phase}"))?;

        CheckpointFile::try_from(stored)
    }
}
