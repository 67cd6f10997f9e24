//! Sync configuration for checkpoint operations.

use std::path::PathBuf;

/// Default directory for checkpoint files.
pub const DEFAULT_CHECKPOINT_DIR: &str = ".mysqldump-sync-checkpoints";

/// Controls checkpoint emission and storage location.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Whether to emit checkpoints during a load.
    pub emit_checkpoints: bool,

    /// Directory holding checkpoint files.
    ///
    /// If `None`, checkpoint emission is disabled even if `emit_checkpoints` is `true`.
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            emit_checkpoints: false,
            checkpoint_dir: Some(PathBuf::from(DEFAULT_CHECKPOINT_DIR)),
        }
    }
}

impl SyncConfig {
    /// Config that writes checkpoints into `checkpoint_dir`.
    pub fn with_checkpoints(checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self {
            emit_checkpoints: true,
            checkpoint_dir: Some(checkpoint_dir.into()),
        }
    }

    /// Config that never writes checkpoints.
    pub fn disabled() -> Self {
        Self {
            emit_checkpoints: false,
            checkpoint_dir: None,
        }
    }

    /// Check if checkpoint emission is enabled and configured.
    pub fn should_emit_checkpoints(&self) -> bool {
        self.emit_checkpoints && self.checkpoint_dir.is_some()
    }
}
