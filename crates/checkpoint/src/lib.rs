//! Checkpoint management for mysqldump-sync
//!
//! Provides storage-agnostic checkpoint handling with support for
//! source-specific checkpoint types.
//!
//! # Architecture
//!
//! - The `Checkpoint` trait is implemented by each source-specific checkpoint
//!   type (for example the binlog coordinate captured from a dump)
//! - `CheckpointFile` is the typed, self-describing view of a stored checkpoint
//! - `SyncManager` saves and loads checkpoints through a `CheckpointStore`
//! - `FilesystemStore` is the on-disk `CheckpointStore`, one JSON file per checkpoint

mod config;
mod file;
mod filesystem;
mod manager;
mod phase;
pub mod store;


pub use config::{SyncConfig, DEFAULT_CHECKPOINT_DIR};
pub use file::CheckpointFile;
pub use filesystem::FilesystemStore;
pub use manager::SyncManager;
pub use phase::SyncPhase;
pub use store::{CheckpointID, CheckpointStore, StoredCheckpoint};

/// Trait that source-specific checkpoints must implement.
///
/// # Example
///
/// ```rust
/// use checkpoint::Checkpoint;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct OffsetCheckpoint {
///     pub offset: u64,
/// }
///
/// impl Checkpoint for OffsetCheckpoint {
///     const DATABASE_TYPE: &'static str = "offset";
///
///     fn to_cli_string(&self) -> String {
///         self.offset.to_string()
///     }
///
///     fn from_cli_string(s: &str) -> anyhow::Result<Self> {
///         Ok(Self { offset: s.parse()? })
///     }
/// }
/// ```
pub trait Checkpoint: serde::Serialize + for<'de> serde::Deserialize<'de> + Clone {
    /// Source type identifier (e.g., "mysql-binlog").
    ///
    /// Stored alongside the checkpoint data and validated when loading.
    const DATABASE_TYPE: &'static str;

    /// Convert to CLI-friendly string format.
    ///
    /// The returned string should be parseable by `from_cli_string()`.
    fn to_cli_string(&self) -> String;

    /// Parse from CLI string format.
    fn from_cli_string(s: &str) -> anyhow::Result<Self>
    where
        Self: Sized;
}
