//! mysqldump-sync Library
//!
//! Replays the output of `mysqldump --master-data --skip-extended-insert`
//! as row events and records the dump's binlog coordinate so replication
//! can resume from it after the load.
//!
//! # Crates
//!
//! - `mysqldump_source` - streaming dump parser and the `DumpHandler` interface
//! - `checkpoint` - checkpoint types and storage
//!
//! # CLI Usage
//!
//! ```bash
//! # Replay rows into a JSON Lines file and record the binlog coordinate
//! mysqldump-sync import dump.sql --output rows.jsonl --emit-checkpoints
//!
//! # Only some tables, reading the dump from stdin
//! mysqldump -h db --master-data app | mysqldump-sync import - --tables users,orders
//!
//! # Print the recorded coordinate
//! mysqldump-sync checkpoint --checkpoint-dir .mysqldump-sync-checkpoints
//! ```

use std::path::PathBuf;

use clap::Args;

pub mod filter;
pub mod import;
pub mod sink;

pub use filter::TableFilter;
pub use import::{import, inspect, read_binlog_checkpoint, ImportConfig};
pub use sink::{ImportStats, JsonlSink, SinkError};

/// Row selection and output options
#[derive(Args, Clone, Debug)]
pub struct OutputOpts {
    /// JSON Lines output file (defaults to stdout)
    #[arg(long, short, env = "MYSQLDUMP_SYNC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Only import rows from these schemas (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub schemas: Vec<String>,

    /// Only import rows from these tables, as `table` or `schema.table` (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Dry run mode - parse and count rows without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Checkpoint options
#[derive(Args, Clone, Debug)]
pub struct CheckpointOpts {
    /// Record the dump's binlog coordinate as checkpoint files
    #[arg(long)]
    pub emit_checkpoints: bool,

    /// Directory to write checkpoint files
    #[arg(
        long,
        default_value = checkpoint::DEFAULT_CHECKPOINT_DIR,
        env = "MYSQLDUMP_SYNC_CHECKPOINT_DIR"
    )]
    pub checkpoint_dir: PathBuf,
}

impl From<&CheckpointOpts> for checkpoint::SyncConfig {
    fn from(opts: &CheckpointOpts) -> Self {
        Self {
            emit_checkpoints: opts.emit_checkpoints,
            checkpoint_dir: Some(opts.checkpoint_dir.clone()),
        }
    }
}

impl ImportConfig {
    pub fn from_opts(source: String, output: OutputOpts, checkpoints: &CheckpointOpts) -> Self {
        Self {
            source,
            output: output.output,
            schemas: output.schemas,
            tables: output.tables,
            dry_run: output.dry_run,
            sync: checkpoints.into(),
        }
    }
}
