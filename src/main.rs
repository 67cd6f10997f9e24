//! Command-line interface for mysqldump-sync
//!
//! # Usage Examples
//!
//! ```bash
//! # Replay a dump into rows.jsonl and record its binlog coordinate
//! mysqldump-sync import dump.sql \
//!   --output rows.jsonl \
//!   --emit-checkpoints --checkpoint-dir .mysqldump-sync-checkpoints
//!
//! # Count rows per table without writing anything
//! mysqldump-sync import dump.sql --dry-run
//!
//! # Log what a dump contains
//! RUST_LOG=mysqldump_source=debug mysqldump-sync inspect dump.sql
//!
//! # Show where replication should resume
//! mysqldump-sync checkpoint --phase load_completed
//! ```
//!
//! ## Checkpoint Format
//! - MySQL binlog: `mysql-bin.000123:45678` (file name and byte offset)

use std::path::PathBuf;

use checkpoint::{Checkpoint, SyncPhase};
use clap::{Parser, Subcommand};
use mysqldump_sync::{
    import, inspect, read_binlog_checkpoint, CheckpointOpts, ImportConfig, OutputOpts,
};

#[derive(Parser)]
#[command(name = "mysqldump-sync")]
#[command(about = "Replay mysqldump output as row events and binlog checkpoints")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the rows of a dump into a JSON Lines file
    Import {
        /// Dump file to read, or `-` for stdin
        source: String,

        #[command(flatten)]
        output: OutputOpts,

        #[command(flatten)]
        checkpoints: CheckpointOpts,
    },

    /// Parse a dump and report what it contains without writing anything
    Inspect {
        /// Dump file to read, or `-` for stdin
        source: String,
    },

    /// Print the binlog coordinate recorded by a previous import
    Checkpoint {
        /// Directory holding checkpoint files
        #[arg(
            long,
            default_value = checkpoint::DEFAULT_CHECKPOINT_DIR,
            env = "MYSQLDUMP_SYNC_CHECKPOINT_DIR"
        )]
        checkpoint_dir: PathBuf,

        /// Phase to read (binlog_captured or load_completed)
        #[arg(long, default_value = "binlog_captured")]
        phase: SyncPhase,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so that stdout can carry the JSON Lines output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            source,
            output,
            checkpoints,
        } => {
            let config = ImportConfig::from_opts(source, output, &checkpoints);
            let stats = import(config).await?;

            eprintln!(
                "Imported {} rows ({} skipped)",
                stats.rows_written, stats.rows_skipped
            );
            for (table, rows) in &stats.tables {
                eprintln!("  {table}: {rows}");
            }
        }
        Commands::Inspect { source } => {
            let handler = inspect(source).await?;
            match handler.binlog_position() {
                Some((file, position)) => println!("Binlog position: {file}:{position}"),
                None => println!("Binlog position: none"),
            }
            println!("Rows: {}", handler.rows());
        }
        Commands::Checkpoint {
            checkpoint_dir,
            phase,
        } => {
            let binlog = read_binlog_checkpoint(checkpoint_dir, phase).await?;
            println!("{}", binlog.to_cli_string());
        }
    }

    Ok(())
}
