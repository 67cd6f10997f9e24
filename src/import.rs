//! Dump import driver
//!
//! Opens the dump, runs the parser on a blocking task and records the
//! dump's binlog coordinate as checkpoints once all rows have been written.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use checkpoint::{SyncConfig, SyncManager, SyncPhase};
use mysqldump_source::{parse, BinlogCheckpoint, LoggingHandler};

use crate::filter::TableFilter;
use crate::sink::{ImportStats, JsonlSink};

/// Source name that reads the dump from standard input.
pub const STDIN_SOURCE: &str = "-";

/// Configuration for a dump import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Dump file path, or `-` for standard input
    pub source: String,

    /// JSON Lines output file; standard output when `None`
    pub output: Option<PathBuf>,

    /// Only import rows from these schemas (all when empty)
    pub schemas: Vec<String>,

    /// Only import rows from these tables, `table` or `schema.table` (all when empty)
    pub tables: Vec<String>,

    /// Parse and count rows without writing them
    pub dry_run: bool,

    /// Checkpoint emission settings
    pub sync: SyncConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source: STDIN_SOURCE.to_string(),
            output: None,
            schemas: vec![],
            tables: vec![],
            dry_run: false,
            sync: SyncConfig::default(),
        }
    }
}

/// Open a dump source for reading.
pub fn open_source(source: &str) -> Result<Box<dyn Read + Send>> {
    if source == STDIN_SOURCE {
        return Ok(Box::new(std::io::stdin()));
    }
    let file =
        File::open(source).with_context(|| format!("Failed to open dump file: {source}"))?;
    Ok(Box::new(file))
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

/// Replay a dump into a JSON Lines file and record its binlog coordinate.
///
/// When checkpoints are enabled and the dump carries a `CHANGE MASTER TO`
/// line, a [`SyncPhase::BinlogCaptured`] checkpoint and then a
/// [`SyncPhase::LoadCompleted`] checkpoint are written after the last row.
pub async fn import(config: ImportConfig) -> Result<ImportStats> {
    tracing::info!("Importing dump from: {}", config.source);

    let reader = open_source(&config.source)?;
    let writer: Box<dyn Write + Send> = if config.dry_run {
        Box::new(std::io::sink())
    } else {
        open_output(config.output.as_deref())?
    };

    let sink = JsonlSink::new(writer)
        .capture_binlog(config.sync.should_emit_checkpoints())
        .dry_run(config.dry_run);
    let mut filter = TableFilter::new(sink, config.schemas.clone(), config.tables.clone());

    let (filter, result) = tokio::task::spawn_blocking(move || {
        let result = parse(reader, &mut filter);
        (filter, result)
    })
    .await
    .context("Dump parser task failed")?;
    result.with_context(|| format!("Failed to parse dump from {}", config.source))?;

    let skipped = filter.skipped();
    let (binlog, mut stats) = filter.into_inner().finish()?;
    stats.rows_skipped = skipped;

    tracing::info!(
        "Imported {} rows ({} skipped) from {}",
        stats.rows_written,
        stats.rows_skipped,
        config.source
    );

    if config.sync.should_emit_checkpoints() {
        emit_checkpoints(&config.sync, binlog).await?;
    }

    Ok(stats)
}

async fn emit_checkpoints(sync: &SyncConfig, binlog: Option<BinlogCheckpoint>) -> Result<()> {
    let Some(binlog) = binlog else {
        tracing::warn!(
            "Dump has no CHANGE MASTER TO line; no checkpoint written (was it taken with --master-data?)"
        );
        return Ok(());
    };

    let manager = SyncManager::new(sync.clone());
    manager
        .emit_checkpoint(&binlog, SyncPhase::BinlogCaptured)
        .await?;
    manager
        .emit_checkpoint(&binlog, SyncPhase::LoadCompleted)
        .await?;
    Ok(())
}

/// Parse a dump with the [`LoggingHandler`] only.
pub async fn inspect(source: String) -> Result<LoggingHandler> {
    let reader = open_source(&source)?;

    let (handler, result) = tokio::task::spawn_blocking(move || {
        let mut handler = LoggingHandler::default();
        let result = parse(reader, &mut handler);
        (handler, result)
    })
    .await
    .context("Dump parser task failed")?;
    result.with_context(|| format!("Failed to parse dump from {source}"))?;

    Ok(handler)
}

/// Read the binlog coordinate recorded for `phase` in `checkpoint_dir`.
pub async fn read_binlog_checkpoint(
    checkpoint_dir: PathBuf,
    phase: SyncPhase,
) -> Result<BinlogCheckpoint> {
    let manager = SyncManager::new(SyncConfig {
        emit_checkpoints: false,
        checkpoint_dir: Some(checkpoint_dir),
    });
    manager.read_checkpoint(phase).await
}
