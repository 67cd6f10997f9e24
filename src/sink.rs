//! JSON Lines row sink
//!
//! Replays row events from a dump into a JSON Lines file, one object per row:
//!
//! ```json
//! {"schema":"app","table":"users","values":["1","Alice","a@b.com"]}
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use mysqldump_source::{BinlogCheckpoint, DumpHandler, HandlerOutcome};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while writing rows.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to serialize row for {table}: {source}")]
    Serialize {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write row for {table}: {source}")]
    Write {
        table: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to flush output: {0}")]
    Flush(#[source] std::io::Error),
}

/// Counters for one import run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Rows handed to the output (or counted, in dry-run mode)
    pub rows_written: u64,
    /// Rows declined by the table filter
    pub rows_skipped: u64,
    /// Rows written per `schema.table`
    pub tables: BTreeMap<String, u64>,
}

#[derive(Serialize)]
struct RowRecord<'a> {
    schema: &'a str,
    table: &'a str,
    values: &'a [String],
}

/// Writes every row event as a JSON object on its own line.
pub struct JsonlSink<W: Write> {
    writer: W,
    capture_binlog: bool,
    dry_run: bool,
    binlog: Option<BinlogCheckpoint>,
    stats: ImportStats,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            capture_binlog: true,
            dry_run: false,
            binlog: None,
            stats: ImportStats::default(),
        }
    }

    /// Whether to keep the dump's binlog coordinate. When disabled the
    /// coordinate is answered with [`HandlerOutcome::Skipped`].
    pub fn capture_binlog(mut self, capture: bool) -> Self {
        self.capture_binlog = capture;
        self
    }

    /// Count rows without writing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn binlog(&self) -> Option<&BinlogCheckpoint> {
        self.binlog.as_ref()
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(SinkError::Flush)
    }

    /// Flush the output and return the captured coordinate and counters.
    pub fn finish(mut self) -> Result<(Option<BinlogCheckpoint>, ImportStats), SinkError> {
        self.flush()?;
        Ok((self.binlog, self.stats))
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn qualified_name(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}

impl<W: Write> DumpHandler for JsonlSink<W> {
    type Error = SinkError;

    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, SinkError> {
        if !self.capture_binlog {
            return Ok(HandlerOutcome::Skipped);
        }
        self.binlog = Some(BinlogCheckpoint::new(name, position));
        Ok(HandlerOutcome::Applied)
    }

    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, SinkError> {
        let name = qualified_name(schema, table);

        if !self.dry_run {
            let record = RowRecord {
                schema,
                table,
                values: &values,
            };
            let mut line =
                serde_json::to_vec(&record).map_err(|source| SinkError::Serialize {
                    table: name.clone(),
                    source,
                })?;
            line.push(b'\n');
            self.writer
                .write_all(&line)
                .map_err(|source| SinkError::Write {
                    table: name.clone(),
                    source,
                })?;
        }

        self.stats.rows_written += 1;
        *self.stats.tables.entry(name).or_insert(0) += 1;
        Ok(HandlerOutcome::Applied)
    }
}
