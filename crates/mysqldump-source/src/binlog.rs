//! Binlog coordinate checkpoint
//!
//! The coordinate captured from a dump's `CHANGE MASTER TO` line is where
//! replication resumes once the dumped rows have been loaded.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binlog file name and byte offset read from a dump.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BinlogCheckpoint {
    /// Binlog file name (e.g. `mysql-bin.000123`)
    pub file: String,
    /// Byte offset within the binlog file
    pub position: u64,
    /// When the coordinate was captured
    pub timestamp: DateTime<Utc>,
}

impl BinlogCheckpoint {
    pub fn new(file: impl Into<String>, position: u64) -> Self {
        Self {
            file: file.into(),
            position,
            timestamp: Utc::now(),
        }
    }
}

impl checkpoint::Checkpoint for BinlogCheckpoint {
    const DATABASE_TYPE: &'static str = "mysql-binlog";

    fn to_cli_string(&self) -> String {
        format!("{}:{}", self.file, self.position)
    }

    fn from_cli_string(s: &str) -> Result<Self> {
        let (file, position) = s.rsplit_once(':').ok_or_else(|| {
            anyhow::anyhow!("Invalid binlog checkpoint: expected 'file:position', got '{s}'")
        })?;
        if file.is_empty() {
            anyhow::bail!("Invalid binlog checkpoint: empty file name in '{s}'");
        }
        let position = position.parse::<u64>().map_err(|e| {
            anyhow::anyhow!("Invalid binlog checkpoint: expected number, got '{position}': {e}")
        })?;

        Ok(Self::new(file, position))
    }
}
