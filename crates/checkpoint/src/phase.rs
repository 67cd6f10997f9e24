//! Sync phase enumeration for checkpoint tracking.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Points in a dump load at which a checkpoint is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncPhase {
    /// The replication coordinate was read from the dump header.
    ///
    /// Replication can resume from here once the rows are in place.
    BinlogCaptured,

    /// Every row of the dump has been handed to the sink.
    ///
    /// Carries the same coordinate as `BinlogCaptured`; its presence marks
    /// the load as complete.
    LoadCompleted,
}

impl SyncPhase {
    /// String form used in checkpoint file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::BinlogCaptured => "binlog_captured",
            SyncPhase::LoadCompleted => "load_completed",
        }
    }
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binlog_captured" => Ok(SyncPhase::BinlogCaptured),
            "load_completed" => Ok(SyncPhase::LoadCompleted),
            other => Err(anyhow::anyhow!("Unknown sync phase: {other}")),
        }
    }
}
