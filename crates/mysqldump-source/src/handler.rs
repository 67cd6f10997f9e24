//! Event sink interface consumed by the parser.

use std::convert::Infallible;

/// Result of handing one event to a [`DumpHandler`].
///
/// Fatal failures are reported through the `Err` side of the handler's
/// return value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The event was applied.
    Applied,
    /// The handler deliberately declined the event; parsing continues.
    Skipped,
}

/// Receives the events recognized in a dump stream.
///
/// Returning `Err` from either method aborts the parse and the error is
/// handed back to the caller unchanged. Returning [`HandlerOutcome::Skipped`]
/// is never a failure.
pub trait DumpHandler {
    /// Handler-specific error type.
    type Error;

    /// Called at most once per parse with the replication coordinate from
    /// `CHANGE MASTER TO MASTER_LOG_FILE='<name>', MASTER_LOG_POS=<position>;`.
    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, Self::Error>;

    /// Called once per `INSERT` line.
    ///
    /// `schema` is the name from the most recent `USE` line, or empty if no
    /// `USE` line has been seen yet. `values` holds the raw literals in column
    /// order, with the quotes of string literals removed.
    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, Self::Error>;
}

impl<H: DumpHandler + ?Sized> DumpHandler for &mut H {
    type Error = H::Error;

    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, Self::Error> {
        (**self).binlog(name, position)
    }

    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, Self::Error> {
        (**self).data(schema, table, values)
    }
}

/// Handler that only logs and counts what it sees.
#[derive(Debug, Default, Clone)]
pub struct LoggingHandler {
    binlog: Option<(String, u64)>,
    rows: u64,
}

impl LoggingHandler {
    /// Coordinate received from the dump, if any.
    pub fn binlog_position(&self) -> Option<(&str, u64)> {
        self.binlog.as_ref().map(|(name, pos)| (name.as_str(), *pos))
    }

    /// Number of row events received.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl DumpHandler for LoggingHandler {
    type Error = Infallible;

    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, Self::Error> {
        tracing::info!("Dump taken at binlog position {name}:{position}");
        self.binlog = Some((name.to_string(), position));
        Ok(HandlerOutcome::Applied)
    }

    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, Self::Error> {
        tracing::debug!("Row for {schema}.{table}: {} values", values.len());
        self.rows += 1;
        Ok(HandlerOutcome::Applied)
    }
}
