//! Line classification loop.

use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::error::ParseError;
use crate::handler::{DumpHandler, HandlerOutcome};
use crate::values::parse_values;

/// Buffer size used when reading the dump stream (16KB)
pub const READ_BUFFER_SIZE: usize = 16 * 1024;

// Patterns run over raw line bytes with Unicode mode off, so `.` matches any
// byte and lines in other encodings are still classified.
static BINLOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^CHANGE MASTER TO MASTER_LOG_FILE='(.+)', MASTER_LOG_POS=([0-9]+);")
        .expect("binlog pattern is valid")
});

static USE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^USE `(.+)`;").expect("USE pattern is valid"));

static INSERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^INSERT INTO `(.+)` VALUES \((.+)\);").expect("INSERT pattern is valid")
});

/// Parse a mysqldump stream, forwarding recognized statements to `handler`.
///
/// Only lines terminated by `\n` are classified; a final line without a
/// terminator is never looked at. Lines are matched as bytes, so lines that
/// match no pattern are ignored whatever their encoding.
///
/// Returns `Ok(())` at end of stream. Any read error, a binlog position that
/// does not fit in a `u64`, a malformed value list, a captured name or value
/// list that is not UTF-8, or a handler error aborts the parse immediately. Events already delivered are not replayed; a retry
/// must start again from the beginning of the stream.
pub fn parse<R, H>(reader: R, handler: &mut H) -> Result<(), ParseError<H::Error>>
where
    R: Read,
    H: DumpHandler + ?Sized,
{
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, reader);
    let mut state = ParseState::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 || buf.last() != Some(&b'\n') {
            break;
        }
        buf.pop();

        state.line += 1;
        state.process_line(&buf, handler)?;
    }

    tracing::debug!("Finished parsing dump after {} lines", state.line);
    Ok(())
}

/// Per-invocation parser state.
#[derive(Debug, Default)]
struct ParseState {
    /// Schema selected by the most recent `USE` line.
    schema: String,
    binlog_parsed: bool,
    line: usize,
}

impl ParseState {
    /// Classify one line. All three patterns are tried on every line.
    fn process_line<H>(&mut self, line: &[u8], handler: &mut H) -> Result<(), ParseError<H::Error>>
    where
        H: DumpHandler + ?Sized,
    {
        if !self.binlog_parsed {
            if let Some(caps) = BINLOG_RE.captures(line) {
                let name = self.text::<H::Error>(&caps[1])?;
                let digits = self.text::<H::Error>(&caps[2])?;
                let position = digits.parse::<u64>().map_err(|source| {
                    ParseError::InvalidBinlogPosition {
                        line: self.line,
                        value: digits.to_string(),
                        source,
                    }
                })?;

                tracing::info!("Found binlog position {name}:{position} on line {}", self.line);
                let outcome = handler.binlog(name, position).map_err(ParseError::Handler)?;
                if outcome == HandlerOutcome::Skipped {
                    tracing::debug!("Handler skipped binlog position {name}:{position}");
                }

                self.binlog_parsed = true;
            }
        }

        if let Some(caps) = USE_RE.captures(line) {
            let schema = self.text::<H::Error>(&caps[1])?;
            tracing::debug!("Switching to schema '{schema}' on line {}", self.line);
            self.schema = schema.to_string();
        }

        if let Some(caps) = INSERT_RE.captures(line) {
            let table = self.text::<H::Error>(&caps[1])?;
            let raw = self.text::<H::Error>(&caps[2])?;
            let values = parse_values(raw).map_err(|source| ParseError::MalformedValues {
                line: self.line,
                source,
            })?;

            tracing::trace!(
                "Row for {}.{} with {} values",
                self.schema,
                table,
                values.len()
            );
            let outcome = handler
                .data(&self.schema, table, values)
                .map_err(ParseError::Handler)?;
            if outcome == HandlerOutcome::Skipped {
                tracing::trace!("Handler skipped row for {}.{}", self.schema, table);
            }
        }

        Ok(())
    }

    fn text<'a, E>(&self, bytes: &'a [u8]) -> Result<&'a str, ParseError<E>> {
        std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8 { line: self.line })
    }
}
