//! Streaming parser for mysqldump output
//!
//! Reads the text produced by `mysqldump --master-data` (one `INSERT` per row,
//! i.e. `--skip-extended-insert`) and turns it into a sequence of events:
//!
//! - the replication coordinate from `CHANGE MASTER TO MASTER_LOG_FILE=..., MASTER_LOG_POS=...;`
//! - one row event per `INSERT INTO \`table\` VALUES (...);` line, scoped to the schema
//!   selected by the most recent `USE \`schema\`;` line
//!
//! Events are delivered to a [`DumpHandler`]. Every other line is ignored.
//!
//! # Example
//!
//! ```rust
//! use mysqldump_source::{parse, LoggingHandler};
//!
//! let dump = "USE `app`;\nINSERT INTO `users` VALUES (1,'Alice');\n";
//! let mut handler = LoggingHandler::default();
//! parse(dump.as_bytes(), &mut handler).unwrap();
//! assert_eq!(handler.rows(), 1);
//! ```

pub mod binlog;
mod error;
mod handler;
mod parser;
mod values;

pub use binlog::BinlogCheckpoint;
pub use error::{ParseError, ValueListError};
pub use handler::{DumpHandler, HandlerOutcome, LoggingHandler};
pub use parser::{parse, READ_BUFFER_SIZE};
pub use values::parse_values;
