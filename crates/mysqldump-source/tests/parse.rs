//! End-to-end tests for dump stream parsing

use std::io::{self, Read};

use mysqldump_source::{parse, DumpHandler, HandlerOutcome, ParseError, ValueListError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Binlog(String, u64),
    Row(String, String, Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rejected(String);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rejected {}", self.0)
    }
}

impl std::error::Error for Rejected {}

/// Records every event, skipping or rejecting rows of selected tables.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    skip_binlog: bool,
    skip_table: Option<String>,
    reject_table: Option<String>,
}

impl DumpHandler for Recorder {
    type Error = Rejected;

    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, Rejected> {
        self.events.push(Event::Binlog(name.to_string(), position));
        if self.skip_binlog {
            return Ok(HandlerOutcome::Skipped);
        }
        Ok(HandlerOutcome::Applied)
    }

    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, Rejected> {
        if self.reject_table.as_deref() == Some(table) {
            return Err(Rejected(table.to_string()));
        }
        self.events
            .push(Event::Row(schema.to_string(), table.to_string(), values));
        if self.skip_table.as_deref() == Some(table) {
            return Ok(HandlerOutcome::Skipped);
        }
        Ok(HandlerOutcome::Applied)
    }
}

fn row(schema: &str, table: &str, values: &[&str]) -> Event {
    Event::Row(
        schema.to_string(),
        table.to_string(),
        values.iter().map(|v| v.to_string()).collect(),
    )
}

fn run(dump: &str, recorder: &mut Recorder) -> Result<(), ParseError<Rejected>> {
    parse(dump.as_bytes(), recorder)
}

const SAMPLE_DUMP: &str = "\
-- MySQL dump 10.13  Distrib 8.0.36, for Linux (x86_64)
--
-- Position to start replication or point-in-time recovery from
--

CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000123', MASTER_LOG_POS=45678;

--
-- Current Database: `app`
--

CREATE DATABASE /*!32312 IF NOT EXISTS*/ `app` /*!40100 DEFAULT CHARACTER SET utf8mb4 */;

USE `app`;

DROP TABLE IF EXISTS `users`;
CREATE TABLE `users` (
  `id` int NOT NULL,
  `name` varchar(64) DEFAULT NULL,
  `email` varchar(64) DEFAULT NULL,
  PRIMARY KEY (`id`)
) ENGINE=InnoDB;

LOCK TABLES `users` WRITE;
INSERT INTO `users` VALUES (1,'Alice','a@b.com');
INSERT INTO `users` VALUES (2,'O\\'Brien',NULL);
UNLOCK TABLES;
";

#[test]
fn test_sample_dump() {
    let mut recorder = Recorder::default();
    run(SAMPLE_DUMP, &mut recorder).unwrap();

    assert_eq!(
        recorder.events,
        vec![
            Event::Binlog("mysql-bin.000123".to_string(), 45678),
            row("app", "users", &["1", "Alice", "a@b.com"]),
            row("app", "users", &["2", r"O\'Brien", "NULL"]),
        ]
    );
}

#[test]
fn test_only_first_binlog_line_is_reported() {
    let dump = "\
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000001', MASTER_LOG_POS=4;
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000002', MASTER_LOG_POS=154;
";
    let mut recorder = Recorder::default();
    run(dump, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![Event::Binlog("mysql-bin.000001".to_string(), 4)]
    );
}

#[test]
fn test_skipped_binlog_still_counts_as_captured() {
    let dump = "\
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000001', MASTER_LOG_POS=4;
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000002', MASTER_LOG_POS=154;
INSERT INTO `t` VALUES (1);
";
    let mut recorder = Recorder {
        skip_binlog: true,
        ..Default::default()
    };
    run(dump, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![
            Event::Binlog("mysql-bin.000001".to_string(), 4),
            row("", "t", &["1"]),
        ]
    );
}

#[test]
fn test_rows_before_use_have_empty_schema() {
    let dump = "\
INSERT INTO `orphans` VALUES (1);
USE `app`;
INSERT INTO `users` VALUES (2);
";
    let mut recorder = Recorder::default();
    run(dump, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![row("", "orphans", &["1"]), row("app", "users", &["2"])]
    );
}

#[test]
fn test_most_recent_use_wins() {
    let dump = "\
USE `zeta`;
USE `alpha`;
INSERT INTO `t` VALUES (1);
USE `mid`;
INSERT INTO `t` VALUES (2);
";
    let mut recorder = Recorder::default();
    run(dump, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![row("alpha", "t", &["1"]), row("mid", "t", &["2"])]
    );
}

#[test]
fn test_skipped_row_does_not_stop_parsing() {
    let dump = "\
USE `app`;
INSERT INTO `audit` VALUES (1);
INSERT INTO `users` VALUES (2);
";
    let mut recorder = Recorder {
        skip_table: Some("audit".to_string()),
        ..Default::default()
    };
    run(dump, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![row("app", "audit", &["1"]), row("app", "users", &["2"])]
    );
}

#[test]
fn test_handler_error_aborts_with_same_error() {
    let dump = "\
USE `app`;
INSERT INTO `users` VALUES (1);
INSERT INTO `secrets` VALUES (2);
INSERT INTO `users` VALUES (3);
";
    let mut recorder = Recorder {
        reject_table: Some("secrets".to_string()),
        ..Default::default()
    };
    let err = run(dump, &mut recorder).unwrap_err();

    assert_eq!(
        err.into_handler_error(),
        Some(Rejected("secrets".to_string()))
    );
    assert_eq!(recorder.events, vec![row("app", "users", &["1"])]);
}

#[test]
fn test_handler_error_display_is_transparent() {
    let mut recorder = Recorder {
        reject_table: Some("t".to_string()),
        ..Default::default()
    };
    let err = run("INSERT INTO `t` VALUES (1);\n", &mut recorder).unwrap_err();
    assert_eq!(err.to_string(), "rejected t");
}

#[test]
fn test_final_line_without_newline_is_ignored() {
    let dump = "\
USE `app`;
INSERT INTO `users` VALUES (1);
INSERT INTO `users` VALUES (2);";
    let mut recorder = Recorder::default();
    run(dump, &mut recorder).unwrap();
    assert_eq!(recorder.events, vec![row("app", "users", &["1"])]);
}

#[test]
fn test_empty_stream() {
    let mut recorder = Recorder::default();
    run("", &mut recorder).unwrap();
    assert!(recorder.events.is_empty());
}

#[test]
fn test_carriage_return_is_kept() {
    // Only `\n` is stripped. The patterns are not anchored at the end, so a
    // trailing `\r` after the `;` does not prevent a match.
    let mut recorder = Recorder::default();
    run("USE `app`;\r\nINSERT INTO `t` VALUES (1);\r\n", &mut recorder).unwrap();
    assert_eq!(recorder.events, vec![row("app", "t", &["1"])]);
}

#[test]
fn test_binlog_position_overflow_is_fatal() {
    let dump = "\
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000001', MASTER_LOG_POS=99999999999999999999;
INSERT INTO `t` VALUES (1);
";
    let mut recorder = Recorder::default();
    let err = run(dump, &mut recorder).unwrap_err();
    match err {
        ParseError::InvalidBinlogPosition { line, value, .. } => {
            assert_eq!(line, 1);
            assert_eq!(value, "99999999999999999999");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(recorder.events.is_empty());
}

#[test]
fn test_unterminated_quote_is_fatal() {
    let dump = "\
INSERT INTO `t` VALUES (1,'broken);
INSERT INTO `t` VALUES (2);
";
    let mut recorder = Recorder::default();
    let err = run(dump, &mut recorder).unwrap_err();
    match err {
        ParseError::MalformedValues { line, source } => {
            assert_eq!(line, 1);
            assert_eq!(source, ValueListError::UnterminatedQuote { position: 2 });
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(recorder.events.is_empty());
}

#[test]
fn test_non_utf8_lines_are_ignored() {
    let mut dump = b"-- Host: caf".to_vec();
    dump.push(0xe9);
    dump.extend_from_slice(b"\nUSE `app`;\n/*!40101 SET @note = '");
    dump.extend_from_slice(&[0xff, 0xfe]);
    dump.extend_from_slice(b"' */;\nINSERT INTO `t` VALUES (1);\n");

    let mut recorder = Recorder::default();
    parse(dump.as_slice(), &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        vec![Event::Row(
            "app".to_string(),
            "t".to_string(),
            vec!["1".to_string()]
        )]
    );
}

#[test]
fn test_non_utf8_row_value_is_fatal() {
    let mut dump = b"USE `app`;\nINSERT INTO `t` VALUES ('".to_vec();
    dump.extend_from_slice(&[0xff, 0xfe]);
    dump.extend_from_slice(b"');\n");

    let mut recorder = Recorder::default();
    let err = parse(dump.as_slice(), &mut recorder).unwrap_err();
    assert!(matches!(err, ParseError::InvalidUtf8 { line: 2 }));
    assert!(recorder.events.is_empty());
}

/// Yields `data` and then fails every subsequent read.
struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset"));
        }
        Ok(n)
    }
}

#[test]
fn test_read_error_is_fatal() {
    let reader = FailingReader {
        data: io::Cursor::new(b"INSERT INTO `t` VALUES (1);\nINSERT INTO `t` VAL".to_vec()),
    };
    let mut recorder = Recorder::default();
    let err = parse(reader, &mut recorder).unwrap_err();

    match err {
        ParseError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(recorder.events, vec![row("", "t", &["1"])]);
}

#[test]
fn test_long_lines_cross_buffer_boundaries() {
    let long_value = "x".repeat(mysqldump_source::READ_BUFFER_SIZE * 3);
    let dump = format!("INSERT INTO `blobs` VALUES (1,'{long_value}');\n");

    let mut recorder = Recorder::default();
    run(&dump, &mut recorder).unwrap();
    assert_eq!(recorder.events, vec![row("", "blobs", &["1", long_value.as_str()])]);
}
