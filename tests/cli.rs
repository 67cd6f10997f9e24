//! CLI tests for the mysqldump-sync binary

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const DUMP: &str = "\
CHANGE MASTER TO MASTER_LOG_FILE='mysql-bin.000009', MASTER_LOG_POS=777;
USE `shop`;
INSERT INTO `orders` VALUES (1,'pending','2024-01-01 00:00:00');
INSERT INTO `items` VALUES (1,1,'widget (large)');
";

/// Execute mysqldump-sync CLI command and return the output
fn execute_mysqldump_sync(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mysqldump-sync"))
        .args(args)
        .env("RUST_LOG", "mysqldump_sync=debug")
        .env_remove("MYSQLDUMP_SYNC_OUTPUT")
        .env_remove("MYSQLDUMP_SYNC_CHECKPOINT_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let mut child_stdin = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            child_stdin.write_all(input.as_bytes()).unwrap();
        }
    }

    child.wait_with_output().unwrap()
}

/// Verify CLI command succeeded
fn assert_cli_success(output: &Output, command_desc: &str) {
    if !output.status.success() {
        panic!(
            "{} failed!\nExit code: {:?}\nStdout: {}\nStderr: {}",
            command_desc,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn test_cli_import_and_checkpoint() {
    let tmp = TempDir::new().unwrap();
    let dump_path = tmp.path().join("dump.sql");
    std::fs::write(&dump_path, DUMP).unwrap();
    let output_path = tmp.path().join("rows.jsonl");
    let checkpoint_dir = tmp.path().join("checkpoints");

    let output = execute_mysqldump_sync(
        &[
            "import",
            dump_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
            "--emit-checkpoints",
            "--checkpoint-dir",
            checkpoint_dir.to_str().unwrap(),
        ],
        None,
    );
    assert_cli_success(&output, "import");

    let rows = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(rows.lines().count(), 2);
    assert!(rows.contains("widget (large)"));

    let output = execute_mysqldump_sync(
        &[
            "checkpoint",
            "--checkpoint-dir",
            checkpoint_dir.to_str().unwrap(),
            "--phase",
            "load_completed",
        ],
        None,
    );
    assert_cli_success(&output, "checkpoint");
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "mysql-bin.000009:777"
    );
}

#[test]
fn test_cli_import_from_stdin_to_stdout() {
    let output = execute_mysqldump_sync(&["import", "-", "--tables", "orders"], Some(DUMP));
    assert_cli_success(&output, "import from stdin");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        rows,
        vec![serde_json::json!({
            "schema": "shop",
            "table": "orders",
            "values": ["1", "pending", "2024-01-01 00:00:00"]
        })]
    );
}

#[test]
fn test_cli_inspect() {
    let output = execute_mysqldump_sync(&["inspect", "-"], Some(DUMP));
    assert_cli_success(&output, "inspect");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Binlog position: mysql-bin.000009:777"));
    assert!(stdout.contains("Rows: 2"));
}

#[test]
fn test_cli_missing_checkpoint_fails() {
    let tmp = TempDir::new().unwrap();
    let output = execute_mysqldump_sync(
        &["checkpoint", "--checkpoint-dir", tmp.path().to_str().unwrap()],
        None,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No checkpoint found"));
}
