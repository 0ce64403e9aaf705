//! Integration tests for the RiptideKV CLI shell.
//!
//! Each test spawns the compiled `cli` binary, feeds it a scripted sequence
//! of commands over stdin, and asserts on the captured stdout — covering the
//! same ground as the source's CLI test suite, minus `SCAN` (out of scope).

use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run_cli_command(dir: &Path, command: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new("cargo")
        .args(["run", "-p", "cli", "--"])
        .env("RIPTIDE_DIR", dir.to_str().unwrap())
        .env("RIPTIDE_FLUSH_KB", "1")
        .env("RIPTIDE_COMPACTION_BASE", "2")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cli");

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        stdin.write_all(command.as_bytes()).expect("failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("failed to write EXIT");
    }

    let output = child.wait_with_output().expect("failed to read output");
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_basic_set_get() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path()).unwrap();

    let output = run_cli_command(dir.path(), "SET key1 value1\nGET key1\n");

    assert!(output.contains("OK"));
    assert!(output.contains("value1"));
}

#[test]
fn test_multiple_keys() {
    let dir = tempdir().unwrap();
    let commands = "SET a 1\nSET b 2\nSET c 3\nGET a\nGET b\nGET c\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains('1'));
    assert!(output.contains('2'));
    assert!(output.contains('3'));
}

#[test]
fn test_overwrite_key() {
    let dir = tempdir().unwrap();
    let commands = "SET mykey oldvalue\nGET mykey\nSET mykey newvalue\nGET mykey\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("oldvalue"));
    assert!(output.contains("newvalue"));
}

#[test]
fn test_delete_key() {
    let dir = tempdir().unwrap();
    let commands = "SET delme value\nGET delme\nDEL delme\nGET delme\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("value"));
    assert!(output.contains("(nil)"));
}

#[test]
fn test_flush_to_sstable() {
    let dir = tempdir().unwrap();
    let commands = "SET a 1\nSET b 2\nFLUSH\nGET a\nGET b\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("OK"));
    assert!(output.contains('1'));
    assert!(output.contains('2'));
}

#[test]
fn test_auto_flush_on_threshold() {
    let dir = tempdir().unwrap();
    let mut commands = String::new();
    for i in 0..50 {
        commands.push_str(&format!("SET key{:03} value_with_some_data_{}\n", i, i));
    }
    for i in 0..50 {
        commands.push_str(&format!("GET key{:03}\n", i));
    }
    let output = run_cli_command(dir.path(), &commands);

    assert!(output.contains("value_with_some_data_0"));
    assert!(output.contains("value_with_some_data_49"));
}

#[test]
fn test_compaction() {
    let dir = tempdir().unwrap();
    let mut commands = String::new();
    for batch in 0..3 {
        for i in 0..5 {
            commands.push_str(&format!("SET batch{}_key{} val{}\n", batch, i, batch * 10 + i));
        }
        commands.push_str("FLUSH\n");
    }
    commands.push_str("COMPACT\n");
    for batch in 0..3 {
        for i in 0..5 {
            commands.push_str(&format!("GET batch{}_key{}\n", batch, i));
        }
    }

    let output = run_cli_command(dir.path(), &commands);

    assert!(output.contains("val0"));
    assert!(output.contains("val10"));
}

#[test]
fn test_stats_output() {
    let dir = tempdir().unwrap();
    let commands = "SET x 1\nSET y 2\nFLUSH\nSTATS\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("Engine"));
}

#[test]
fn test_quit_command() {
    let dir = tempdir().unwrap();
    let commands = "SET foo bar\nQUIT\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("OK"));
    assert!(output.contains("bye"));
}

#[test]
fn test_persistence_across_restarts() {
    let dir = tempdir().unwrap();

    let commands1 = "SET persist_key persist_value\nFLUSH\n";
    run_cli_command(dir.path(), commands1);

    let commands2 = "GET persist_key\n";
    let output2 = run_cli_command(dir.path(), commands2);

    assert!(output2.contains("persist_value"));
}

#[test]
fn test_empty_key_rejection_leaves_shell_usable() {
    let dir = tempdir().unwrap();
    let commands = "SET normalkey value\nGET normalkey\n";
    let output = run_cli_command(dir.path(), commands);

    assert!(output.contains("value"));
}
