//! # CLI — RiptideKV interactive shell
//!
//! A REPL-style command-line interface for the RiptideKV storage engine.
//! Reads commands from stdin, executes them against the engine, and prints
//! results to stdout. Designed for both interactive use and scripted testing
//! (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! SET key value   Insert or update a key-value pair
//! GET key         Look up a key (prints value or "(nil)")
//! DEL key         Delete a key (writes a tombstone)
//! FLUSH           Force flush memtable to SSTable
//! COMPACT         Trigger manual compaction
//! STATS           Print engine debug info
//! EXIT / QUIT     Shut down gracefully (flushing + closing first)
//! ```
//!
//! Range scans are out of scope (spec.md §1 Non-goals), so unlike the
//! source CLI this shell has no `SCAN` command.
//!
//! ## Configuration
//!
//! All settings are controlled via environment variables:
//!
//! ```text
//! RIPTIDE_DIR              Database directory        (default: "testdata")
//! RIPTIDE_WAL_NAME          WAL file name within dir  (default: "WAL")
//! RIPTIDE_FLUSH_KB          Flush threshold in KiB    (default: 4096 = 4 MiB)
//! RIPTIDE_COMPACTION_BASE   Per-level threshold base  (default: 2)
//! RIPTIDE_BLOOM_FPR         Bloom filter target FPR   (default: 0.01)
//! ```
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! RiptideKV started (dir=testdata, flush=4096KiB, compaction_base=2)
//! > SET name Alice
//! OK
//! > GET name
//! Alice
//! > EXIT
//! bye
//! ```

use anyhow::Result;
use config::EngineConfig;
use engine::Engine;
use std::io::{self, BufRead, Write};

/// Reads a configuration value from the environment, falling back to `default`.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn build_config() -> EngineConfig {
    let dir = env_or("RIPTIDE_DIR", "testdata");
    let wal_name = env_or("RIPTIDE_WAL_NAME", "WAL");
    let flush_kb: usize = env_or("RIPTIDE_FLUSH_KB", "4096").parse().unwrap_or(4096);
    let compaction_base: usize = env_or("RIPTIDE_COMPACTION_BASE", "2").parse().unwrap_or(2);
    let bloom_fpr: f64 = env_or("RIPTIDE_BLOOM_FPR", "0.01").parse().unwrap_or(0.01);

    EngineConfig::new()
        .with_dir(dir)
        .with_wal_name(wal_name)
        .with_flush_threshold_bytes(flush_kb * 1024)
        .with_compaction_base(compaction_base)
        .with_bloom_fpr(bloom_fpr)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = build_config();
    let flush_kb = config.flush_threshold_bytes / 1024;
    let compaction_base = config.compaction_base;
    let dir_display = config.dir.display().to_string();

    let mut engine = Engine::open(config)?;

    println!(
        "RiptideKV started (dir={}, flush={}KiB, compaction_base={})",
        dir_display, flush_kb, compaction_base
    );
    println!("Commands: SET key value | GET key | DEL key | FLUSH | COMPACT | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "SET" => {
                    if let Some(k) = parts.next() {
                        let v: String = parts.collect::<Vec<&str>>().join(" ");
                        if v.is_empty() {
                            println!("ERR usage: SET key value");
                        } else {
                            match engine.put(k.as_bytes().to_vec(), v.as_bytes().to_vec()) {
                                Ok(()) => println!("OK"),
                                Err(e) => println!("ERR set failed: {}", e),
                            }
                        }
                    } else {
                        println!("ERR usage: SET key value");
                    }
                }
                "GET" => {
                    if let Some(k) = parts.next() {
                        match engine.get(k.as_bytes()) {
                            Ok(Some(v)) => println!("{}", String::from_utf8_lossy(&v)),
                            Ok(None) => println!("(nil)"),
                            Err(e) => println!("ERR read failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: GET key");
                    }
                }
                "DEL" => {
                    if let Some(k) = parts.next() {
                        match engine.remove(k.as_bytes().to_vec()) {
                            Ok(()) => println!("OK"),
                            Err(e) => println!("ERR del failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: DEL key");
                    }
                }
                "FLUSH" => match engine.force_flush() {
                    Ok(()) => println!("OK (L0={})", engine.table_count(0)),
                    Err(e) => println!("ERR flush failed: {}", e),
                },
                "COMPACT" => match engine.compact() {
                    Ok(()) => println!("OK (L0={}, L1={})", engine.table_count(0), engine.table_count(1)),
                    Err(e) => println!("ERR compact failed: {}", e),
                },
                "STATS" => {
                    println!("{:?}", engine);
                }
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => {
                    println!("unknown command: {}", other);
                }
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    engine.close()?;
    Ok(())
}
