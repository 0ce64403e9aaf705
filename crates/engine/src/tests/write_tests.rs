use crate::{Engine, MAX_KEY_SIZE, MAX_VALUE_SIZE};
use config::EngineConfig;
use tempfile::tempdir;

fn cfg(dir: &std::path::Path) -> EngineConfig {
    EngineConfig::new().with_dir(dir).with_flush_threshold_bytes(1024 * 1024)
}

#[test]
fn put_and_get() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(b"name".to_vec(), b"alice".to_vec())?;
    assert_eq!(engine.get(b"name")?.unwrap(), b"alice");
    Ok(())
}

#[test]
fn get_missing_key() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    assert!(engine.get(b"nope")?.is_none());
    Ok(())
}

#[test]
fn remove_deletes_key() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(b"k".to_vec(), b"v".to_vec())?;
    assert!(engine.get(b"k")?.is_some());
    engine.remove(b"k".to_vec())?;
    assert!(engine.get(b"k")?.is_none());
    Ok(())
}

#[test]
fn overwrite_key_is_last_writer_wins() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(b"k".to_vec(), b"v1".to_vec())?;
    let len_before = engine.memtable_len();
    engine.put(b"k".to_vec(), b"v2".to_vec())?;
    assert_eq!(engine.memtable_len(), len_before, "memtable must not grow on overwrite");
    assert_eq!(engine.get(b"k")?.unwrap(), b"v2");
    Ok(())
}

#[test]
fn put_after_remove_resurrects_key() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(b"k".to_vec(), b"v1".to_vec())?;
    engine.remove(b"k".to_vec())?;
    engine.put(b"k".to_vec(), b"v2".to_vec())?;
    assert_eq!(engine.get(b"k")?.unwrap(), b"v2");
    Ok(())
}

#[test]
fn put_accepts_empty_key() -> anyhow::Result<()> {
    // spec.md §3: "Key, Value: finite ordered sequences of bytes (length >= 0)".
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(vec![], b"v".to_vec())?;
    assert_eq!(engine.get(&[])?.unwrap(), b"v");
    Ok(())
}

#[test]
fn remove_accepts_empty_key() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(vec![], b"v".to_vec())?;
    engine.remove(vec![])?;
    assert!(engine.get(&[])?.is_none());
    Ok(())
}

#[test]
fn put_rejects_oversized_key() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(cfg(dir.path())).unwrap();
    let big_key = vec![b'k'; MAX_KEY_SIZE + 1];
    let err = engine.put(big_key, b"v".to_vec()).unwrap_err();
    assert!(err.to_string().contains("key too large"));
}

#[test]
fn put_rejects_oversized_value() {
    let dir = tempdir().unwrap();
    let mut engine = Engine::open(cfg(dir.path())).unwrap();
    let big_val = vec![b'v'; MAX_VALUE_SIZE + 1];
    let err = engine.put(b"k".to_vec(), big_val).unwrap_err();
    assert!(err.to_string().contains("value too large"));
}

#[test]
fn put_accepts_max_key_size() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    let max_key = vec![b'k'; MAX_KEY_SIZE];
    engine.put(max_key.clone(), b"v".to_vec())?;
    assert_eq!(engine.get(&max_key)?.unwrap(), b"v");
    Ok(())
}

#[test]
fn flush_triggers_at_threshold_and_truncates_wal() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()).with_flush_threshold_bytes(1))?;
    engine.put(b"k1".to_vec(), b"v1".to_vec())?;

    assert_eq!(engine.table_count(0), 1, "expected one level-0 table after crossing threshold");
    let wal_meta = std::fs::metadata(dir.path().join("WAL"))?;
    assert_eq!(wal_meta.len(), 0, "expected WAL to be truncated after flush");
    Ok(())
}

#[test]
fn multiple_flushes_create_multiple_level0_tables() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()).with_flush_threshold_bytes(1))?;
    for i in 0..5u32 {
        engine.put(format!("k{i}").into_bytes(), b"v".to_vec())?;
    }

    assert_eq!(engine.table_count(0), 5);
    for i in 0..5u32 {
        let key = format!("k{i}").into_bytes();
        assert!(engine.get(&key)?.is_some(), "key {i} should be readable");
    }
    Ok(())
}

#[test]
fn force_flush_empty_memtable_is_noop() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.force_flush()?;
    assert_eq!(engine.table_count(0), 0);
    Ok(())
}

#[test]
fn force_flush_persists_memtable_data_ahead_of_threshold() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut engine = Engine::open(cfg(dir.path()))?;
    engine.put(b"k".to_vec(), b"v".to_vec())?;
    assert_eq!(engine.table_count(0), 0, "threshold is large; nothing auto-flushed yet");

    engine.force_flush()?;
    assert_eq!(engine.table_count(0), 1);
    assert_eq!(engine.memtable_len(), 0);
    Ok(())
}

#[test]
fn drop_flushes_memtable_to_sstable() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let dir_path = dir.path().to_path_buf();
    {
        let mut engine = Engine::open(cfg(&dir_path))?;
        engine.put(b"drop_key".to_vec(), b"drop_val".to_vec())?;
        // Engine drops here; the memtable must be flushed so the data
        // survives even without a clean `close()`.
    }

    let mut engine = Engine::open(cfg(&dir_path))?;
    assert_eq!(engine.get(b"drop_key")?.unwrap(), b"drop_val");
    Ok(())
}
