use super::*;

#[test]
fn put_and_get_one_thousand_keys() {
    let mut mem = Memtable::new();
    for i in 0..1_000 {
        mem.put(format!("key{i}").into_bytes(), Value::Data(format!("value{i}").into_bytes()));
    }

    for i in 0..1_000 {
        let got = mem.get(format!("key{i}").as_bytes()).unwrap();
        assert_eq!(got, &Value::Data(format!("value{i}").into_bytes()));
    }
}

#[test]
fn tombstone_distinct_from_untouched_key() {
    let mut mem = Memtable::new();
    mem.put(b"a".to_vec(), Value::Data(b"1".to_vec()));
    mem.put(b"a".to_vec(), Value::Tombstone);

    assert_eq!(mem.get(b"a"), Some(&Value::Tombstone));
    assert_eq!(mem.get(b"never-written"), None);
}

#[test]
fn repeated_put_does_not_grow_len() {
    let mut mem = Memtable::new();
    mem.put(b"k".to_vec(), Value::Data(b"v1".to_vec()));
    assert_eq!(mem.len(), 1);
    mem.put(b"k".to_vec(), Value::Data(b"v2".to_vec()));
    assert_eq!(mem.len(), 1);
    assert_eq!(mem.get(b"k"), Some(&Value::Data(b"v2".to_vec())));
}

#[test]
fn clear_empties_the_memtable() {
    let mut mem = Memtable::new();
    mem.put(b"a".to_vec(), Value::Data(b"1".to_vec()));
    mem.put(b"b".to_vec(), Value::Data(b"2".to_vec()));
    mem.clear();
    assert!(mem.is_empty());
    assert_eq!(mem.get(b"a"), None);
}

#[test]
fn approx_size_tracks_puts_overwrites_and_clear() {
    let mut mem = Memtable::new();
    assert_eq!(mem.approx_size(), 0);

    mem.put(b"k".to_vec(), Value::Data(b"v1".to_vec()));
    let after_first = mem.approx_size();
    assert_eq!(after_first, record::on_disk_size(1, 2));

    mem.put(b"k".to_vec(), Value::Data(b"longer-value".to_vec()));
    assert_eq!(mem.approx_size(), record::on_disk_size(1, 12));

    mem.put(b"k".to_vec(), Value::Tombstone);
    assert_eq!(mem.approx_size(), record::on_disk_size(1, 0));

    mem.clear();
    assert_eq!(mem.approx_size(), 0);
}

#[test]
fn iter_yields_keys_in_ascending_order() {
    let mut mem = Memtable::new();
    mem.put(b"3".to_vec(), Value::Data(b"4".to_vec()));
    mem.put(b"1".to_vec(), Value::Data(b"2".to_vec()));
    mem.put(b"2".to_vec(), Value::Data(b"3".to_vec()));

    let keys: Vec<_> = mem.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
}
