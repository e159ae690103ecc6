use super::*;
use crate::export::document::KeyframeEntry;

fn doc_with(n: usize) -> KeyframeDocument {
    KeyframeDocument {
        keyframes: vec![KeyframeEntry::default(); n],
    }
}

#[test]
fn in_memory_store_keeps_every_document() {
    let mut store = InMemoryStore::new();
    store.write_document(&doc_with(1)).unwrap();
    store.write_document(&doc_with(2)).unwrap();
    assert_eq!(store.documents().len(), 2);
    assert_eq!(store.last().unwrap().keyframes.len(), 2);
}

#[test]
fn json_file_store_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("replay.json");
    let mut store = JsonFileStore::new(&path).pretty(true);
    store.write_document(&doc_with(3)).unwrap();

    let back = KeyframeDocument::from_path(&path).unwrap();
    assert_eq!(back, doc_with(3));
    assert!(std::fs::read_to_string(&path).unwrap().contains('\n'));
}

#[test]
fn json_file_store_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replay.json");
    let mut store = JsonFileStore::new(&path);
    store.write_document(&doc_with(3)).unwrap();
    store.write_document(&doc_with(1)).unwrap();
    assert_eq!(KeyframeDocument::from_path(&path).unwrap(), doc_with(1));
}
