//! # Cursor Position Tests
//!
//! Positioned-cursor behavior over real query results:
//!
//! - a fresh cursor sits before the first row
//! - `move_to_last` lands on `count - 1`
//! - moving past either end fails, clamps the position, and keeps the last
//!   materialized row
//! - empty results are both before-first and after-last
//! - cursors over the same store move independently

use docstore::{Cursor, Database, Document, Store};

fn doc(pairs: &[(&str, &str)]) -> Document {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn store_with(rows: usize) -> (Database, Store) {
    let db = Database::open_in_memory().unwrap();
    let mut store = db.object_store("items");
    store.declare_columns(["n"]).unwrap();
    store.init().unwrap();
    for i in 0..rows {
        let n = i.to_string();
        store.put(&doc(&[("n", n.as_str()), ("tag", "t")])).unwrap();
    }
    (db, store)
}

fn all(store: &Store) -> Cursor {
    store.all_rows().unwrap()
}

#[test]
fn fresh_cursor_is_before_first() {
    let (_db, store) = store_with(3);
    let cursor = all(&store);

    assert!(cursor.is_before_first());
    assert!(!cursor.is_first());
    assert_eq!(cursor.position(), -1);
    assert!(cursor.row().is_empty());
}

#[test]
fn move_to_last_lands_on_last_row() {
    let (_db, store) = store_with(3);
    let mut cursor = all(&store);

    assert!(cursor.move_to_last().unwrap());

    assert!(cursor.is_last());
    assert_eq!(cursor.position(), cursor.count() as i64 - 1);
    assert_eq!(cursor.value("n"), Some("2"));
}

#[test]
fn moving_past_the_end_fails_and_keeps_the_row() {
    let (_db, store) = store_with(3);
    let mut cursor = all(&store);
    cursor.move_to_last().unwrap();

    assert!(!cursor.move_to_next().unwrap());

    assert!(cursor.is_after_last());
    assert_eq!(cursor.position(), 3);
    assert_eq!(cursor.value("n"), Some("2"));
}

#[test]
fn moving_before_the_start_clamps_to_minus_one() {
    let (_db, store) = store_with(3);
    let mut cursor = all(&store);
    cursor.move_to_first().unwrap();

    assert!(!cursor.move_to_previous().unwrap());

    assert!(cursor.is_before_first());
    assert_eq!(cursor.value("n"), Some("0"));
}

#[test]
fn absolute_and_relative_moves() {
    let (_db, store) = store_with(5);
    let mut cursor = all(&store);

    assert!(cursor.move_to_position(2).unwrap());
    assert_eq!(cursor.value("n"), Some("2"));

    assert!(cursor.move_by(2).unwrap());
    assert_eq!(cursor.value("n"), Some("4"));

    assert!(!cursor.move_by(10).unwrap());
    assert_eq!(cursor.position(), 5);

    assert!(cursor.move_by(-5).unwrap());
    assert_eq!(cursor.value("n"), Some("0"));
    assert!(cursor.is_first());
}

#[test]
fn empty_result_is_both_before_first_and_after_last() {
    let (_db, store) = store_with(0);
    let mut cursor = all(&store);

    assert_eq!(cursor.count(), 0);
    assert!(cursor.is_before_first());
    assert!(cursor.is_after_last());
    assert!(!cursor.move_to_first().unwrap());
    assert!(!cursor.move_to_last().unwrap());
    assert!(!cursor.is_first());
    assert!(!cursor.is_last());
}

#[test]
fn every_row_materializes_columns_and_overflow() {
    let (_db, store) = store_with(4);
    let mut cursor = all(&store);

    let mut seen = 0;
    while cursor.move_to_next().unwrap() {
        assert_eq!(cursor.row().len(), 2);
        assert_eq!(cursor.value("tag"), Some("t"));
        assert_eq!(cursor.column_names(), vec!["n", "tag"]);
        assert!(cursor.row_id().is_some());
        seen += 1;
    }

    assert_eq!(seen, 4);
    assert!(cursor.is_after_last());
}

#[test]
fn two_cursors_move_independently() {
    let (_db, store) = store_with(4);
    let mut forward = all(&store);
    let mut backward = all(&store);

    assert!(forward.move_to_first().unwrap());
    assert!(backward.move_to_last().unwrap());
    assert!(forward.move_to_next().unwrap());
    assert!(backward.move_to_previous().unwrap());
    assert!(forward.move_to_next().unwrap());

    assert_eq!(forward.value("n"), Some("2"));
    assert_eq!(backward.value("n"), Some("2"));
    assert_eq!(forward.position(), 2);
    assert_eq!(backward.position(), 2);

    assert!(forward.move_to_next().unwrap());
    backward.close();

    assert!(forward.is_last());
    assert_eq!(forward.value("n"), Some("3"));
    assert!(backward.is_closed());
    assert!(!forward.is_closed());
    assert_eq!(backward.value("n"), Some("2"));
}

#[test]
fn closed_cursor_cannot_move() {
    let (_db, store) = store_with(2);
    let mut cursor = all(&store);
    cursor.move_to_first().unwrap();

    cursor.close();

    assert!(cursor.is_closed());
    assert!(!cursor.move_to_next().unwrap());
}
