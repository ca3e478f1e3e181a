//! Fuzz testing for overflow column decoding.
//!
//! Overflow text is read back from disk and may have been written by another
//! tool, so decoding arbitrary text must fail with `StoreError::Codec` rather
//! than panic. The same text is also pushed through a cursor to exercise row
//! materialization. Documents built from arbitrary pairs must survive an
//! encode/decode round trip unchanged.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use docstore::engine::BufferedResultSet;
use docstore::{Cursor, Document, EmptyValues, JsonCodec, RowCodec, StoreError};

#[derive(Debug, Arbitrary)]
struct OverflowInput {
    text: String,
    pairs: Vec<(String, String)>,
    preserve_empty: bool,
}

fuzz_target!(|input: OverflowInput| {
    let codec = JsonCodec::new();

    match codec.decode(&input.text) {
        Ok(_) | Err(StoreError::Codec(_)) => {}
        Err(other) => panic!("unexpected error kind: {:?}", other),
    }

    let empty_values = if input.preserve_empty {
        EmptyValues::Preserve
    } else {
        EmptyValues::Absent
    };
    let rows = vec![vec![Some("1".to_string()), Some(input.text.clone())]];
    let columns = vec!["_id".to_string(), "extra_data".to_string()];
    let mut cursor = Cursor::new(
        Box::new(BufferedResultSet::new(columns, rows)),
        Arc::new(codec),
        empty_values,
    );
    let _ = cursor.move_to_first();

    let document: Document = input.pairs.into_iter().collect();
    let encoded = codec.encode(&document).expect("string maps always encode");
    let decoded = codec.decode(&encoded).expect("encoded text always decodes");
    assert_eq!(decoded, document);
});
