//! # Overflow Codec
//!
//! Undeclared attributes of a document are stored together in the reserved
//! overflow column as a single text value. [`RowCodec`] is the seam that turns
//! the attribute mapping into that text and back.
//!
//! ## Contract
//!
//! - `encode` must accept any [`Document`], including the empty one.
//! - `decode(encode(d)) == d` for every document `d`.
//! - `decode` must reject malformed text with `StoreError::Codec` instead of
//!   panicking; the text comes from disk and may predate this crate.
//!
//! ## Implementations
//!
//! - [`JsonCodec`]: a flat JSON object of string values. This is the default
//!   and the format existing stores were written with.

mod json;

pub use json::JsonCodec;

use crate::error::Result;
use crate::types::Document;
use std::fmt::Debug;

pub trait RowCodec: Debug + Send + Sync {
    fn encode(&self, attributes: &Document) -> Result<String>;

    fn decode(&self, text: &str) -> Result<Document>;
}
