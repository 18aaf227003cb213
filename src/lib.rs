//! Product batch codes for production tracking.
//!
//! See [`code`] for the batch code format and codec.

pub mod code;

pub use code::{BatchCodeCodec, BatchCodeFields, CodecConfig, DecodedBatchCode};
