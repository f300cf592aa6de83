//! # Verdant Serde
//! Fixed-order binary serialization for verdant wire messages.
//!
//! Layouts carry no field tags: a writer appends typed fields in a fixed
//! order per message kind, and the reader consumes them in the same order.
//! The single-byte message discriminant is prepended by the transport layer,
//! never by this crate.

mod reader;
mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;

pub const BYTE_SIZE: usize = 1;
pub const SHORT_SIZE: usize = 2;
pub const INT_SIZE: usize = 4;
pub const FLOAT_SIZE: usize = 4;
pub const LONG_SIZE: usize = 8;

/// Maximum byte length of a string field, bounded by the u16 length prefix.
pub const MAX_STRING_BYTES: usize = u16::MAX as usize;
