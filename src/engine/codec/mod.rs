//! Composite value codec.
//!
//! Serializes a [`Value`](crate::Value) tree into a compact, self-describing
//! byte stream and back. Every value starts with a one-byte tag:
//!
//! | tag    | value  | payload                                              |
//! |--------|--------|------------------------------------------------------|
//! | `0x00` | Null   | none                                                 |
//! | `0x01` | Bool   | one byte, `0x00` or `0x01`                           |
//! | `0x02` | Int    | `i64`, 8 bytes big-endian                            |
//! | `0x03` | Double | `f64`, 8 bytes big-endian                            |
//! | `0x04` | Str    | varint byte length, UTF-8 bytes                      |
//! | `0x05` | Array  | varint count, elements                               |
//! | `0x06` | Object | varint count, then per field: varint key length, key |
//! |        |        | bytes, value                                         |
//!
//! Varints are unsigned LEB128 limited to `u32`, see [`varint`]. There is no
//! header and no padding, so the byte count of an encoded record is exactly
//! what ends up on disk.
//!
//! Neither direction recurses on the call stack: both walk the tree with an
//! explicit stack of frames. The decoder also bounds nesting depth (see
//! [`DecodeLimits`]).
//!
//! - [`encode`]: `Value` to bytes
//! - [`decode`]: bytes to `Value`, strict
//! - [`tags`]: tag constants
//! - [`varint`]: length prefixes

pub mod decode;
pub mod encode;
pub mod tags;
pub mod varint;

pub use decode::*;
pub use encode::*;
pub use tags::*;
pub use varint::*;
