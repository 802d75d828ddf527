//! Variable-length length prefixes (unsigned LEB128, `u32` only).
//!
//! - 0..=127: 1 byte
//! - 128..=16383: 2 bytes
//! - up to `u32::MAX`: 5 bytes at most
//!
//! Reading is strict: a prefix must use the shortest form and must fit in
//! 32 bits, so every length has exactly one encoding.

use std::io::{self, Read, Write};

use byteorder::ReadBytesExt;
use thiserror::Error;

/// Maximum number of bytes of a `u32` varint.
pub const MAX_VARINT_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    #[error("varint truncated")]
    Truncated,
    #[error("varint exceeds 32 bits")]
    Overflow,
    #[error("varint is not in its shortest form")]
    NonMinimal,
}

/// Writes `value` as a varint, returns the number of bytes written.
///
/// ```
/// use buddyvault::engine::codec::write_varint;
///
/// let mut buf = Vec::new();
/// write_varint(&mut buf, 300).unwrap();
/// assert_eq!(buf, vec![0xAC, 0x02]);
/// ```
pub fn write_varint<W: Write>(
    w: &mut W,
    mut value: u32,
) -> io::Result<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf[len] = byte;
        len += 1;
        if value == 0 {
            break;
        }
    }

    w.write_all(&buf[..len])?;
    Ok(len)
}

/// Reads a varint written by [`write_varint`].
pub fn read_varint<R: Read>(r: &mut R) -> Result<u32, VarintError> {
    let mut result: u32 = 0;

    for i in 0..MAX_VARINT_LEN {
        let byte = r.read_u8().map_err(|_| VarintError::Truncated)?;

        // The fifth byte may only carry the top 4 bits and no continuation.
        if i == MAX_VARINT_LEN - 1 && byte > 0x0F {
            return Err(VarintError::Overflow);
        }

        result |= u32::from(byte & 0x7F) << (7 * i);

        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(VarintError::NonMinimal);
            }
            return Ok(result);
        }
    }

    Err(VarintError::Overflow)
}

/// Size in bytes of the varint encoding of `value`.
pub fn varint_size(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}
