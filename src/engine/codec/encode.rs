//! Serialization of [`Value`] trees.

use std::io::Write;

use buddyvault_error::{CodecError, VaultResult};
use byteorder::{BigEndian, WriteBytesExt};

use super::{tags::Tag, varint::write_varint};
use crate::Value;

/// Container being written, with the children still to emit.
enum Frame<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(indexmap::map::Iter<'a, String, Value>),
}

/// Writes `value` to `w`, returns the number of bytes written.
///
/// The tree is walked with an explicit stack, so arbitrarily deep values
/// do not exhaust the call stack.
pub fn write_value<W: Write>(
    w: &mut W,
    value: &Value,
) -> VaultResult<usize> {
    let mut written = 0;
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = Some(value);

    loop {
        if let Some(v) = next.take() {
            written += write_head(w, v)?;
            match v {
                Value::Array(items) if !items.is_empty() => stack.push(Frame::Array(items.iter())),
                Value::Object(map) if !map.is_empty() => stack.push(Frame::Object(map.iter())),
                _ => {}
            }
        }

        let Some(frame) = stack.last_mut() else {
            return Ok(written);
        };

        match frame {
            Frame::Array(items) => match items.next() {
                Some(item) => next = Some(item),
                None => {
                    stack.pop();
                }
            },
            Frame::Object(entries) => match entries.next() {
                Some((key, item)) => {
                    written += write_str(w, "object key", key)?;
                    next = Some(item);
                }
                None => {
                    stack.pop();
                }
            },
        }
    }
}

/// Encodes `value` into a fresh buffer.
///
/// ```
/// use buddyvault::{engine::codec::encode, Value};
///
/// let bytes = encode(&Value::from("hi")).unwrap();
/// assert_eq!(bytes, vec![0x04, 0x02, b'h', b'i']);
/// ```
pub fn encode(value: &Value) -> VaultResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_value(&mut buf, value)?;
    Ok(buf)
}

/// Writes the tag and the fixed part of one value: the whole payload for
/// scalars, the element count for containers.
fn write_head<W: Write>(
    w: &mut W,
    value: &Value,
) -> VaultResult<usize> {
    w.write_u8(Tag::of(value).byte())?;
    let body = match value {
        Value::Null => 0,
        Value::Bool(b) => {
            w.write_u8(u8::from(*b))?;
            1
        }
        Value::Int(i) => {
            w.write_i64::<BigEndian>(*i)?;
            8
        }
        Value::Double(d) => {
            w.write_f64::<BigEndian>(*d)?;
            8
        }
        Value::Str(s) => write_str(w, "string", s)?,
        Value::Array(items) => write_varint(w, prefix("array", items.len())?)?,
        Value::Object(map) => write_varint(w, prefix("object", map.len())?)?,
    };
    Ok(1 + body)
}

fn write_str<W: Write>(
    w: &mut W,
    what: &str,
    s: &str,
) -> VaultResult<usize> {
    let bytes = s.as_bytes();
    let n = write_varint(w, prefix(what, bytes.len())?)?;
    w.write_all(bytes)?;
    Ok(n + bytes.len())
}

fn prefix(
    what: &str,
    len: usize,
) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::TooLarge {
        what: what.to_string(),
        len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::Null).unwrap(), vec![0x00]);
        assert_eq!(encode(&Value::Bool(true)).unwrap(), vec![0x01, 0x01]);
        assert_eq!(encode(&Value::Bool(false)).unwrap(), vec![0x01, 0x00]);
        assert_eq!(
            encode(&Value::Int(-2)).unwrap(),
            vec![0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]
        );
        assert_eq!(
            encode(&Value::Double(1.5)).unwrap(),
            vec![0x03, 0x3F, 0xF8, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode(&Value::from("")).unwrap(), vec![0x04, 0x00]);
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let obj = Object::new().with("b", 1i64).with("a", true);
        let bytes = encode(&Value::Object(obj)).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x06, 0x02, // two entries
                0x01, b'b', 0x02, 0, 0, 0, 0, 0, 0, 0, 1, // "b": 1
                0x01, b'a', 0x01, 0x01, // "a": true
            ]
        );
    }

    #[test]
    fn test_nested_containers() {
        let v = Value::Array(vec![
            Value::Array(vec![]),
            Value::Object(Object::new()),
            Value::Array(vec![Value::Null]),
        ]);
        assert_eq!(
            encode(&v).unwrap(),
            vec![0x05, 0x03, 0x05, 0x00, 0x06, 0x00, 0x05, 0x01, 0x00]
        );
    }

    #[test]
    fn test_reported_length_matches_output() {
        let v = Value::Object(
            Object::new()
                .with("lo", "alice")
                .with("bl", Value::Array(vec![Value::from("x".repeat(200))])),
        );
        let mut buf = Vec::new();
        let n = write_value(&mut buf, &v).unwrap();
        assert_eq!(n, buf.len());
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut v = Value::Null;
        for _ in 0..100_000 {
            v = Value::Array(vec![v]);
        }
        let bytes = encode(&v).unwrap();
        assert_eq!(bytes.len(), 100_000 * 2 + 1);
        // Drop without recursing through 100k boxes.
        let mut cur = v;
        while let Value::Array(mut items) = cur {
            cur = items.pop().unwrap_or(Value::Null);
        }
    }
}
