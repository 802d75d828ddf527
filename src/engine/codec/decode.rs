//! Strict deserialization of [`Value`] trees.
//!
//! Any input that is not exactly the encoding of one value is rejected with
//! [`CodecError::MalformedData`]: unknown tags, bool bytes other than 0 and
//! 1, length prefixes running past the end, invalid UTF-8, duplicate object
//! keys, overlong varints, excessive nesting and trailing bytes. No input
//! makes the decoder panic.

use buddyvault_error::CodecError;
use byteorder::{BigEndian, ReadBytesExt};

use super::{
    tags::{Tag, MAX_NESTING_DEPTH},
    varint::read_varint,
};
use crate::{CodecResult, Object, Value};

/// Bounds applied while decoding untrusted bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest container nesting accepted; a top-level array is depth 1.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Decodes exactly one value spanning all of `bytes`.
///
/// ```
/// use buddyvault::{engine::codec::decode, Value};
///
/// assert_eq!(decode(&[0x02, 0, 0, 0, 0, 0, 0, 0, 7]).unwrap(), Value::Int(7));
/// assert!(decode(&[0x02, 0, 0]).is_err());
/// ```
pub fn decode(bytes: &[u8]) -> CodecResult<Value> {
    decode_with_limits(bytes, DecodeLimits::default())
}

pub fn decode_with_limits(
    bytes: &[u8],
    limits: DecodeLimits,
) -> CodecResult<Value> {
    let mut reader = Reader::new(bytes);
    let value = reader.value(limits)?;
    if !reader.buf.is_empty() {
        return Err(CodecError::malformed(
            format!("{} trailing bytes", reader.buf.len()),
            reader.offset(),
        ));
    }
    Ok(value)
}

/// Decodes one value from the front of `input` and advances it past the
/// consumed bytes. Whatever follows is left for the caller.
pub fn read_value(input: &mut &[u8]) -> CodecResult<Value> {
    let mut reader = Reader::new(input);
    let value = reader.value(DecodeLimits::default())?;
    *input = reader.buf;
    Ok(value)
}

/// Container being filled in.
enum Pending {
    Array {
        items: Vec<Value>,
        remaining: usize,
    },
    Object {
        map: Object,
        remaining: usize,
        /// Key of the value currently being decoded.
        key: String,
    },
}

impl Pending {
    /// Stores a finished child, returns `true` once the container is full.
    fn push(
        &mut self,
        value: Value,
    ) -> bool {
        match self {
            Pending::Array { items, remaining } => {
                items.push(value);
                *remaining -= 1;
                *remaining == 0
            }
            Pending::Object {
                map,
                remaining,
                key,
            } => {
                map.insert(std::mem::take(key), value);
                *remaining -= 1;
                *remaining == 0
            }
        }
    }

    fn into_value(self) -> Value {
        match self {
            Pending::Array { items, .. } => Value::Array(items),
            Pending::Object { map, .. } => Value::Object(map),
        }
    }
}

/// Cursor over the input that knows its absolute offset.
struct Reader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            total: buf.len(),
        }
    }

    fn offset(&self) -> usize {
        self.total - self.buf.len()
    }

    fn malformed(
        &self,
        reason: impl Into<String>,
    ) -> CodecError {
        CodecError::malformed(reason, self.offset())
    }

    fn u8(
        &mut self,
        what: &str,
    ) -> CodecResult<u8> {
        self.buf
            .read_u8()
            .map_err(|_| self.malformed(format!("unexpected end of input reading {what}")))
    }

    fn i64(&mut self) -> CodecResult<i64> {
        self.buf
            .read_i64::<BigEndian>()
            .map_err(|_| self.malformed("unexpected end of input reading int"))
    }

    fn f64(&mut self) -> CodecResult<f64> {
        self.buf
            .read_f64::<BigEndian>()
            .map_err(|_| self.malformed("unexpected end of input reading double"))
    }

    fn varint(
        &mut self,
        what: &str,
    ) -> CodecResult<usize> {
        let start = self.offset();
        let mut probe = self.buf;
        match read_varint(&mut probe) {
            Ok(n) => {
                self.buf = probe;
                Ok(n as usize)
            }
            Err(e) => Err(CodecError::malformed(format!("{what}: {e}"), start)),
        }
    }

    fn bytes(
        &mut self,
        len: usize,
        what: &str,
    ) -> CodecResult<&'a [u8]> {
        if len > self.buf.len() {
            return Err(self.malformed(format!(
                "{what} of {len} bytes exceeds the {} remaining",
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    fn string(
        &mut self,
        what: &str,
    ) -> CodecResult<String> {
        let len = self.varint(what)?;
        let start = self.offset();
        let bytes = self.bytes(len, what)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| CodecError::malformed(format!("{what} is not valid UTF-8: {e}"), start))
    }

    /// Reads a container count and checks that the remaining input can hold
    /// that many children of at least `min_size` bytes each.
    fn count(
        &mut self,
        what: &str,
        min_size: usize,
    ) -> CodecResult<usize> {
        let count = self.varint(what)?;
        if count > self.buf.len() / min_size {
            return Err(self.malformed(format!(
                "{what} of {count} entries cannot fit in {} remaining bytes",
                self.buf.len()
            )));
        }
        Ok(count)
    }

    fn key(
        &mut self,
        map: &Object,
    ) -> CodecResult<String> {
        let start = self.offset();
        let key = self.string("object key")?;
        if map.contains_key(&key) {
            return Err(CodecError::malformed(
                format!("duplicate object key '{key}'"),
                start,
            ));
        }
        Ok(key)
    }

    fn value(
        &mut self,
        limits: DecodeLimits,
    ) -> CodecResult<Value> {
        let mut stack: Vec<Pending> = Vec::new();

        'values: loop {
            let start = self.offset();
            let tag = self.u8("tag")?;
            let tag = Tag::try_from(tag)
                .map_err(|_| CodecError::malformed(format!("unknown tag 0x{tag:02x}"), start))?;

            let mut done = match tag {
                Tag::Null => Value::Null,
                Tag::Bool => match self.u8("bool")? {
                    0 => Value::Bool(false),
                    1 => Value::Bool(true),
                    b => {
                        return Err(CodecError::malformed(
                            format!("invalid bool byte 0x{b:02x}"),
                            start + 1,
                        ))
                    }
                },
                Tag::Int => Value::Int(self.i64()?),
                Tag::Double => Value::Double(self.f64()?),
                Tag::Str => Value::Str(self.string("string")?),
                Tag::Array | Tag::Object => {
                    if stack.len() >= limits.max_depth {
                        return Err(CodecError::malformed(
                            format!("nesting deeper than {}", limits.max_depth),
                            start,
                        ));
                    }
                    if tag == Tag::Array {
                        let count = self.count("array", 1)?;
                        if count == 0 {
                            Value::Array(Vec::new())
                        } else {
                            stack.push(Pending::Array {
                                items: Vec::with_capacity(count),
                                remaining: count,
                            });
                            continue 'values;
                        }
                    } else {
                        // Each entry takes at least a key length and a tag.
                        let count = self.count("object", 2)?;
                        if count == 0 {
                            Value::Object(Object::new())
                        } else {
                            let map = Object::with_capacity(count);
                            let key = self.key(&map)?;
                            stack.push(Pending::Object {
                                map,
                                remaining: count,
                                key,
                            });
                            continue 'values;
                        }
                    }
                }
            };

            // Hand the finished value to its parent, closing every container
            // it completes.
            loop {
                let Some(mut parent) = stack.pop() else {
                    return Ok(done);
                };
                if parent.push(done) {
                    done = parent.into_value();
                    continue;
                }
                if let Pending::Object { map, key, .. } = &mut parent {
                    *key = self.key(map)?;
                }
                stack.push(parent);
                continue 'values;
            }
        }
    }
}
