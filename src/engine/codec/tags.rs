//! Tag bytes of the value wire format.

use num_enum::TryFromPrimitive;

use crate::Value;

pub const TAG_NULL: u8 = 0x00;
pub const TAG_BOOL: u8 = 0x01;
pub const TAG_INT: u8 = 0x02;
pub const TAG_DOUBLE: u8 = 0x03;
pub const TAG_STR: u8 = 0x04;
pub const TAG_ARRAY: u8 = 0x05;
pub const TAG_OBJECT: u8 = 0x06;

/// Default bound on container nesting accepted by the decoder.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Tag byte preceding every encoded value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Tag {
    Null = TAG_NULL,
    Bool = TAG_BOOL,
    Int = TAG_INT,
    Double = TAG_DOUBLE,
    Str = TAG_STR,
    Array = TAG_ARRAY,
    Object = TAG_OBJECT,
}

impl Tag {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Bool,
            Value::Int(_) => Tag::Int,
            Value::Double(_) => Tag::Double,
            Value::Str(_) => Tag::Str,
            Value::Array(_) => Tag::Array,
            Value::Object(_) => Tag::Object,
        }
    }

    pub const fn byte(self) -> u8 {
        self as u8
    }
}
