use std::fmt;

use buddyvault_error::CodecError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Result of codec-level operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// A dynamically typed value as stored in a buddy list record.
///
/// Scalars are strings, booleans, 64-bit integers, doubles and `Null`;
/// containers are ordered arrays and insertion-ordered objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered, heterogeneous sequence.
    Array(Vec<Value>),
    /// String-keyed map preserving insertion order.
    Object(Object),
}

/// String-keyed map of values that keeps insertion order, so that
/// re-encoding a decoded object yields the same bytes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Object(IndexMap<String, Value>);

////////////////////////////////////////////////////////////////////////////////
// Value
////////////////////////////////////////////////////////////////////////////////

impl Value {
    /// Human readable type name, used in schema errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    // The `expect_*` family turns a type mismatch into a `SchemaMismatch`
    // naming `field`, which may be a key or a position like `bl[3]`.

    pub fn expect_str(
        &self,
        field: &str,
    ) -> CodecResult<&str> {
        self.as_str()
            .ok_or_else(|| CodecError::wrong_type(field, "string", self.type_name()))
    }

    pub fn expect_bool(
        &self,
        field: &str,
    ) -> CodecResult<bool> {
        self.as_bool()
            .ok_or_else(|| CodecError::wrong_type(field, "bool", self.type_name()))
    }

    pub fn expect_int(
        &self,
        field: &str,
    ) -> CodecResult<i64> {
        self.as_int()
            .ok_or_else(|| CodecError::wrong_type(field, "int", self.type_name()))
    }

    pub fn expect_double(
        &self,
        field: &str,
    ) -> CodecResult<f64> {
        self.as_double()
            .ok_or_else(|| CodecError::wrong_type(field, "double", self.type_name()))
    }

    pub fn expect_array(
        &self,
        field: &str,
    ) -> CodecResult<&[Value]> {
        self.as_array()
            .ok_or_else(|| CodecError::wrong_type(field, "array", self.type_name()))
    }

    pub fn expect_object(
        &self,
        field: &str,
    ) -> CodecResult<&Object> {
        self.as_object()
            .ok_or_else(|| CodecError::wrong_type(field, "object", self.type_name()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Array(items) => write!(f, "[{} items]", items.len()),
            Value::Object(obj) => write!(f, "{{{} fields}}", obj.len()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Object
////////////////////////////////////////////////////////////////////////////////

impl Object {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field. An existing key keeps its position and gets the new
    /// value; the old one is returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(
        &self,
        key: &str,
    ) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a field, keeping the order of the remaining ones.
    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Fetches a field that must be present, whatever its type.
    pub fn get_value(
        &self,
        key: &str,
        expected: &str,
    ) -> CodecResult<&Value> {
        self.get(key)
            .ok_or_else(|| CodecError::missing_field(key, expected))
    }

    pub fn get_str(
        &self,
        key: &str,
    ) -> CodecResult<&str> {
        self.get_value(key, "string")?.expect_str(key)
    }

    pub fn get_bool(
        &self,
        key: &str,
    ) -> CodecResult<bool> {
        self.get_value(key, "bool")?.expect_bool(key)
    }

    pub fn get_int(
        &self,
        key: &str,
    ) -> CodecResult<i64> {
        self.get_value(key, "int")?.expect_int(key)
    }

    pub fn get_double(
        &self,
        key: &str,
    ) -> CodecResult<f64> {
        self.get_value(key, "double")?.expect_double(key)
    }

    pub fn get_array(
        &self,
        key: &str,
    ) -> CodecResult<&[Value]> {
        self.get_value(key, "array")?.expect_array(key)
    }

    pub fn get_object(
        &self,
        key: &str,
    ) -> CodecResult<&Object> {
        self.get_value(key, "object")?.expect_object(key)
    }
}

/// Order-sensitive: `{a, b}` and `{b, a}` encode differently, so they are
/// not equal.
impl PartialEq for Object {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Fuzzing support
////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "fuzz")]
const ARBITRARY_MAX_DEPTH: usize = 8;

#[cfg(feature = "fuzz")]
impl<'a> arbitrary::Arbitrary<'a> for Value {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        arbitrary_value(u, 0)
    }
}

#[cfg(feature = "fuzz")]
fn arbitrary_value(
    u: &mut arbitrary::Unstructured<'_>,
    depth: usize,
) -> arbitrary::Result<Value> {
    let last_variant = if depth >= ARBITRARY_MAX_DEPTH { 4 } else { 6 };
    Ok(match u.int_in_range(0..=last_variant)? {
        0 => Value::Null,
        1 => Value::Bool(u.arbitrary()?),
        2 => Value::Int(u.arbitrary()?),
        3 => Value::Double(u.arbitrary()?),
        4 => Value::Str(u.arbitrary()?),
        5 => {
            let len = u.int_in_range(0..=4)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth + 1)?);
            }
            Value::Array(items)
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut map = Object::with_capacity(len);
            for _ in 0..len {
                let key: String = u.arbitrary()?;
                map.insert(key, arbitrary_value(u, depth + 1)?);
            }
            Value::Object(map)
        }
    })
}

#[cfg(test)]
mod tests {
    use buddyvault_error::{ErrorExt, StatusCode};

    use super::*;

    #[test]
    fn test_object_preserves_insertion_order() {
        let obj = Object::new()
            .with("zeta", 1)
            .with("alpha", 2)
            .with("mid", 3);
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut obj = Object::new().with("a", 1).with("b", 2);
        let old = obj.insert("a", 10);
        assert_eq!(old, Some(Value::Int(1)));
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj.get_int("a").unwrap(), 10);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab = Object::new().with("a", 1).with("b", 2);
        let ba = Object::new().with("b", 2).with("a", 1);
        assert_ne!(ab, ba);
        assert_eq!(ab, Object::new().with("a", 1).with("b", 2));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut obj = Object::new().with("a", 1).with("b", 2).with("c", 3);
        obj.remove("b");
        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_typed_getters() {
        let obj = Object::new()
            .with("bn", "bob")
            .with("bb", true)
            .with("n", 7)
            .with("d", 0.5)
            .with("arr", vec![Value::Null])
            .with("obj", Object::new());

        assert_eq!(obj.get_str("bn").unwrap(), "bob");
        assert!(obj.get_bool("bb").unwrap());
        assert_eq!(obj.get_int("n").unwrap(), 7);
        assert_eq!(obj.get_double("d").unwrap(), 0.5);
        assert_eq!(obj.get_array("arr").unwrap().len(), 1);
        assert!(obj.get_object("obj").unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let obj = Object::new();
        let err = obj.get_str("lo").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SchemaMismatch);
        assert_eq!(err, CodecError::missing_field("lo", "string"));
    }

    #[test]
    fn test_wrong_type_is_schema_mismatch() {
        let obj = Object::new().with("bb", "yes");
        let err = obj.get_bool("bb").unwrap_err();
        assert_eq!(err, CodecError::wrong_type("bb", "bool", "string"));
    }

    #[test]
    fn test_no_default_for_wrong_scalar() {
        assert!(Value::Int(0).expect_bool("x").is_err());
        assert!(Value::Double(1.0).expect_int("x").is_err());
        assert!(Value::Null.expect_str("x").is_err());
    }

    #[test]
    fn test_json_view() {
        let v = Value::Object(
            Object::new()
                .with("lo", "alice")
                .with("bl", Vec::<Value>::new()),
        );
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"lo":"alice","bl":[]}"#);
    }
}
