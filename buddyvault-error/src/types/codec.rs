use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Errors of the composite value codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The byte stream is corrupt, truncated or carries trailing bytes.
    MalformedData { reason: String, offset: usize },
    /// A decoded tree lacks a field or holds the wrong type in it.
    SchemaMismatch {
        field: String,
        expected: String,
        actual: String,
    },
    /// A string or container is too large for the length prefix.
    TooLarge { what: String, len: usize },
}

impl CodecError {
    pub fn malformed(
        reason: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::MalformedData {
            reason: reason.into(),
            offset,
        }
    }

    pub fn missing_field(
        field: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: "nothing".to_string(),
        }
    }

    pub fn wrong_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Byte offset of a decoding failure.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::MalformedData { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl std::fmt::Display for CodecError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::MalformedData { reason, offset } => {
                write!(f, "Malformed data at offset {offset}: {reason}")
            }
            Self::SchemaMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Schema mismatch for field '{field}': expected {expected}, got {actual}"
            ),
            Self::TooLarge { what, len } => {
                write!(f, "{what} of length {len} exceeds the encodable maximum")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl ErrorExt for CodecError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedData { .. } => StatusCode::MalformedData,
            Self::SchemaMismatch { .. } => StatusCode::SchemaMismatch,
            Self::TooLarge { .. } => StatusCode::SerializationFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::MalformedData { .. } => "Stored record is damaged".to_string(),
            Self::SchemaMismatch { field, .. } => format!("Stored record lacks field '{field}'"),
            Self::TooLarge { what, .. } => format!("{what} is too large to store"),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "codec".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::SchemaMismatch { field, .. } = self {
            tags.push(("field", field.clone()));
        }
        tags
    }
}
