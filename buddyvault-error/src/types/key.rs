use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Errors of the owner-name ⇄ storage-key encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    NotUtf8 { reason: String },
    MalformedKey { key: String, reason: String },
    /// The key would not fit in a file name.
    TooLong { len: usize, max: usize },
    Empty,
}

impl std::fmt::Display for KeyError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotUtf8 { reason } => write!(f, "Identifier is not valid UTF-8: {reason}"),
            Self::MalformedKey { key, reason } => {
                write!(f, "Malformed storage key '{key}': {reason}")
            }
            Self::TooLong { len, max } => write!(
                f,
                "Storage key of {len} bytes exceeds the {max}-byte limit"
            ),
            Self::Empty => write!(f, "Empty identifier cannot address a record"),
        }
    }
}

impl std::error::Error for KeyError {}

impl ErrorExt for KeyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidIdentifier
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
