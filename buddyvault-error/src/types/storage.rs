use std::{any::Any, io, path::Path};

use crate::{ErrorExt, StatusCode};

/// Errors of the buddy list record store.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// The store was used before a successful `init()`.
    NotInitialized { zone: String },
    /// No record exists for this owner.
    RecordNotFound { owner: String },
    /// The underlying medium failed.
    Io {
        operation: &'static str,
        path: String,
        kind: io::ErrorKind,
        reason: String,
    },
    /// The live buddy list is full.
    CapacityExceeded { owner: String, limit: usize },
    /// The live buddy list already holds a buddy with this name.
    DuplicateBuddy { owner: String, buddy: String },
}

impl StorageError {
    pub fn io(
        operation: &'static str,
        path: &Path,
        err: &io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.display().to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotInitialized { zone } => write!(
                f,
                "Buddy storage for zone '{zone}' is not initialized"
            ),
            Self::RecordNotFound { owner } => write!(f, "Buddy list not found for: {owner}"),
            Self::Io {
                operation,
                path,
                reason,
                ..
            } => write!(f, "I/O failure during {operation} on {path}: {reason}"),
            Self::CapacityExceeded { owner, limit } => write!(
                f,
                "Buddy list of '{owner}' is full ({limit} buddies max)"
            ),
            Self::DuplicateBuddy { owner, buddy } => {
                write!(f, "Buddy '{buddy}' is already in the list of '{owner}'")
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl ErrorExt for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotInitialized { .. } => StatusCode::NotInitialized,
            Self::RecordNotFound { .. } => StatusCode::RecordNotFound,
            Self::Io { kind, .. } if *kind == io::ErrorKind::PermissionDenied => {
                StatusCode::PermissionDenied
            }
            Self::Io { .. } => StatusCode::Io,
            Self::CapacityExceeded { .. } => StatusCode::CapacityExceeded,
            Self::DuplicateBuddy { .. } => StatusCode::DuplicateBuddy,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::NotInitialized { .. } => "Buddy storage unavailable".to_string(),
            Self::RecordNotFound { .. } => "Buddy list not found".to_string(),
            Self::Io { .. } => "Internal storage error".to_string(),
            Self::CapacityExceeded { limit, .. } => {
                format!("Buddy list is full ({limit} buddies max)")
            }
            Self::DuplicateBuddy { buddy, .. } => format!("Buddy '{buddy}' already listed"),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "storage".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::Io { operation, .. } = self {
            tags.push(("operation", operation.to_string()));
        }
        tags
    }
}
