use std::{any::Any, error::Error};

use crate::StatusCode;

/// Object-safe extension implemented by every buddyvault error type.
///
/// Gives the status code, a message that is safe to show outside the
/// process, a detailed message for logs and tags for observability.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Defaults to [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Enables `downcast_ref` on the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Message without internal details. Internal errors collapse into a
    /// generic string.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => "Internal storage error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Detailed message, may contain owner names and paths.
    fn log_message(&self) -> String {
        format!("{self:?}")
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ]
    }

    /// Short type name, without the module path.
    fn type_name(&self) -> String {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .to_string()
    }
}
