/// Returns early with an error, like `anyhow::bail!`.
///
/// - `bail!(err)` takes any type convertible into `StackError`;
/// - `bail!(code, "msg")` builds a `GenericError`;
/// - `bail!(code, "fmt {}", arg)` formats the message.
///
/// ```ignore
/// use buddyvault_error::{bail, StatusCode};
///
/// fn check_zone(zone: &str) -> buddyvault_error::VaultResult<()> {
///     if zone.is_empty() {
///         bail!(StatusCode::InvalidArgs, "zone cannot be empty");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Calls `bail!` when the condition is false. Same forms as `bail!`.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Adds `.context(...)` and `.with_context(...)` to any `Result` whose error
/// converts into [`StackError`](crate::StackError).
pub trait ResultExt<T> {
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Lazy variant, the closure only runs on error.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().context(ctx))
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenericError, StatusCode, VaultResult};

    #[test]
    fn test_bail_with_format() {
        fn example(size: usize) -> VaultResult<()> {
            bail!(StatusCode::InvalidArgs, "list size {} is not allowed", size);
        }

        let err = example(0).unwrap_err();
        assert!(err.to_string().contains("list size 0 is not allowed"));
        assert!(err.is(StatusCode::InvalidArgs));
    }

    #[test]
    fn test_ensure() {
        fn validate(x: usize) -> VaultResult<()> {
            ensure!(x > 0, StatusCode::InvalidArgs, "must be positive");
            ensure!(x < 100, StatusCode::InvalidArgs, "too large: {}", x);
            Ok(())
        }

        assert!(validate(50).is_ok());
        assert!(validate(0).is_err());
        assert!(validate(150).is_err());
    }

    #[test]
    fn test_result_ext() {
        fn inner() -> Result<(), GenericError> {
            Err(GenericError::new(StatusCode::Internal, "inner error"))
        }

        fn outer() -> VaultResult<()> {
            inner().context("outer context")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].message, "outer context");
    }

    #[test]
    fn test_with_context_lazy() {
        fn example(success: bool) -> VaultResult<()> {
            let result: Result<(), GenericError> = if success {
                Ok(())
            } else {
                Err(GenericError::new(StatusCode::Internal, "error"))
            };
            result.with_context(|| format!("attempt {success}"))?;
            Ok(())
        }

        assert!(example(true).is_ok());
        assert_eq!(
            example(false).unwrap_err().contexts()[0].message,
            "attempt false"
        );
    }
}
