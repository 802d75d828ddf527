use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Status codes used to categorize errors.
///
/// # Ranges
/// - 0xxx: success
/// - 1xxx: general errors
/// - 2xxx: data and schema errors
/// - 5xxx: storage lifecycle
/// - 6xxx: I/O
///
/// `num_enum::TryFromPrimitive` provides `TryFrom<u32>`, handy when a code
/// crosses a process boundary (CLI exit reporting, logs).
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: success ===
    Success = 0,

    // === 1xxx: general ===
    Unknown = 1000,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: data ===
    RecordNotFound = 2000,
    MalformedData = 2001,
    SchemaMismatch = 2002,
    InvalidIdentifier = 2003,
    InvalidUtf8 = 2004,
    CapacityExceeded = 2005,
    DuplicateBuddy = 2006,

    // === 5xxx: storage ===
    NotInitialized = 5000,
    PermissionDenied = 5001,
    SerializationFailed = 5002,

    // === 6xxx: I/O ===
    Io = 6000,
    UnexpectedEof = 6001,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Inherent methods
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Numeric representation of the code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Returns the variant for `v`, or `None` if no variant matches.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Returns `true` when `code` means success.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Errors caused by the stored bytes rather than by the medium or by the
    /// caller. A record failing with one of these is treated as damaged.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedData | Self::SchemaMismatch | Self::InvalidUtf8
        )
    }

    /// Errors that indicate a programming mistake in the caller.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized | Self::InvalidArgs | Self::InvalidIdentifier
        )
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Internal | Self::PermissionDenied)
    }

    /// Suggested log level for this code.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::RecordNotFound => LogLevel::Debug,
            Self::InvalidArgs
            | Self::InvalidIdentifier
            | Self::CapacityExceeded
            | Self::DuplicateBuddy => LogLevel::Info,
            Self::MalformedData | Self::SchemaMismatch | Self::InvalidUtf8 => LogLevel::Warn,
            Self::Internal | Self::PermissionDenied | Self::NotInitialized => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Trait impls
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
