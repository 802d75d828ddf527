pub mod ext;
pub mod macros;
pub mod stack;
pub mod status_code;
pub mod types;

// Re-export everything so downstream crates can `use buddyvault_error::*`.
pub use ext::*;
pub use macros::*;
pub use stack::*;
pub use status_code::*;
pub use types::*;

pub type VaultResult<T> = Result<T, StackError>;
