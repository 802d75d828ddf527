//! In-memory types: the generic [`Value`] tree, the live buddy list and the
//! record schema it is saved as.

pub mod buddy;
pub mod record;
pub mod value;

pub use buddy::*;
pub use record::*;
pub use value::*;
