//! Settings loading: defaults, optional file, `BUDDYVAULT_*` environment.

pub mod settings;

pub use settings::*;
