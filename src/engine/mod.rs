//! Storage engine of buddy lists.
//!
//! - `codec`: binary encoding of [`Value`](crate::Value) trees.
//! - `key`: owner name to file-system-safe storage key.
//! - `policy`: buddy list rules the store consults.
//! - `storage`: the [`BuddyStorage`] trait and its lifecycle states.
//! - `persistent`: file-system implementation, one file per owner.

pub mod codec;
pub mod key;
pub mod persistent;
pub mod policy;
pub mod storage;

pub use key::{decode_key, encode_key, encode_key_bytes, StorageKey};
pub use persistent::{FsBuddyStorage, MAX_KEY_LEN};
pub use policy::{BuddyListPolicy, BuddyListSettings};
pub use storage::{BuddyStorage, StoreState};
