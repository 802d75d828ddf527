/// Settings loading (file and environment).
pub mod config;
/// Value codec, storage keys, buddy list policy and the record store.
pub mod engine;
/// `tracing` subscriber setup.
pub mod logging;
/// Value tree, live buddy lists and the persisted record schema.
pub mod model;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Error stack shared with the `buddyvault-error` crate.
pub use buddyvault_error::{StackError, StatusCode, VaultResult};
/// config
pub use self::config::{Settings, StorageConfig};
/// Codec entry points and the store.
pub use engine::{
    codec::{decode, decode_with_limits, encode, read_value, write_value, DecodeLimits},
    decode_key, encode_key, encode_key_bytes, BuddyListPolicy, BuddyListSettings, BuddyStorage,
    FsBuddyStorage, StorageKey, StoreState, MAX_KEY_LEN,
};
/// Model types.
pub use model::{
    Buddy, BuddyList, BuddyRecord, BuddyVariable, CodecResult, LoadedBuddyList, Object, Record,
    SkippedBuddy, Value, VariableType,
};
