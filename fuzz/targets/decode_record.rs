#![no_main]

use buddyvault::{BuddyListSettings, Record};
use libfuzzer_sys::fuzz_target;

// Corrupt records fail with an error, never a panic, and whatever parses can
// be rebuilt into a live list under a small policy.
fuzz_target!(|data: &[u8]| {
    let Ok(record) = Record::from_bytes(data) else {
        return;
    };
    let policy = BuddyListSettings {
        allow_offline_variables: true,
        max_buddy_list_size: 4,
    };
    let loaded = record.into_list(&policy);
    assert!(loaded.list.len() <= 4);
});
