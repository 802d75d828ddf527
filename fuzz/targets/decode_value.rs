#![no_main]

use buddyvault::{decode_with_limits, encode, DecodeLimits};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must never panic the decoder. Whatever decodes must
// re-encode to the very same bytes, since every value has one encoding.
fuzz_target!(|data: &[u8]| {
    let Ok(value) = decode_with_limits(data, DecodeLimits { max_depth: 64 }) else {
        return;
    };
    let bytes = encode(&value).expect("decoded value must encode");
    assert_eq!(bytes, data, "decode then encode changed the bytes");
});
