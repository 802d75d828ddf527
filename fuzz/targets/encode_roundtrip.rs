#![no_main]

use buddyvault::{decode, encode, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: Value| {
    let bytes = encode(&value).expect("encoding in-memory values cannot fail");
    let decoded = decode(&bytes).expect("encoded value must decode");
    assert_eq!(encode(&decoded).unwrap(), bytes);
});
