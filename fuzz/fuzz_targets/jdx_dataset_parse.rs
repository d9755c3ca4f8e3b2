//! Fuzz target for full JDX dataset decoding.
//!
//! Feeds arbitrary bytes to the dataset reader. Declared lengths and counts
//! come straight from the input, so this mostly exercises the bounds checks
//! that run before any allocation.
//!
//! Run with:
//!   cargo +nightly fuzz run jdx_dataset_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use jdx::format::from_jdx_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_jdx_slice(data);
});
