//! Fuzz target for a single item record, without a header in front.
//!
//! Run with:
//!   cargo +nightly fuzz run jdx_item_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use jdx::format::fuzz_parse_item;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let _ = fuzz_parse_item(data);
});
