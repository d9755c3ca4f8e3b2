//! Fuzz target for header-only decoding.
//!
//! Run with:
//!   cargo +nightly fuzz run jdx_header_parse

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use jdx::format::read_header_only;

fuzz_target!(|data: &[u8]| {
    let _ = read_header_only(Cursor::new(data));
});
