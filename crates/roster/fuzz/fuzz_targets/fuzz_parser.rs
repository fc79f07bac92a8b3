//! Fuzz target for the upload parser.
//!
//! This fuzzer tests that the delimited-text parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Never produces a row wider than the header

#![no_main]

use libfuzzer_sys::fuzz_target;
use roster::Parser;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    if let Ok(table) = parser.parse_bytes(data) {
        for row in &table.rows {
            assert!(row.len() <= table.column_count());
        }
    }
});
