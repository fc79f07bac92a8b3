//! Fuzz target for extracting JSON from free-form replies.
//!
//! Arbitrary model output must either parse or fail cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roster::extract::{json_array_span, parse_embedded_array, parse_fenced_object};
use roster::{RuleKind, ValidationError};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(span) = json_array_span(text) {
        assert!(span.starts_with('[') && span.ends_with(']'));
    }
    let _ = parse_embedded_array::<ValidationError>(text);
    let _ = parse_fenced_object::<RuleKind>(text);
});
