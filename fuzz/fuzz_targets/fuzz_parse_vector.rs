//! Fuzz target for textual vector input.
//!
//! Feeds arbitrary whitespace-separated tokens through `Vector::parse` and,
//! when they parse, through every operation of the dynamic API. Nothing
//! should panic: bad input must come back as an error.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_parse_vector
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use lanewise_core::{generic, ElementKind, Op, Vector};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    let kind = ElementKind::ALL[usize::from(selector) % ElementKind::ALL.len()];
    let (lhs, rhs) = text.split_once('|').unwrap_or((text, text));
    let lhs: Vec<&str> = lhs.split_whitespace().collect();
    let rhs: Vec<&str> = rhs.split_whitespace().collect();

    let (Ok(lhs), Ok(rhs)) = (Vector::parse(kind, &lhs), Vector::parse(kind, &rhs)) else {
        return;
    };

    for op in Op::ALL {
        match op.as_reduce() {
            Some(_) => {
                let _ = generic::reduce(op, lhs.as_ref());
            }
            None => {
                let _ = generic::apply(op, lhs.as_ref(), rhs.as_ref());
            }
        }
    }
});
