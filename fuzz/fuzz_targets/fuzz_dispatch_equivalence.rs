//! Fuzz target comparing runtime dispatch against the scalar engine.
//!
//! Looks for:
//! - Accelerated kernels that disagree with the reference loops
//! - Out-of-bounds access in block tails
//! - Panics on valid input (NaN, infinities, wrapping integers)
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_dispatch_equivalence
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lanewise_core::{dispatch, scalar, BinaryOp, Element};

const MAX_LEN: usize = 4096;

/// One pair of operand buffers; `rhs` is resized to `lhs.len()`.
#[derive(Arbitrary, Debug)]
enum Buffers {
    U8(Vec<u8>, Vec<u8>),
    U16(Vec<u16>, Vec<u16>),
    U32(Vec<u32>, Vec<u32>),
    U64(Vec<u64>, Vec<u64>),
    I8(Vec<i8>, Vec<i8>),
    I16(Vec<i16>, Vec<i16>),
    I32(Vec<i32>, Vec<i32>),
    I64(Vec<i64>, Vec<i64>),
    F32(Vec<f32>, Vec<f32>),
    F64(Vec<f64>, Vec<f64>),
}

#[allow(clippy::eq_op)]
fn same<T: PartialEq>(a: T, b: T) -> bool {
    a == b || (a != a && b != b)
}

fn check<T: Element>(mut lhs: Vec<T>, mut rhs: Vec<T>) {
    lhs.truncate(MAX_LEN);
    rhs.resize(lhs.len(), T::ZERO);

    if !lhs.is_empty() {
        // Float sums reassociate across lanes.
        if T::INTEGRAL {
            assert_eq!(dispatch::sum(&lhs), scalar::sum(&lhs));
        }
        // Debug output tells `0.0` from `-0.0`, which `==` does not.
        assert_eq!(format!("{:?}", dispatch::min(&lhs)), format!("{:?}", scalar::min(&lhs)));
        assert_eq!(format!("{:?}", dispatch::max(&lhs)), format!("{:?}", scalar::max(&lhs)));
    }

    let has_zero_divisor = rhs.iter().any(|v| v.is_zero());
    for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
        if op == BinaryOp::Div && T::INTEGRAL && has_zero_divisor {
            continue;
        }

        let mut expected = vec![T::ZERO; lhs.len()];
        scalar::apply(op, &mut expected, &lhs, &rhs);

        let mut out = vec![T::ZERO; lhs.len()];
        dispatch::apply(op, &mut out, &lhs, &rhs);
        assert!(out.iter().zip(&expected).all(|(a, b)| same(*a, *b)), "{op}");

        let mut in_place = lhs.clone();
        dispatch::apply_assign(op, &mut in_place, &rhs);
        assert!(in_place.iter().zip(&expected).all(|(a, b)| same(*a, *b)), "{op} assign");
    }
}

fuzz_target!(|input: Buffers| {
    match input {
        Buffers::U8(a, b) => check(a, b),
        Buffers::U16(a, b) => check(a, b),
        Buffers::U32(a, b) => check(a, b),
        Buffers::U64(a, b) => check(a, b),
        Buffers::I8(a, b) => check(a, b),
        Buffers::I16(a, b) => check(a, b),
        Buffers::I32(a, b) => check(a, b),
        Buffers::I64(a, b) => check(a, b),
        Buffers::F32(a, b) => check(a, b),
        Buffers::F64(a, b) => check(a, b),
    }
});
