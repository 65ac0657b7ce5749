#![allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
//! End-to-end scenarios through the public API, run on both execution paths.
//!
//! Every test installs capability overrides, so all of them hold the
//! `dispatch` key exclusively.

use lanewise_core::{
    dispatch, generic, simd_level, with_capabilities, Capabilities, CapabilityOverride, Op, SimdLevel,
    Vector,
};
use serial_test::serial;

const SEQUENCE_LEN: usize = 70;

/// Runs `f` once on the scalar engine and once on the processor's best path.
fn on_both_paths<R>(f: impl Fn() -> R) -> (R, R) {
    let scalar = with_capabilities(Capabilities::scalar_only(), &f);
    let accelerated = {
        let _guard = CapabilityOverride::hardware();
        f()
    };
    (scalar, accelerated)
}

#[test]
#[serial(dispatch)]
fn test_sum_of_one_two() {
    macro_rules! check {
        ($($ty:ident),*) => {
            $(
                let (scalar, accelerated) = on_both_paths(|| dispatch::sum::<$ty>(&[1 as $ty, 2 as $ty]));
                assert_eq!(scalar, 3 as $ty, "{}", stringify!($ty));
                assert_eq!(accelerated, 3 as $ty, "{}", stringify!($ty));
            )*
        };
    }
    check!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
}

#[test]
#[serial(dispatch)]
fn test_min_max_of_three_one_two() {
    macro_rules! check {
        ($($ty:ident),*) => {
            $(
                let data = [3 as $ty, 1 as $ty, 2 as $ty];
                let (scalar, accelerated) =
                    on_both_paths(|| (dispatch::min(&data), dispatch::max(&data)));
                assert_eq!(scalar, (1 as $ty, 3 as $ty), "{}", stringify!($ty));
                assert_eq!(accelerated, scalar, "{}", stringify!($ty));

                let pair = [1 as $ty, 2 as $ty];
                assert_eq!(dispatch::max(&pair), 2 as $ty, "{}", stringify!($ty));
            )*
        };
    }
    check!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
}

#[test]
#[serial(dispatch)]
#[allow(overflowing_literals)]
fn test_add_seventy_element_sequences() {
    macro_rules! check {
        ($($ty:ident),*) => {
            $(
                let input: Vec<$ty> = (0..SEQUENCE_LEN).map(|i| (i + 1) as $ty).collect();
                let (scalar, accelerated) = on_both_paths(|| {
                    let mut out = vec![0 as $ty; SEQUENCE_LEN];
                    dispatch::add(&mut out, &input, &input);
                    out
                });
                assert_eq!(scalar, accelerated, "{}", stringify!($ty));
                assert_eq!(scalar[69], 140 as $ty, "{}", stringify!($ty));
            )*
        };
    }
    check!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
}

#[test]
#[serial(dispatch)]
fn test_div_seventy_element_sequences() {
    macro_rules! check {
        ($($ty:ident),*) => {
            $(
                let input: Vec<$ty> = (0..SEQUENCE_LEN).map(|i| (i + 1) as $ty).collect();
                let (scalar, accelerated) = on_both_paths(|| {
                    let mut out = vec![0 as $ty; SEQUENCE_LEN];
                    dispatch::div(&mut out, &input, &input);
                    out
                });
                for (i, (s, a)) in scalar.iter().zip(&accelerated).enumerate() {
                    assert!(
                        ((*s as f64) - (*a as f64)).abs() <= 0.01,
                        "{} index {i}: scalar={s} accelerated={a}",
                        stringify!($ty)
                    );
                    assert_eq!(*s, 1 as $ty);
                }
            )*
        };
    }
    check!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
}

#[test]
#[serial(dispatch)]
fn test_flags_false_then_true_leave_results_unchanged() {
    let input = Vector::sequence(lanewise_core::ElementKind::I16, 257);
    let run = || {
        let reductions: Vec<_> = [Op::Sum, Op::Min, Op::Max]
            .into_iter()
            .map(|op| generic::reduce(op, input.as_ref()).expect("non-empty"))
            .collect();
        let products = generic::apply(Op::Mul, input.as_ref(), input.as_ref()).expect("same shape");
        (reductions, products)
    };

    let before = run();
    {
        let _guard = CapabilityOverride::scalar_only();
        assert_eq!(simd_level(), SimdLevel::Scalar);
        assert_eq!(run(), before);
    }
    {
        let _guard = CapabilityOverride::hardware();
        assert_eq!(run(), before);
    }
    assert_eq!(run(), before);
}

#[test]
#[serial(dispatch)]
fn test_generic_sum_matches_typed_on_both_paths() {
    macro_rules! check {
        ($($ty:ident),*) => {
            $(
                let data: Vec<$ty> = (0..33).map(|i| ((i % 100) + 1) as $ty).collect();
                let (scalar, accelerated) =
                    on_both_paths(|| (generic::sum(&data), dispatch::sum(&data)));
                assert_eq!(scalar.0, scalar.1, "{}", stringify!($ty));
                assert_eq!(accelerated.0, accelerated.1, "{}", stringify!($ty));
            )*
        };
    }
    check!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
}
