//! Tests for the scalar engine.

use super::op::{BinaryOp, ReduceOp};
use super::scalar;

// ============================================================================
// Reductions
// ============================================================================

#[test]
fn test_sum_small() {
    assert_eq!(scalar::sum(&[1_u8, 2]), 3);
    assert_eq!(scalar::sum(&[1.0_f64, 2.0]), 3.0);
    assert_eq!(scalar::sum(&[-5_i32, 2, 3]), 0);
}

#[test]
fn test_sum_empty_is_zero() {
    assert_eq!(scalar::sum::<u32>(&[]), 0);
    assert_eq!(scalar::sum::<f32>(&[]), 0.0);
}

#[test]
fn test_sum_wraps() {
    assert_eq!(scalar::sum(&[200_u8, 100]), 44);
    assert_eq!(scalar::sum(&[i16::MAX, 1]), i16::MIN);
    assert_eq!(scalar::sum(&[usize::MAX, 2]), 1);
}

#[test]
fn test_min_max() {
    let data = [3_i64, 1, 2];
    assert_eq!(scalar::min(&data), 1);
    assert_eq!(scalar::max(&data), 3);
    assert_eq!(scalar::max(&[1_u16, 2]), 2);
    assert_eq!(scalar::min(&[42_u8]), 42);
}

#[test]
fn test_min_max_float_nan_handling() {
    // A NaN after the first element never wins a strict comparison.
    assert_eq!(scalar::min(&[2.0_f32, f32::NAN, 1.0]), 1.0);
    assert_eq!(scalar::max(&[2.0_f64, f64::NAN, 5.0]), 5.0);
    // A leading NaN is never replaced.
    assert!(scalar::min(&[f32::NAN, 1.0]).is_nan());
}

#[test]
#[should_panic(expected = "cannot min an empty buffer")]
fn test_min_empty_panics() {
    let _ = scalar::min::<i8>(&[]);
}

#[test]
#[should_panic(expected = "cannot max an empty buffer")]
fn test_max_empty_panics() {
    let _ = scalar::max::<f64>(&[]);
}

#[test]
fn test_reduce_selects_operation() {
    let data = [4_u32, 9, 2];
    assert_eq!(scalar::reduce(ReduceOp::Sum, &data), 15);
    assert_eq!(scalar::reduce(ReduceOp::Min, &data), 2);
    assert_eq!(scalar::reduce(ReduceOp::Max, &data), 9);
}

// ============================================================================
// Paired arithmetic
// ============================================================================

#[test]
fn test_elementwise_ops() {
    let lhs = [10_i32, 20, 30];
    let rhs = [3_i32, 4, 5];
    let mut out = [0_i32; 3];

    assert_eq!(scalar::add(&mut out, &lhs, &rhs), &[13, 24, 35]);
    assert_eq!(scalar::sub(&mut out, &lhs, &rhs), &[7, 16, 25]);
    assert_eq!(scalar::mul(&mut out, &lhs, &rhs), &[30, 80, 150]);
    assert_eq!(scalar::div(&mut out, &lhs, &rhs), &[3, 5, 6]);
}

#[test]
fn test_integer_edge_cases() {
    let mut out = [0_i8; 2];
    scalar::div(&mut out, &[i8::MIN, -7], &[-1, 2]);
    assert_eq!(out, [i8::MIN, -3]);

    let mut out = [0_u8; 2];
    scalar::sub(&mut out, &[0, 5], &[1, 5]);
    assert_eq!(out, [255, 0]);
}

#[test]
fn test_float_division_by_zero_is_ieee() {
    let mut out = [0.0_f32; 3];
    scalar::div(&mut out, &[1.0, -1.0, 0.0], &[0.0, 0.0, 0.0]);
    assert_eq!(out[0], f32::INFINITY);
    assert_eq!(out[1], f32::NEG_INFINITY);
    assert!(out[2].is_nan());
}

#[test]
fn test_assign_forms_match_distinct_output() {
    let lhs = [8_u32, 6, 4, 2];
    let rhs = [1_u32, 2, 3, 4];
    for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
        let mut expected = [0_u32; 4];
        scalar::apply(op, &mut expected, &lhs, &rhs);

        let mut into_lhs = lhs;
        scalar::apply_assign(op, &mut into_lhs, &rhs);
        assert_eq!(into_lhs, expected, "{op} into lhs");

        let mut into_rhs = rhs;
        scalar::apply_assign_rhs(op, &lhs, &mut into_rhs);
        assert_eq!(into_rhs, expected, "{op} into rhs");
    }
}

#[test]
fn test_named_assign_forms() {
    let mut lhs = [1.5_f64, 2.5];
    scalar::mul_assign(&mut lhs, &[2.0, 2.0]);
    assert_eq!(lhs, [3.0, 5.0]);

    let mut rhs = [4_i16, 5];
    scalar::sub_assign_rhs(&[10, 10], &mut rhs);
    assert_eq!(rhs, [6, 5]);
}

#[test]
fn test_empty_buffers_are_noop() {
    let mut out: [u8; 0] = [];
    assert!(scalar::add(&mut out, &[], &[]).is_empty());
}

#[test]
#[should_panic(expected = "buffer length mismatch: expected 2 elements, got 3")]
fn test_length_mismatch_panics() {
    let mut out = [0_u8; 2];
    scalar::add(&mut out, &[1, 2, 3], &[1, 2]);
}

#[test]
fn test_integer_division_by_zero_panics_before_writing() {
    let mut out = [7_u16; 3];
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        scalar::div(&mut out, &[4, 4, 4], &[2, 0, 1]);
    }));
    let payload = result.unwrap_err();
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert_eq!(message, "integer division by zero at index 1");
    assert_eq!(out, [7, 7, 7]);
}

#[test]
fn test_validation_helpers() {
    assert_eq!(scalar::first_zero_divisor(BinaryOp::Div, &[1_i32, 0, 0]), Some(1));
    assert_eq!(scalar::first_zero_divisor(BinaryOp::Add, &[0_i32]), None);
    assert_eq!(scalar::first_zero_divisor(BinaryOp::Div, &[0.0_f32]), None);
    assert!(scalar::validate_operands(BinaryOp::Div, 2, &[1.0_f64, 2.0], &[0.0, 0.0]).is_ok());
    assert!(matches!(
        scalar::validate_operands(BinaryOp::Add, 2, &[1_u8], &[1, 2]),
        Err(crate::Error::LengthMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn test_generic_over_pointer_sized_integers() {
    assert_eq!(scalar::sum(&[1_usize, 2, 3]), 6);
    assert_eq!(scalar::min(&[-1_isize, -9, 4]), -9);
    let mut out = [0_isize; 2];
    scalar::mul(&mut out, &[3, -4], &[5, 6]);
    assert_eq!(out, [15, -24]);
}
