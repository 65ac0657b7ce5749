//! Tests for error messages and conversions.

use super::config::{ConfigError, LanewiseConfig};
use super::element::ElementKind;
use super::error::Error;
use super::op::Op;

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::EmptyInput { op: Op::Min }.to_string(),
        "cannot min an empty buffer"
    );
    assert_eq!(
        Error::LengthMismatch {
            expected: 4,
            actual: 3
        }
        .to_string(),
        "buffer length mismatch: expected 4 elements, got 3"
    );
    assert_eq!(
        Error::KindMismatch {
            expected: ElementKind::U8,
            actual: ElementKind::F32
        }
        .to_string(),
        "element kind mismatch: expected u8, got f32"
    );
    assert_eq!(
        Error::DivisionByZero { index: 7 }.to_string(),
        "integer division by zero at index 7"
    );
    assert_eq!(Error::NotAReduction(Op::Add).to_string(), "'add' is not a reduction");
    assert_eq!(
        Error::NotBinary(Op::Sum).to_string(),
        "'sum' is not a paired arithmetic operation"
    );
    assert_eq!(
        Error::InvalidValue {
            kind: ElementKind::I8,
            value: "300".to_string()
        }
        .to_string(),
        "invalid i8 value '300'"
    );
}

#[test]
fn test_config_error_converts_transparently() {
    let config_err = LanewiseConfig::from_toml_str("[logging]\nlevel = \"noisy\"\n").unwrap_err();
    let message = config_err.to_string();
    let err: Error = config_err.into();
    assert!(matches!(err, Error::Config(ConfigError::Invalid { .. })));
    assert_eq!(err.to_string(), message);
}
