//! Tests for tagged buffers and values.

use super::element::ElementKind;
use super::error::Error;
use super::vector::{Value, Vector, VectorMut, VectorRef};

#[test]
fn test_sequence_pattern() {
    let seq = Vector::sequence(ElementKind::U8, 205);
    let Vector::U8(values) = &seq else {
        panic!("wrong kind: {:?}", seq.kind());
    };
    assert_eq!(values[0], 1);
    assert_eq!(values[99], 100);
    assert_eq!(values[100], 1);
    assert_eq!(values[204], 5);
    assert_eq!(seq.len(), 205);
}

#[test]
fn test_sequence_every_kind() {
    for kind in ElementKind::ALL {
        let seq = Vector::sequence(kind, 3);
        assert_eq!(seq.kind(), kind);
        assert_eq!(seq.get(2).map(|v| v.as_f64()), Some(3.0));
    }
}

#[test]
fn test_zeros() {
    let zeros = Vector::zeros(ElementKind::F32, 4);
    assert_eq!(zeros, Vector::F32(vec![0.0; 4]));
    assert!(Vector::zeros(ElementKind::I8, 0).is_empty());
}

#[test]
fn test_parse_values() {
    let parsed = Vector::parse(ElementKind::I16, &["1", " -2", "300"]).expect("valid");
    assert_eq!(parsed, Vector::I16(vec![1, -2, 300]));

    let parsed = Vector::parse(ElementKind::F64, &["0.5".to_string(), "inf".to_string()]).expect("valid");
    assert_eq!(parsed, Vector::F64(vec![0.5, f64::INFINITY]));
}

#[test]
fn test_parse_rejects_out_of_range() {
    let err = Vector::parse(ElementKind::U8, &["1", "256"]).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidValue { kind: ElementKind::U8, ref value } if value == "256"
    ));
}

#[test]
fn test_borrowed_views() {
    let mut vector = Vector::from(vec![1_u64, 2, 3]);
    assert_eq!(vector.as_ref(), VectorRef::U64(&[1, 2, 3]));
    assert_eq!(vector.as_ref().len(), 3);
    assert_eq!(vector.as_ref().to_vector(), vector);

    let view = vector.as_mut();
    assert_eq!(view.kind(), ElementKind::U64);
    assert_eq!(view.len(), 3);
    if let VectorMut::U64(values) = view {
        values[0] = 9;
    }
    assert_eq!(vector.get(0), Some(Value::U64(9)));
    assert_eq!(vector.get(3), None);
}

#[test]
fn test_display() {
    assert_eq!(Vector::from(vec![1_i8, -2]).to_string(), "[1, -2]");
    assert_eq!(Vector::from(Vec::<f32>::new()).to_string(), "[]");
    assert_eq!(Value::F32(1.5).to_string(), "1.5");
    assert_eq!(Value::from(7_u16).kind(), ElementKind::U16);
}

#[test]
fn test_serde_tagged() {
    let json = serde_json::to_string(&Value::I32(-3)).expect("serializable");
    assert_eq!(json, r#"{"kind":"i32","value":-3}"#);

    let vector: Vector = serde_json::from_str(r#"{"kind":"u16","values":[1,2]}"#).expect("deserializable");
    assert_eq!(vector, Vector::U16(vec![1, 2]));
}
