use super::{resolve_spec_str, Category, TagError, TypeTag};
use pretty_assertions::assert_eq;

#[test]
fn registered_names_round_trip() {
    for tag in TypeTag::ALL {
        assert_eq!(TypeTag::from_registered_name(tag.name()), Some(tag));
    }
}

#[test]
fn categories_are_numeric_only() {
    assert_eq!(TypeTag::Int8.category(), Category::Integer);
    assert_eq!(TypeTag::UInt64.category(), Category::Integer);
    assert_eq!(TypeTag::Real32.category(), Category::Floating);
    assert_eq!(TypeTag::Complex128.category(), Category::Complex);
}

#[test]
fn widths() {
    assert_eq!(TypeTag::UInt16.bit_width(), 16);
    assert_eq!(TypeTag::Complex64.bit_width(), 64);
    assert_eq!(TypeTag::Complex128.bit_width(), 128);
    assert!(TypeTag::Int8.is_signed());
    assert!(!TypeTag::UInt8.is_signed());
}

#[test]
fn raw_descriptors_parse() {
    assert_eq!(TypeTag::parse_descriptor("int32"), Some(TypeTag::Int32));
    assert_eq!(TypeTag::parse_descriptor("u2"), Some(TypeTag::UInt16));
    assert_eq!(TypeTag::parse_descriptor("f8"), Some(TypeTag::Real64));
    assert_eq!(
        TypeTag::parse_descriptor("complex64"),
        Some(TypeTag::Complex64)
    );
}

#[test]
fn non_numeric_descriptors_rejected() {
    assert_eq!(TypeTag::parse_descriptor("bool"), None);
    assert_eq!(TypeTag::parse_descriptor("str"), None);
    assert_eq!(TypeTag::parse_descriptor(""), None);
}

#[test]
fn resolve_inference_marker() {
    assert_eq!(resolve_spec_str("Automatic"), Ok(None));
}

#[test]
fn resolve_registered_and_raw() {
    assert_eq!(
        resolve_spec_str("UnsignedInteger16"),
        Ok(Some(TypeTag::UInt16))
    );
    assert_eq!(resolve_spec_str("float32"), Ok(Some(TypeTag::Real32)));
}

#[test]
fn resolve_failure_carries_offending_spec() {
    let err = resolve_spec_str("Quaternion").unwrap_err();
    assert_eq!(
        err,
        TagError::Unsupported {
            spec: "Quaternion".to_string()
        }
    );
}
