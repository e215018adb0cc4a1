//! Error kinds and the context they carry.

use binstruct_core::{
    Codec, CodecConfig, CodecError, ErrorKind, Field, Schema, SchemaError, Value, WireTag,
};

use super::helpers::{header_schema, text_record_schema};

#[test]
fn test_short_buffer_underflows() {
    for len in 0..6 {
        let data = vec![0u8; len];
        let err = header_schema().unpack(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Underflow, "buffer of {} bytes", len);
    }
}

#[test]
fn test_underflow_reports_field_and_offset() {
    let err = text_record_schema()
        .unpack(b"\x00\x00\x00\x09foo")
        .unwrap_err();
    match err {
        CodecError::Underflow {
            schema,
            field,
            offset,
            requested,
            remaining,
        } => {
            assert_eq!(schema, "TextRecord");
            assert_eq!(field, "text");
            assert_eq!((offset, requested, remaining), (4, 9, 3));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_forward_dependency_rejected_at_build() {
    let err = Schema::builder("Backwards")
        .field(Field::char_array("data").length_of("len"))
        .field(Field::unsigned_char("len"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::ForwardDependency { .. }));
}

#[test]
fn test_unknown_dependency_rejected_at_build() {
    let err = Schema::builder("Dangling")
        .field(Field::char_array("data").length_of("missing"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownDependency { .. }));
}

#[test]
fn test_duplicate_field_rejected() {
    let err = Schema::builder("Twice")
        .field(Field::int("a"))
        .field(Field::short("a"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateField {
            schema: "Twice".to_string(),
            field: "a".to_string(),
        }
    );
}

#[test]
fn test_negative_length_is_type_mismatch() {
    let err = text_record_schema()
        .unpack(b"\xff\xff\xff\xfffoo")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    match err {
        CodecError::TypeMismatch { field, .. } => assert_eq!(field, "text"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_pack_missing_value() {
    let instance = header_schema().instance().with("kind", 1).unwrap();
    let err = instance.pack().unwrap_err();
    assert_eq!(
        err,
        CodecError::MissingValue {
            schema: "Header".to_string(),
            field: "length".to_string(),
        }
    );
}

#[test]
fn test_pack_type_mismatch_carries_offset() {
    let instance = header_schema()
        .instance()
        .with("kind", 1)
        .unwrap()
        .with("length", "six")
        .unwrap();
    match instance.pack().unwrap_err() {
        CodecError::TypeMismatch { field, offset, .. } => {
            assert_eq!(field, "length");
            assert_eq!(offset, 2);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_pack_out_of_range() {
    let instance = header_schema()
        .instance()
        .with("kind", 40_000)
        .unwrap()
        .with("length", 0)
        .unwrap();
    assert_eq!(instance.pack().unwrap_err().kind(), ErrorKind::ValueOutOfRange);
}

#[test]
fn test_pack_wrong_sequence_length() {
    let schema = Schema::builder("Pair")
        .field(Field::unsigned_short("pair").count(2))
        .build()
        .unwrap();
    let instance = schema
        .instance()
        .with("pair", vec![Value::UInt(1)])
        .unwrap();
    assert_eq!(instance.pack().unwrap_err().kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_pack_unencodable_text() {
    let schema = Schema::builder("Latin")
        .field(
            Field::char_array("name")
                .count(4)
                .encoding(encoding_rs::WINDOWS_1252),
        )
        .build()
        .unwrap();
    let instance = schema.instance().with("name", "日本").unwrap();
    assert_eq!(instance.pack().unwrap_err().kind(), ErrorKind::TextEncode);
}

#[test]
fn test_trailing_bytes_rejected_when_configured() {
    let config = CodecConfig {
        reject_trailing_bytes: true,
        ..Default::default()
    };
    let codec = Codec::new(config).unwrap();
    let data = [0, 1, 0, 0, 0, 2, 0xff];

    let err = codec.unpack(&header_schema(), &data).unwrap_err();
    assert_eq!(
        err,
        CodecError::TrailingBytes {
            schema: "Header".to_string(),
            offset: 6,
            remaining: 1,
        }
    );
    assert!(Codec::default().unpack(&header_schema(), &data).is_ok());
}

#[test]
fn test_nesting_depth_limit() {
    let mut schema = Schema::builder("Level0")
        .field(Field::unsigned_char("v"))
        .build()
        .unwrap();
    for level in 1..=3 {
        schema = Schema::builder(format!("Level{}", level))
            .field(Field::nested("inner", schema))
            .build()
            .unwrap();
    }
    let config = CodecConfig::from_json(r#"{"max_depth": 2}"#).unwrap();
    let codec = Codec::new(config).unwrap();

    let err = codec.unpack(&schema, &[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    assert!(Codec::default().unpack(&schema, &[1]).is_ok());
}

#[test]
fn test_error_messages_name_context() {
    let err = header_schema().unpack(&[0, 1]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Header"), "{}", message);
    assert!(message.contains("length"), "{}", message);
}

#[test]
fn test_lossy_pascal_slot_is_malformed() {
    let schema = Schema::builder("Pascal")
        .field(Field::pascal_string("s").count(4))
        .build()
        .unwrap();

    for data in [&b"\x01abc"[..], &b"\x07abc"[..]] {
        let err = schema.unpack(data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed, "slot {:?}", data);
    }
    let (instance, _) = schema.unpack(b"\x03abc").unwrap();
    assert_eq!(instance.pack().unwrap(), b"\x03abc");
}

#[test]
fn test_bool_byte_other_than_zero_or_one_is_malformed() {
    let schema = Schema::builder("Flag")
        .field(Field::bool("on"))
        .build()
        .unwrap();

    match schema.unpack(&[2]).unwrap_err() {
        CodecError::Malformed { field, offset, .. } => {
            assert_eq!(field, "on");
            assert_eq!(offset, 0);
        }
        other => panic!("unexpected error {other:?}"),
    }
    let (instance, _) = schema.unpack(&[1]).unwrap();
    assert_eq!(instance.pack().unwrap(), vec![1]);
}

#[test]
fn test_nonzero_padding_is_malformed() {
    let schema = Schema::builder("Padded")
        .field(Field::unsigned_char("a"))
        .field(Field::pad("gap").count(3))
        .build()
        .unwrap();
    let err = schema.unpack(&[1, 0, 9, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn test_pack_rejects_length_over_limit() {
    let schema = Schema::builder("Blob")
        .field(Field::unsigned_long_long("length"))
        .field(Field::char_array("data").length_of("length"))
        .build()
        .unwrap();
    let instance = schema
        .instance()
        .with("length", 1u64 << 40)
        .unwrap()
        .with("data", "hi")
        .unwrap();
    match instance.pack().unwrap_err() {
        CodecError::LengthLimit {
            field,
            length,
            limit,
            ..
        } => {
            assert_eq!(field, "data");
            assert_eq!(length, 1 << 40);
            assert_eq!(limit, CodecConfig::default().max_field_len);
        }
        other => panic!("unexpected error {other:?}"),
    }

    let padded = Schema::builder("Gap")
        .field(Field::unsigned_int("width"))
        .field(Field::pad("gap").length_of("width"))
        .build()
        .unwrap();
    let err = padded.instance().with("width", u32::MAX).unwrap().pack().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthLimit);
}

#[test]
fn test_configured_length_limit_applies_both_ways() {
    let config = CodecConfig {
        max_field_len: 4,
        ..Default::default()
    };
    let codec = Codec::new(config).unwrap();
    let schema = Schema::builder("Counted")
        .field(Field::unsigned_char("count"))
        .field(Field::array("items", WireTag::UnsignedChar).count_of("count"))
        .build()
        .unwrap();

    let err = codec.unpack(&schema, &[5, 1, 2, 3, 4, 5]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthLimit);
    assert!(codec.unpack(&schema, &[4, 1, 2, 3, 4]).is_ok());

    let long = text_record_schema()
        .instance()
        .with("length", 5)
        .unwrap()
        .with("text", "hello")
        .unwrap();
    assert_eq!(codec.pack(&long).unwrap_err().kind(), ErrorKind::LengthLimit);
    assert!(Codec::default().pack(&long).is_ok());
}
