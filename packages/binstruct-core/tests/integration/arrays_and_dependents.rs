//! Dependent lengths, dynamic counts and array fields.

use anyhow::Result;
use binstruct_core::{
    ArrayField, CodecError, Dependent, ErrorKind, Field, Schema, Value, WireTag,
};

fn counted_shorts() -> Schema {
    Schema::builder("Counted")
        .field(Field::unsigned_char("count"))
        .field(Field::array("items", WireTag::UnsignedShort).count_of("count"))
        .build()
        .unwrap()
}

#[test]
fn test_array_with_dynamic_count() -> Result<()> {
    let data = [3, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
    let (instance, cursor) = counted_shorts().unpack(&data)?;

    assert_eq!(
        instance.get("items"),
        Some(&Value::Sequence(vec![
            Value::UInt(1),
            Value::UInt(2),
            Value::UInt(3)
        ]))
    );
    assert!(cursor.is_exhausted());
    assert_eq!(instance.pack()?, data);
    Ok(())
}

#[test]
fn test_array_with_zero_count() -> Result<()> {
    let (instance, _) = counted_shorts().unpack(&[0])?;
    assert_eq!(instance.get("items"), Some(&Value::Sequence(Vec::new())));
    assert_eq!(instance.pack()?, vec![0]);
    Ok(())
}

#[test]
fn test_array_elements_with_derived_repetition() -> Result<()> {
    // Two elements over eight bytes: each element holds two shorts.
    let schema = Schema::builder("Grid")
        .field(Field::unsigned_char("rows"))
        .field(Field::unsigned_char("size"))
        .field(
            Field::array("cells", WireTag::Short)
                .count_of("rows")
                .length_of("size"),
        )
        .build()?;
    let data = [2, 8, 0, 1, 0, 2, 0, 3, 0xff, 0xff];

    let (instance, _) = schema.unpack(&data)?;
    assert_eq!(
        instance.get("cells"),
        Some(&Value::Sequence(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(-1)
        ]))
    );
    assert_eq!(instance.pack()?, data);
    Ok(())
}

#[test]
fn test_array_of_text_elements() -> Result<()> {
    let schema = Schema::builder("Names")
        .field(Field::unsigned_char("count"))
        .field(Field::unsigned_char("size"))
        .field(
            Field::array("names", ArrayField::new(WireTag::CharArray))
                .count_of("count")
                .length_of("size")
                .encoding(encoding_rs::UTF_8),
        )
        .build()?;
    let data = b"\x02\x06foobar";

    let (instance, _) = schema.unpack(data)?;
    assert_eq!(
        instance.get("names"),
        Some(&Value::Sequence(vec![
            Value::Text("foo".to_string()),
            Value::Text("bar".to_string())
        ]))
    );
    assert_eq!(instance.pack()?, data);
    Ok(())
}

#[test]
fn test_array_length_not_divisible_by_count() {
    let schema = Schema::builder("Uneven")
        .field(Field::unsigned_char("count"))
        .field(Field::unsigned_char("size"))
        .field(
            Field::array("cells", WireTag::Char)
                .count_of("count")
                .length_of("size"),
        )
        .build()
        .unwrap();

    let err = schema.unpack(&[4, 6, 0, 0, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    match err {
        CodecError::Format {
            field,
            length,
            divisor,
            offset,
            ..
        } => {
            assert_eq!(field, "cells");
            assert_eq!((length, divisor, offset), (6, 4, 2));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_length_not_divisible_by_width() {
    let schema = Schema::builder("Odd")
        .field(Field::unsigned_char("size"))
        .field(Field::int("values").length_of("size"))
        .build()
        .unwrap();

    let err = schema.unpack(&[6, 0, 0, 0, 1, 0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_length_dependent_ints() -> Result<()> {
    let schema = Schema::builder("Ints")
        .field(Field::unsigned_char("size"))
        .field(Field::int("values").length_of("size"))
        .build()?;

    let (two, _) = schema.unpack(&[8, 0, 0, 0, 1, 0, 0, 0, 2])?;
    assert_eq!(
        two.get("values"),
        Some(&Value::Sequence(vec![Value::Int(1), Value::Int(2)]))
    );

    // An implicit single element unwraps like a fixed field.
    let (one, _) = schema.unpack(&[4, 0, 0, 0, 7])?;
    assert_eq!(one.get("values"), Some(&Value::Int(7)));
    assert_eq!(one.pack()?, vec![4, 0, 0, 0, 7]);
    Ok(())
}

#[test]
fn test_dynamic_count_scalars() -> Result<()> {
    let schema = Schema::builder("Dyn")
        .field(Field::unsigned_char("n"))
        .field(Field::unsigned_short("values").count_of("n"))
        .build()?;

    // A dynamic count of one still yields a sequence.
    let (instance, _) = schema.unpack(&[1, 0, 5])?;
    assert_eq!(
        instance.get("values"),
        Some(&Value::Sequence(vec![Value::UInt(5)]))
    );
    assert_eq!(instance.pack()?, vec![1, 0, 5]);
    Ok(())
}

#[test]
fn test_computed_length() -> Result<()> {
    let schema = Schema::builder("Computed")
        .field(Field::unsigned_char("words"))
        .field(
            Field::char_array("body").length(Dependent::computed(&["words"], |instance| {
                Ok(instance.usize_of("words")? * 2)
            })),
        )
        .build()?;

    let (instance, _) = schema.unpack(b"\x02abcdXX")?;
    assert_eq!(instance.get("body"), Some(&Value::Bytes(b"abcd".to_vec())));
    assert_eq!(instance.pack()?, b"\x02abcd");
    Ok(())
}

#[test]
fn test_char_array_pack_fits_declared_length() -> Result<()> {
    let schema = Schema::builder("Fixed")
        .field(Field::char_array("name").count(5))
        .build()?;

    let short = schema.instance().with("name", "ab")?;
    assert_eq!(short.pack()?, b"ab\0\0\0");
    let long = schema.instance().with("name", b"abcdefg".to_vec())?;
    assert_eq!(long.pack()?, b"abcde");
    Ok(())
}

#[test]
fn test_text_decode_falls_back_to_bytes() -> Result<()> {
    let schema = Schema::builder("Text")
        .field(Field::unsigned_char("len"))
        .field(Field::char_array("text").length_of("len").encoding_label("utf-8")?)
        .build()?;
    let data = [3, b'a', 0xff, b'b'];

    let (instance, _) = schema.unpack(&data)?;
    assert_eq!(
        instance.get("text"),
        Some(&Value::Bytes(vec![b'a', 0xff, b'b']))
    );
    assert_eq!(instance.pack()?, data);
    Ok(())
}

#[test]
fn test_shift_jis_text() -> Result<()> {
    let schema = Schema::builder("Sjis")
        .field(Field::unsigned_char("len"))
        .field(Field::char_array("text").length_of("len").encoding_label("shift_jis")?)
        .build()?;
    let data = [6, 0x83, 0x65, 0x83, 0x58, 0x83, 0x67];

    let (instance, _) = schema.unpack(&data)?;
    assert_eq!(instance.get("text"), Some(&Value::Text("テスト".to_string())));
    assert_eq!(instance.pack()?, data);
    Ok(())
}
