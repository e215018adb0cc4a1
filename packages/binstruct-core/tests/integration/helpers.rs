//! Shared schemas for the integration suite.

use binstruct_core::{ByteOrder, Field, Schema};

/// `{16-bit signed; 32-bit signed}`, network order.
pub fn header_schema() -> Schema {
    Schema::builder("Header")
        .field(Field::short("kind"))
        .field(Field::int("length"))
        .build()
        .unwrap()
}

/// `{32-bit length; utf-8 text of that length}`.
pub fn text_record_schema() -> Schema {
    Schema::builder("TextRecord")
        .field(Field::int("length"))
        .field(
            Field::char_array("text")
                .length_of("length")
                .encoding(encoding_rs::UTF_8),
        )
        .build()
        .unwrap()
}

/// Bytes taken by the last three fields of `every_tag_schema`.
pub const EVERY_TAG_TAIL: usize = 10;

/// One field of every catalog tag, little-endian.
///
/// Fields whose bytes are not all valid (bool, padding, pascal string) come
/// last and take `EVERY_TAG_TAIL` bytes; everything before them decodes from
/// any bytes at all.
pub fn every_tag_schema() -> Schema {
    Schema::builder("EveryTag")
        .byte_order(ByteOrder::LittleEndian)
        .fields([
            Field::signed_char("b"),
            Field::unsigned_char("ub"),
            Field::short("h"),
            Field::unsigned_short("uh"),
            Field::int("i"),
            Field::unsigned_int("ui"),
            Field::long("l"),
            Field::unsigned_long("ul"),
            Field::long_long("q"),
            Field::unsigned_long_long("uq"),
            Field::ssize("n"),
            Field::size("un"),
            Field::pointer("p"),
            Field::float("f"),
            Field::double("d"),
            Field::char("c").count(2),
            Field::char_array("tag").count(4),
            Field::bool("flag"),
            Field::pad("pad").count(3),
            Field::pascal_string("name").count(6),
        ])
        .build()
        .unwrap()
}
