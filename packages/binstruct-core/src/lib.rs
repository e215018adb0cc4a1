//! Declarative binary struct codec.
//!
//! Describe a wire layout once as a [`Schema`] of typed [`Field`]s, then
//! unpack byte buffers into [`StructInstance`]s and pack them back. Fields
//! may depend on earlier fields for their length or repeat count, nest
//! other schemas, override the byte order, and decode text.
//!
//! ```
//! use binstruct_core::{Field, Schema, Value};
//!
//! let schema = Schema::builder("Record")
//!     .field(Field::unsigned_char("len"))
//!     .field(Field::char_array("data").length_of("len"))
//!     .build()
//!     .unwrap();
//!
//! let (record, _) = schema.unpack(b"\x03abc").unwrap();
//! assert_eq!(record.get("data"), Some(&Value::Bytes(b"abc".to_vec())));
//! assert_eq!(record.pack().unwrap(), b"\x03abc");
//! ```

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod instance;
pub mod schema;
pub mod types;

pub use codec::{pack, unpack, unpack_from, Codec};
pub use config::CodecConfig;
pub use cursor::ByteCursor;
pub use error::{CodecError, CursorError, ErrorKind, SchemaError};
pub use instance::StructInstance;
pub use schema::{ArrayField, Count, Dependent, Field, FieldKind, Schema, SchemaBuilder, ValueShape};
pub use types::{ByteOrder, Value, ValueType, WireTag};
