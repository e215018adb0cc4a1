//! Wire-level type catalog: byte orders, primitive tags and values.

mod byte_order;
mod value;
mod wire_tag;

pub use byte_order::ByteOrder;
pub use value::Value;
pub use wire_tag::{ValueType, WireTag};
