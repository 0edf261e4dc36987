//! Descriptor model: fields, flags, enums, and structs.
//!
//! Descriptors are immutable definitions established once at startup.
//! They are authored as declarative tables (constructor calls), handed to
//! the registry, and shared read-only afterwards.

mod enums;
mod field;
mod flags;
mod structs;

pub use enums::{EnumDescriptor, EnumItem};
pub use field::{DefaultValue, FieldDescriptor};
pub use flags::FieldFlags;
pub use structs::StructDescriptor;
