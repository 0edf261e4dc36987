//! Schema meta-model for the preview tool.
//!
//! One declarative set of descriptors drives wire (de)serialization,
//! project-file persistence, and reflection-based editing surfaces.

pub mod codec;
pub mod describe;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod types;
pub mod value;

pub use descriptor::{DefaultValue, EnumDescriptor, EnumItem, FieldDescriptor, FieldFlags,
    StructDescriptor};
pub use error::{CodecError, SchemaError};
pub use registry::SchemaRegistry;
pub use types::TypeRef;
pub use value::{StructValue, Value};
