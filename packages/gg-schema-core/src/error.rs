//! Schema and codec error types.

use thiserror::Error;

/// Schema definition, registration, and instance access errors.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// Struct descriptor name collision
    #[error("Struct '{name}' already registered")]
    DuplicateStruct { name: String },

    /// Enum descriptor name collision
    #[error("Enum '{name}' already registered")]
    DuplicateEnum { name: String },

    /// Field name collision within a struct
    #[error("Field '{field}' already declared in struct '{strukt}'")]
    DuplicateField { strukt: String, field: String },

    /// Item name collision within an enum
    #[error("Item '{item}' already declared in enum '{enumeration}'")]
    DuplicateEnumItem { enumeration: String, item: String },

    /// Enums need at least one item to have a default ordinal
    #[error("Enum '{name}' has no items")]
    EmptyEnum { name: String },

    /// Registration attempted after finalization
    #[error("Schema registry is finalized; no further registration allowed")]
    RegistryFinalized,

    /// Lookup or instantiation attempted before finalization
    #[error("Schema registry is not finalized yet")]
    RegistryNotFinalized,

    /// Struct lookup failed
    #[error("Struct '{name}' not found in registry")]
    StructNotFound { name: String },

    /// Enum lookup failed
    #[error("Enum '{name}' not found in registry")]
    EnumNotFound { name: String },

    /// Field lookup on an instance failed
    #[error("Field '{field}' not found in struct '{strukt}'")]
    FieldNotFound { strukt: String, field: String },

    /// A field references a struct that was never registered
    #[error("Field '{field}' of struct '{strukt}' references unknown struct '{target}'")]
    UnresolvedStructRef {
        strukt: String,
        field: String,
        target: String,
    },

    /// A field references an enum that was never registered
    #[error("Field '{field}' of struct '{strukt}' references unknown enum '{target}'")]
    UnresolvedEnumRef {
        strukt: String,
        field: String,
        target: String,
    },

    /// The struct reference graph must be a DAG
    #[error("Struct '{strukt}' participates in a reference cycle")]
    CyclicReference { strukt: String },

    /// Fixed-size array default with the wrong number of elements
    #[error("Field '{field}' of struct '{strukt}' declares {expected} array elements but the default has {got}")]
    DefaultLengthMismatch {
        strukt: String,
        field: String,
        expected: usize,
        got: usize,
    },

    /// Default value of a kind the declared type cannot hold
    #[error("Field '{field}' of struct '{strukt}' has a default incompatible with its {expected} type")]
    DefaultKindMismatch {
        strukt: String,
        field: String,
        expected: &'static str,
    },

    /// Dynamic arrays always default to the empty sequence
    #[error("Field '{field}' of struct '{strukt}' is a dynamic array and cannot carry an explicit default")]
    ListDefaultNotEmpty { strukt: String, field: String },

    /// Enum default names an item the enum does not declare
    #[error("Field '{field}' of struct '{strukt}' defaults to unknown item '{item}' of enum '{enumeration}'")]
    UnknownEnumItem {
        strukt: String,
        field: String,
        enumeration: String,
        item: String,
    },

    /// Value assigned to a field of an incompatible type
    #[error("Field '{field}' of struct '{strukt}' expects a {expected} value")]
    ValueTypeMismatch {
        strukt: String,
        field: String,
        expected: &'static str,
    },
}

/// Encode/decode errors against a finalized schema.
#[derive(Error, Debug, Clone)]
pub enum CodecError {
    /// Schema lookup failed while decoding
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Enum ordinal outside the declared item range
    #[error("Ordinal {ordinal} is out of range for enum '{enumeration}' ({count} items)")]
    InvalidEnumOrdinal {
        enumeration: String,
        ordinal: u32,
        count: usize,
    },

    /// Fixed-size array encoded with the wrong element count
    #[error("Field '{field}' of struct '{strukt}' expects {expected} array elements, got {got}")]
    ArrayLengthMismatch {
        strukt: String,
        field: String,
        expected: usize,
        got: usize,
    },

    /// Encoded value of a shape the declared type cannot hold
    #[error("Field '{field}' of struct '{strukt}' expects a {expected} value")]
    ValueShapeMismatch {
        strukt: String,
        field: String,
        expected: &'static str,
    },

    /// Document root is not an object
    #[error("Encoded struct '{strukt}' is not a JSON object")]
    NotAnObject { strukt: String },

    /// Non-finite floats have no JSON representation
    #[error("Field '{field}' of struct '{strukt}' holds a non-finite float")]
    NonFiniteFloat { strukt: String, field: String },
}
