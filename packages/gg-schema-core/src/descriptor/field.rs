//! Field descriptors and default values.

use crate::types::TypeRef;

use super::flags::FieldFlags;

/// Authored default for a field.
///
/// `TypeDefault` stands for the zero value of the declared type: `false`,
/// `0`, `0.0`, `""`, the first enum item, the nested struct's own
/// defaults, or the empty sequence for dynamic arrays. Enum defaults are
/// authored by item name and resolved to an ordinal at finalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Named item of the field's enum type
    EnumItem(String),
    /// Element-wise defaults for a fixed-size array
    Array(Vec<DefaultValue>),
    /// Zero value of the declared type
    TypeDefault,
}

impl DefaultValue {
    /// Human-readable rendering for reflection surfaces.
    pub fn display(&self) -> String {
        match self {
            DefaultValue::Bool(v) => v.to_string(),
            DefaultValue::Int(v) => v.to_string(),
            DefaultValue::Float(v) => v.to_string(),
            DefaultValue::Str(v) => format!("{:?}", v),
            DefaultValue::EnumItem(name) => name.clone(),
            DefaultValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(DefaultValue::display).collect();
                format!("[{}]", parts.join(", "))
            }
            DefaultValue::TypeDefault => "{}".to_string(),
        }
    }
}

/// Atomic unit of the schema: name, semantic type, default value,
/// documentation, and behavior flags.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeRef,
    default: DefaultValue,
    doc: String,
    flags: FieldFlags,
}

impl FieldDescriptor {
    /// Creates a field descriptor from raw parts.
    ///
    /// The convenience constructors below are the usual authoring
    /// surface; this one exists for element types they do not cover.
    /// Default/type compatibility is checked when the owning struct
    /// descriptor is built.
    pub fn new(name: &str, ty: TypeRef, default: DefaultValue, doc: &str) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default,
            doc: doc.to_string(),
            flags: FieldFlags::NONE,
        }
    }

    /// Boolean field.
    pub fn bool_field(name: &str, default: bool, doc: &str) -> Self {
        Self::new(name, TypeRef::Bool, DefaultValue::Bool(default), doc)
    }

    /// Integer field.
    pub fn int_field(name: &str, default: i64, doc: &str) -> Self {
        Self::new(name, TypeRef::Int, DefaultValue::Int(default), doc)
    }

    /// Float field.
    pub fn float_field(name: &str, default: f64, doc: &str) -> Self {
        Self::new(name, TypeRef::Float, DefaultValue::Float(default), doc)
    }

    /// String field.
    pub fn str_field(name: &str, default: &str, doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::Str,
            DefaultValue::Str(default.to_string()),
            doc,
        )
    }

    /// Enum-typed field defaulting to the named item.
    pub fn enum_field(name: &str, enumeration: &str, default_item: &str, doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::Enum(enumeration.to_string()),
            DefaultValue::EnumItem(default_item.to_string()),
            doc,
        )
    }

    /// Nested struct field; the default is the nested struct's defaults.
    pub fn struct_field(name: &str, strukt: &str, doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::Struct(strukt.to_string()),
            DefaultValue::TypeDefault,
            doc,
        )
    }

    /// Fixed-size float array; the declared length is the default's length.
    pub fn float_array(name: &str, defaults: &[f64], doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::Array(Box::new(TypeRef::Float), defaults.len()),
            DefaultValue::Array(defaults.iter().copied().map(DefaultValue::Float).collect()),
            doc,
        )
    }

    /// Fixed-size integer array; the declared length is the default's length.
    pub fn int_array(name: &str, defaults: &[i64], doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::Array(Box::new(TypeRef::Int), defaults.len()),
            DefaultValue::Array(defaults.iter().copied().map(DefaultValue::Int).collect()),
            doc,
        )
    }

    /// Variable-length array of a uniform element type, defaulting empty.
    pub fn list(name: &str, elem: TypeRef, doc: &str) -> Self {
        Self::new(
            name,
            TypeRef::List(Box::new(elem)),
            DefaultValue::TypeDefault,
            doc,
        )
    }

    /// Attaches behavior flags, replacing any previous set.
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Field name, unique within the owning struct.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared semantic type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Authored default.
    pub fn default(&self) -> &DefaultValue {
        &self.default
    }

    /// Documentation string.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Behavior flags.
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }
}
