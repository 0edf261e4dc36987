//! Dynamic instance values.

use std::sync::Arc;

use crate::descriptor::StructDescriptor;
use crate::error::SchemaError;
use crate::types::TypeRef;

/// Runtime value of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Stable ordinal of an enum item
    Enum(u32),
    /// Nested struct instance
    Struct(StructValue),
    /// Fixed-size array; length always equals the declared size
    Array(Vec<Value>),
    /// Variable-length array
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ordinal(&self) -> Option<u32> {
        match self {
            Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) | Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Shallow structural check of a value against a type reference.
    ///
    /// Array lengths, element kinds, and nested struct names are checked
    /// recursively; enum ordinal ranges are not (the codec validates
    /// those against the registry).
    pub fn matches(&self, ty: &TypeRef) -> bool {
        match (ty, self) {
            (TypeRef::Bool, Value::Bool(_)) => true,
            (TypeRef::Int, Value::Int(_)) => true,
            (TypeRef::Float, Value::Float(_)) => true,
            (TypeRef::Str, Value::Str(_)) => true,
            (TypeRef::Enum(_), Value::Enum(_)) => true,
            (TypeRef::Struct(name), Value::Struct(v)) => v.descriptor().name() == name,
            (TypeRef::Array(elem, len), Value::Array(items)) => {
                items.len() == *len && items.iter().all(|i| i.matches(elem))
            }
            (TypeRef::List(elem), Value::List(items)) => items.iter().all(|i| i.matches(elem)),
            _ => false,
        }
    }
}

/// Instance of a registered struct: its descriptor plus one value per
/// field, held in declaration order.
///
/// Instances are created per message or per document, mutated freely by
/// their single owner, and discarded after handling. The descriptor is
/// shared read-only.
#[derive(Debug, Clone)]
pub struct StructValue {
    descriptor: Arc<StructDescriptor>,
    values: Vec<Value>,
}

impl StructValue {
    /// Builds an instance from a descriptor and pre-shaped values.
    ///
    /// The registry's `instantiate` is the usual way to get one; this is
    /// for the codec and other consumers that already produced values in
    /// declaration order.
    pub(crate) fn from_parts(descriptor: Arc<StructDescriptor>, values: Vec<Value>) -> Self {
        debug_assert_eq!(descriptor.fields().len(), values.len());
        Self { descriptor, values }
    }

    /// Descriptor this instance was built from.
    pub fn descriptor(&self) -> &Arc<StructDescriptor> {
        &self.descriptor
    }

    /// Field values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of the named field.
    pub fn get(&self, field: &str) -> Result<&Value, SchemaError> {
        let index = self.index_of(field)?;
        Ok(&self.values[index])
    }

    /// Mutable value of the named field.
    ///
    /// In-place edits bypass the structural check `set` performs; editing
    /// surfaces that swap whole values should prefer `set`.
    pub fn get_mut(&mut self, field: &str) -> Result<&mut Value, SchemaError> {
        let index = self.index_of(field)?;
        Ok(&mut self.values[index])
    }

    /// Replaces the named field's value after a structural type check.
    pub fn set(&mut self, field: &str, value: Value) -> Result<(), SchemaError> {
        let index = self.index_of(field)?;
        let ty = self.descriptor.fields()[index].ty();
        if !value.matches(ty) {
            return Err(SchemaError::ValueTypeMismatch {
                strukt: self.descriptor.name().to_string(),
                field: field.to_string(),
                expected: ty.kind_name(),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Replaces a field value by position without a type check.
    ///
    /// Only for consumers that validated the value against the same
    /// descriptor already (the codec).
    pub(crate) fn set_raw(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    /// Boolean field accessor.
    pub fn bool_field(&self, field: &str) -> Result<bool, SchemaError> {
        self.get(field)?
            .as_bool()
            .ok_or_else(|| self.type_mismatch(field, "bool"))
    }

    /// Integer field accessor.
    pub fn int_field(&self, field: &str) -> Result<i64, SchemaError> {
        self.get(field)?
            .as_int()
            .ok_or_else(|| self.type_mismatch(field, "int"))
    }

    /// Float field accessor.
    pub fn float_field(&self, field: &str) -> Result<f64, SchemaError> {
        self.get(field)?
            .as_float()
            .ok_or_else(|| self.type_mismatch(field, "float"))
    }

    /// String field accessor.
    pub fn str_field(&self, field: &str) -> Result<&str, SchemaError> {
        self.get(field)?
            .as_str()
            .ok_or_else(|| self.type_mismatch(field, "string"))
    }

    /// Enum ordinal accessor.
    pub fn ordinal_field(&self, field: &str) -> Result<u32, SchemaError> {
        self.get(field)?
            .as_ordinal()
            .ok_or_else(|| self.type_mismatch(field, "enum"))
    }

    /// Nested struct accessor.
    pub fn struct_field(&self, field: &str) -> Result<&StructValue, SchemaError> {
        self.get(field)?
            .as_struct()
            .ok_or_else(|| self.type_mismatch(field, "struct"))
    }

    /// Fixed or dynamic array accessor.
    pub fn slice_field(&self, field: &str) -> Result<&[Value], SchemaError> {
        self.get(field)?
            .as_slice()
            .ok_or_else(|| self.type_mismatch(field, "array"))
    }

    /// Appends an element to a dynamic array field.
    pub fn push(&mut self, field: &str, value: Value) -> Result<(), SchemaError> {
        let index = self.index_of(field)?;
        let elem = match self.descriptor.fields()[index].ty() {
            TypeRef::List(elem) => elem.as_ref().clone(),
            ty => {
                return Err(SchemaError::ValueTypeMismatch {
                    strukt: self.descriptor.name().to_string(),
                    field: field.to_string(),
                    expected: ty.kind_name(),
                })
            }
        };
        if !value.matches(&elem) {
            return Err(SchemaError::ValueTypeMismatch {
                strukt: self.descriptor.name().to_string(),
                field: field.to_string(),
                expected: elem.kind_name(),
            });
        }
        match &mut self.values[index] {
            Value::List(items) => items.push(value),
            _ => unreachable!("list-typed field holds a list value"),
        }
        Ok(())
    }

    fn index_of(&self, field: &str) -> Result<usize, SchemaError> {
        self.descriptor
            .index_of(field)
            .ok_or_else(|| SchemaError::FieldNotFound {
                strukt: self.descriptor.name().to_string(),
                field: field.to_string(),
            })
    }

    fn type_mismatch(&self, field: &str, expected: &'static str) -> SchemaError {
        SchemaError::ValueTypeMismatch {
            strukt: self.descriptor.name().to_string(),
            field: field.to_string(),
            expected,
        }
    }
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name() == other.descriptor.name() && self.values == other.values
    }
}
