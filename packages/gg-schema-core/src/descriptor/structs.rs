//! Struct descriptors.

use crate::error::SchemaError;
use crate::types::TypeRef;

use super::field::{DefaultValue, FieldDescriptor};

/// Ordered set of field descriptors.
///
/// Field order is significant for any order-dependent encoding and is
/// preserved exactly as declared. Struct-typed fields may reference
/// descriptors registered later; those references are resolved when the
/// registry is finalized.
#[derive(Debug, Clone)]
pub struct StructDescriptor {
    name: String,
    doc: String,
    fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Builds a struct descriptor, validating everything that needs no
    /// registry lookups: field name uniqueness, default/type kind
    /// agreement, and fixed-array default lengths.
    pub fn new(name: &str, doc: &str, fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if !seen.insert(field.name().to_string()) {
                return Err(SchemaError::DuplicateField {
                    strukt: name.to_string(),
                    field: field.name().to_string(),
                });
            }
            check_default(name, field.name(), field.ty(), field.default())?;
        }
        Ok(Self {
            name: name.to_string(),
            doc: doc.to_string(),
            fields,
        })
    }

    /// Struct name, unique within the struct namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Position of the named field, if declared.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == field)
    }

    /// Descriptor of the named field.
    pub fn field(&self, field: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == field)
    }
}

/// Validates that a default is shaped for its declared type.
///
/// Enum item existence and struct/enum reference resolution are deferred
/// to registry finalization; everything checkable locally fails here, at
/// registration.
fn check_default(
    strukt: &str,
    field: &str,
    ty: &TypeRef,
    default: &DefaultValue,
) -> Result<(), SchemaError> {
    if matches!(default, DefaultValue::TypeDefault) {
        return Ok(());
    }
    match (ty, default) {
        (TypeRef::Bool, DefaultValue::Bool(_)) => Ok(()),
        (TypeRef::Int, DefaultValue::Int(_)) => Ok(()),
        (TypeRef::Float, DefaultValue::Float(_)) => Ok(()),
        (TypeRef::Str, DefaultValue::Str(_)) => Ok(()),
        (TypeRef::Enum(_), DefaultValue::EnumItem(_)) => Ok(()),
        (TypeRef::Array(elem, len), DefaultValue::Array(defaults)) => {
            if defaults.len() != *len {
                return Err(SchemaError::DefaultLengthMismatch {
                    strukt: strukt.to_string(),
                    field: field.to_string(),
                    expected: *len,
                    got: defaults.len(),
                });
            }
            for default in defaults {
                check_default(strukt, field, elem, default)?;
            }
            Ok(())
        }
        (TypeRef::List(_), _) => Err(SchemaError::ListDefaultNotEmpty {
            strukt: strukt.to_string(),
            field: field.to_string(),
        }),
        (ty, _) => Err(SchemaError::DefaultKindMismatch {
            strukt: strukt.to_string(),
            field: field.to_string(),
            expected: ty.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::field::FieldDescriptor;

    #[test]
    fn duplicate_field_names_rejected() {
        let err = StructDescriptor::new(
            "Camera",
            "",
            vec![
                FieldDescriptor::bool_field("perspective", true, ""),
                FieldDescriptor::bool_field("perspective", false, ""),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn array_default_length_must_match_declared_size() {
        // A 3-element array with a 2-element default is a definition error.
        let field = FieldDescriptor::new(
            "size",
            TypeRef::Array(Box::new(TypeRef::Int), 3),
            DefaultValue::Array(vec![DefaultValue::Int(0), DefaultValue::Int(0)]),
            "",
        );
        let err = StructDescriptor::new("Texture", "", vec![field]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DefaultLengthMismatch {
                expected: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn list_defaults_must_be_empty() {
        let field = FieldDescriptor::new(
            "resources",
            TypeRef::List(Box::new(TypeRef::Str)),
            DefaultValue::Str("x".to_string()),
            "",
        );
        let err = StructDescriptor::new("File", "", vec![field]).unwrap_err();
        assert!(matches!(err, SchemaError::ListDefaultNotEmpty { .. }));
    }

    #[test]
    fn default_kind_must_match_type() {
        let field = FieldDescriptor::new("count", TypeRef::Int, DefaultValue::Bool(true), "");
        let err = StructDescriptor::new("Buffer", "", vec![field]).unwrap_err();
        assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));
    }

    #[test]
    fn field_lookup_by_name() {
        let descriptor = StructDescriptor::new(
            "Bookmark",
            "",
            vec![
                FieldDescriptor::str_field("name", "", ""),
                FieldDescriptor::str_field("target", "", ""),
            ],
        )
        .unwrap();
        assert_eq!(descriptor.index_of("target"), Some(1));
        assert!(descriptor.field("missing").is_none());
    }
}
