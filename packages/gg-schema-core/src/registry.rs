//! Schema registry: registration, forward-reference resolution, and
//! instantiation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::{DefaultValue, EnumDescriptor, StructDescriptor};
use crate::error::SchemaError;
use crate::types::TypeRef;
use crate::value::{StructValue, Value};

/// Registry of struct and enum descriptors.
///
/// Registration happens single-threaded at startup; `finalize` resolves
/// forward references and freezes the registry, after which it is shared
/// read-only (typically behind an `Arc`) with no interior locking.
/// Structs and enums are namespaced independently.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    structs: HashMap<String, Arc<StructDescriptor>>,
    enums: HashMap<String, Arc<EnumDescriptor>>,
    finalized: bool,
}

impl SchemaRegistry {
    /// Creates an empty, unfinalized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a struct descriptor.
    ///
    /// # Returns
    /// `Err(SchemaError::DuplicateStruct)` on a name collision,
    /// `Err(SchemaError::RegistryFinalized)` after finalization.
    pub fn register_struct(&mut self, descriptor: StructDescriptor) -> Result<(), SchemaError> {
        if self.finalized {
            return Err(SchemaError::RegistryFinalized);
        }
        if self.structs.contains_key(descriptor.name()) {
            return Err(SchemaError::DuplicateStruct {
                name: descriptor.name().to_string(),
            });
        }
        self.structs
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        Ok(())
    }

    /// Registers an enum descriptor.
    ///
    /// # Returns
    /// `Err(SchemaError::DuplicateEnum)` on a name collision,
    /// `Err(SchemaError::RegistryFinalized)` after finalization.
    pub fn register_enum(&mut self, descriptor: EnumDescriptor) -> Result<(), SchemaError> {
        if self.finalized {
            return Err(SchemaError::RegistryFinalized);
        }
        if self.enums.contains_key(descriptor.name()) {
            return Err(SchemaError::DuplicateEnum {
                name: descriptor.name().to_string(),
            });
        }
        self.enums
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        Ok(())
    }

    /// Resolves all forward references and freezes the registry.
    ///
    /// Checks, in order: every enum/struct reference points at a
    /// registered descriptor, every enum-item default names a declared
    /// item, and the struct reference graph is a DAG.
    pub fn finalize(&mut self) -> Result<(), SchemaError> {
        if self.finalized {
            return Err(SchemaError::RegistryFinalized);
        }
        for descriptor in self.structs.values() {
            for field in descriptor.fields() {
                self.check_references(descriptor.name(), field.name(), field.ty())?;
                self.check_default_refs(
                    descriptor.name(),
                    field.name(),
                    field.ty(),
                    field.default(),
                )?;
            }
        }
        self.check_acyclic()?;
        self.finalized = true;
        tracing::debug!(
            structs = self.structs.len(),
            enums = self.enums.len(),
            "schema registry finalized"
        );
        Ok(())
    }

    /// Returns true once `finalize` has succeeded.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Looks up a struct descriptor by name.
    pub fn struct_descriptor(&self, name: &str) -> Result<Arc<StructDescriptor>, SchemaError> {
        if !self.finalized {
            return Err(SchemaError::RegistryNotFinalized);
        }
        self.structs
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::StructNotFound {
                name: name.to_string(),
            })
    }

    /// Looks up an enum descriptor by name.
    pub fn enum_descriptor(&self, name: &str) -> Result<Arc<EnumDescriptor>, SchemaError> {
        if !self.finalized {
            return Err(SchemaError::RegistryNotFinalized);
        }
        self.enums
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::EnumNotFound {
                name: name.to_string(),
            })
    }

    /// Iterates all registered struct descriptors (reflection surface).
    pub fn structs(&self) -> impl Iterator<Item = &Arc<StructDescriptor>> {
        self.structs.values()
    }

    /// Iterates all registered enum descriptors (reflection surface).
    pub fn enums(&self) -> impl Iterator<Item = &Arc<EnumDescriptor>> {
        self.enums.values()
    }

    /// Creates an instance of the named struct populated with defaults.
    pub fn instantiate(&self, name: &str) -> Result<StructValue, SchemaError> {
        let descriptor = self.struct_descriptor(name)?;
        let mut values = Vec::with_capacity(descriptor.fields().len());
        for field in descriptor.fields() {
            values.push(self.default_value(
                descriptor.name(),
                field.name(),
                field.ty(),
                field.default(),
            )?);
        }
        Ok(StructValue::from_parts(descriptor, values))
    }

    /// Materializes a field default into a runtime value.
    pub(crate) fn default_value(
        &self,
        strukt: &str,
        field: &str,
        ty: &TypeRef,
        default: &DefaultValue,
    ) -> Result<Value, SchemaError> {
        match default {
            DefaultValue::Bool(v) => Ok(Value::Bool(*v)),
            DefaultValue::Int(v) => Ok(Value::Int(*v)),
            DefaultValue::Float(v) => Ok(Value::Float(*v)),
            DefaultValue::Str(v) => Ok(Value::Str(v.clone())),
            DefaultValue::EnumItem(item) => {
                let enum_name = match ty {
                    TypeRef::Enum(name) => name,
                    _ => {
                        return Err(SchemaError::DefaultKindMismatch {
                            strukt: strukt.to_string(),
                            field: field.to_string(),
                            expected: ty.kind_name(),
                        })
                    }
                };
                let descriptor = self.enum_ref(strukt, field, enum_name)?;
                let ordinal =
                    descriptor
                        .ordinal_of(item)
                        .ok_or_else(|| SchemaError::UnknownEnumItem {
                            strukt: strukt.to_string(),
                            field: field.to_string(),
                            enumeration: enum_name.clone(),
                            item: item.clone(),
                        })?;
                Ok(Value::Enum(ordinal))
            }
            DefaultValue::Array(defaults) => {
                let elem = match ty {
                    TypeRef::Array(elem, _) => elem,
                    _ => {
                        return Err(SchemaError::DefaultKindMismatch {
                            strukt: strukt.to_string(),
                            field: field.to_string(),
                            expected: ty.kind_name(),
                        })
                    }
                };
                let mut values = Vec::with_capacity(defaults.len());
                for default in defaults {
                    values.push(self.default_value(strukt, field, elem, default)?);
                }
                Ok(Value::Array(values))
            }
            DefaultValue::TypeDefault => self.zero_value(strukt, field, ty),
        }
    }

    /// Zero value of a type: false / 0 / 0.0 / "" / first enum item /
    /// nested defaults / empty list.
    fn zero_value(&self, strukt: &str, field: &str, ty: &TypeRef) -> Result<Value, SchemaError> {
        match ty {
            TypeRef::Bool => Ok(Value::Bool(false)),
            TypeRef::Int => Ok(Value::Int(0)),
            TypeRef::Float => Ok(Value::Float(0.0)),
            TypeRef::Str => Ok(Value::Str(String::new())),
            TypeRef::Enum(_) => Ok(Value::Enum(0)),
            TypeRef::Struct(name) => {
                let nested = self.instantiate_unchecked(strukt, field, name)?;
                Ok(Value::Struct(nested))
            }
            TypeRef::Array(elem, len) => {
                let mut values = Vec::with_capacity(*len);
                for _ in 0..*len {
                    values.push(self.zero_value(strukt, field, elem)?);
                }
                Ok(Value::Array(values))
            }
            TypeRef::List(_) => Ok(Value::List(Vec::new())),
        }
    }

    /// Instantiation used while materializing defaults; maps a missing
    /// struct to an unresolved-reference error with field context.
    fn instantiate_unchecked(
        &self,
        strukt: &str,
        field: &str,
        target: &str,
    ) -> Result<StructValue, SchemaError> {
        if !self.structs.contains_key(target) {
            return Err(SchemaError::UnresolvedStructRef {
                strukt: strukt.to_string(),
                field: field.to_string(),
                target: target.to_string(),
            });
        }
        self.instantiate(target)
    }

    fn enum_ref(
        &self,
        strukt: &str,
        field: &str,
        target: &str,
    ) -> Result<&Arc<EnumDescriptor>, SchemaError> {
        self.enums
            .get(target)
            .ok_or_else(|| SchemaError::UnresolvedEnumRef {
                strukt: strukt.to_string(),
                field: field.to_string(),
                target: target.to_string(),
            })
    }

    /// Checks that every enum/struct reference in a type is registered.
    fn check_references(
        &self,
        strukt: &str,
        field: &str,
        ty: &TypeRef,
    ) -> Result<(), SchemaError> {
        match ty {
            TypeRef::Bool | TypeRef::Int | TypeRef::Float | TypeRef::Str => Ok(()),
            TypeRef::Enum(name) => {
                self.enum_ref(strukt, field, name)?;
                Ok(())
            }
            TypeRef::Struct(name) => {
                if !self.structs.contains_key(name) {
                    return Err(SchemaError::UnresolvedStructRef {
                        strukt: strukt.to_string(),
                        field: field.to_string(),
                        target: name.clone(),
                    });
                }
                Ok(())
            }
            TypeRef::Array(elem, _) | TypeRef::List(elem) => {
                self.check_references(strukt, field, elem)
            }
        }
    }

    /// Checks that enum-item defaults resolve against their enums.
    fn check_default_refs(
        &self,
        strukt: &str,
        field: &str,
        ty: &TypeRef,
        default: &DefaultValue,
    ) -> Result<(), SchemaError> {
        match default {
            DefaultValue::EnumItem(item) => {
                if let TypeRef::Enum(enum_name) = ty {
                    let descriptor = self.enum_ref(strukt, field, enum_name)?;
                    if descriptor.ordinal_of(item).is_none() {
                        return Err(SchemaError::UnknownEnumItem {
                            strukt: strukt.to_string(),
                            field: field.to_string(),
                            enumeration: enum_name.clone(),
                            item: item.clone(),
                        });
                    }
                }
                Ok(())
            }
            DefaultValue::Array(defaults) => {
                if let TypeRef::Array(elem, _) = ty {
                    for default in defaults {
                        self.check_default_refs(strukt, field, elem, default)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Rejects cycles in the struct reference graph.
    fn check_acyclic(&self) -> Result<(), SchemaError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            name: &str,
            structs: &HashMap<String, Arc<StructDescriptor>>,
            marks: &mut HashMap<String, Mark>,
        ) -> Result<(), SchemaError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    return Err(SchemaError::CyclicReference {
                        strukt: name.to_string(),
                    })
                }
                None => {}
            }
            marks.insert(name.to_string(), Mark::InProgress);
            if let Some(descriptor) = structs.get(name) {
                for field in descriptor.fields() {
                    for target in struct_refs(field.ty()) {
                        visit(&target, structs, marks)?;
                    }
                }
            }
            marks.insert(name.to_string(), Mark::Done);
            Ok(())
        }

        fn struct_refs(ty: &TypeRef) -> Vec<String> {
            match ty {
                TypeRef::Struct(name) => vec![name.clone()],
                TypeRef::Array(elem, _) | TypeRef::List(elem) => struct_refs(elem),
                _ => Vec::new(),
            }
        }

        let mut marks = HashMap::new();
        for name in self.structs.keys() {
            visit(name, &self.structs, &mut marks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;

    fn level_enum() -> EnumDescriptor {
        EnumDescriptor::new("Level", "", &[("Info", ""), ("Warn", ""), ("Error", "")]).unwrap()
    }

    #[test]
    fn duplicate_names_rejected_per_namespace() {
        let mut registry = SchemaRegistry::new();
        registry.register_enum(level_enum()).unwrap();
        let err = registry.register_enum(level_enum()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEnum { .. }));

        registry
            .register_struct(StructDescriptor::new("Msg", "", vec![]).unwrap())
            .unwrap();
        let err = registry
            .register_struct(StructDescriptor::new("Msg", "", vec![]).unwrap())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateStruct { .. }));

        // A struct and an enum may share a name: independent namespaces.
        registry
            .register_struct(StructDescriptor::new("Level", "", vec![]).unwrap())
            .unwrap();
    }

    #[test]
    fn forward_references_resolve_at_finalize() {
        let mut registry = SchemaRegistry::new();
        // "Outer" references "Inner" before it is registered.
        registry
            .register_struct(
                StructDescriptor::new(
                    "Outer",
                    "",
                    vec![FieldDescriptor::struct_field("inner", "Inner", "")],
                )
                .unwrap(),
            )
            .unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Inner",
                    "",
                    vec![FieldDescriptor::int_field("count", 7, "")],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();

        let outer = registry.instantiate("Outer").unwrap();
        let inner = outer.struct_field("inner").unwrap();
        assert_eq!(inner.int_field("count").unwrap(), 7);
    }

    #[test]
    fn unresolved_reference_fails_finalize() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Outer",
                    "",
                    vec![FieldDescriptor::struct_field("inner", "Missing", "")],
                )
                .unwrap(),
            )
            .unwrap();
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedStructRef { .. }));
    }

    #[test]
    fn reference_cycles_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_struct(
                StructDescriptor::new("A", "", vec![FieldDescriptor::struct_field("b", "B", "")])
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_struct(
                StructDescriptor::new("B", "", vec![FieldDescriptor::struct_field("a", "A", "")])
                    .unwrap(),
            )
            .unwrap();
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, SchemaError::CyclicReference { .. }));
    }

    #[test]
    fn enum_item_defaults_resolve_to_ordinals() {
        let mut registry = SchemaRegistry::new();
        registry.register_enum(level_enum()).unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Log",
                    "",
                    vec![FieldDescriptor::enum_field("level", "Level", "Warn", "")],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();

        let log = registry.instantiate("Log").unwrap();
        assert_eq!(log.ordinal_field("level").unwrap(), 1);
    }

    #[test]
    fn unknown_enum_item_default_fails_finalize() {
        let mut registry = SchemaRegistry::new();
        registry.register_enum(level_enum()).unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Log",
                    "",
                    vec![FieldDescriptor::enum_field("level", "Level", "Fatal", "")],
                )
                .unwrap(),
            )
            .unwrap();
        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownEnumItem { .. }));
    }

    #[test]
    fn registration_closed_after_finalize() {
        let mut registry = SchemaRegistry::new();
        registry.finalize().unwrap();
        let err = registry
            .register_struct(StructDescriptor::new("Late", "", vec![]).unwrap())
            .unwrap_err();
        assert!(matches!(err, SchemaError::RegistryFinalized));
    }

    #[test]
    fn lookups_require_finalize() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_struct(StructDescriptor::new("Msg", "", vec![]).unwrap())
            .unwrap();
        assert!(matches!(
            registry.struct_descriptor("Msg").unwrap_err(),
            SchemaError::RegistryNotFinalized
        ));
        registry.finalize().unwrap();
        assert!(registry.struct_descriptor("Msg").is_ok());
        assert!(matches!(
            registry.struct_descriptor("Other").unwrap_err(),
            SchemaError::StructNotFound { .. }
        ));
    }

    #[test]
    fn instantiate_materializes_array_defaults() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Texture",
                    "",
                    vec![FieldDescriptor::int_array("size", &[0, 0, 1], "")],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();

        let texture = registry.instantiate("Texture").unwrap();
        let size = texture.slice_field("size").unwrap();
        assert_eq!(size.len(), 3);
        assert_eq!(size[2].as_int(), Some(1));
    }
}
