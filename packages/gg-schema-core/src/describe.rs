//! Serializable registry descriptions for reflection consumers.
//!
//! Editing surfaces and tooling read the same field metadata the codec
//! does; this module renders it into plain serializable records.

use serde::Serialize;

use crate::descriptor::FieldFlags;
use crate::registry::SchemaRegistry;

/// Description of every descriptor in a registry, sorted by name.
#[derive(Debug, Serialize)]
pub struct RegistryDescription {
    pub structs: Vec<StructDescription>,
    pub enums: Vec<EnumDescription>,
}

/// Description of a single struct descriptor.
#[derive(Debug, Serialize)]
pub struct StructDescription {
    pub name: String,
    pub doc: String,
    pub fields: Vec<FieldDescription>,
}

/// Description of a single field, flags unpacked for consumers.
#[derive(Debug, Serialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub default: String,
    pub doc: String,
    pub no_serialize: bool,
    pub ui_hide_array_index: bool,
}

/// Description of a single enum descriptor.
#[derive(Debug, Serialize)]
pub struct EnumDescription {
    pub name: String,
    pub doc: String,
    pub items: Vec<EnumItemDescription>,
}

/// Description of an enum item with its stable ordinal.
#[derive(Debug, Serialize)]
pub struct EnumItemDescription {
    pub name: String,
    pub ordinal: u32,
    pub doc: String,
}

/// Renders a finalized registry into a serializable description.
pub fn describe(registry: &SchemaRegistry) -> RegistryDescription {
    let mut structs: Vec<StructDescription> = registry
        .structs()
        .map(|descriptor| StructDescription {
            name: descriptor.name().to_string(),
            doc: descriptor.doc().to_string(),
            fields: descriptor
                .fields()
                .iter()
                .map(|field| FieldDescription {
                    name: field.name().to_string(),
                    ty: field.ty().display(),
                    default: field.default().display(),
                    doc: field.doc().to_string(),
                    no_serialize: field.flags().contains(FieldFlags::NO_SERIALIZE),
                    ui_hide_array_index: field.flags().contains(FieldFlags::UI_HIDE_ARRAY_INDEX),
                })
                .collect(),
        })
        .collect();
    structs.sort_by(|a, b| a.name.cmp(&b.name));

    let mut enums: Vec<EnumDescription> = registry
        .enums()
        .map(|descriptor| EnumDescription {
            name: descriptor.name().to_string(),
            doc: descriptor.doc().to_string(),
            items: descriptor
                .items()
                .iter()
                .enumerate()
                .map(|(ordinal, item)| EnumItemDescription {
                    name: item.name().to_string(),
                    ordinal: ordinal as u32,
                    doc: item.doc().to_string(),
                })
                .collect(),
        })
        .collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));

    RegistryDescription { structs, enums }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumDescriptor, FieldDescriptor, StructDescriptor};

    #[test]
    fn description_carries_flags_and_ordinals() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_enum(EnumDescriptor::new("Mode", "", &[("A", ""), ("B", "")]).unwrap())
            .unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Thing",
                    "a thing",
                    vec![
                        FieldDescriptor::float_array("pos", &[0.0, 0.0], "")
                            .with_flags(FieldFlags::NO_SERIALIZE | FieldFlags::UI_HIDE_ARRAY_INDEX),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();

        let description = describe(&registry);
        assert_eq!(description.structs.len(), 1);
        let field = &description.structs[0].fields[0];
        assert_eq!(field.ty, "float[2]");
        assert!(field.no_serialize);
        assert!(field.ui_hide_array_index);
        assert_eq!(description.enums[0].items[1].ordinal, 1);
    }
}
