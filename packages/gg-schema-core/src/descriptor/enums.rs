//! Enum descriptors.

use crate::error::SchemaError;

/// Single item of an enumeration.
#[derive(Debug, Clone)]
pub struct EnumItem {
    name: String,
    doc: String,
}

impl EnumItem {
    /// Item name, unique within the enum.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string.
    pub fn doc(&self) -> &str {
        &self.doc
    }
}

/// Named ordered set of items backed by stable integer ordinals.
///
/// The ordinal of an item is its position in the declared sequence and is
/// the wire/file representation; reordering published items breaks
/// compatibility.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    name: String,
    doc: String,
    items: Vec<EnumItem>,
}

impl EnumDescriptor {
    /// Builds an enum descriptor from `(item, doc)` pairs.
    ///
    /// # Returns
    /// `Err(SchemaError)` on duplicate item names or an empty item list.
    pub fn new(name: &str, doc: &str, items: &[(&str, &str)]) -> Result<Self, SchemaError> {
        if items.is_empty() {
            return Err(SchemaError::EmptyEnum {
                name: name.to_string(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for (item, _) in items {
            if !seen.insert(*item) {
                return Err(SchemaError::DuplicateEnumItem {
                    enumeration: name.to_string(),
                    item: item.to_string(),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            doc: doc.to_string(),
            items: items
                .iter()
                .map(|(item, doc)| EnumItem {
                    name: item.to_string(),
                    doc: doc.to_string(),
                })
                .collect(),
        })
    }

    /// Enum name, unique within the enum namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Items in declaration order.
    pub fn items(&self) -> &[EnumItem] {
        &self.items
    }

    /// Number of items; valid ordinals are `0..count()`.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Ordinal of the named item, if declared.
    pub fn ordinal_of(&self, item: &str) -> Option<u32> {
        self.items
            .iter()
            .position(|i| i.name == item)
            .map(|p| p as u32)
    }

    /// Item at the given ordinal, if in range.
    pub fn item(&self, ordinal: u32) -> Option<&EnumItem> {
        self.items.get(ordinal as usize)
    }
}
