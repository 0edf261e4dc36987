//! Typed facade over the project document instance.

use std::sync::Arc;

use gg_schema_core::{FieldFlags, SchemaError, SchemaRegistry, StructValue, TypeRef, Value};

use crate::schema;

/// One loaded `.gguser` document.
///
/// The root instance stays dynamic so reflection consumers can walk it
/// through the descriptors; the accessors below cover the operations the
/// preview surface performs constantly.
#[derive(Debug, Clone)]
pub struct UserFile {
    registry: Arc<SchemaRegistry>,
    root: StructValue,
}

impl UserFile {
    /// Creates a document populated with descriptor defaults.
    pub fn new(registry: Arc<SchemaRegistry>) -> Result<Self, SchemaError> {
        let root = registry.instantiate(schema::GG_USER_FILE)?;
        Ok(Self { registry, root })
    }

    /// Wraps a decoded root instance.
    pub(crate) fn from_root(registry: Arc<SchemaRegistry>, root: StructValue) -> Self {
        Self { registry, root }
    }

    /// Registry the document's descriptors live in.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Root instance, for reflection consumers.
    pub fn root(&self) -> &StructValue {
        &self.root
    }

    /// Mutable root instance.
    pub fn root_mut(&mut self) -> &mut StructValue {
        &mut self.root
    }

    /// Document version string.
    pub fn version(&self) -> Result<&str, SchemaError> {
        self.root.str_field("version")
    }

    /// Creates a default instance of any registered struct, typically an
    /// imported resource to fill in and add.
    pub fn instantiate(&self, name: &str) -> Result<StructValue, SchemaError> {
        self.registry.instantiate(name)
    }

    /// Appends an imported resource record.
    pub fn add_imported_resource(&mut self, resource: StructValue) -> Result<(), SchemaError> {
        self.root
            .push("importedResources", Value::Struct(resource))
    }

    /// Imported resource records in document order.
    pub fn imported_resources(&self) -> Result<&[Value], SchemaError> {
        self.root.slice_field("importedResources")
    }

    /// Sets a saved variable, overwriting an existing entry of the same
    /// name or appending a new one.
    pub fn set_saved_variable(&mut self, name: &str, value: &str) -> Result<(), SchemaError> {
        if let Value::List(entries) = self.root.get_mut("savedVariables")? {
            for entry in entries.iter_mut() {
                if let Value::Struct(pair) = entry {
                    if pair.str_field("name")? == name {
                        pair.set("value", Value::Str(value.to_string()))?;
                        return Ok(());
                    }
                }
            }
        }
        let mut pair = self.registry.instantiate(schema::SAVED_VARIABLE)?;
        pair.set("name", Value::Str(name.to_string()))?;
        pair.set("value", Value::Str(value.to_string()))?;
        self.root.push("savedVariables", Value::Struct(pair))
    }

    /// Value of a saved variable, if present.
    pub fn saved_variable(&self, name: &str) -> Result<Option<String>, SchemaError> {
        for entry in self.root.slice_field("savedVariables")? {
            if let Value::Struct(pair) = entry {
                if pair.str_field("name")? == name {
                    return Ok(Some(pair.str_field("value")?.to_string()));
                }
            }
        }
        Ok(None)
    }

    /// Adds a bookmark pointing at a viewable resource.
    pub fn add_bookmark(&mut self, name: &str, target: &str) -> Result<(), SchemaError> {
        let mut bookmark = self.registry.instantiate(schema::BOOKMARK)?;
        bookmark.set("name", Value::Str(name.to_string()))?;
        bookmark.set(
            "viewableResourceDisplayName",
            Value::Str(target.to_string()),
        )?;
        self.root.push("bookmarks", Value::Struct(bookmark))
    }

    /// Bookmark `(name, target)` pairs in document order.
    pub fn bookmarks(&self) -> Result<Vec<(String, String)>, SchemaError> {
        let mut result = Vec::new();
        for entry in self.root.slice_field("bookmarks")? {
            if let Value::Struct(bookmark) = entry {
                result.push((
                    bookmark.str_field("name")?.to_string(),
                    bookmark
                        .str_field("viewableResourceDisplayName")?
                        .to_string(),
                ));
            }
        }
        Ok(result)
    }

    /// Adds a named preset bundling imported-resource records.
    pub fn add_preset(
        &mut self,
        name: &str,
        resources: Vec<StructValue>,
    ) -> Result<(), SchemaError> {
        let mut preset = self.registry.instantiate(schema::IMPORTED_RESOURCE_PRESET)?;
        preset.set("name", Value::Str(name.to_string()))?;
        for resource in resources {
            preset.push("importedResources", Value::Struct(resource))?;
        }
        self.root
            .push("importedResourcePresets", Value::Struct(preset))
    }

    /// Named preset, if present.
    pub fn preset(&self, name: &str) -> Result<Option<StructValue>, SchemaError> {
        for entry in self.root.slice_field("importedResourcePresets")? {
            if let Value::Struct(preset) = entry {
                if preset.str_field("name")? == name {
                    return Ok(Some(preset.clone()));
                }
            }
        }
        Ok(None)
    }

    /// Copies every runtime-only (`NO_SERIALIZE`) field from a previous
    /// document into this one.
    ///
    /// This is the `preserveState` reload behavior: a freshly loaded
    /// document has runtime fields at their defaults; carrying them over
    /// keeps the camera pose and similar session state alive across the
    /// reload. The walk descends through struct-typed fields; list
    /// entries are positional and are not carried.
    pub fn carry_runtime_state(&mut self, prev: &UserFile) -> Result<(), SchemaError> {
        carry_struct(&mut self.root, &prev.root)
    }
}

fn carry_struct(dst: &mut StructValue, src: &StructValue) -> Result<(), SchemaError> {
    if dst.descriptor().name() != src.descriptor().name() {
        return Ok(());
    }
    let fields: Vec<(String, FieldFlags, TypeRef)> = dst
        .descriptor()
        .fields()
        .iter()
        .map(|f| (f.name().to_string(), f.flags(), f.ty().clone()))
        .collect();
    for (name, flags, ty) in fields {
        if flags.contains(FieldFlags::NO_SERIALIZE) {
            let value = src.get(&name)?.clone();
            dst.set(&name, value)?;
        } else if matches!(ty, TypeRef::Struct(_)) {
            if let (Value::Struct(dst_nested), Value::Struct(src_nested)) =
                (dst.get_mut(&name)?, src.get(&name)?)
            {
                carry_struct(dst_nested, src_nested)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::project_registry;

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(project_registry().unwrap())
    }

    #[test]
    fn saved_variables_upsert() {
        let mut file = UserFile::new(registry()).unwrap();
        file.set_saved_variable("exposure", "1.5").unwrap();
        file.set_saved_variable("exposure", "2.0").unwrap();
        file.set_saved_variable("gamma", "2.2").unwrap();

        assert_eq!(
            file.saved_variable("exposure").unwrap(),
            Some("2.0".to_string())
        );
        assert_eq!(file.saved_variable("missing").unwrap(), None);
        assert_eq!(file.root().slice_field("savedVariables").unwrap().len(), 2);
    }

    #[test]
    fn bookmarks_keep_order() {
        let mut file = UserFile::new(registry()).unwrap();
        file.add_bookmark("first", "Texture: output").unwrap();
        file.add_bookmark("second", "Buffer: particles").unwrap();
        let bookmarks = file.bookmarks().unwrap();
        assert_eq!(bookmarks[0].0, "first");
        assert_eq!(bookmarks[1].1, "Buffer: particles");
    }

    #[test]
    fn carry_runtime_state_restores_camera_pose() {
        let registry = registry();
        let mut old = UserFile::new(registry.clone()).unwrap();

        // Simulate a session that moved the camera.
        let camera = old
            .root_mut()
            .get_mut("systemVars")
            .unwrap()
            .as_struct_mut()
            .unwrap()
            .get_mut("camera")
            .unwrap()
            .as_struct_mut()
            .unwrap();
        camera
            .set(
                "cameraPos",
                Value::Array(vec![
                    Value::Float(5.0),
                    Value::Float(1.0),
                    Value::Float(-2.0),
                ]),
            )
            .unwrap();
        camera.set("cameraChanged", Value::Bool(true)).unwrap();

        let mut fresh = UserFile::new(registry).unwrap();
        fresh.carry_runtime_state(&old).unwrap();

        let camera = fresh
            .root()
            .struct_field("systemVars")
            .unwrap()
            .struct_field("camera")
            .unwrap();
        let pos = camera.slice_field("cameraPos").unwrap();
        assert_eq!(pos[0].as_float(), Some(5.0));
        assert!(camera.bool_field("cameraChanged").unwrap());
        // Persisted fields are untouched by the carry.
        assert_eq!(camera.float_field("FOV").unwrap(), 45.0);
    }
}
