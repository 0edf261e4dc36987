//! Descriptor tables for the `.gguser` project document.
//!
//! Field names, defaults, docs, and flags are the persisted contract;
//! renaming or reordering published entries breaks saved files.

use gg_schema_core::{EnumDescriptor, FieldDescriptor, FieldFlags, SchemaError, SchemaRegistry,
    StructDescriptor, TypeRef};

/// Root document struct.
pub const GG_USER_FILE: &str = "GGUserFile";
/// Imported texture settings.
pub const IMPORTED_TEXTURE: &str = "GGUserFile_ImportedTexture";
/// Imported buffer settings.
pub const IMPORTED_BUFFER: &str = "GGUserFile_ImportedBuffer";
/// Texture-or-buffer import record, tagged by `isATexture`.
pub const IMPORTED_RESOURCE: &str = "GGUserFile_ImportedResource";
/// Camera parameters, including runtime-only pose fields.
pub const CAMERA: &str = "GGUserFile_Camera";
/// System variable-name bindings consumed by the rendering pipeline.
pub const SYSTEM_VARS: &str = "GGUserFile_SystemVars";
/// Persisted name/value scalar pair.
pub const SAVED_VARIABLE: &str = "GGUserFile_SavedVariable";
/// Named shortcut to a viewable resource.
pub const BOOKMARK: &str = "GGUserFile_Bookmark";
/// Named bundle of imported-resource settings.
pub const IMPORTED_RESOURCE_PRESET: &str = "GGUserFile_ImportedResourcePreset";

/// Element type of raw binary texture imports.
pub const TEXTURE_BINARY_TYPE: &str = "GGUserFile_ImportedTexture_BinaryType";
/// Ray-tracing acceleration-structure build-flag hints.
pub const TLAS_BUILD_FLAGS: &str = "GGUserFile_TLASBuildFlags";
/// Jitter sequence selection for temporal techniques.
pub const CAMERA_JITTER_TYPE: &str = "GGUserFile_CameraJitterType";
/// Pixel format of a created texture.
pub const TEXTURE_FORMAT: &str = "TextureFormat";
/// Scalar typing of structured-buffer fields.
pub const DATA_FIELD_TYPE: &str = "DataFieldType";

/// Registers the project-file descriptors into a registry.
pub fn register_project(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    register_enums(registry)?;
    register_imported_resources(registry)?;
    register_camera_and_vars(registry)?;

    registry.register_struct(StructDescriptor::new(
        SAVED_VARIABLE,
        "Saved Variable Values",
        vec![
            FieldDescriptor::str_field("name", "", ""),
            FieldDescriptor::str_field("value", "", ""),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        BOOKMARK,
        "A bookmark for resources to show up in a short list, to be more quickly found.",
        vec![
            FieldDescriptor::str_field("name", "", ""),
            FieldDescriptor::str_field("viewableResourceDisplayName", "", ""),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        IMPORTED_RESOURCE_PRESET,
        "A preset of imported resource settings",
        vec![
            FieldDescriptor::str_field("name", "", ""),
            FieldDescriptor::list(
                "importedResources",
                TypeRef::Struct(IMPORTED_RESOURCE.to_string()),
                "",
            ),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        GG_USER_FILE,
        "The contents of a .gguser file",
        vec![
            FieldDescriptor::str_field("version", "1.0", "The version of the .gguser file"),
            FieldDescriptor::struct_field("systemVars", SYSTEM_VARS, ""),
            FieldDescriptor::int_field("resourceViewType", 0, "The type of resource being viewed"),
            FieldDescriptor::int_field(
                "resourceViewNodeIndex",
                -1,
                "The index of the node being viewed",
            ),
            FieldDescriptor::int_field(
                "resourceViewResourceIndex",
                -1,
                "The index of that resource within that node being used",
            ),
            FieldDescriptor::int_field(
                "syncInterval",
                1,
                "Present() parameter: synchronize presentation after the nth vertical blank.",
            ),
            FieldDescriptor::list(
                "importedResources",
                TypeRef::Struct(IMPORTED_RESOURCE.to_string()),
                "",
            ),
            FieldDescriptor::list(
                "savedVariables",
                TypeRef::Struct(SAVED_VARIABLE.to_string()),
                "",
            ),
            FieldDescriptor::list("bookmarks", TypeRef::Struct(BOOKMARK.to_string()), ""),
            FieldDescriptor::list(
                "importedResourcePresets",
                TypeRef::Struct(IMPORTED_RESOURCE_PRESET.to_string()),
                "",
            ),
        ],
    )?)?;

    Ok(())
}

fn register_enums(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register_enum(EnumDescriptor::new(
        TEXTURE_BINARY_TYPE,
        "The basic data type within the binary file",
        &[
            ("Float", "Floating point 32 bits"),
            ("Byte", "Unsigned 8 bits"),
            ("Count", ""),
        ],
    )?)?;

    registry.register_enum(EnumDescriptor::new(
        TLAS_BUILD_FLAGS,
        "Acceleration structure build preference hints",
        &[
            ("None", ""),
            ("AllowUpdate", ""),
            ("AllowCompaction", ""),
            ("PreferFastTrace", ""),
            ("PreferFastBuild", ""),
            ("MinimizeMemory", ""),
        ],
    )?)?;

    registry.register_enum(EnumDescriptor::new(
        CAMERA_JITTER_TYPE,
        "The sequence of the jittered projection matrix",
        &[
            ("None", "No Jitter"),
            ("UniformWhite", "Uniform white noise"),
            ("Halton23", "Halton(2,3)"),
        ],
    )?)?;

    registry.register_enum(EnumDescriptor::new(
        TEXTURE_FORMAT,
        "The pixel format of a texture",
        &[
            ("Any", ""),
            ("R8_Unorm", ""),
            ("RG8_Unorm", ""),
            ("RGBA8_Unorm", ""),
            ("RGBA8_Unorm_sRGB", ""),
            ("R16_Float", ""),
            ("RG16_Float", ""),
            ("RGBA16_Float", ""),
            ("R32_Float", ""),
            ("RG32_Float", ""),
            ("RGBA32_Float", ""),
            ("R32_Uint", ""),
            ("RGBA32_Uint", ""),
            ("D32_Float", ""),
        ],
    )?)?;

    registry.register_enum(EnumDescriptor::new(
        DATA_FIELD_TYPE,
        "The scalar type of a structured-buffer field",
        &[
            ("Int", ""),
            ("Int2", ""),
            ("Int3", ""),
            ("Int4", ""),
            ("Uint", ""),
            ("Uint2", ""),
            ("Uint3", ""),
            ("Uint4", ""),
            ("Float", ""),
            ("Float2", ""),
            ("Float3", ""),
            ("Float4", ""),
            ("Bool", ""),
            ("Float4x4", ""),
            ("Uint_16", ""),
            ("Int_64", ""),
            ("Uint_64", ""),
            ("Count", ""),
        ],
    )?)?;

    Ok(())
}

fn register_imported_resources(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register_struct(StructDescriptor::new(
        IMPORTED_TEXTURE,
        "The details of an imported texture",
        vec![
            FieldDescriptor::str_field("fileName", "", "The image file loaded"),
            FieldDescriptor::bool_field(
                "fileIsSRGB",
                true,
                "Whether the file is an sRGB file or not",
            ),
            FieldDescriptor::bool_field("makeMips", false, "Whether to make mips or no"),
            FieldDescriptor::int_array("size", &[0, 0, 1], "The size of the image to create")
                .with_flags(FieldFlags::UI_HIDE_ARRAY_INDEX),
            FieldDescriptor::float_array(
                "color",
                &[1.0, 1.0, 1.0, 1.0],
                "The color of the image to create, or the tint of the loaded file",
            )
            .with_flags(FieldFlags::UI_HIDE_ARRAY_INDEX),
            FieldDescriptor::enum_field(
                "format",
                TEXTURE_FORMAT,
                "RGBA8_Unorm_sRGB",
                "The format of the texture to create",
            ),
            FieldDescriptor::int_array(
                "binaryDims",
                &[0, 0, 1],
                "The size of the image in the binary file",
            )
            .with_flags(FieldFlags::UI_HIDE_ARRAY_INDEX),
            FieldDescriptor::enum_field(
                "binaryType",
                TEXTURE_BINARY_TYPE,
                "Float",
                "The basic data type within the binary file",
            ),
            FieldDescriptor::int_field(
                "binaryChannels",
                4,
                "How many channels there are in the file",
            ),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        IMPORTED_BUFFER,
        "The details of an imported buffer",
        vec![
            FieldDescriptor::str_field("fileName", "", "The file loaded"),
            FieldDescriptor::bool_field(
                "CSVHeaderRow",
                true,
                "If reading a CSV, and this is true, it will skip everything up to the first \
                 newline, to ignore a header row.",
            ),
            FieldDescriptor::int_field(
                "structIndex",
                -1,
                "the index of the struct if a structured buffer",
            ),
            FieldDescriptor::enum_field(
                "type",
                DATA_FIELD_TYPE,
                "Count",
                "The data field type, if not a structured buffer",
            ),
            FieldDescriptor::int_field("count", 1, "how many items are stored"),
            FieldDescriptor::enum_field(
                "RT_BuildFlags",
                TLAS_BUILD_FLAGS,
                "PreferFastTrace",
                "Acceleration structure build preference",
            ),
            FieldDescriptor::bool_field("BLASOpaque", false, "BLAS option"),
            FieldDescriptor::bool_field("BLASNoDuplicateAnyhitInvocations", false, "BLAS option"),
            FieldDescriptor::bool_field(
                "IsAABBs",
                false,
                "Set to true if ray tracing AABBs with intersection shaders. Format is Min XYZ, \
                 Max XYZ.",
            ),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        IMPORTED_RESOURCE,
        "The details of an imported resource",
        vec![
            FieldDescriptor::str_field(
                "nodeName",
                "",
                "The name of the node this imported resource data is for",
            ),
            FieldDescriptor::bool_field(
                "resetEveryFrame",
                true,
                "Whether this resource should be reset every frame, or if the technique is \
                 allowed to change it over multiple frames",
            ),
            FieldDescriptor::bool_field("isATexture", true, "Is it a texture or a buffer"),
            FieldDescriptor::struct_field("texture", IMPORTED_TEXTURE, "Texture data"),
            FieldDescriptor::struct_field("buffer", IMPORTED_BUFFER, "Buffer data"),
        ],
    )?)?;

    Ok(())
}

fn register_camera_and_vars(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register_struct(StructDescriptor::new(
        CAMERA,
        "",
        vec![
            FieldDescriptor::bool_field(
                "perspective",
                true,
                "Perspective if true, orthographic if false.",
            ),
            FieldDescriptor::bool_field(
                "leftHanded",
                true,
                "Left handed if true, right handed if false.",
            ),
            FieldDescriptor::bool_field(
                "reverseZ",
                true,
                "If true, reverses the depth values for more precision.",
            ),
            FieldDescriptor::float_field("nearPlane", 0.1, "The distance to the near plane."),
            FieldDescriptor::float_field(
                "farPlane",
                1000.0,
                "The distance to the far plane. Set to zero for infinite Z.",
            ),
            FieldDescriptor::float_field("FOV", 45.0, "Vertical field of view, in degrees"),
            FieldDescriptor::float_field(
                "flySpeed",
                0.1,
                "How fast the WASD keys move in the world",
            ),
            FieldDescriptor::float_field(
                "mouseSensitivity",
                0.01,
                "How fast the mouse rotates the camera",
            ),
            FieldDescriptor::enum_field(
                "jitterType",
                CAMERA_JITTER_TYPE,
                "Halton23",
                "The sequence of the jittered projection matrix",
            ),
            FieldDescriptor::int_field(
                "jitterLength",
                16,
                "The length of the sequence used to jitter the jittered projection matrix. \
                 0 means infinite.",
            ),
            FieldDescriptor::float_array("startingCameraPos", &[0.0, 0.0, -10.0], "")
                .with_flags(FieldFlags::UI_HIDE_ARRAY_INDEX),
            FieldDescriptor::float_array("startingCameraAltitudeAzimuth", &[0.0, 0.0], "")
                .with_flags(FieldFlags::UI_HIDE_ARRAY_INDEX),
            // Session-local camera pose; never persisted.
            FieldDescriptor::float_array("cameraPos", &[0.0, 0.0, -10.0], "")
                .with_flags(FieldFlags::NO_SERIALIZE),
            FieldDescriptor::float_array("cameraAltitudeAzimuth", &[0.0, 0.0], "")
                .with_flags(FieldFlags::NO_SERIALIZE),
            FieldDescriptor::bool_field("cameraChanged", false, "")
                .with_flags(FieldFlags::NO_SERIALIZE),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        SYSTEM_VARS,
        "",
        vec![
            FieldDescriptor::str_field("iResolution_varName", "iResolution", ""),
            FieldDescriptor::str_field("iResolution_textureName", "", ""),
            FieldDescriptor::str_field("iTime_varName", "iTime", ""),
            FieldDescriptor::str_field("iTimeDelta_varName", "iTimeDelta", ""),
            FieldDescriptor::str_field("iFrameRate_varName", "iFrameRate", ""),
            FieldDescriptor::str_field("iFrame_varName", "iFrame", ""),
            FieldDescriptor::str_field("iMouse_varName", "iMouse", ""),
            FieldDescriptor::str_field("MouseState_varName", "MouseState", ""),
            FieldDescriptor::str_field("MouseStateLastFrame_varName", "MouseStateLastFrame", ""),
            FieldDescriptor::str_field("WindowSize_varName", "WindowSize", ""),
            FieldDescriptor::struct_field(
                "camera",
                CAMERA,
                "The camera settings. Can pluralize if one isn't enough.",
            ),
            FieldDescriptor::str_field(
                "ProjMtx_textureName",
                "",
                "The projection matrix needs a resolution to calculate for. Choose a texture \
                 node and that will be used as a resolution.",
            ),
            FieldDescriptor::str_field("ViewMtx_varName", "ViewMtx", ""),
            FieldDescriptor::str_field("InvViewMtx_varName", "InvViewMtx", ""),
            FieldDescriptor::str_field("ProjMtx_varName", "ProjMtx", ""),
            FieldDescriptor::str_field("InvProjMtx_varName", "InvProjMtx", ""),
            FieldDescriptor::str_field("ViewProjMtx_varName", "ViewProjMtx", ""),
            FieldDescriptor::str_field("InvViewProjMtx_varName", "InvViewProjMtx", ""),
            FieldDescriptor::str_field(
                "JitteredProjMtx_varName",
                "JitteredProjMtx",
                "ProjMtx with jitter.",
            ),
            FieldDescriptor::str_field(
                "InvJitteredProjMtx_varName",
                "InvJitteredProjMtx",
                "Inverted ProjMtx with jitter.",
            ),
            FieldDescriptor::str_field(
                "JitteredViewProjMtx_varName",
                "JitteredViewProjMtx",
                "ViewProjMtx with jitter.",
            ),
            FieldDescriptor::str_field(
                "InvJitteredViewProjMtx_varName",
                "InvJitteredViewProjMtx",
                "Inverted ViewProjMtx with jitter.",
            ),
            FieldDescriptor::str_field("CameraPos_varName", "CameraPos", ""),
            FieldDescriptor::str_field("CameraChanged_varName", "CameraChanged", ""),
            FieldDescriptor::str_field("CameraJitter_varName", "CameraJitter", ""),
            FieldDescriptor::str_field(
                "ShadingRateImageTileSize_varName",
                "ShadingRateImageTileSize",
                "",
            ),
            FieldDescriptor::str_field(
                "KeyState_bufferName",
                "",
                "256 entries for the keys this frame, and 256 entries for the keys last frame. \
                 512 entries total.",
            ),
        ],
    )?)?;

    Ok(())
}

/// Builds a finalized registry holding only the project tables.
pub fn project_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    register_project(&mut registry)?;
    registry.finalize()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_tables_register_and_finalize() {
        let registry = project_registry().unwrap();
        assert!(registry.struct_descriptor(GG_USER_FILE).is_ok());
        assert!(registry.struct_descriptor(IMPORTED_RESOURCE).is_ok());
        assert!(registry.enum_descriptor(TLAS_BUILD_FLAGS).is_ok());
    }

    #[test]
    fn root_defaults_match_published_contract() {
        let registry = project_registry().unwrap();
        let file = registry.instantiate(GG_USER_FILE).unwrap();
        assert_eq!(file.str_field("version").unwrap(), "1.0");
        assert_eq!(file.int_field("resourceViewNodeIndex").unwrap(), -1);
        assert_eq!(file.int_field("syncInterval").unwrap(), 1);
        assert!(file.slice_field("importedResources").unwrap().is_empty());

        let camera = file
            .struct_field("systemVars")
            .unwrap()
            .struct_field("camera")
            .unwrap();
        assert_eq!(camera.float_field("FOV").unwrap(), 45.0);
        // Halton23 is ordinal 2 of the jitter enum.
        assert_eq!(camera.ordinal_field("jitterType").unwrap(), 2);
    }

    #[test]
    fn texture_defaults_match_published_contract() {
        let registry = project_registry().unwrap();
        let texture = registry.instantiate(IMPORTED_TEXTURE).unwrap();
        assert!(texture.bool_field("fileIsSRGB").unwrap());
        let format = registry.enum_descriptor(TEXTURE_FORMAT).unwrap();
        assert_eq!(
            texture.ordinal_field("format").unwrap(),
            format.ordinal_of("RGBA8_Unorm_sRGB").unwrap()
        );
        let size = texture.slice_field("size").unwrap();
        assert_eq!(size[2].as_int(), Some(1));
    }
}
