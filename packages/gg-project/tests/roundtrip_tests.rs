//! End-to-end persistence tests through real files.

use std::sync::Arc;

use gg_schema_core::Value;
use gg_project::schema::{self, project_registry};
use gg_project::{ProjectStore, UserFile};

fn setup() -> (tempfile::TempDir, ProjectStore, Arc<gg_schema_core::SchemaRegistry>) {
    let registry = Arc::new(project_registry().unwrap());
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::new(dir.path(), registry.clone());
    (dir, store, registry)
}

fn texture_resource(file: &UserFile, node: &str, image: &str) -> gg_schema_core::StructValue {
    let mut resource = file.instantiate(schema::IMPORTED_RESOURCE).unwrap();
    resource
        .set("nodeName", Value::Str(node.to_string()))
        .unwrap();
    resource.set("isATexture", Value::Bool(true)).unwrap();
    let texture = resource
        .get_mut("texture")
        .unwrap()
        .as_struct_mut()
        .unwrap();
    texture
        .set("fileName", Value::Str(image.to_string()))
        .unwrap();
    texture.set("makeMips", Value::Bool(true)).unwrap();
    resource
}

fn buffer_resource(file: &UserFile, node: &str, data: &str) -> gg_schema_core::StructValue {
    let mut resource = file.instantiate(schema::IMPORTED_RESOURCE).unwrap();
    resource
        .set("nodeName", Value::Str(node.to_string()))
        .unwrap();
    resource.set("isATexture", Value::Bool(false)).unwrap();
    let buffer = resource.get_mut("buffer").unwrap().as_struct_mut().unwrap();
    buffer.set("fileName", Value::Str(data.to_string())).unwrap();
    buffer.set("count", Value::Int(1024)).unwrap();
    resource
}

#[test]
fn preset_survives_save_load_cycle() {
    let (_dir, store, registry) = setup();
    let mut file = UserFile::new(registry).unwrap();

    let texture = texture_resource(&file, "NoiseTexture", "bluenoise.png");
    let buffer = buffer_resource(&file, "Particles", "particles.csv");
    file.add_preset("night scene", vec![texture, buffer]).unwrap();

    store.save(&file, "project").unwrap();
    let loaded = store.load("project").unwrap();

    let preset = loaded.preset("night scene").unwrap().unwrap();
    let resources = preset.slice_field("importedResources").unwrap();
    assert_eq!(resources.len(), 2);

    // Ordering and field values survive the cycle.
    let first = resources[0].as_struct().unwrap();
    assert_eq!(first.str_field("nodeName").unwrap(), "NoiseTexture");
    assert!(first.bool_field("isATexture").unwrap());
    assert_eq!(
        first
            .struct_field("texture")
            .unwrap()
            .str_field("fileName")
            .unwrap(),
        "bluenoise.png"
    );

    let second = resources[1].as_struct().unwrap();
    assert!(!second.bool_field("isATexture").unwrap());
    assert_eq!(
        second
            .struct_field("buffer")
            .unwrap()
            .int_field("count")
            .unwrap(),
        1024
    );
}

#[test]
fn runtime_camera_state_resets_through_persistence() {
    let (_dir, store, registry) = setup();
    let mut file = UserFile::new(registry).unwrap();

    {
        let camera = file
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
                    Value::Float(3.0),
                    Value::Float(4.0),
                    Value::Float(5.0),
                ]),
            )
            .unwrap();
        camera.set("FOV", Value::Float(60.0)).unwrap();
    }

    store.save(&file, "session").unwrap();
    let loaded = store.load("session").unwrap();

    let camera = loaded
        .root()
        .struct_field("systemVars")
        .unwrap()
        .struct_field("camera")
        .unwrap();
    // Persisted field kept, runtime-only field back at its default.
    assert_eq!(camera.float_field("FOV").unwrap(), 60.0);
    let pos = camera.slice_field("cameraPos").unwrap();
    assert_eq!(pos[0].as_float(), Some(0.0));
    assert_eq!(pos[2].as_float(), Some(-10.0));
}

#[test]
fn saved_variables_and_bookmarks_round_trip() {
    let (_dir, store, registry) = setup();
    let mut file = UserFile::new(registry).unwrap();
    file.set_saved_variable("exposure", "1.25").unwrap();
    file.add_bookmark("main output", "Texture: Output").unwrap();

    store.save(&file, "vars").unwrap();
    let loaded = store.load("vars").unwrap();

    assert_eq!(
        loaded.saved_variable("exposure").unwrap(),
        Some("1.25".to_string())
    );
    assert_eq!(
        loaded.bookmarks().unwrap(),
        vec![("main output".to_string(), "Texture: Output".to_string())]
    );
}

#[test]
fn fields_added_by_newer_builds_are_ignored() {
    let (dir, store, _registry) = setup();
    let path = store.path_for("forward");
    std::fs::write(
        &path,
        r#"{
            "version": "1.0",
            "syncInterval": 2,
            "someFieldFromTheFuture": {"nested": [1, 2, 3]}
        }"#,
    )
    .unwrap();

    let loaded = store.load("forward").unwrap();
    assert_eq!(loaded.root().int_field("syncInterval").unwrap(), 2);
    // Defaults fill everything the document does not carry.
    assert_eq!(loaded.version().unwrap(), "1.0");
    assert!(loaded.imported_resources().unwrap().is_empty());
    drop(dir);
}

#[test]
fn preserve_state_reload_keeps_camera_pose() {
    let (_dir, store, registry) = setup();

    // Session one: camera moved, project saved.
    let mut session = UserFile::new(registry).unwrap();
    {
        let camera = session
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
                    Value::Float(8.0),
                    Value::Float(0.5),
                    Value::Float(-3.0),
                ]),
            )
            .unwrap();
    }
    store.save(&session, "reload").unwrap();

    // Reload with preserveState: the fresh document gets the old pose.
    let mut reloaded = store.load("reload").unwrap();
    reloaded.carry_runtime_state(&session).unwrap();

    let camera = reloaded
        .root()
        .struct_field("systemVars")
        .unwrap()
        .struct_field("camera")
        .unwrap();
    let pos = camera.slice_field("cameraPos").unwrap();
    assert_eq!(pos[0].as_float(), Some(8.0));
    assert_eq!(pos[1].as_float(), Some(0.5));
}
