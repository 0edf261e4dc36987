//! Descriptor tables for the preview message shapes.
//!
//! The registered descriptors are the single authoring surface: the wire
//! codec, the typed message conversions, and reflection consumers all
//! read them.

use gg_schema_core::{EnumDescriptor, FieldDescriptor, SchemaError, SchemaRegistry,
    StructDescriptor};

/// Bidirectional keep-alive message (empty body).
pub const PING: &str = "PreviewMsg_Ping";
/// Client→server version declaration.
pub const CS_VERSION: &str = "PreviewMsgCS_Version";
/// Severity enum for forwarded client diagnostics.
pub const CS_LOG_LEVEL: &str = "PreviewMsgCS_Log_Level";
/// Client→server diagnostic forwarding.
pub const CS_LOG: &str = "PreviewMsgCS_Log";
/// Server→client version verdict.
pub const SC_VERSION_RESPONSE: &str = "PreviewMsgSC_VersionResponse";
/// Server→client project load instruction.
pub const SC_LOAD_GG_FILE: &str = "PreviewMsgSC_LoadGGFile";

/// Registers the message descriptors into a registry.
///
/// Callers compose these with other tables (the project-file schema) and
/// finalize once everything is in.
pub fn register_messages(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    registry.register_enum(EnumDescriptor::new(
        CS_LOG_LEVEL,
        "",
        &[("Info", ""), ("Warn", ""), ("Error", "")],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        PING,
        "The client and server send this periodically to know the other is still alive. \
         It fails to send if the connection closes.",
        vec![],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        CS_VERSION,
        "The client tells the server what schema version it is using",
        vec![FieldDescriptor::str_field("version", "", "Schema version")],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        CS_LOG,
        "The client forwards a diagnostic message to the server's log sink",
        vec![
            FieldDescriptor::enum_field("level", CS_LOG_LEVEL, "Info", "The type of message"),
            FieldDescriptor::str_field("msg", "", "The log message"),
        ],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        SC_VERSION_RESPONSE,
        "The server tells the client whether or not the version is ok.",
        vec![FieldDescriptor::bool_field(
            "versionOK",
            false,
            "Whether the version is ok or not.",
        )],
    )?)?;

    registry.register_struct(StructDescriptor::new(
        SC_LOAD_GG_FILE,
        "The server tells the client to load a gg file",
        vec![
            FieldDescriptor::str_field(
                "fileName",
                "",
                "The path and name of the .gg file to load",
            ),
            FieldDescriptor::bool_field(
                "preserveState",
                true,
                "If true, camera state etc should be preserved",
            ),
        ],
    )?)?;

    Ok(())
}

/// Builds a finalized registry holding only the message tables.
pub fn protocol_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    register_messages(&mut registry)?;
    registry.finalize()?;
    Ok(registry)
}
