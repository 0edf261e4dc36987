//! Typed message payloads and the per-direction closed variant sets.

use gg_schema_core::{SchemaRegistry, StructValue, Value};

use crate::error::ProtocolError;
use crate::schema;

/// Severity of a forwarded client diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Stable ordinal used on the wire.
    pub fn ordinal(self) -> u32 {
        match self {
            LogLevel::Info => 0,
            LogLevel::Warn => 1,
            LogLevel::Error => 2,
        }
    }

    /// Typed counterpart of a wire ordinal.
    pub fn from_ordinal(ordinal: u32) -> Result<Self, ProtocolError> {
        match ordinal {
            0 => Ok(LogLevel::Info),
            1 => Ok(LogLevel::Warn),
            2 => Ok(LogLevel::Error),
            ordinal => Err(ProtocolError::InvalidLogLevel { ordinal }),
        }
    }
}

/// Client declares its schema/protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub version: String,
}

/// Client forwards a diagnostic to the server's log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
    pub msg: String,
}

/// Server's compatibility verdict on the declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionResponse {
    pub version_ok: bool,
}

/// Server instructs the client to load a named project definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadGGFile {
    pub file_name: String,
    /// Retain session-local runtime state (camera position etc.) across
    /// the reload instead of resetting it to defaults.
    pub preserve_state: bool,
}

/// Closed set of client→server messages.
///
/// Adding a variant extends the wire tag space and is a compile-time
/// obligation at every dispatch site.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientToServer {
    Ping,
    Version(Version),
    Log(Log),
}

/// Closed set of server→client messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerToClient {
    Ping,
    VersionResponse(VersionResponse),
    LoadGGFile(LoadGGFile),
}

/// Stable client→server tags. `Ping` shares tag 0 in both directions.
pub const CLIENT_TAG_PING: u32 = 0;
pub const CLIENT_TAG_VERSION: u32 = 1;
pub const CLIENT_TAG_LOG: u32 = 2;

/// Stable server→client tags.
pub const SERVER_TAG_PING: u32 = 0;
pub const SERVER_TAG_VERSION_RESPONSE: u32 = 1;
pub const SERVER_TAG_LOAD_GG_FILE: u32 = 2;

impl ClientToServer {
    /// Wire tag of this message.
    pub fn tag(&self) -> u32 {
        match self {
            ClientToServer::Ping => CLIENT_TAG_PING,
            ClientToServer::Version(_) => CLIENT_TAG_VERSION,
            ClientToServer::Log(_) => CLIENT_TAG_LOG,
        }
    }

    /// Name of the registered schema describing this message's body.
    pub fn schema_name(&self) -> &'static str {
        match self {
            ClientToServer::Ping => schema::PING,
            ClientToServer::Version(_) => schema::CS_VERSION,
            ClientToServer::Log(_) => schema::CS_LOG,
        }
    }
}

impl ServerToClient {
    /// Wire tag of this message.
    pub fn tag(&self) -> u32 {
        match self {
            ServerToClient::Ping => SERVER_TAG_PING,
            ServerToClient::VersionResponse(_) => SERVER_TAG_VERSION_RESPONSE,
            ServerToClient::LoadGGFile(_) => SERVER_TAG_LOAD_GG_FILE,
        }
    }

    /// Name of the registered schema describing this message's body.
    pub fn schema_name(&self) -> &'static str {
        match self {
            ServerToClient::Ping => schema::PING,
            ServerToClient::VersionResponse(_) => schema::SC_VERSION_RESPONSE,
            ServerToClient::LoadGGFile(_) => schema::SC_LOAD_GG_FILE,
        }
    }
}

impl Version {
    pub(crate) fn to_value(&self, registry: &SchemaRegistry) -> Result<StructValue, ProtocolError> {
        let mut value = registry.instantiate(schema::CS_VERSION)?;
        value.set("version", Value::Str(self.version.clone()))?;
        Ok(value)
    }

    pub(crate) fn from_value(value: &StructValue) -> Result<Self, ProtocolError> {
        Ok(Self {
            version: value.str_field("version")?.to_string(),
        })
    }
}

impl Log {
    pub(crate) fn to_value(&self, registry: &SchemaRegistry) -> Result<StructValue, ProtocolError> {
        let mut value = registry.instantiate(schema::CS_LOG)?;
        value.set("level", Value::Enum(self.level.ordinal()))?;
        value.set("msg", Value::Str(self.msg.clone()))?;
        Ok(value)
    }

    pub(crate) fn from_value(value: &StructValue) -> Result<Self, ProtocolError> {
        Ok(Self {
            level: LogLevel::from_ordinal(value.ordinal_field("level")?)?,
            msg: value.str_field("msg")?.to_string(),
        })
    }
}

impl VersionResponse {
    pub(crate) fn to_value(&self, registry: &SchemaRegistry) -> Result<StructValue, ProtocolError> {
        let mut value = registry.instantiate(schema::SC_VERSION_RESPONSE)?;
        value.set("versionOK", Value::Bool(self.version_ok))?;
        Ok(value)
    }

    pub(crate) fn from_value(value: &StructValue) -> Result<Self, ProtocolError> {
        Ok(Self {
            version_ok: value.bool_field("versionOK")?,
        })
    }
}

impl LoadGGFile {
    pub(crate) fn to_value(&self, registry: &SchemaRegistry) -> Result<StructValue, ProtocolError> {
        let mut value = registry.instantiate(schema::SC_LOAD_GG_FILE)?;
        value.set("fileName", Value::Str(self.file_name.clone()))?;
        value.set("preserveState", Value::Bool(self.preserve_state))?;
        Ok(value)
    }

    pub(crate) fn from_value(value: &StructValue) -> Result<Self, ProtocolError> {
        Ok(Self {
            file_name: value.str_field("fileName")?.to_string(),
            preserve_state: value.bool_field("preserveState")?,
        })
    }
}
