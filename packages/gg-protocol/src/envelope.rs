//! Tagged envelope encoding for both message directions.
//!
//! A frame is one JSON object `{"tag": <u32>, "body": <object>}`. The
//! body is produced and consumed by the descriptor-driven codec, so the
//! registered schema tables stay the single source of truth for what
//! travels on the wire.

use gg_schema_core::{codec, SchemaRegistry};

use crate::error::ProtocolError;
use crate::messages::{
    ClientToServer, LoadGGFile, Log, ServerToClient, Version, VersionResponse, CLIENT_TAG_LOG,
    CLIENT_TAG_PING, CLIENT_TAG_VERSION, SERVER_TAG_LOAD_GG_FILE, SERVER_TAG_PING,
    SERVER_TAG_VERSION_RESPONSE,
};
use crate::schema;

/// Encodes a client→server message into a frame.
pub fn encode_client(
    registry: &SchemaRegistry,
    msg: &ClientToServer,
) -> Result<String, ProtocolError> {
    let body = match msg {
        ClientToServer::Ping => codec::encode(&registry.instantiate(schema::PING)?)?,
        ClientToServer::Version(m) => codec::encode(&m.to_value(registry)?)?,
        ClientToServer::Log(m) => codec::encode(&m.to_value(registry)?)?,
    };
    Ok(envelope(msg.tag(), body).to_string())
}

/// Encodes a server→client message into a frame.
pub fn encode_server(
    registry: &SchemaRegistry,
    msg: &ServerToClient,
) -> Result<String, ProtocolError> {
    let body = match msg {
        ServerToClient::Ping => codec::encode(&registry.instantiate(schema::PING)?)?,
        ServerToClient::VersionResponse(m) => codec::encode(&m.to_value(registry)?)?,
        ServerToClient::LoadGGFile(m) => codec::encode(&m.to_value(registry)?)?,
    };
    Ok(envelope(msg.tag(), body).to_string())
}

/// Decodes a client→server frame.
///
/// # Returns
/// `Err(ProtocolError::UnknownMessage)` for tags outside the closed set.
pub fn decode_client(
    registry: &SchemaRegistry,
    frame: &str,
) -> Result<ClientToServer, ProtocolError> {
    let (tag, body) = split_envelope(frame)?;
    match tag {
        CLIENT_TAG_PING => Ok(ClientToServer::Ping),
        CLIENT_TAG_VERSION => {
            let value = codec::decode(registry, schema::CS_VERSION, &body)?;
            Ok(ClientToServer::Version(Version::from_value(&value)?))
        }
        CLIENT_TAG_LOG => {
            let value = codec::decode(registry, schema::CS_LOG, &body)?;
            Ok(ClientToServer::Log(Log::from_value(&value)?))
        }
        tag => Err(ProtocolError::UnknownMessage { tag }),
    }
}

/// Decodes a server→client frame.
pub fn decode_server(
    registry: &SchemaRegistry,
    frame: &str,
) -> Result<ServerToClient, ProtocolError> {
    let (tag, body) = split_envelope(frame)?;
    match tag {
        SERVER_TAG_PING => Ok(ServerToClient::Ping),
        SERVER_TAG_VERSION_RESPONSE => {
            let value = codec::decode(registry, schema::SC_VERSION_RESPONSE, &body)?;
            Ok(ServerToClient::VersionResponse(VersionResponse::from_value(
                &value,
            )?))
        }
        SERVER_TAG_LOAD_GG_FILE => {
            let value = codec::decode(registry, schema::SC_LOAD_GG_FILE, &body)?;
            Ok(ServerToClient::LoadGGFile(LoadGGFile::from_value(&value)?))
        }
        tag => Err(ProtocolError::UnknownMessage { tag }),
    }
}

fn envelope(tag: u32, body: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "tag": tag, "body": body })
}

fn split_envelope(frame: &str) -> Result<(u32, serde_json::Value), ProtocolError> {
    let doc: serde_json::Value = serde_json::from_str(frame)?;
    let tag = doc
        .get("tag")
        .and_then(|t| t.as_u64())
        .and_then(|t| u32::try_from(t).ok())
        .ok_or(ProtocolError::MissingTag)?;
    // A missing body decodes as an all-defaults message.
    let body = doc
        .get("body")
        .cloned()
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    Ok((tag, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::LogLevel;
    use crate::schema::protocol_registry;

    #[test]
    fn tags_are_stable() {
        assert_eq!(ClientToServer::Ping.tag(), 0);
        assert_eq!(
            ClientToServer::Version(Version {
                version: String::new()
            })
            .tag(),
            1
        );
        assert_eq!(
            ClientToServer::Log(Log {
                level: LogLevel::Info,
                msg: String::new()
            })
            .tag(),
            2
        );
        assert_eq!(ServerToClient::Ping.tag(), 0);
        assert_eq!(
            ServerToClient::VersionResponse(VersionResponse { version_ok: true }).tag(),
            1
        );
        assert_eq!(
            ServerToClient::LoadGGFile(LoadGGFile {
                file_name: String::new(),
                preserve_state: true
            })
            .tag(),
            2
        );
    }

    #[test]
    fn client_messages_round_trip() {
        let registry = protocol_registry().unwrap();
        let messages = [
            ClientToServer::Ping,
            ClientToServer::Version(Version {
                version: "1.0".to_string(),
            }),
            ClientToServer::Log(Log {
                level: LogLevel::Error,
                msg: "shader compile failed".to_string(),
            }),
        ];
        for msg in messages {
            let frame = encode_client(&registry, &msg).unwrap();
            let decoded = decode_client(&registry, &frame).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn server_messages_round_trip() {
        let registry = protocol_registry().unwrap();
        let messages = [
            ServerToClient::Ping,
            ServerToClient::VersionResponse(VersionResponse { version_ok: false }),
            ServerToClient::LoadGGFile(LoadGGFile {
                file_name: "boids.gg".to_string(),
                preserve_state: false,
            }),
        ];
        for msg in messages {
            let frame = encode_server(&registry, &msg).unwrap();
            let decoded = decode_server(&registry, &frame).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn log_levels_travel_as_ordinals() {
        let registry = protocol_registry().unwrap();
        let frame = encode_client(
            &registry,
            &ClientToServer::Log(Log {
                level: LogLevel::Warn,
                msg: "m".to_string(),
            }),
        )
        .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(doc["body"]["level"], serde_json::json!(1));
    }

    #[test]
    fn unknown_tag_is_an_error_not_a_default() {
        let registry = protocol_registry().unwrap();
        let err = decode_client(&registry, r#"{"tag": 99, "body": {}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessage { tag: 99 }));
        let err = decode_server(&registry, r#"{"tag": 7}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownMessage { tag: 7 }));
    }

    #[test]
    fn missing_tag_rejected() {
        let registry = protocol_registry().unwrap();
        let err = decode_client(&registry, r#"{"body": {}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingTag));
    }

    #[test]
    fn missing_body_decodes_to_defaults() {
        let registry = protocol_registry().unwrap();
        let decoded = decode_server(&registry, r#"{"tag": 2}"#).unwrap();
        // preserveState defaults to true per the descriptor.
        assert_eq!(
            decoded,
            ServerToClient::LoadGGFile(LoadGGFile {
                file_name: String::new(),
                preserve_state: true,
            })
        );
    }

    #[test]
    fn unknown_body_fields_tolerated() {
        let registry = protocol_registry().unwrap();
        let decoded = decode_client(
            &registry,
            r#"{"tag": 1, "body": {"version": "2.1", "futureField": [1, 2]}}"#,
        )
        .unwrap();
        assert_eq!(
            decoded,
            ClientToServer::Version(Version {
                version: "2.1".to_string()
            })
        );
    }
}
