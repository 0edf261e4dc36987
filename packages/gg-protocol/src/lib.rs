//! Preview wire protocol: closed message variant sets over a
//! descriptor-backed codec.
//!
//! Each direction owns a closed tagged union. Bodies are encoded and
//! decoded through the schema registry, so the registered descriptor
//! tables remain the single source of truth for wire shapes, defaults,
//! and serialization flags.

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod messages;
pub mod schema;

pub use dispatch::{dispatch_client, dispatch_server, ClientMessageHandler, ServerMessageHandler};
pub use envelope::{decode_client, decode_server, encode_client, encode_server};
pub use error::ProtocolError;
pub use messages::{ClientToServer, LoadGGFile, Log, LogLevel, ServerToClient, Version,
    VersionResponse};
