//! Preview session runtime: version handshake, keep-alive liveness, and
//! the per-connection state machine, over a pluggable framed transport.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod transport;

pub use client::{ClientHandle, ClientSession, SessionEvent};
pub use config::{ReconnectPolicy, SessionConfig};
pub use error::SessionError;
pub use server::{ExactVersion, ServerEvent, ServerHandle, ServerSession, VersionPolicy};
pub use state::{CloseReason, SessionState};
pub use transport::{loopback, LoopbackTransport, Transport, TransportError};
