//! Session error types.

use gg_protocol::ProtocolError;
use thiserror::Error;

/// Fatal session failures.
///
/// Ordinary terminations (version rejection, liveness loss, transport
/// teardown) are reported as a `CloseReason`, not an error; this type
/// covers failures to produce our own frames, which indicate a schema
/// mismatch inside the process.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
