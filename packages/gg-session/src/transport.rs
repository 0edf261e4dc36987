//! Framed-text transport seam.
//!
//! The session only needs ordered, reliable delivery of whole frames.
//! The socket implementation lives outside this crate; the loopback pair
//! below keeps both ends in-process for embedded hosts and tests.

use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;

/// Transport failure surfaced to the session loop.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
}

/// Ordered, reliable delivery of whole text frames.
pub trait Transport: Send {
    /// Delivers one frame to the peer.
    fn send(&mut self, frame: String)
        -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next frame; `None` once the peer is gone.
    fn recv(&mut self) -> impl Future<Output = Option<String>> + Send;
}

/// One end of an in-process transport pair.
pub struct LoopbackTransport {
    tx: mpsc::Sender<String>,
    rx: mpsc::Receiver<String>,
}

/// Creates a connected pair of in-process transports.
pub fn loopback(capacity: usize) -> (LoopbackTransport, LoopbackTransport) {
    let (a_tx, b_rx) = mpsc::channel(capacity);
    let (b_tx, a_rx) = mpsc::channel(capacity);
    (
        LoopbackTransport { tx: a_tx, rx: a_rx },
        LoopbackTransport { tx: b_tx, rx: b_rx },
    )
}

impl Transport for LoopbackTransport {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.tx.send(frame).await.map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_arrive_in_order() {
        let (mut a, mut b) = loopback(8);
        a.send("one".to_string()).await.unwrap();
        a.send("two".to_string()).await.unwrap();
        assert_eq!(b.recv().await.as_deref(), Some("one"));
        assert_eq!(b.recv().await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn drop_closes_the_other_end() {
        let (a, mut b) = loopback(8);
        drop(a);
        assert!(b.recv().await.is_none());
    }
}
