//! Client side of a preview session.

use std::sync::Arc;

use gg_protocol::{
    dispatch_server, encode_client, decode_server, ClientToServer, LoadGGFile, Log, LogLevel,
    ProtocolError, ServerMessageHandler, Version, VersionResponse,
};
use gg_schema_core::SchemaRegistry;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::state::{CloseReason, SessionState};
use crate::transport::Transport;

/// Events the client surfaces to its embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Handshake accepted; application traffic may flow
    Ready,
    /// Server instructed a project load
    LoadFile {
        file_name: String,
        preserve_state: bool,
    },
    /// Session reached its terminal state
    Closed(CloseReason),
}

enum ClientCommand {
    Log { level: LogLevel, msg: String },
}

/// Handle for feeding outbound traffic into a running client session.
#[derive(Clone)]
pub struct ClientHandle {
    tx: mpsc::Sender<ClientCommand>,
}

impl ClientHandle {
    /// Forwards a diagnostic to the server's log sink.
    ///
    /// Dropped with a warning if the session is not `Ready` or already
    /// gone.
    pub async fn log(&self, level: LogLevel, msg: impl Into<String>) {
        let _ = self
            .tx
            .send(ClientCommand::Log {
                level,
                msg: msg.into(),
            })
            .await;
    }
}

/// Client connection: declares its version, keeps the link alive, and
/// turns accepted server traffic into [`SessionEvent`]s.
pub struct ClientSession<T: Transport> {
    config: SessionConfig,
    registry: Arc<SchemaRegistry>,
    transport: T,
    commands: mpsc::Receiver<ClientCommand>,
    events: mpsc::Sender<SessionEvent>,
}

impl<T: Transport> ClientSession<T> {
    /// Creates a session over an established transport.
    ///
    /// The registry must contain the message tables.
    pub fn new(
        config: SessionConfig,
        registry: Arc<SchemaRegistry>,
        transport: T,
    ) -> (Self, ClientHandle, mpsc::Receiver<SessionEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(64);
        (
            Self {
                config,
                registry,
                transport,
                commands: cmd_rx,
                events: event_tx,
            },
            ClientHandle { tx: cmd_tx },
            event_rx,
        )
    }

    /// Drives the connection to its terminal state.
    ///
    /// Returns the close reason; `Err` only for failures to produce our
    /// own frames.
    pub async fn run(self) -> Result<CloseReason, SessionError> {
        let Self {
            config,
            registry,
            mut transport,
            mut commands,
            events,
        } = self;

        let mut commands_open = true;

        // Declare our version before anything else.
        let hello = encode_client(
            &registry,
            &ClientToServer::Version(Version {
                version: config.protocol_version.clone(),
            }),
        )?;
        if transport.send(hello).await.is_err() {
            return close(&events, CloseReason::TransportClosed).await;
        }
        let mut state = SessionState::AwaitingVersionAck;
        tracing::debug!(version = %config.protocol_version, "declared version, awaiting verdict");

        let mut ping = tokio::time::interval(config.ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_rx = Instant::now();

        loop {
            let window = config.liveness_window(state);
            tokio::select! {
                _ = ping.tick() => {
                    let frame = encode_client(&registry, &ClientToServer::Ping)?;
                    if transport.send(frame).await.is_err() {
                        return close(&events, CloseReason::TransportClosed).await;
                    }
                }
                _ = tokio::time::sleep_until(last_rx + window) => {
                    let reason = if state == SessionState::Ready {
                        CloseReason::PingTimeout
                    } else {
                        CloseReason::HandshakeTimeout
                    };
                    tracing::warn!(?reason, "peer went silent");
                    return close(&events, reason).await;
                }
                cmd = commands.recv(), if commands_open => {
                    match cmd {
                        Some(ClientCommand::Log { level, msg }) => {
                            if state == SessionState::Ready {
                                let frame = encode_client(
                                    &registry,
                                    &ClientToServer::Log(Log { level, msg }),
                                )?;
                                if transport.send(frame).await.is_err() {
                                    return close(&events, CloseReason::TransportClosed).await;
                                }
                            } else {
                                tracing::warn!("dropping log message, session not ready");
                            }
                        }
                        None => commands_open = false,
                    }
                }
                frame = transport.recv() => {
                    let Some(text) = frame else {
                        return close(&events, CloseReason::TransportClosed).await;
                    };
                    last_rx = Instant::now();
                    match decode_server(&registry, &text) {
                        Ok(msg) => {
                            let mut handler = ServerFrameHandler::new(state);
                            dispatch_server(msg, &mut handler);
                            if handler.violation {
                                tracing::error!("application message before handshake completed");
                                return close(&events, CloseReason::ProtocolError).await;
                            }
                            if handler.stray_ack {
                                tracing::warn!("duplicate version response ignored");
                            }
                            if handler.rejected {
                                tracing::warn!("server rejected our version");
                                return close(&events, CloseReason::VersionRejected).await;
                            }
                            if handler.accepted {
                                state = SessionState::Ready;
                                let _ = events.send(SessionEvent::Ready).await;
                                tracing::info!("session ready");
                            }
                            if let Some(load) = handler.load {
                                let _ = events
                                    .send(SessionEvent::LoadFile {
                                        file_name: load.file_name,
                                        preserve_state: load.preserve_state,
                                    })
                                    .await;
                            }
                        }
                        Err(ProtocolError::UnknownMessage { tag }) if state == SessionState::Ready => {
                            // Surfaced, dropped, connection kept.
                            tracing::error!(tag, "unknown message tag from server");
                        }
                        Err(err) => {
                            tracing::error!(%err, "undecodable frame from server");
                            return close(&events, CloseReason::ProtocolError).await;
                        }
                    }
                }
            }
        }
    }
}

async fn close(
    events: &mpsc::Sender<SessionEvent>,
    reason: CloseReason,
) -> Result<CloseReason, SessionError> {
    let _ = events.send(SessionEvent::Closed(reason)).await;
    Ok(reason)
}

/// Per-frame dispatch outcome, applied by the loop after the exhaustive
/// match.
struct ServerFrameHandler {
    state: SessionState,
    accepted: bool,
    rejected: bool,
    stray_ack: bool,
    violation: bool,
    load: Option<LoadGGFile>,
}

impl ServerFrameHandler {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            accepted: false,
            rejected: false,
            stray_ack: false,
            violation: false,
            load: None,
        }
    }
}

impl ServerMessageHandler for ServerFrameHandler {
    fn on_ping(&mut self) {}

    fn on_version_response(&mut self, msg: VersionResponse) {
        if self.state == SessionState::AwaitingVersionAck {
            if msg.version_ok {
                self.accepted = true;
            } else {
                self.rejected = true;
            }
        } else {
            self.stray_ack = true;
        }
    }

    fn on_load_gg_file(&mut self, msg: LoadGGFile) {
        if self.state == SessionState::Ready {
            self.load = Some(msg);
        } else {
            // Application traffic before the handshake completed.
            self.violation = true;
        }
    }
}
