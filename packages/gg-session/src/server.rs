//! Server side of a preview session.

use std::sync::Arc;

use gg_protocol::{
    dispatch_client, decode_client, encode_server, ClientMessageHandler, Log, LogLevel,
    ProtocolError, ServerToClient, Version, VersionResponse,
};
use gg_schema_core::SchemaRegistry;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::state::{CloseReason, SessionState};
use crate::transport::Transport;

/// Events the server surfaces to its embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Handshake accepted with the client's declared version
    ClientReady { version: String },
    /// Session reached its terminal state
    Closed(CloseReason),
}

enum ServerCommand {
    LoadFile {
        file_name: String,
        preserve_state: bool,
    },
}

/// Handle for driving a running server session.
#[derive(Clone)]
pub struct ServerHandle {
    tx: mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    /// Instructs the client to load a named project definition.
    pub async fn load_file(&self, file_name: impl Into<String>, preserve_state: bool) {
        let _ = self
            .tx
            .send(ServerCommand::LoadFile {
                file_name: file_name.into(),
                preserve_state,
            })
            .await;
    }
}

/// Compatibility verdict over the client's declared version.
pub trait VersionPolicy: Send {
    fn version_ok(&self, client_version: &str) -> bool;
}

/// Default policy: the declared version must match ours exactly.
pub struct ExactVersion(pub String);

impl VersionPolicy for ExactVersion {
    fn version_ok(&self, client_version: &str) -> bool {
        self.0 == client_version
    }
}

/// Server connection: answers the handshake, forwards client diagnostics
/// into the log sink, pushes load instructions, and monitors liveness.
pub struct ServerSession<T: Transport, P: VersionPolicy> {
    config: SessionConfig,
    registry: Arc<SchemaRegistry>,
    transport: T,
    policy: P,
    commands: mpsc::Receiver<ServerCommand>,
    events: mpsc::Sender<ServerEvent>,
}

impl<T: Transport, P: VersionPolicy> ServerSession<T, P> {
    /// Creates a session over an established transport.
    pub fn new(
        config: SessionConfig,
        registry: Arc<SchemaRegistry>,
        transport: T,
        policy: P,
    ) -> (Self, ServerHandle, mpsc::Receiver<ServerEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(64);
        (
            Self {
                config,
                registry,
                transport,
                policy,
                commands: cmd_rx,
                events: event_tx,
            },
            ServerHandle { tx: cmd_tx },
            event_rx,
        )
    }

    /// Drives the connection to its terminal state.
    pub async fn run(self) -> Result<CloseReason, SessionError> {
        let Self {
            config,
            registry,
            mut transport,
            policy,
            mut commands,
            events,
        } = self;

        let mut state = SessionState::Connecting;
        let mut commands_open = true;

        let mut ping = tokio::time::interval(config.ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_rx = Instant::now();

        loop {
            let window = config.liveness_window(state);
            tokio::select! {
                _ = ping.tick() => {
                    let frame = encode_server(&registry, &ServerToClient::Ping)?;
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
                    tracing::warn!(?reason, "client went silent");
                    return close(&events, reason).await;
                }
                cmd = commands.recv(), if commands_open => {
                    match cmd {
                        Some(ServerCommand::LoadFile { file_name, preserve_state }) => {
                            if state == SessionState::Ready {
                                let frame = encode_server(
                                    &registry,
                                    &ServerToClient::LoadGGFile(gg_protocol::LoadGGFile {
                                        file_name,
                                        preserve_state,
                                    }),
                                )?;
                                if transport.send(frame).await.is_err() {
                                    return close(&events, CloseReason::TransportClosed).await;
                                }
                            } else {
                                tracing::warn!("dropping load instruction, client not ready");
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
                    match decode_client(&registry, &text) {
                        Ok(msg) => {
                            let mut handler = ClientFrameHandler::new(state);
                            dispatch_client(msg, &mut handler);
                            if handler.violation {
                                tracing::error!("application message before handshake completed");
                                return close(&events, CloseReason::ProtocolError).await;
                            }
                            if handler.stray_version {
                                tracing::warn!("repeated version declaration ignored");
                            }
                            if let Some(version) = handler.version {
                                let verdict = policy.version_ok(&version);
                                let frame = encode_server(
                                    &registry,
                                    &ServerToClient::VersionResponse(VersionResponse {
                                        version_ok: verdict,
                                    }),
                                )?;
                                if transport.send(frame).await.is_err() {
                                    return close(&events, CloseReason::TransportClosed).await;
                                }
                                if verdict {
                                    state = SessionState::Ready;
                                    tracing::info!(%version, "client version accepted");
                                    let _ = events.send(ServerEvent::ClientReady { version }).await;
                                } else {
                                    tracing::warn!(%version, "client version rejected");
                                    return close(&events, CloseReason::VersionRejected).await;
                                }
                            }
                        }
                        Err(ProtocolError::UnknownMessage { tag }) if state == SessionState::Ready => {
                            tracing::error!(tag, "unknown message tag from client");
                        }
                        Err(err) => {
                            tracing::error!(%err, "undecodable frame from client");
                            return close(&events, CloseReason::ProtocolError).await;
                        }
                    }
                }
            }
        }
    }
}

async fn close(
    events: &mpsc::Sender<ServerEvent>,
    reason: CloseReason,
) -> Result<CloseReason, SessionError> {
    let _ = events.send(ServerEvent::Closed(reason)).await;
    Ok(reason)
}

/// Per-frame dispatch outcome, applied by the loop after the exhaustive
/// match. Diagnostics go straight to the log sink at the mapped level.
struct ClientFrameHandler {
    state: SessionState,
    version: Option<String>,
    stray_version: bool,
    violation: bool,
}

impl ClientFrameHandler {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            version: None,
            stray_version: false,
            violation: false,
        }
    }
}

impl ClientMessageHandler for ClientFrameHandler {
    fn on_ping(&mut self) {}

    fn on_version(&mut self, msg: Version) {
        if self.state == SessionState::Connecting {
            self.version = Some(msg.version);
        } else {
            self.stray_version = true;
        }
    }

    fn on_log(&mut self, msg: Log) {
        if self.state != SessionState::Ready {
            self.violation = true;
            return;
        }
        match msg.level {
            LogLevel::Info => tracing::info!(target: "preview_client", "{}", msg.msg),
            LogLevel::Warn => tracing::warn!(target: "preview_client", "{}", msg.msg),
            LogLevel::Error => tracing::error!(target: "preview_client", "{}", msg.msg),
        }
    }
}
