//! Preview session host.
//!
//! Runs the server side of a preview session with an embedded client over
//! the in-process loopback transport: version handshake, keep-alive, an
//! optional initial project load, and graceful shutdown. The embedded
//! client loads pushed projects through the file store, carrying runtime
//! state across reloads when instructed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;

use gg_project::schema::register_project;
use gg_project::{ProjectStore, UserFile};
use gg_protocol::schema::register_messages;
use gg_schema_core::SchemaRegistry;
use gg_session::{
    loopback, ClientSession, ExactVersion, ServerSession, SessionConfig, SessionEvent,
};

/// Command-line arguments for the session host.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Protocol version both ends declare
    #[arg(long, default_value = "1.0")]
    protocol_version: String,

    /// Keep-alive ping interval in milliseconds
    #[arg(long, default_value_t = 4000)]
    ping_interval_ms: u64,

    /// Liveness timeout in milliseconds
    #[arg(long, default_value_t = 12000)]
    ping_timeout_ms: u64,

    /// Directory project documents are loaded from
    #[arg(long, default_value = "./projects")]
    project_dir: String,

    /// Project document to push to the client once the session is ready
    #[arg(long)]
    load: Option<String>,

    /// Preserve session-local runtime state across the initial load
    #[arg(long, default_value_t = true)]
    preserve_state: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // One registry carries both the message and the project tables.
    let mut registry = SchemaRegistry::new();
    register_messages(&mut registry)?;
    register_project(&mut registry)?;
    registry.finalize()?;
    let registry = Arc::new(registry);

    let config = SessionConfig {
        protocol_version: args.protocol_version.clone(),
        ping_interval: Duration::from_millis(args.ping_interval_ms),
        ping_timeout: Duration::from_millis(args.ping_timeout_ms),
        ..SessionConfig::default()
    };

    let (client_transport, server_transport) = loopback(256);
    let (client, _client_handle, mut client_events) =
        ClientSession::new(config.clone(), registry.clone(), client_transport);
    let (server, server_handle, mut server_events) = ServerSession::new(
        config,
        registry.clone(),
        server_transport,
        ExactVersion(args.protocol_version.clone()),
    );

    let client_task = tokio::spawn(client.run());
    let server_task = tokio::spawn(server.run());

    let store = ProjectStore::new(PathBuf::from(&args.project_dir), registry.clone());
    let mut current: Option<UserFile> = None;

    tracing::info!(
        version = %args.protocol_version,
        project_dir = %args.project_dir,
        "preview session host starting"
    );

    loop {
        tokio::select! {
            event = client_events.recv() => {
                match event {
                    Some(SessionEvent::Ready) => {
                        tracing::info!("client session ready");
                        if let Some(name) = &args.load {
                            server_handle.load_file(name.clone(), args.preserve_state).await;
                        }
                    }
                    Some(SessionEvent::LoadFile { file_name, preserve_state }) => {
                        match store.load(&file_name) {
                            Ok(mut loaded) => {
                                if preserve_state {
                                    if let Some(prev) = &current {
                                        loaded.carry_runtime_state(prev)?;
                                    }
                                }
                                tracing::info!(
                                    file = %file_name,
                                    version = %loaded.version()?,
                                    resources = loaded.imported_resources()?.len(),
                                    preserve_state,
                                    "project loaded"
                                );
                                current = Some(loaded);
                            }
                            Err(err) => tracing::error!(file = %file_name, %err, "project load failed"),
                        }
                    }
                    Some(SessionEvent::Closed(reason)) => {
                        tracing::warn!(?reason, "client session closed");
                        break;
                    }
                    None => break,
                }
            }
            event = server_events.recv() => {
                if let Some(event) = event {
                    tracing::debug!(?event, "server session event");
                } else {
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    client_task.abort();
    server_task.abort();
    Ok(())
}
