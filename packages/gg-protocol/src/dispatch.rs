//! Exhaustive dispatch over the closed variant sets.
//!
//! The match arms below are the only place a received message fans out to
//! handler methods. A new variant fails compilation here and at every
//! handler implementation until it is covered.

use crate::messages::{ClientToServer, LoadGGFile, Log, ServerToClient, Version, VersionResponse};

/// Handler for client→server traffic, one method per variant.
pub trait ClientMessageHandler {
    fn on_ping(&mut self);
    fn on_version(&mut self, msg: Version);
    fn on_log(&mut self, msg: Log);
}

/// Handler for server→client traffic, one method per variant.
pub trait ServerMessageHandler {
    fn on_ping(&mut self);
    fn on_version_response(&mut self, msg: VersionResponse);
    fn on_load_gg_file(&mut self, msg: LoadGGFile);
}

/// Routes one client→server message to its handler method.
pub fn dispatch_client<H: ClientMessageHandler>(msg: ClientToServer, handler: &mut H) {
    match msg {
        ClientToServer::Ping => handler.on_ping(),
        ClientToServer::Version(m) => handler.on_version(m),
        ClientToServer::Log(m) => handler.on_log(m),
    }
}

/// Routes one server→client message to its handler method.
pub fn dispatch_server<H: ServerMessageHandler>(msg: ServerToClient, handler: &mut H) {
    match msg {
        ServerToClient::Ping => handler.on_ping(),
        ServerToClient::VersionResponse(m) => handler.on_version_response(m),
        ServerToClient::LoadGGFile(m) => handler.on_load_gg_file(m),
    }
}
