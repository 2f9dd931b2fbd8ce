//! Realtime change feed
//!
//! Socket.IO layer broadcasting [`SyncPayload`] events to connected clients.
//! Clients reconcile with `GET /api/sync/status` (epoch + per-resource
//! versions) and refetch anything whose version moved while they were away.

use shared::sync::SyncPayload;
use socketioxide::SocketIo;
use socketioxide::extract::SocketRef;
use socketioxide::layer::SocketIoLayer;

const SYNC_EVENT: &str = "sync";

#[derive(Clone)]
pub struct ChangeFeedService {
    io: SocketIo,
}

impl ChangeFeedService {
    /// Build the service plus the axum layer serving the Socket.IO endpoint
    pub fn new() -> (Self, SocketIoLayer) {
        let (layer, io) = SocketIo::new_layer();
        io.ns("/", on_connect);
        (Self { io }, layer)
    }

    /// Broadcast one change to every connected client. Delivery is
    /// best-effort; the version counter is the source of truth.
    pub async fn publish(&self, payload: &SyncPayload) {
        if let Err(e) = self.io.emit(SYNC_EVENT, payload).await {
            tracing::warn!(error = %e, resource = %payload.resource, "Change feed emit failed");
        }
    }
}

async fn on_connect(socket: SocketRef) {
    tracing::debug!(sid = %socket.id, "Change feed client connected");
    socket.on_disconnect(on_disconnect);
}

async fn on_disconnect(socket: SocketRef) {
    tracing::debug!(sid = %socket.id, "Change feed client disconnected");
}
