use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;

use crate::user;

use super::ConnectionId;

/// Live transport handle of one connected device. Holds the outbound half of
/// the connection's channel; the WS write task drains the other half.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    sub: user::Sub,
    sender: UnboundedSender<Bytes>,
    connected_at: i64,
}

impl Connection {
    pub fn new(sub: user::Sub, sender: UnboundedSender<Bytes>) -> Self {
        Self {
            id: ConnectionId::random(),
            sub,
            sender,
            connected_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn sub(&self) -> &user::Sub {
        &self.sub
    }

    pub fn connected_at(&self) -> i64 {
        self.connected_at
    }

    /// Fire-and-forget push. A send towards a connection that is tearing
    /// down is not an error, the registry entry goes away with it.
    pub fn push(&self, payload: Bytes) {
        if let Err(e) = self.sender.send(payload) {
            log::debug!("connection {} is gone: {e}", self.id);
        }
    }
}
