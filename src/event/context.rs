use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Notify, RwLock};

use crate::presence::ConnectionId;
use crate::user;

/// Per-connection state of one live channel session.
#[derive(Clone)]
pub struct Ws {
    pub sub: user::Sub,
    pub connection_id: ConnectionId,
    typing_to: Arc<RwLock<HashSet<user::Sub>>>,
    pub close: Arc<Notify>,
}

impl Ws {
    pub fn new(sub: user::Sub, connection_id: ConnectionId) -> Self {
        Self {
            sub,
            connection_id,
            typing_to: Arc::new(RwLock::new(HashSet::new())),
            close: Arc::new(Notify::new()),
        }
    }
}

impl Ws {
    pub async fn start_typing_to(&self, target: &user::Sub) {
        self.typing_to.write().await.insert(target.clone());
    }

    pub async fn stop_typing_to(&self, target: &user::Sub) {
        self.typing_to.write().await.remove(target);
    }

    /// Targets this connection never sent a `typing_stop` for. Taken on
    /// teardown so the recipients' indicators do not stay lit.
    pub async fn drain_typing_targets(&self) -> HashSet<user::Sub> {
        std::mem::take(&mut *self.typing_to.write().await)
    }
}
