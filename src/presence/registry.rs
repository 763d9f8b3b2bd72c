use std::collections::{HashMap, HashSet};

use log::debug;
use tokio::sync::RwLock;

use crate::user;

use super::ConnectionId;
use super::model::Connection;

/// Process-wide map of connected users to their live connection handles.
/// Single source of truth for "online": a user is online while at least one
/// handle is registered. Mutated only by the connect/disconnect path; the
/// relay and fan-out components read it.
pub struct PresenceRegistry {
    connections: RwLock<HashMap<user::Sub, HashMap<ConnectionId, Connection>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRegistry {
    /// Adds a handle under the owning user. Registering a second device for
    /// the same user is not an error.
    pub async fn register(&self, conn: Connection) {
        debug!("{} connected as {}", conn.sub(), conn.id());

        self.connections
            .write()
            .await
            .entry(conn.sub().clone())
            .or_default()
            .insert(conn.id(), conn);
    }

    /// Removes a handle from whatever user it was registered under. Safe to
    /// call for a handle that is already gone.
    pub async fn deregister(&self, sub: &user::Sub, id: &ConnectionId) {
        let mut connections = self.connections.write().await;

        if let Some(handles) = connections.get_mut(sub) {
            handles.remove(id);
            if handles.is_empty() {
                connections.remove(sub);
                debug!("{sub} is offline");
            }
        }
    }

    pub async fn is_online(&self, sub: &user::Sub) -> bool {
        self.connections.read().await.contains_key(sub)
    }

    /// Live handles of one user, possibly empty. Each handle is a distinct
    /// device; delivery fans out at most once per handle.
    pub async fn handles_for(&self, sub: &user::Sub) -> Vec<Connection> {
        self.connections
            .read()
            .await
            .get(sub)
            .map(|handles| handles.values().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn online_users(&self) -> HashSet<user::Sub> {
        self.connections.read().await.keys().cloned().collect()
    }

    pub async fn all_handles(&self) -> Vec<Connection> {
        self.connections
            .read()
            .await
            .values()
            .flat_map(|handles| handles.values().cloned())
            .collect()
    }
}
