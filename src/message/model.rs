use serde::{Deserialize, Serialize};

use crate::{conversation, user};

use super::Id;

/// Durable unit of one conversation. Immutable once persisted; the store
/// assigns `seq` so equal timestamps still order deterministically.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub id: Id,
    pub conversation_id: conversation::Id,
    pub owner: user::Sub,
    pub recipient: user::Sub,
    pub text: String,
    pub created_at: i64,
    #[serde(skip, default)]
    pub(super) seq: u64,
}

impl Message {
    pub fn new(
        conversation_id: conversation::Id,
        owner: user::Sub,
        recipient: user::Sub,
        text: &str,
    ) -> Self {
        Self {
            id: Id::random(),
            conversation_id,
            owner,
            recipient,
            text: text.to_string(),
            created_at: chrono::Utc::now().timestamp(),
            seq: 0,
        }
    }
}
