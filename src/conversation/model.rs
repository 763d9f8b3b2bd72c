use serde::{Deserialize, Serialize};

use crate::user;

use super::{Id, Members};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Conversation {
    pub id: Id,
    pub members: Members,
    pub last_message: Option<LastMessage>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Conversation {
    pub fn new(members: Members) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Id::random(),
            members,
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Denormalized pointer to the latest message, kept on the conversation so
/// list rendering needs no join.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LastMessage {
    pub owner: user::Sub,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ConversationDto {
    pub id: Id,
    pub recipient: user::Sub,
    pub last_message: Option<LastMessage>,
    pub created_at: i64,
}

impl ConversationDto {
    pub fn new(c: Conversation, logged_sub: &user::Sub) -> Self {
        let recipient = c.members.other(logged_sub).clone();
        Self {
            id: c.id,
            recipient,
            last_message: c.last_message,
            created_at: c.created_at,
        }
    }
}
