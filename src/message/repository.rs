use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::conversation;

use super::Id;
use super::model::Message;

#[async_trait]
pub trait MessageRepository {
    async fn insert(&self, msg: &Message) -> super::Result<Message>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Message>;

    /// Chronological history of one conversation. `end_time` keeps only
    /// messages created strictly before it, `limit` keeps the latest N of
    /// what remains; output order stays oldest-first either way.
    async fn find_by_conversation_id(
        &self,
        conversation_id: &conversation::Id,
        limit: Option<usize>,
        end_time: Option<i64>,
    ) -> super::Result<Vec<Message>>;
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    by_conversation: RwLock<HashMap<conversation::Id, Vec<Message>>>,
    seq: AtomicU64,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, msg: &Message) -> super::Result<Message> {
        let mut stored = msg.clone();
        stored.seq = self.seq.fetch_add(1, Ordering::Relaxed);

        self.by_conversation
            .write()
            .await
            .entry(stored.conversation_id)
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Message> {
        self.by_conversation
            .read()
            .await
            .values()
            .flatten()
            .find(|m| m.id.eq(id))
            .cloned()
            .ok_or(super::Error::NotFound(*id))
    }

    async fn find_by_conversation_id(
        &self,
        conversation_id: &conversation::Id,
        limit: Option<usize>,
        end_time: Option<i64>,
    ) -> super::Result<Vec<Message>> {
        let mut messages = self
            .by_conversation
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .unwrap_or_default();

        messages.sort_by_key(|m| (m.created_at, m.seq));

        if let Some(end_time) = end_time {
            messages.retain(|m| m.created_at < end_time);
        }

        if let Some(limit) = limit
            && messages.len() > limit
        {
            messages.drain(..messages.len() - limit);
        }

        Ok(messages)
    }
}
