use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::user;

use super::model::{Conversation, LastMessage};
use super::{Id, Members};

/// Seam towards the durable conversation store. The store itself belongs to
/// the persistence tier; this process only needs the operations below.
#[async_trait]
pub trait ConversationRepository {
    /// Returns the one conversation for the given pair, creating it on first
    /// use. Repeated calls with the same pair, in any member order, return
    /// the same record.
    async fn get_or_create(&self, members: &Members) -> super::Result<Conversation>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Conversation>;

    /// Conversations the user is a member of, most recently updated first.
    async fn find_by_sub(&self, sub: &user::Sub) -> super::Result<Vec<Conversation>>;

    async fn update_last_message(&self, id: &Id, last: &LastMessage) -> super::Result<()>;
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<Id, Conversation>>,
    by_members: RwLock<HashMap<Members, Id>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn get_or_create(&self, members: &Members) -> super::Result<Conversation> {
        let mut by_members = self.by_members.write().await;

        if let Some(id) = by_members.get(members) {
            return self.find_by_id(id).await;
        }

        let conversation = Conversation::new(members.clone());
        by_members.insert(members.clone(), conversation.id);
        self.conversations
            .write()
            .await
            .insert(conversation.id, conversation.clone());

        Ok(conversation)
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Conversation> {
        self.conversations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(super::Error::NotFound(*id))
    }

    async fn find_by_sub(&self, sub: &user::Sub) -> super::Result<Vec<Conversation>> {
        let mut conversations = self
            .conversations
            .read()
            .await
            .values()
            .filter(|c| c.members.contains(sub))
            .cloned()
            .collect::<Vec<_>>();

        conversations.sort_by_key(|c| std::cmp::Reverse(c.updated_at));

        Ok(conversations)
    }

    async fn update_last_message(&self, id: &Id, last: &LastMessage) -> super::Result<()> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(id).ok_or(super::Error::NotFound(*id))?;

        conversation.last_message = Some(last.clone());
        conversation.updated_at = last.timestamp;

        Ok(())
    }
}
