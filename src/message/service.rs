use log::error;

use crate::conversation;
use crate::conversation::service::ConversationService;
use crate::user;

use super::model::Message;
use super::{Id, Repository};

#[derive(Clone)]
pub struct MessageService {
    repo: Repository,
    conversation_service: ConversationService,
}

impl MessageService {
    pub fn new(repo: Repository, conversation_service: ConversationService) -> Self {
        Self {
            repo,
            conversation_service,
        }
    }
}

impl MessageService {
    /// Durable write. Live delivery is not triggered here: the sender's
    /// `send_message` frame is the single relay invocation per message, so
    /// persisting twice-notified duplicates cannot happen.
    pub async fn create(&self, msg: &Message) -> super::Result<Message> {
        if msg.text.trim().is_empty() {
            return Err(super::Error::EmptyText);
        }

        self.conversation_service
            .check_member(&msg.conversation_id, &msg.owner)
            .await?;

        let stored = self.repo.insert(msg).await?;

        if let Err(e) = self.conversation_service.update_last_message(&stored).await {
            error!("failed to update last message of {}: {e}", stored.conversation_id);
        }

        Ok(stored)
    }

    pub async fn find_by_id(&self, id: &Id) -> super::Result<Message> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_conversation_id(
        &self,
        logged_sub: &user::Sub,
        conversation_id: &conversation::Id,
        limit: Option<usize>,
        end_time: Option<i64>,
    ) -> super::Result<Vec<Message>> {
        self.conversation_service
            .check_member(conversation_id, logged_sub)
            .await
            .map_err(|_| super::Error::NotMember)?;

        self.repo
            .find_by_conversation_id(conversation_id, limit, end_time)
            .await
    }
}
