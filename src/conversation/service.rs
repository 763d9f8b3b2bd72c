use crate::conversation;
use crate::message::model::Message;
use crate::user;

use super::model::{ConversationDto, LastMessage};
use super::{Members, Repository};

#[derive(Clone)]
pub struct ConversationService {
    repo: Repository,
}

impl ConversationService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

impl ConversationService {
    pub async fn get_or_create(
        &self,
        logged_sub: &user::Sub,
        recipient: &user::Sub,
    ) -> super::Result<ConversationDto> {
        if logged_sub.eq(recipient) {
            return Err(conversation::Error::SelfReference);
        }

        let members = Members::new(logged_sub.clone(), recipient.clone());
        let conversation = self.repo.get_or_create(&members).await?;

        Ok(ConversationDto::new(conversation, logged_sub))
    }

    pub async fn find_by_id(
        &self,
        id: &conversation::Id,
        logged_sub: &user::Sub,
    ) -> super::Result<ConversationDto> {
        let conversation = self.repo.find_by_id(id).await?;

        if !conversation.members.contains(logged_sub) {
            return Err(conversation::Error::NotMember);
        }

        Ok(ConversationDto::new(conversation, logged_sub))
    }

    pub async fn find_all(&self, logged_sub: &user::Sub) -> super::Result<Vec<ConversationDto>> {
        let conversations = self.repo.find_by_sub(logged_sub).await?;

        Ok(conversations
            .into_iter()
            .map(|c| ConversationDto::new(c, logged_sub))
            .collect())
    }

    pub async fn check_member(
        &self,
        id: &conversation::Id,
        sub: &user::Sub,
    ) -> super::Result<()> {
        let conversation = self.repo.find_by_id(id).await?;

        if !conversation.members.contains(sub) {
            return Err(conversation::Error::NotMember);
        }

        Ok(())
    }

    pub async fn update_last_message(&self, msg: &Message) -> super::Result<()> {
        let last = LastMessage {
            owner: msg.owner.clone(),
            text: msg.text.clone(),
            timestamp: msg.created_at,
        };

        self.repo.update_last_message(&msg.conversation_id, &last).await
    }
}
