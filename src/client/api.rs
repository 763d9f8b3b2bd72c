use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::conversation::model::ConversationDto;
use crate::integration;
use crate::message::model::Message;
use crate::user::middleware::SUB_HEADER;
use crate::{conversation, user};

/// REST collaborator of the sync layer. The durable fetch path is the
/// authoritative one; live events only trigger merges against it.
#[async_trait]
pub trait Backend {
    async fn find_conversations(&self) -> super::Result<Vec<ConversationDto>>;

    async fn find_messages(
        &self,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<Message>>;

    async fn create_message(
        &self,
        conversation_id: &conversation::Id,
        recipient: &user::Sub,
        text: &str,
    ) -> super::Result<Message>;

    async fn pending_contact_count(&self) -> super::Result<usize>;
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    sub: user::Sub,
}

impl HttpBackend {
    pub fn new(base_url: &str, sub: user::Sub) -> Self {
        Self {
            http: integration::init_http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            sub,
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn find_conversations(&self) -> super::Result<Vec<ConversationDto>> {
        let dtos = self
            .http
            .get(format!("{}/api/conversations", self.base_url))
            .header(SUB_HEADER, self.sub.to_string())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(dtos)
    }

    async fn find_messages(
        &self,
        conversation_id: &conversation::Id,
    ) -> super::Result<Vec<Message>> {
        let messages = self
            .http
            .get(format!("{}/api/messages", self.base_url))
            .query(&[("conversation_id", conversation_id.to_string())])
            .header(SUB_HEADER, self.sub.to_string())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(messages)
    }

    async fn create_message(
        &self,
        conversation_id: &conversation::Id,
        recipient: &user::Sub,
        text: &str,
    ) -> super::Result<Message> {
        let msg = self
            .http
            .post(format!("{}/api/messages", self.base_url))
            .header(SUB_HEADER, self.sub.to_string())
            .json(&json!({
                "conversation_id": conversation_id,
                "recipient": recipient,
                "text": text,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(msg)
    }

    async fn pending_contact_count(&self) -> super::Result<usize> {
        #[derive(Deserialize)]
        struct PendingCount {
            count: usize,
        }

        let count: PendingCount = self
            .http
            .get(format!("{}/api/contacts/pending/count", self.base_url))
            .header(SUB_HEADER, self.sub.to_string())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(count.count)
    }
}
