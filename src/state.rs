use std::sync::Arc;

use axum::extract::FromRef;

use crate::contact;
use crate::contact::repository::InMemoryContactRepository;
use crate::contact::service::ContactServiceImpl;
use crate::conversation;
use crate::conversation::repository::InMemoryConversationRepository;
use crate::conversation::service::ConversationService;
use crate::event::service::EventService;
use crate::message;
use crate::message::repository::InMemoryMessageRepository;
use crate::message::service::MessageService;
use crate::presence;
use crate::presence::registry::PresenceRegistry;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub event_service: EventService,
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub contact_service: contact::Service,
}

impl AppState {
    pub fn init() -> Self {
        let registry: presence::Registry = Arc::new(PresenceRegistry::new());
        let event_service = EventService::new(registry);

        let conversation_repo: conversation::Repository =
            Arc::new(InMemoryConversationRepository::new());
        let conversation_service = ConversationService::new(conversation_repo);

        let message_repo: message::Repository = Arc::new(InMemoryMessageRepository::new());
        let message_service = MessageService::new(message_repo, conversation_service.clone());

        let contact_repo: contact::Repository = Arc::new(InMemoryContactRepository::new());
        let contact_service: contact::Service =
            Arc::new(ContactServiceImpl::new(contact_repo, event_service.clone()));

        Self {
            event_service,
            conversation_service,
            message_service,
            contact_service,
        }
    }
}
