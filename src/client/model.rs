use crate::conversation::model::ConversationDto;
use crate::event::model::Notification;
use crate::message::model::Message;
use crate::{conversation, message, user};

/// One message as the client renders it. An optimistic entry starts with
/// `pending` set and only the client-generated `local_id`; the REST ack
/// fills in the canonical record. Entries received live from a peer carry
/// the peer's client-generated id, which is what keys deduplication.
#[derive(Clone, Debug)]
pub struct LocalMessage {
    pub local_id: message::Id,
    pub message_id: Option<message::Id>,
    pub conversation_id: conversation::Id,
    pub sender: user::Sub,
    pub text: String,
    pub created_at: i64,
    pub pending: bool,
}

impl LocalMessage {
    pub fn optimistic(
        local_id: message::Id,
        conversation_id: conversation::Id,
        sender: user::Sub,
        text: &str,
    ) -> Self {
        Self {
            local_id,
            message_id: None,
            conversation_id,
            sender,
            text: text.to_string(),
            created_at: chrono::Utc::now().timestamp(),
            pending: true,
        }
    }

    pub fn confirm(&mut self, canonical: &Message) {
        self.message_id = Some(canonical.id);
        self.created_at = canonical.created_at;
        self.pending = false;
    }
}

impl From<Message> for LocalMessage {
    fn from(msg: Message) -> Self {
        Self {
            local_id: msg.id,
            message_id: Some(msg.id),
            conversation_id: msg.conversation_id,
            sender: msg.owner,
            text: msg.text,
            created_at: msg.created_at,
            pending: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConversationPreview {
    pub id: conversation::Id,
    pub recipient: user::Sub,
    pub last_message: Option<String>,
    pub unread: u32,
}

impl From<ConversationDto> for ConversationPreview {
    fn from(dto: ConversationDto) -> Self {
        Self {
            id: dto.id,
            recipient: dto.recipient,
            last_message: dto.last_message.map(|m| m.text),
            unread: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedKind {
    Message,
    FriendRequest,
    FriendAccepted,
    Booking,
}

/// Client-local notification feed entry. The id is derived from the domain
/// record carried by the event, so every device of one user keys the same
/// entry and read-state can converge.
#[derive(Clone, Debug)]
pub struct FeedEntry {
    pub id: String,
    pub notification: Notification,
    pub received_at: i64,
}

impl FeedEntry {
    /// None for variants that are liveness signals rather than feed items.
    pub fn from_notification(noti: &Notification) -> Option<Self> {
        let id = match noti {
            Notification::NewMessage { message_id, .. } => message_id.to_string(),
            Notification::FriendRequestSent { contact_id, .. } => contact_id.to_string(),
            Notification::FriendRequestAccepted { contact_id, .. } => {
                format!("{contact_id}:accepted")
            }
            Notification::NewBooking { booking_id, .. } => booking_id.clone(),
            Notification::BookingStatus {
                booking_id, status, ..
            } => format!("{booking_id}:{status:?}"),

            Notification::OnlineUsers { .. }
            | Notification::UserTyping { .. }
            | Notification::NotificationRemoved { .. } => return None,
        };

        Some(Self {
            id,
            notification: noti.clone(),
            received_at: chrono::Utc::now().timestamp(),
        })
    }

    pub fn kind(&self) -> FeedKind {
        match self.notification {
            Notification::NewMessage { .. } => FeedKind::Message,
            Notification::FriendRequestSent { .. } => FeedKind::FriendRequest,
            Notification::FriendRequestAccepted { .. } => FeedKind::FriendAccepted,
            Notification::NewBooking { .. } | Notification::BookingStatus { .. } => {
                FeedKind::Booking
            }
            // from_notification never builds these
            Notification::OnlineUsers { .. }
            | Notification::UserTyping { .. }
            | Notification::NotificationRemoved { .. } => {
                unreachable!("not a feed notification")
            }
        }
    }
}
