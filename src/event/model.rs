use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::user::model::UserInfo;
use crate::{booking, contact, conversation, message, user};

/// Client -> server frames of the live channel. Closed set; anything that
/// does not parse into one of these is skipped at the socket boundary.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Fire-and-forget relay of an already-persisting message. The id is the
    /// client-generated one, so every receiving device keys the same record.
    SendMessage {
        message_id: message::Id,
        conversation_id: conversation::Id,
        recipient: user::Sub,
        text: String,
    },
    TypingStart {
        recipient: user::Sub,
    },
    TypingStop {
        recipient: user::Sub,
    },
    RemoveNotification {
        notification_id: String,
    },
}

/// Server -> client push events. Each variant carries enough denormalized
/// data to render without a follow-up fetch.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    #[serde(rename = "get_users")]
    OnlineUsers { users: HashSet<user::Sub> },

    #[serde(rename = "get_message")]
    NewMessage {
        message_id: message::Id,
        conversation_id: conversation::Id,
        sender: user::Sub,
        text: String,
        created_at: i64,
    },

    UserTyping {
        sub: user::Sub,
        is_typing: bool,
    },

    FriendRequestSent {
        contact_id: contact::Id,
        requester: UserInfo,
    },

    FriendRequestAccepted {
        contact_id: contact::Id,
        new_friend: UserInfo,
    },

    #[serde(rename = "new_booking_notification")]
    NewBooking {
        booking_id: String,
        customer: user::Sub,
        customer_name: String,
        service_title: String,
    },

    #[serde(rename = "booking_status_notification")]
    BookingStatus {
        booking_id: String,
        customer: user::Sub,
        service_title: String,
        status: booking::Status,
    },

    NotificationRemoved {
        notification_id: String,
    },
}
