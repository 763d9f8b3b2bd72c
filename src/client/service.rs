use std::collections::HashSet;

use log::warn;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::model::{Command, Notification};
use crate::message::model::Message;
use crate::{conversation, message, user};

use super::Api;
use super::model::{ConversationPreview, FeedEntry, LocalMessage};

struct OpenConversation {
    id: conversation::Id,
    messages: Vec<LocalMessage>,
}

/// Per-client reconciliation of the durable REST baseline with live-pushed
/// events. REST order is ground truth; a live event is only a trigger to
/// merge, never the source of sequencing.
pub struct ClientSync {
    me: user::Sub,
    api: Api,
    commands: UnboundedSender<Command>,

    conversations: Vec<ConversationPreview>,
    open: Option<OpenConversation>,
    online: HashSet<user::Sub>,
    typing: HashSet<user::Sub>,
    feed: Vec<FeedEntry>,
    friend_requests: u32,
}

impl ClientSync {
    pub fn new(me: user::Sub, api: Api, commands: UnboundedSender<Command>) -> Self {
        Self {
            me,
            api,
            commands,
            conversations: Vec::new(),
            open: None,
            online: HashSet::new(),
            typing: HashSet::new(),
            feed: Vec::new(),
            friend_requests: 0,
        }
    }
}

impl ClientSync {
    /// Fetches the durable baseline: conversation list and the pending
    /// friend-request count.
    pub async fn load(&mut self) -> super::Result<()> {
        let dtos = self.api.find_conversations().await?;
        self.conversations = dtos.into_iter().map(ConversationPreview::from).collect();

        self.friend_requests = self.api.pending_contact_count().await? as u32;

        Ok(())
    }

    /// Opens one conversation and fetches its chronological history.
    pub async fn open(&mut self, id: &conversation::Id) -> super::Result<()> {
        let messages = self.api.find_messages(id).await?;

        self.open = Some(OpenConversation {
            id: *id,
            messages: messages.into_iter().map(LocalMessage::from).collect(),
        });

        if let Some(preview) = self.conversations.iter_mut().find(|c| c.id.eq(id)) {
            preview.unread = 0;
        }

        Ok(())
    }

    /// Dual-write send path: optimistic local append, live notify, durable
    /// REST write. The live emit and the REST write are independent; only
    /// the REST outcome decides whether the optimistic entry stays.
    pub async fn send(&mut self, recipient: &user::Sub, text: &str) -> super::Result<Message> {
        let (conversation_id, local_id) = {
            let open = self.open.as_mut().ok_or(super::Error::NoOpenConversation)?;

            let local_id = message::Id::random();
            open.messages.push(LocalMessage::optimistic(
                local_id,
                open.id,
                self.me.clone(),
                text,
            ));

            (open.id, local_id)
        };

        let live = Command::SendMessage {
            message_id: local_id,
            conversation_id,
            recipient: recipient.clone(),
            text: text.to_string(),
        };
        if self.commands.send(live).is_err() {
            warn!("live channel is down, recipient will catch up on next fetch");
        }

        match self
            .api
            .create_message(&conversation_id, recipient, text)
            .await
        {
            Ok(canonical) => {
                if let Some(open) = self.open.as_mut()
                    && let Some(entry) = open.messages.iter_mut().find(|m| m.local_id == local_id)
                {
                    entry.confirm(&canonical);
                }

                self.bump_preview(&conversation_id, recipient, &canonical.text, false);

                Ok(canonical)
            }
            Err(e) => {
                // roll the optimistic entry back, the caller prompts a retry
                if let Some(open) = self.open.as_mut() {
                    open.messages.retain(|m| m.local_id != local_id);
                }

                Err(e)
            }
        }
    }

    /// Decodes one wire frame and merges it. A malformed or unknown payload
    /// is logged and dropped, never surfaced to the UI.
    pub fn apply_frame(&mut self, frame: &str) {
        match serde_json::from_str::<Notification>(frame) {
            Ok(noti) => self.apply(noti),
            Err(e) => warn!("skipping malformed event frame: {e}"),
        }
    }

    /// Merges one live event into local state.
    pub fn apply(&mut self, noti: Notification) {
        match noti {
            Notification::OnlineUsers { users } => self.online = users,

            Notification::UserTyping { sub, is_typing } => {
                if is_typing {
                    self.typing.insert(sub);
                } else {
                    self.typing.remove(&sub);
                }
            }

            Notification::NewMessage {
                message_id,
                conversation_id,
                ref sender,
                ref text,
                created_at,
            } => {
                if sender.eq(&self.me) {
                    return;
                }

                let sender = sender.clone();
                let text = text.clone();

                let is_open = self.open.as_ref().is_some_and(|o| o.id == conversation_id);

                if is_open && let Some(open) = self.open.as_mut() {
                    if open.messages.iter().any(|m| m.local_id == message_id) {
                        return;
                    }

                    open.messages.push(LocalMessage {
                        local_id: message_id,
                        message_id: None,
                        conversation_id,
                        sender: sender.clone(),
                        text: text.clone(),
                        created_at,
                        pending: false,
                    });

                    self.bump_preview(&conversation_id, &sender, &text, false);
                } else {
                    // not the open conversation: touch the preview only, the
                    // full history is fetched when the user opens it
                    self.bump_preview(&conversation_id, &sender, &text, true);
                    self.push_feed(&noti);
                }
            }

            Notification::FriendRequestSent { .. } => {
                self.push_feed(&noti);
                self.friend_requests += 1;
            }

            Notification::FriendRequestAccepted { .. }
            | Notification::NewBooking { .. }
            | Notification::BookingStatus { .. } => self.push_feed(&noti),

            Notification::NotificationRemoved { notification_id } => {
                // another device of this user read it; the friend-request
                // counter intentionally stays as is (only the explicit clear
                // resets it)
                self.feed.retain(|e| e.id != notification_id);
            }
        }
    }

    /// Removes the entry locally and tells the user's other devices to do
    /// the same. Does not touch the friend-request counter.
    pub fn mark_as_read(&mut self, notification_id: &str) {
        self.feed.retain(|e| e.id != notification_id);

        let removed = Command::RemoveNotification {
            notification_id: notification_id.to_string(),
        };
        if self.commands.send(removed).is_err() {
            warn!("live channel is down, other devices will not converge now");
        }
    }

    /// The only operation that resets the friend-request counter.
    pub fn clear_friend_requests(&mut self) {
        self.friend_requests = 0;
    }
}

impl ClientSync {
    fn bump_preview(
        &mut self,
        conversation_id: &conversation::Id,
        peer: &user::Sub,
        text: &str,
        unread: bool,
    ) {
        let mut preview = match self
            .conversations
            .iter()
            .position(|c| c.id.eq(conversation_id))
        {
            Some(pos) => {
                let mut preview = self.conversations.remove(pos);
                preview.last_message = Some(text.to_string());
                preview
            }
            // first contact on a conversation the baseline missed
            None => ConversationPreview {
                id: *conversation_id,
                recipient: peer.clone(),
                last_message: Some(text.to_string()),
                unread: 0,
            },
        };

        if unread {
            preview.unread += 1;
        }

        self.conversations.insert(0, preview);
    }

    fn push_feed(&mut self, noti: &Notification) {
        if let Some(entry) = FeedEntry::from_notification(noti) {
            if self.feed.iter().any(|e| e.id == entry.id) {
                return;
            }
            self.feed.push(entry);
        }
    }
}

impl ClientSync {
    pub fn conversations(&self) -> &[ConversationPreview] {
        &self.conversations
    }

    pub fn open_messages(&self) -> &[LocalMessage] {
        self.open.as_ref().map(|o| o.messages.as_slice()).unwrap_or(&[])
    }

    pub fn online(&self) -> &HashSet<user::Sub> {
        &self.online
    }

    pub fn is_typing(&self, sub: &user::Sub) -> bool {
        self.typing.contains(sub)
    }

    pub fn feed(&self) -> &[FeedEntry] {
        &self.feed
    }

    pub fn friend_requests(&self) -> u32 {
        self.friend_requests
    }
}
