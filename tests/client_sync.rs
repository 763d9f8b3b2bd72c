use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use courier_service::client::api::Backend;
use courier_service::client::model::FeedKind;
use courier_service::client::service::ClientSync;
use courier_service::client;
use courier_service::contact;
use courier_service::conversation;
use courier_service::conversation::model::ConversationDto;
use courier_service::event::model::{Command, Notification};
use courier_service::message::model::Message;
use courier_service::user::Sub;
use courier_service::user::model::UserInfo;

/// Canned REST collaborator. `fail_writes` simulates a persistence outage.
struct StubBackend {
    me: Sub,
    conversations: Vec<ConversationDto>,
    messages: Vec<Message>,
    pending: usize,
    fail_writes: AtomicBool,
}

impl StubBackend {
    fn new(me: Sub) -> Self {
        Self {
            me,
            conversations: Vec::new(),
            messages: Vec::new(),
            pending: 0,
            fail_writes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn find_conversations(&self) -> client::Result<Vec<ConversationDto>> {
        Ok(self.conversations.clone())
    }

    async fn find_messages(
        &self,
        conversation_id: &conversation::Id,
    ) -> client::Result<Vec<Message>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.conversation_id.eq(conversation_id))
            .cloned()
            .collect())
    }

    async fn create_message(
        &self,
        conversation_id: &conversation::Id,
        recipient: &Sub,
        text: &str,
    ) -> client::Result<Message> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(client::Error::Backend("persistence is down".into()));
        }

        Ok(Message::new(
            *conversation_id,
            self.me.clone(),
            recipient.clone(),
            text,
        ))
    }

    async fn pending_contact_count(&self) -> client::Result<usize> {
        Ok(self.pending)
    }
}

struct Fixture {
    sync: ClientSync,
    backend: Arc<StubBackend>,
    commands: UnboundedReceiver<Command>,
    me: Sub,
    peer: Sub,
    convo: conversation::Id,
}

fn fixture() -> Fixture {
    let me = Sub::from("auth0|me");
    let peer = Sub::from("auth0|peer");
    let convo = conversation::Id::random();

    let mut backend = StubBackend::new(me.clone());
    backend.conversations.push(ConversationDto {
        id: convo,
        recipient: peer.clone(),
        last_message: None,
        created_at: 0,
    });

    let backend = Arc::new(backend);
    let (tx, commands) = mpsc::unbounded_channel();
    let sync = ClientSync::new(me.clone(), backend.clone(), tx);

    Fixture {
        sync,
        backend,
        commands,
        me,
        peer,
        convo,
    }
}

fn live_message(convo: conversation::Id, sender: &Sub, text: &str) -> Notification {
    Notification::NewMessage {
        message_id: courier_service::message::Id::random(),
        conversation_id: convo,
        sender: sender.clone(),
        text: text.into(),
        created_at: 0,
    }
}

#[tokio::test]
async fn load_fetches_the_durable_baseline() {
    let mut f = fixture();

    f.sync.load().await.unwrap();

    assert_eq!(f.sync.conversations().len(), 1);
    assert_eq!(f.sync.conversations()[0].recipient, f.peer);
    assert_eq!(f.sync.friend_requests(), 0);
}

#[tokio::test]
async fn send_confirms_the_optimistic_entry() {
    let mut f = fixture();
    f.sync.load().await.unwrap();
    f.sync.open(&f.convo).await.unwrap();

    let peer = f.peer.clone();
    let canonical = f.sync.send(&peer, "hi there").await.unwrap();

    let messages = f.sync.open_messages();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].pending);
    assert_eq!(messages[0].message_id, Some(canonical.id));
    assert_eq!(messages[0].sender, f.me);

    // the live emit went out alongside the REST write
    let emitted = f.commands.try_recv().unwrap();
    assert!(matches!(
        emitted,
        Command::SendMessage { message_id, text, .. }
            if message_id == messages[0].local_id && text == "hi there"
    ));

    assert_eq!(
        f.sync.conversations()[0].last_message.as_deref(),
        Some("hi there")
    );
}

#[tokio::test]
async fn failed_send_rolls_back_but_still_notified_live() {
    let mut f = fixture();
    f.sync.load().await.unwrap();
    f.sync.open(&f.convo).await.unwrap();

    f.backend.fail_writes.store(true, Ordering::Relaxed);

    let peer = f.peer.clone();
    let result = f.sync.send(&peer, "lost words").await;

    assert!(result.is_err());
    // optimistic entry is rolled back, the caller prompts a retry
    assert!(f.sync.open_messages().is_empty());

    // the live emit and the durable write are decoupled by design
    assert!(matches!(
        f.commands.try_recv().unwrap(),
        Command::SendMessage { .. }
    ));
}

#[tokio::test]
async fn live_message_in_open_conversation_appends_once() {
    let mut f = fixture();
    f.sync.load().await.unwrap();
    f.sync.open(&f.convo).await.unwrap();

    let noti = live_message(f.convo, &f.peer.clone(), "knock knock");
    f.sync.apply(noti.clone());
    // duplicate delivery of the same event must not duplicate the entry
    f.sync.apply(noti);

    assert_eq!(f.sync.open_messages().len(), 1);
    assert_eq!(f.sync.open_messages()[0].text, "knock knock");
    // watching the conversation, nothing is unread
    assert_eq!(f.sync.conversations()[0].unread, 0);
    assert!(f.sync.feed().is_empty());
}

#[tokio::test]
async fn live_message_elsewhere_only_bumps_the_preview() {
    let mut f = fixture();
    f.sync.load().await.unwrap();
    f.sync.open(&f.convo).await.unwrap();

    let other_convo = conversation::Id::random();
    let other_peer = Sub::from("auth0|other");

    f.sync
        .apply(live_message(other_convo, &other_peer, "psst"));

    // open conversation untouched
    assert!(f.sync.open_messages().is_empty());

    // the unseen conversation surfaces first with an unread marker
    let preview = &f.sync.conversations()[0];
    assert_eq!(preview.id, other_convo);
    assert_eq!(preview.unread, 1);
    assert_eq!(preview.last_message.as_deref(), Some("psst"));

    // and it lands in the notification feed
    assert_eq!(f.sync.feed().len(), 1);
    assert_eq!(f.sync.feed()[0].kind(), FeedKind::Message);
}

#[tokio::test]
async fn own_echo_is_ignored() {
    let mut f = fixture();
    f.sync.load().await.unwrap();
    f.sync.open(&f.convo).await.unwrap();

    let me = f.me.clone();
    f.sync.apply(live_message(f.convo, &me, "looped back"));

    assert!(f.sync.open_messages().is_empty());
}

#[tokio::test]
async fn friend_request_counter_only_resets_explicitly() {
    let mut f = fixture();

    f.sync.apply(Notification::FriendRequestSent {
        contact_id: contact::Id::random(),
        requester: UserInfo {
            sub: f.peer.clone(),
            name: "Peer".into(),
            picture: "".into(),
        },
    });

    assert_eq!(f.sync.friend_requests(), 1);
    assert_eq!(f.sync.feed().len(), 1);
    assert_eq!(f.sync.feed()[0].kind(), FeedKind::FriendRequest);

    // reading the notification removes it from the feed and syncs the other
    // devices, but deliberately leaves the counter alone
    let id = f.sync.feed()[0].id.clone();
    f.sync.mark_as_read(&id);

    assert!(f.sync.feed().is_empty());
    assert_eq!(f.sync.friend_requests(), 1);
    assert!(matches!(
        f.commands.try_recv().unwrap(),
        Command::RemoveNotification { notification_id } if notification_id == id
    ));

    f.sync.clear_friend_requests();
    assert_eq!(f.sync.friend_requests(), 0);
}

#[tokio::test]
async fn read_state_converges_from_other_devices() {
    let mut f = fixture();

    f.sync.apply(Notification::FriendRequestSent {
        contact_id: contact::Id::random(),
        requester: UserInfo {
            sub: f.peer.clone(),
            name: "Peer".into(),
            picture: "".into(),
        },
    });
    let id = f.sync.feed()[0].id.clone();

    // another device of this user marked it as read
    f.sync.apply(Notification::NotificationRemoved {
        notification_id: id,
    });

    assert!(f.sync.feed().is_empty());
    assert_eq!(f.sync.friend_requests(), 1);
}

#[tokio::test]
async fn booking_events_feed_by_category() {
    let mut f = fixture();

    f.sync.apply(Notification::NewBooking {
        booking_id: "bk-1".into(),
        customer: f.peer.clone(),
        customer_name: "Peer".into(),
        service_title: "Pipe repair".into(),
    });
    f.sync.apply(Notification::BookingStatus {
        booking_id: "bk-1".into(),
        customer: f.peer.clone(),
        service_title: "Pipe repair".into(),
        status: courier_service::booking::Status::Completed,
    });

    let bookings = f
        .sync
        .feed()
        .iter()
        .filter(|e| e.kind() == FeedKind::Booking)
        .count();
    assert_eq!(bookings, 2);
}

#[tokio::test]
async fn malformed_frames_are_dropped_defensively() {
    let mut f = fixture();
    f.sync.load().await.unwrap();

    f.sync.apply_frame("not even json");
    f.sync.apply_frame(r#"{"type":"friend_request_sent"}"#);
    f.sync.apply_frame(r#"{"type":"get_users","users":["auth0|peer"]}"#);

    // the two broken frames changed nothing, the valid one merged
    assert!(f.sync.feed().is_empty());
    assert_eq!(f.sync.friend_requests(), 0);
    assert!(f.sync.online().contains(&f.peer));
}

#[tokio::test]
async fn presence_and_typing_signals_track_state() {
    let mut f = fixture();

    f.sync.apply(Notification::OnlineUsers {
        users: [f.peer.clone()].into_iter().collect(),
    });
    assert!(f.sync.online().contains(&f.peer));

    f.sync.apply(Notification::UserTyping {
        sub: f.peer.clone(),
        is_typing: true,
    });
    assert!(f.sync.is_typing(&f.peer));

    f.sync.apply(Notification::UserTyping {
        sub: f.peer.clone(),
        is_typing: false,
    });
    assert!(!f.sync.is_typing(&f.peer));
}
