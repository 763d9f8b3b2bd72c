use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use courier_service::conversation;
use courier_service::event::context;
use courier_service::event::model::{Command, Notification};
use courier_service::event::service::EventService;
use courier_service::message;
use courier_service::presence::model::Connection;
use courier_service::presence::Registry;
use courier_service::presence::registry::PresenceRegistry;
use courier_service::user::Sub;

struct Device {
    ctx: context::Ws,
    inbox: UnboundedReceiver<bytes::Bytes>,
}

impl Device {
    /// Drains everything delivered so far.
    fn received(&mut self) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(payload) = self.inbox.try_recv() {
            received.push(serde_json::from_slice(&payload).unwrap());
        }
        received
    }
}

async fn connect(registry: &Registry, sub: &str) -> Device {
    let (tx, inbox) = mpsc::unbounded_channel();
    let conn = Connection::new(Sub::from(sub), tx);
    let ctx = context::Ws::new(Sub::from(sub), conn.id());

    registry.register(conn).await;

    Device { ctx, inbox }
}

fn harness() -> (Registry, EventService) {
    let registry: Registry = Arc::new(PresenceRegistry::new());
    let service = EventService::new(registry.clone());
    (registry, service)
}

fn send_message_command(recipient: &str) -> Command {
    Command::SendMessage {
        message_id: message::Id::random(),
        conversation_id: conversation::Id::random(),
        recipient: Sub::from(recipient),
        text: "hello".into(),
    }
}

#[tokio::test]
async fn relay_delivers_exactly_once_per_handle() {
    let (registry, service) = harness();

    let a = connect(&registry, "auth0|a").await;
    let mut b_phone = connect(&registry, "auth0|b").await;
    let mut b_tab = connect(&registry, "auth0|b").await;

    service
        .handle_command(&a.ctx, send_message_command("auth0|b"))
        .await
        .unwrap();

    for device in [&mut b_phone, &mut b_tab] {
        let received = device.received();
        assert_eq!(received.len(), 1);
        assert!(matches!(
            &received[0],
            Notification::NewMessage { sender, text, .. }
                if *sender == Sub::from("auth0|a") && text == "hello"
        ));
    }
}

#[tokio::test]
async fn offline_recipient_is_a_silent_no_op() {
    let (registry, service) = harness();
    let a = connect(&registry, "auth0|a").await;

    service
        .handle_command(&a.ctx, send_message_command("auth0|nobody"))
        .await
        .unwrap();
}

#[tokio::test]
async fn sender_devices_get_no_echo() {
    let (registry, service) = harness();

    let a_web = connect(&registry, "auth0|a").await;
    let mut a_tab = connect(&registry, "auth0|a").await;
    let mut b = connect(&registry, "auth0|b").await;

    service
        .handle_command(&a_web.ctx, send_message_command("auth0|b"))
        .await
        .unwrap();

    assert_eq!(b.received().len(), 1);
    assert!(a_tab.received().is_empty());
}

#[tokio::test]
async fn typing_relays_to_target_only() {
    let (registry, service) = harness();

    let a = connect(&registry, "auth0|a").await;
    let mut b = connect(&registry, "auth0|b").await;
    let mut c = connect(&registry, "auth0|c").await;

    service
        .handle_command(
            &a.ctx,
            Command::TypingStart {
                recipient: Sub::from("auth0|b"),
            },
        )
        .await
        .unwrap();

    let received = b.received();
    assert_eq!(received.len(), 1);
    assert!(matches!(
        &received[0],
        Notification::UserTyping { sub, is_typing: true } if *sub == Sub::from("auth0|a")
    ));
    assert!(c.received().is_empty());

    service
        .handle_command(
            &a.ctx,
            Command::TypingStop {
                recipient: Sub::from("auth0|b"),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        &b.received()[0],
        Notification::UserTyping {
            is_typing: false,
            ..
        }
    ));
}

#[tokio::test]
async fn self_typing_is_filtered_at_the_boundary() {
    let (registry, service) = harness();

    let mut a = connect(&registry, "auth0|a").await;

    service
        .handle_command(
            &a.ctx,
            Command::TypingStart {
                recipient: Sub::from("auth0|a"),
            },
        )
        .await
        .unwrap();

    assert!(a.received().is_empty());
}

#[tokio::test]
async fn disconnect_implies_typing_stop() {
    let (registry, service) = harness();

    let a = connect(&registry, "auth0|a").await;
    let mut b = connect(&registry, "auth0|b").await;

    service
        .handle_command(
            &a.ctx,
            Command::TypingStart {
                recipient: Sub::from("auth0|b"),
            },
        )
        .await
        .unwrap();
    b.received();

    service.disconnect(&a.ctx).await;

    let received = b.received();
    assert!(received.iter().any(|n| matches!(
        n,
        Notification::UserTyping {
            is_typing: false,
            ..
        }
    )));
    assert!(!registry.is_online(&Sub::from("auth0|a")).await);
}

#[tokio::test]
async fn remove_notification_reaches_only_the_other_devices() {
    let (registry, service) = harness();

    let mut origin = connect(&registry, "auth0|a").await;
    let mut other = connect(&registry, "auth0|a").await;
    let mut peer = connect(&registry, "auth0|b").await;

    service
        .handle_command(
            &origin.ctx,
            Command::RemoveNotification {
                notification_id: "noti-1".into(),
            },
        )
        .await
        .unwrap();

    let received = other.received();
    assert_eq!(received.len(), 1);
    assert!(matches!(
        &received[0],
        Notification::NotificationRemoved { notification_id } if notification_id == "noti-1"
    ));

    assert!(origin.received().is_empty());
    assert!(peer.received().is_empty());
}

#[tokio::test]
async fn connect_and_disconnect_broadcast_the_online_snapshot() {
    let (registry, service) = harness();

    let mut a = connect(&registry, "auth0|a").await;

    // second user connects through the service, everybody gets a snapshot
    let (tx, inbox) = mpsc::unbounded_channel();
    let conn = Connection::new(Sub::from("auth0|b"), tx);
    let ctx = context::Ws::new(Sub::from("auth0|b"), conn.id());
    service.connect(conn).await;
    let b = Device { ctx, inbox };

    let snapshot = a.received();
    assert!(matches!(
        snapshot.last().unwrap(),
        Notification::OnlineUsers { users } if users.len() == 2
    ));

    service.disconnect(&b.ctx).await;

    let snapshot = a.received();
    assert!(matches!(
        snapshot.last().unwrap(),
        Notification::OnlineUsers { users }
            if users.len() == 1 && users.contains(&Sub::from("auth0|a"))
    ));

    // idempotent: a second teardown of the same connection changes nothing
    service.disconnect(&b.ctx).await;
    assert!(matches!(
        a.received().last().unwrap(),
        Notification::OnlineUsers { users } if users.len() == 1
    ));
}
