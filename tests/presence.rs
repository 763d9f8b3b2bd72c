use tokio::sync::mpsc;

use courier_service::presence::model::Connection;
use courier_service::presence::registry::PresenceRegistry;
use courier_service::user::Sub;

fn connection(sub: &str) -> Connection {
    let (tx, _rx) = mpsc::unbounded_channel();
    Connection::new(Sub::from(sub), tx)
}

#[tokio::test]
async fn user_is_online_while_any_handle_remains() {
    let registry = PresenceRegistry::new();
    let sub = Sub::from("auth0|u1");

    let first = connection("auth0|u1");
    let second = connection("auth0|u1");
    let third = connection("auth0|u1");

    let ids = [first.id(), second.id(), third.id()];

    registry.register(first).await;
    registry.register(second).await;
    registry.register(third).await;

    assert!(registry.is_online(&sub).await);
    assert_eq!(registry.handles_for(&sub).await.len(), 3);

    registry.deregister(&sub, &ids[0]).await;
    registry.deregister(&sub, &ids[1]).await;
    assert!(registry.is_online(&sub).await);

    registry.deregister(&sub, &ids[2]).await;
    assert!(!registry.is_online(&sub).await);
    assert!(registry.handles_for(&sub).await.is_empty());
}

#[tokio::test]
async fn deregister_is_idempotent() {
    let registry = PresenceRegistry::new();
    let sub = Sub::from("auth0|u1");

    let conn = connection("auth0|u1");
    let id = conn.id();

    registry.register(conn).await;
    registry.deregister(&sub, &id).await;
    registry.deregister(&sub, &id).await;

    assert!(!registry.is_online(&sub).await);

    // deregistering a never-registered handle corrects nothing and errors nothing
    let ghost = connection("auth0|ghost");
    registry.deregister(ghost.sub(), &ghost.id()).await;
}

#[tokio::test]
async fn online_snapshot_lists_each_user_once() {
    let registry = PresenceRegistry::new();

    registry.register(connection("auth0|a")).await;
    registry.register(connection("auth0|a")).await;
    registry.register(connection("auth0|b")).await;

    let users = registry.online_users().await;
    assert_eq!(users.len(), 2);
    assert!(users.contains(&Sub::from("auth0|a")));
    assert!(users.contains(&Sub::from("auth0|b")));

    // one handle per device in the flat view
    assert_eq!(registry.all_handles().await.len(), 3);
}
