use bytes::Bytes;
use log::{debug, error};

use crate::presence;
use crate::presence::ConnectionId;
use crate::presence::model::Connection;
use crate::user;

use super::context;
use super::model::{Command, Notification};

/// Routes live-channel traffic: message relay, typing relay, notification
/// fan-out and presence broadcasts. Delivery is fire-and-forget over already
/// open connections; an offline recipient is a silent no-op and the durable
/// REST path covers them on next fetch.
#[derive(Clone)]
pub struct EventService {
    registry: presence::Registry,
}

impl EventService {
    pub fn new(registry: presence::Registry) -> Self {
        Self { registry }
    }
}

impl EventService {
    pub async fn connect(&self, conn: Connection) {
        self.registry.register(conn).await;
        self.broadcast_presence().await;
    }

    /// Idempotent teardown: relays an implicit `typing_stop` for every pair
    /// this connection left hanging, then drops the handle and republishes
    /// the online snapshot.
    pub async fn disconnect(&self, ctx: &context::Ws) {
        for target in ctx.drain_typing_targets().await {
            if let Err(e) = self
                .publish(
                    &target,
                    &Notification::UserTyping {
                        sub: ctx.sub.clone(),
                        is_typing: false,
                    },
                )
                .await
            {
                error!("failed to relay typing stop on disconnect: {e}");
            }
        }

        self.registry.deregister(&ctx.sub, &ctx.connection_id).await;
        self.broadcast_presence().await;
    }
}

impl EventService {
    pub async fn handle_command(&self, ctx: &context::Ws, command: Command) -> super::Result<()> {
        debug!("handling command: {command:?}");

        match command {
            Command::SendMessage {
                message_id,
                conversation_id,
                recipient,
                text,
            } => {
                // The sender's own devices are not echoed; they converge via
                // the durable fetch path.
                self.publish(
                    &recipient,
                    &Notification::NewMessage {
                        message_id,
                        conversation_id,
                        sender: ctx.sub.clone(),
                        text,
                        created_at: chrono::Utc::now().timestamp(),
                    },
                )
                .await
            }
            Command::TypingStart { recipient } => {
                if recipient.eq(&ctx.sub) {
                    return Ok(());
                }

                ctx.start_typing_to(&recipient).await;
                self.publish(
                    &recipient,
                    &Notification::UserTyping {
                        sub: ctx.sub.clone(),
                        is_typing: true,
                    },
                )
                .await
            }
            Command::TypingStop { recipient } => {
                if recipient.eq(&ctx.sub) {
                    return Ok(());
                }

                ctx.stop_typing_to(&recipient).await;
                self.publish(
                    &recipient,
                    &Notification::UserTyping {
                        sub: ctx.sub.clone(),
                        is_typing: false,
                    },
                )
                .await
            }
            Command::RemoveNotification { notification_id } => {
                // The initiating device already removed its local entry; only
                // the user's other devices need to converge.
                self.publish_to_others(
                    &ctx.sub,
                    &ctx.connection_id,
                    &Notification::NotificationRemoved { notification_id },
                )
                .await
            }
        }
    }
}

impl EventService {
    /// Pushes one notification to each live handle of `sub`, at most once
    /// per handle. No handles registered means nobody to deliver to.
    pub async fn publish(&self, sub: &user::Sub, noti: &Notification) -> super::Result<()> {
        let payload = Bytes::from(serde_json::to_vec(noti)?);

        for handle in self.registry.handles_for(sub).await {
            handle.push(payload.clone());
        }

        Ok(())
    }

    async fn publish_to_others(
        &self,
        sub: &user::Sub,
        except: &ConnectionId,
        noti: &Notification,
    ) -> super::Result<()> {
        let payload = Bytes::from(serde_json::to_vec(noti)?);

        for handle in self.registry.handles_for(sub).await {
            if handle.id().eq(except) {
                continue;
            }
            handle.push(payload.clone());
        }

        Ok(())
    }

    /// Full online-user snapshot to every connection. A full broadcast is
    /// fine at this system's scale.
    pub async fn broadcast_presence(&self) {
        let users = self.registry.online_users().await;
        let noti = Notification::OnlineUsers { users };

        let payload = match serde_json::to_vec(&noti) {
            Ok(payload) => Bytes::from(payload),
            Err(e) => {
                error!("could not serialize presence snapshot: {e}");
                return;
            }
        };

        for handle in self.registry.all_handles().await {
            handle.push(payload.clone());
        }
    }
}
