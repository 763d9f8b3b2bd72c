use axum::extract::ws::Message::{Binary, Close, Text};
use axum::extract::ws::{self, Utf8Bytes, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::{debug, error, warn};
use serde::Deserialize;
use serde_json::from_str;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::try_join;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::presence::model::Connection;
use crate::user;

use super::context;
use super::model::Command;
use super::service::EventService;

#[derive(Deserialize)]
pub struct ConnectParams {
    sub: user::Sub,
}

pub async fn ws(
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
    State(event_service): State<EventService>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(params.sub, socket, event_service))
}

async fn handle_socket(sub: user::Sub, ws: WebSocket, event_service: EventService) {
    let (outbound, inbound) = mpsc::unbounded_channel();

    let conn = Connection::new(sub.clone(), outbound);
    let ctx = context::Ws::new(sub, conn.id());

    event_service.connect(conn).await;

    let (sender, receiver) = ws.split();

    let read_task = tokio::spawn(read(ctx.clone(), receiver, event_service.clone()));
    let write_task = tokio::spawn(write(ctx.clone(), sender, inbound));

    match try_join!(read_task, write_task) {
        Ok(_) => debug!("ws disconnected gracefully"),
        Err(e) => error!("ws disconnected with error: {e}"),
    }

    event_service.disconnect(&ctx).await;
}

async fn read(ctx: context::Ws, mut receiver: SplitStream<WebSocket>, event_service: EventService) {
    loop {
        tokio::select! {
            // close is notified => stop 'read' task
            _ = ctx.close.notified() => break,

            // read next frame from ws connection
            frame = receiver.next() => {
                if let Some(message) = frame {
                    match message {
                        Err(e) => {
                            error!("failed to read ws frame: {e}");
                            ctx.close.notify_one(); // notify 'write' task to stop
                            break;
                        },
                        Ok(Close(frame)) => {
                            debug!("ws connection closed by client: {frame:?}");
                            ctx.close.notify_one(); // notify 'write' task to stop
                            break;
                        },
                        Ok(Text(content)) => {
                            if let Err(e) = handle_text_frame(&ctx, content.as_str(), event_service.clone()).await {
                                error!("failed to handle text frame: {e}");
                                ctx.close.notify_one(); // notify 'write' task to stop
                                break;
                            }
                        },
                        Ok(Binary(content)) => {
                            warn!("received binary ws frame: {content:?}");
                        }
                        Ok(wtf) => warn!("received non-text ws frame: {wtf:?}")
                    }
                } else {
                    // transport is gone without a close frame
                    ctx.close.notify_one();
                    break;
                }
            }
        }
    }
}

async fn handle_text_frame(
    ctx: &context::Ws,
    content: &str,
    event_service: EventService,
) -> super::Result<()> {
    if let Ok(command) = from_str::<Command>(content) {
        return event_service.handle_command(ctx, command).await;
    }

    warn!("skipping text frame, content is malformed: {content}");
    Ok(())
}

async fn write(
    ctx: context::Ws,
    mut sender: SplitSink<WebSocket, ws::Message>,
    inbound: UnboundedReceiver<Bytes>,
) {
    let mut notifications = UnboundedReceiverStream::new(inbound);

    loop {
        tokio::select! {
            // close is notified => stop 'write' task
            _ = ctx.close.notified() => break,

            // new notification for this connection => push it to the client
            item = notifications.next() => {
                match item {
                    None => break,
                    Some(payload) => match Utf8Bytes::try_from(payload) {
                        Ok(text) => {
                            if let Err(e) = sender.send(Text(text)).await {
                                error!("failed to send notification to client: {e}");
                                ctx.close.notify_one(); // notify 'read' task to stop
                                break;
                            }
                        }
                        Err(e) => error!("skipping non-utf8 payload: {e}"),
                    }
                }
            }
        }
    }
}
