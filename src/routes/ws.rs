use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::error::{AppError, AppResult};
use crate::services::realtime::room_key;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
}

/// Upgrade handler for `/ws/dashboard`. Every session receives the global
/// feed; passing recipientType+recipientId additionally joins that room.
pub async fn dashboard_ws(
    ws: WebSocketUpgrade,
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> AppResult<Response> {
    let guard = state.realtime.read().await;
    let Some(hub) = guard.as_ref() else {
        return Err(AppError::ServiceUnavailable(
            "Realtime hub not initialized".to_string(),
        ));
    };

    let global_rx = hub.subscribe_global();
    let room_rx = match (&query.recipient_type, &query.recipient_id) {
        (Some(rtype), Some(rid)) => {
            let room = room_key(rtype, rid);
            tracing::debug!(room = %room, "Dashboard session joining room");
            Some(hub.subscribe_room(&room).await)
        }
        _ => None,
    };
    drop(guard);

    Ok(ws.on_upgrade(move |socket| run_session(socket, global_rx, room_rx)))
}

async fn run_session(
    socket: WebSocket,
    mut global_rx: broadcast::Receiver<String>,
    mut room_rx: Option<broadcast::Receiver<String>>,
) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            broadcast = global_rx.recv() => match broadcast {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dashboard session lagged behind global feed");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            broadcast = recv_room(&mut room_rx) => match broadcast {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dashboard session lagged behind room feed");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    room_rx = None;
                }
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(_)) => break,
                // Pings are answered by axum; other client frames are ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Dashboard session closed");
}

/// A session without a room never yields from this branch.
async fn recv_room(
    rx: &mut Option<broadcast::Receiver<String>>,
) -> Result<String, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
