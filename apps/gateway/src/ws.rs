//! WebSocket handler for the `/tasks` channel.
//!
//! Every accepted connection first nudges the relay lifecycle manager, so
//! the bus consumer is running whenever at least one client is connected.
//! Each client then gets its own forwarding loop; a slow or broken client
//! only ever affects itself.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use realtime::TASKS_CHANNEL;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// WebSocket upgrade handler for `GET /tasks`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Connecting is what (re)starts the relay. A worker that faulted is
    // replaced here, before this client starts listening.
    state.relay.ensure_running().await;

    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Forward broadcast events to one client until it disconnects.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.broadcaster.subscribe(TASKS_CHANNEL).await;

    let subscribers = state.broadcaster.subscriber_count(TASKS_CHANNEL).await;
    info!(subscribers, "WebSocket client connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            let payload = match rx.recv().await {
                Ok(payload) => payload,
                Err(RecvError::Lagged(skipped)) => {
                    // Slow client: it missed events but stays connected.
                    warn!(skipped, "WebSocket client lagged behind broadcast");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let frame = match event_frame(&payload) {
                Some(frame) => frame,
                None => {
                    warn!(payload = %payload, "Dropping unparseable broadcast payload");
                    continue;
                }
            };

            if sender.send(Message::Text(frame.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    // Drain the client side so close frames and disconnects are noticed.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    debug!("WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    // Whichever side finishes first, the other must be torn down too:
    // a forwarding task left parked on the broadcast receiver would keep
    // a disconnected client counted as a subscriber until the next push.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("WebSocket client disconnected");
}

/// Wrap a broadcast payload in the `task_event` frame clients expect.
fn event_frame(payload: &str) -> Option<String> {
    let data: Value = serde_json::from_str(payload).ok()?;
    Some(
        json!({
            "event": "task_event",
            "data": data,
        })
        .to_string(),
    )
}
