use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::core::constants::MAX_FRAME_BYTES;
use crate::models::ClientCommand;
use crate::services::ClientSession;
use crate::state::AppState;

/// WebSocket endpoint for the whole game protocol
///
/// A connection exists before it belongs to any room, so there are no
/// path parameters; create/join commands arrive in-band.
///
/// # Flow
///
/// 1. Accept the connection and mint a connection id
/// 2. Spawn a writer task serializing outbound events to text frames
/// 3. Parse each incoming frame as a command and dispatch it
/// 4. When the read loop ends, run disconnect handling exactly once
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    tracing::info!("WebSocket accepted: connection={}", connection_id);

    // All outbound traffic funnels through this task; room handlers
    // only ever push to the unbounded channel, so a slow socket never
    // stalls command handling for the rest of the room.
    let send_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!("Failed to serialize event: {}", err);
                }
            }
        }
    });

    let mut session = ClientSession::new(connection_id, event_tx, state);

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => {
                if text.len() > MAX_FRAME_BYTES {
                    tracing::warn!(
                        "Oversized frame from connection={}: {} bytes",
                        connection_id,
                        text.len()
                    );
                    break;
                }

                match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => session.handle(command).await,
                    Err(err) => {
                        tracing::warn!(
                            "Malformed frame from connection={}: {}",
                            connection_id,
                            err
                        );
                    }
                }
            }
            Message::Close(_) => {
                tracing::debug!("Close frame from connection={}", connection_id);
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Axum answers transport pings itself
            }
            Message::Binary(_) => {
                tracing::warn!("Unexpected binary frame from connection={}", connection_id);
            }
        }
    }

    session.disconnect().await;
    send_task.abort();

    tracing::info!("WebSocket closed: connection={}", connection_id);
}
