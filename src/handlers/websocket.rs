use futures_util::sink::SinkExt;
use futures_util::stream::{SplitStream, StreamExt};
use log::{debug, error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::core::message::parse_identity;
use crate::core::pairing::SharedEngine;
use crate::core::participant::{Outbox, ParticipantId};

/// Runs the disconnect sequence when the connection task ends, however it ends
struct DisconnectGuard {
    engine: SharedEngine,
    participant_id: ParticipantId,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        match self.engine.disconnect(&self.participant_id) {
            Ok(true) => info!("Client disconnected: {}", self.participant_id),
            Ok(false) => debug!("Client {} was already removed", self.participant_id),
            Err(e) => error!("Failed to disconnect client {}: {}", self.participant_id, e),
        }
    }
}

// Handle a WebSocket connection
pub async fn handle_ws_client(ws: WebSocket, engine: SharedEngine, outbox_capacity: usize) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (outbox, mut rx) = Outbox::channel(outbox_capacity);

    // Spawn a task to forward frames from the outbox to the WebSocket.
    // It ends once the engine drops the participant and with it the outbox.
    tokio::task::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = ws_tx.send(Message::text(frame)).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let identity = match read_identity(&mut ws_rx).await {
        Some(identity) => identity,
        None => {
            debug!("Connection closed before sending a name");
            return;
        }
    };

    let participant_id = match engine.connect(&identity, outbox) {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to register client: {}", e);
            return;
        }
    };
    let _guard = DisconnectGuard {
        engine: engine.clone(),
        participant_id: participant_id.clone(),
    };

    // Handle incoming messages
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                if msg.is_close() {
                    break;
                }
                // Only process text messages
                if let (true, Ok(text)) = (msg.is_text(), msg.to_str()) {
                    if let Err(e) = engine.route(&participant_id, text) {
                        error!("Failed to route message from {}: {}", participant_id, e);
                    }
                }
            }
            Err(e) => {
                warn!("WebSocket error for {}: {}", participant_id, e);
                break;
            }
        }
    }
}

// The first text frame names the participant
async fn read_identity(ws_rx: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) if msg.is_close() => return None,
            Ok(msg) => {
                if let (true, Ok(text)) = (msg.is_text(), msg.to_str()) {
                    return Some(parse_identity(text));
                }
            }
            Err(e) => {
                warn!("WebSocket error before identification: {}", e);
                return None;
            }
        }
    }
    None
}
