//! Participant state
//! One connected chat user, its pairing link and its outbound queue

use chrono::{DateTime, Utc};
use log::warn;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::constants::DEFAULT_DISPLAY_NAME;
use crate::error::{Result, StrangerSocksError};

pub type ParticipantId = String;

/// Bounded queue of text frames waiting to be written to one connection
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: mpsc::Sender<String>,
}

impl Outbox {
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }

    /// Create an outbox together with the receiving end the writer task drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Enqueue a frame without waiting. A full outbox drops the frame.
    pub fn deliver(&self, owner: &str, payload: String) -> Result<()> {
        match self.sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(StrangerSocksError::OutboxFull(owner.to_string())),
            Err(TrySendError::Closed(_)) => {
                Err(StrangerSocksError::OutboxClosed(owner.to_string()))
            }
        }
    }
}

/// A connected user tracked by the pairing engine
#[derive(Debug)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    /// Current partner, looked up in the registry. Never owning.
    pub partner: Option<ParticipantId>,
    pub outbox: Outbox,
    pub connected_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant with a fresh id
    pub fn new(display_name: &str, outbox: Outbox) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: normalize_display_name(display_name),
            partner: None,
            outbox,
            connected_at: Utc::now(),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.partner.is_some()
    }

    /// Send a text frame, logging instead of failing
    pub fn send_text(&self, text: String) -> bool {
        match self.outbox.deliver(&self.id, text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to deliver to {} ({}): {}", self.id, self.display_name, e);
                false
            }
        }
    }
}

/// Trim a requested name, falling back to the placeholder when blank
pub fn normalize_display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_DISPLAY_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
