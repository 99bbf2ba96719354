use serde::Deserialize;
use std::fmt;

use crate::constants::{
    STOP_COMMAND, TAG_CONNECT, TAG_COUNT, TAG_MESSAGE, TAG_PARTNER_LEFT, TAG_WAIT,
};

/// Status and chat frames pushed to participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Number of connected participants
    Population(usize),
    /// A pairing was established with the named partner
    Paired { partner_name: String },
    /// The recipient is queued until someone else arrives
    Waiting { name: String },
    /// The named partner skipped or disconnected
    PartnerLeft { partner_name: String },
    /// Chat text relayed from the partner
    Chat { sender_name: String, content: String },
}

impl Notice {
    pub fn to_frame(&self) -> String {
        match self {
            Self::Population(count) => format!("{}{}", TAG_COUNT, count),
            Self::Paired { partner_name } => format!("{}{}", TAG_CONNECT, partner_name),
            Self::Waiting { name } => format!("{}{}", TAG_WAIT, name),
            Self::PartnerLeft { partner_name } => format!("{}{}", TAG_PARTNER_LEFT, partner_name),
            Self::Chat {
                sender_name,
                content,
            } => format!("{}{}: {}", TAG_MESSAGE, sender_name, content),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_frame())
    }
}

/// Structured form of the first frame a client sends
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum JoinRequest {
    #[serde(rename = "join")]
    Join { name: String },
}

/// Extract the requested display name from the identity frame.
/// Accepts `{"type":"join","name":...}` or the bare name.
pub fn parse_identity(frame: &str) -> String {
    match serde_json::from_str::<JoinRequest>(frame) {
        Ok(JoinRequest::Join { name }) => name,
        Err(_) => frame.to_string(),
    }
}

/// What an inbound payload asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    Skip,
    Chat(&'a str),
}

impl<'a> Inbound<'a> {
    /// Only an exact match of the stop token counts as a skip
    pub fn classify(payload: &'a str) -> Self {
        if payload == STOP_COMMAND {
            Inbound::Skip
        } else {
            Inbound::Chat(payload)
        }
    }
}
