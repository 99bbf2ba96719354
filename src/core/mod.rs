//! Core functionality for stranger pairing

pub mod message;
pub mod notifier;
pub mod pairing;
pub mod participant;
pub mod stats;
pub mod waiting_queue;

// Re-export main components for convenience
pub use message::{Inbound, Notice};
pub use pairing::{create_pairing_engine, PairingEngine, PairingState, SharedEngine};
pub use participant::{Outbox, Participant, ParticipantId};
pub use stats::{PairingStatus, StatsSnapshot};
pub use waiting_queue::WaitingQueue;
