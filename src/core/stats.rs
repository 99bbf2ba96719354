//! Read-only snapshots of the pairing engine for operators

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::core::pairing::PairingState;
use crate::core::participant::ParticipantId;

/// Where a participant stands in the pairing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStatus {
    Waiting,
    Paired,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStat {
    pub id: ParticipantId,
    pub display_name: String,
    pub status: PairingStatus,
    pub partner_id: Option<ParticipantId>,
    pub partner_name: Option<String>,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitingEntry {
    pub id: ParticipantId,
    pub display_name: String,
}

/// Registry and queue as they stood at one instant
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub taken_at: DateTime<Utc>,
    pub connected: usize,
    pub waiting: usize,
    pub total_pairings: u64,
    /// Oldest connection first
    pub participants: Vec<ParticipantStat>,
    /// Head of the queue first
    pub queue: Vec<WaitingEntry>,
}

impl StatsSnapshot {
    /// Build a snapshot. The caller must hold the engine lock.
    pub fn capture(state: &PairingState) -> Self {
        let queue: Vec<WaitingEntry> = state
            .queue()
            .iter()
            .map(|id| WaitingEntry {
                id: id.clone(),
                display_name: state
                    .participant(id)
                    .map(|p| p.display_name.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let mut participants: Vec<ParticipantStat> = state
            .participants()
            .map(|p| {
                let partner_name = p
                    .partner
                    .as_deref()
                    .and_then(|partner_id| state.participant(partner_id))
                    .map(|partner| partner.display_name.clone());
                // Unpaired participants are always queued once the engine lock is released
                let status = if p.is_paired() {
                    PairingStatus::Paired
                } else {
                    PairingStatus::Waiting
                };

                ParticipantStat {
                    id: p.id.clone(),
                    display_name: p.display_name.clone(),
                    status,
                    partner_id: p.partner.clone(),
                    partner_name,
                    connected_at: p.connected_at,
                }
            })
            .collect();
        participants.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Self {
            taken_at: Utc::now(),
            connected: participants.len(),
            waiting: queue.len(),
            total_pairings: state.total_pairings(),
            participants,
            queue,
        }
    }

    /// One line per participant with their partner, for the operator console
    pub fn client_table(&self) -> String {
        let mut out = format!(
            "There are currently {} clients connected:\n",
            self.connected
        );
        for p in &self.participants {
            out.push_str(&format!(
                "{:<20} {:<20} {}\n",
                p.display_name,
                p.partner_name.as_deref().unwrap_or("none"),
                p.connected_at.format("%Y-%m-%d %H:%M:%S"),
            ));
        }
        out
    }

    /// Waiting queue in pairing order
    pub fn waiting_list(&self) -> String {
        let mut out = format!("There are currently {} clients waiting:\n", self.waiting);
        for (position, entry) in self.queue.iter().enumerate() {
            out.push_str(&format!("{:>3}. {:<20} {}\n", position + 1, entry.display_name, entry.id));
        }
        out
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} connected, {} waiting, {} pairings so far",
            self.connected, self.waiting, self.total_pairings
        )
    }
}
