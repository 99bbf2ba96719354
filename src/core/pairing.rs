//! Pairing engine
//!
//! Owns the participant registry and the waiting queue. Every public operation
//! takes the single engine lock for its whole duration, and all notices for an
//! event are pushed to outboxes before the lock is released. Outbox delivery
//! never waits, so no operation can stall while holding the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::core::message::{Inbound, Notice};
use crate::core::notifier;
use crate::core::participant::{Outbox, Participant, ParticipantId};
use crate::core::stats::StatsSnapshot;
use crate::core::waiting_queue::WaitingQueue;
use crate::error::Result;

/// Registry, queue and partner links guarded by the engine lock
#[derive(Debug, Default)]
pub struct PairingState {
    participants: HashMap<ParticipantId, Participant>,
    queue: WaitingQueue,
    total_pairings: u64,
}

impl PairingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    pub fn total_pairings(&self) -> u64 {
        self.total_pairings
    }

    fn display_name(&self, id: &str) -> String {
        self.participants
            .get(id)
            .map(|p| p.display_name.clone())
            .unwrap_or_default()
    }

    fn notify(&self, id: &str, notice: &Notice) {
        if let Some(target) = self.participants.get(id) {
            notifier::notify(target, notice);
        }
    }

    fn broadcast_population(&self) {
        let notice = Notice::Population(self.participants.len());
        notifier::broadcast(self.participants.values(), &notice);
    }

    fn register(&mut self, participant: Participant) -> ParticipantId {
        let id = participant.id.clone();
        info!("Participant connected: {} ({})", id, participant.display_name);
        self.participants.insert(id.clone(), participant);
        id
    }

    /// Link two unpaired participants and tell each who they got
    fn link(&mut self, a: &str, b: &str) {
        if let Some(p) = self.participants.get_mut(a) {
            p.partner = Some(b.to_string());
        }
        if let Some(p) = self.participants.get_mut(b) {
            p.partner = Some(a.to_string());
        }
        self.total_pairings += 1;

        let a_name = self.display_name(a);
        let b_name = self.display_name(b);
        info!("Paired {} ({}) with {} ({})", a, a_name, b, b_name);

        self.notify(a, &Notice::Paired { partner_name: b_name });
        self.notify(b, &Notice::Paired { partner_name: a_name });
    }

    fn is_available(&self, id: &str) -> bool {
        self.participants
            .get(id)
            .map(|p| !p.is_paired())
            .unwrap_or(false)
    }

    /// Pair with the longest-waiting participant, or start waiting
    fn try_pair(&mut self, id: &str) {
        if !self.is_available(id) || self.queue.contains(id) {
            return;
        }

        while let Some(candidate) = self.queue.dequeue() {
            if candidate != id && self.is_available(&candidate) {
                self.link(&candidate, id);
                return;
            }
        }

        self.requeue(id);
    }

    /// Put an unpaired participant at the tail of the queue, once
    fn requeue(&mut self, id: &str) {
        if !self.is_available(id) {
            return;
        }
        if self.queue.enqueue(id.to_string()) {
            debug!("Participant {} is waiting ({} in queue)", id, self.queue.len());
            let name = self.display_name(id);
            self.notify(id, &Notice::Waiting { name });
        }
    }

    /// Break the pairing `id` is part of. The former partner is told who left
    /// and returned.
    fn detach(&mut self, id: &str) -> Option<ParticipantId> {
        let partner_id = self.participants.get_mut(id)?.partner.take()?;
        let leaver_name = self.display_name(id);

        if let Some(partner) = self.participants.get_mut(&partner_id) {
            partner.partner = None;
            notifier::notify(
                partner,
                &Notice::PartnerLeft {
                    partner_name: leaver_name,
                },
            );
        }

        info!("Pairing of {} and {} ended", id, partner_id);
        Some(partner_id)
    }

    fn drain_queue(&mut self) -> usize {
        let mut paired = 0;
        while let Some((first, second)) = self.queue.dequeue_pair() {
            self.link(&first, &second);
            paired += 1;
        }
        paired
    }

    fn route(&mut self, from: &str, payload: &str) {
        match Inbound::classify(payload) {
            Inbound::Skip => self.skip(from),
            Inbound::Chat(content) => self.relay(from, content),
        }
    }

    fn relay(&self, from: &str, content: &str) {
        let Some(sender) = self.participants.get(from) else {
            return;
        };
        let Some(partner_id) = sender.partner.as_deref() else {
            debug!("Dropping message from unpaired participant {}", from);
            return;
        };

        let notice = Notice::Chat {
            sender_name: sender.display_name.clone(),
            content: content.to_string(),
        };
        self.notify(partner_id, &notice);
    }

    fn skip(&mut self, id: &str) {
        if !self.participants.contains_key(id) {
            return;
        }
        if let Some(partner_id) = self.detach(id) {
            self.requeue(&partner_id);
        }
        self.requeue(id);
        self.drain_queue();
    }

    fn disconnect(&mut self, id: &str) -> bool {
        let Some(mut leaving) = self.participants.remove(id) else {
            return false;
        };
        self.queue.remove(id);

        if let Some(partner_id) = leaving.partner.take() {
            if let Some(partner) = self.participants.get_mut(&partner_id) {
                partner.partner = None;
                notifier::notify(
                    partner,
                    &Notice::PartnerLeft {
                        partner_name: leaving.display_name.clone(),
                    },
                );
            }
            self.requeue(&partner_id);
            self.drain_queue();
        }

        info!("Participant disconnected: {} ({})", id, leaving.display_name);
        self.broadcast_population();
        true
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        for (id, participant) in &self.participants {
            if let Some(partner_id) = &participant.partner {
                let partner = self
                    .participants
                    .get(partner_id)
                    .unwrap_or_else(|| panic!("{} points at missing partner", id));
                assert_eq!(partner.partner.as_deref(), Some(id.as_str()));
                assert_ne!(partner_id, id);
                assert!(!self.queue.contains(id), "{} is paired and queued", id);
            }
        }
        for id in self.queue.iter() {
            assert!(self.participants.contains_key(id), "{} queued but gone", id);
        }
    }
}

/// Thread-safe pairing engine shared by every connection task
#[derive(Debug, Default)]
pub struct PairingEngine {
    state: Mutex<PairingState>,
}

// Shared reference to the pairing engine
pub type SharedEngine = Arc<PairingEngine>;

// Create a new shared pairing engine
pub fn create_pairing_engine() -> SharedEngine {
    Arc::new(PairingEngine::new())
}

impl PairingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, PairingState>> {
        Ok(self.state.lock()?)
    }

    /// Register a participant, announce the new population, then try to pair it
    pub fn connect(&self, identity: &str, outbox: Outbox) -> Result<ParticipantId> {
        let participant = Participant::new(identity, outbox);
        let mut state = self.lock_state()?;
        let id = state.register(participant);
        state.broadcast_population();
        state.try_pair(&id);
        Ok(id)
    }

    pub fn try_pair(&self, id: &str) -> Result<()> {
        self.lock_state()?.try_pair(id);
        Ok(())
    }

    /// Handle one inbound payload: the stop token skips, anything else is
    /// relayed to the partner or dropped when there is none
    pub fn route(&self, from: &str, payload: &str) -> Result<()> {
        self.lock_state()?.route(from, payload);
        Ok(())
    }

    /// End the current pairing and return both sides to the queue
    pub fn skip(&self, id: &str) -> Result<()> {
        self.lock_state()?.skip(id);
        Ok(())
    }

    /// Pair off waiting participants oldest first; returns pairs made
    pub fn drain_queue(&self) -> Result<usize> {
        Ok(self.lock_state()?.drain_queue())
    }

    /// Remove a participant for good. Returns false if it was already gone.
    pub fn disconnect(&self, id: &str) -> Result<bool> {
        Ok(self.lock_state()?.disconnect(id))
    }

    pub fn partner_of(&self, id: &str) -> Result<Option<ParticipantId>> {
        Ok(self
            .lock_state()?
            .participant(id)
            .and_then(|p| p.partner.clone()))
    }

    pub fn participant_count(&self) -> Result<usize> {
        Ok(self.lock_state()?.participants.len())
    }

    pub fn waiting_count(&self) -> Result<usize> {
        Ok(self.lock_state()?.queue.len())
    }

    /// Consistent read-only view of registry and queue
    pub fn stats(&self) -> Result<StatsSnapshot> {
        let state = self.lock_state()?;
        Ok(StatsSnapshot::capture(&state))
    }
}
