//! FIFO queue of participants waiting for a partner

use std::collections::{HashSet, VecDeque};

use crate::core::participant::ParticipantId;

/// Ordered, duplicate-free queue of unpaired participant ids
#[derive(Debug, Default)]
pub struct WaitingQueue {
    order: VecDeque<ParticipantId>,
    members: HashSet<ParticipantId>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail. Returns false if the id was already waiting.
    pub fn enqueue(&mut self, id: ParticipantId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push_back(id);
        true
    }

    /// Take the longest-waiting id
    pub fn dequeue(&mut self) -> Option<ParticipantId> {
        let id = self.order.pop_front()?;
        self.members.remove(&id);
        Some(id)
    }

    /// Take the two longest-waiting ids, or nothing if fewer than two wait
    pub fn dequeue_pair(&mut self) -> Option<(ParticipantId, ParticipantId)> {
        if self.order.len() < 2 {
            return None;
        }
        let first = self.dequeue()?;
        let second = self.dequeue()?;
        Some((first, second))
    }

    /// Purge an id wherever it sits in the queue
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|queued| queued != id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in queue order, head first
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> {
        self.order.iter()
    }
}
