//! Delivery of status notices to participants
//!
//! Formatting lives on [`Notice`]; this module only hands frames to outboxes
//! and never touches engine state.

use log::debug;

use crate::core::message::Notice;
use crate::core::participant::Participant;

/// Deliver a notice to one participant
pub fn notify(target: &Participant, notice: &Notice) -> bool {
    debug!("Notify {}: {}", target.id, notice);
    target.send_text(notice.to_frame())
}

/// Deliver a notice to every target, returning how many accepted it
pub fn broadcast<'a, I>(targets: I, notice: &Notice) -> usize
where
    I: IntoIterator<Item = &'a Participant>,
{
    let frame = notice.to_frame();
    let mut success_count = 0;

    for target in targets {
        if target.send_text(frame.clone()) {
            success_count += 1;
        }
    }

    debug!("Broadcast {} to {} participants", frame, success_count);
    success_count
}
