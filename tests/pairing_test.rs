use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use stranger_socks::core::{create_pairing_engine, Outbox, PairingStatus, StatsSnapshot};
use tokio::sync::mpsc::Receiver;

fn join(
    engine: &stranger_socks::core::SharedEngine,
    name: &str,
) -> (String, Receiver<String>) {
    let (outbox, rx) = Outbox::channel(64);
    let id = engine.connect(name, outbox).unwrap();
    (id, rx)
}

fn frames(rx: &mut Receiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(frame);
    }
    out
}

// Symmetric partners, nobody queued while paired, queue only holds registered ids
fn assert_consistent(snapshot: &StatsSnapshot) {
    let by_id: HashMap<_, _> = snapshot
        .participants
        .iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    for p in &snapshot.participants {
        if let Some(partner_id) = &p.partner_id {
            let partner = by_id.get(partner_id).expect("dangling partner");
            assert_eq!(partner.partner_id.as_ref(), Some(&p.id));
            assert_eq!(p.status, PairingStatus::Paired);
        }
    }
    for entry in &snapshot.queue {
        let p = by_id.get(&entry.id).expect("queued participant not registered");
        assert!(p.partner_id.is_none());
    }
    assert!(snapshot.waiting <= 1);
}

#[test]
fn test_chat_lifecycle() {
    let engine = create_pairing_engine();

    let (a, mut rx_a) = join(&engine, "alice");
    assert_eq!(frames(&mut rx_a), vec!["[COUNT]:1", "[WAIT]:alice"]);

    let (b, mut rx_b) = join(&engine, "bob");
    assert_eq!(frames(&mut rx_a), vec!["[COUNT]:2", "[CONNECT]:bob"]);
    assert_eq!(frames(&mut rx_b), vec!["[COUNT]:2", "[CONNECT]:alice"]);

    engine.route(&a, "hi").unwrap();
    assert_eq!(frames(&mut rx_b), vec!["[MSG]:alice: hi"]);
    assert!(frames(&mut rx_a).is_empty());

    assert!(engine.disconnect(&a).unwrap());
    assert_eq!(
        frames(&mut rx_b),
        vec!["[NOTI1]:alice", "[WAIT]:bob", "[COUNT]:1"]
    );
    assert_eq!(engine.partner_of(&b).unwrap(), None);
    assert_eq!(engine.waiting_count().unwrap(), 1);

    let (c, mut rx_c) = join(&engine, "carol");
    assert_eq!(engine.partner_of(&b).unwrap(), Some(c.clone()));
    assert_eq!(engine.partner_of(&c).unwrap(), Some(b));
    assert_eq!(frames(&mut rx_c), vec!["[COUNT]:2", "[CONNECT]:bob"]);
    assert_eq!(frames(&mut rx_b), vec!["[COUNT]:2", "[CONNECT]:carol"]);

    assert_consistent(&engine.stats().unwrap());
}

#[test]
fn test_population_tracks_running_total() {
    let engine = create_pairing_engine();
    let (a, mut rx_a) = join(&engine, "a");
    let (b, mut rx_b) = join(&engine, "b");
    let (c, mut rx_c) = join(&engine, "c");

    assert_eq!(
        frames(&mut rx_a),
        vec!["[COUNT]:1", "[WAIT]:a", "[COUNT]:2", "[CONNECT]:b", "[COUNT]:3"]
    );
    assert_eq!(
        frames(&mut rx_b),
        vec!["[COUNT]:2", "[CONNECT]:a", "[COUNT]:3"]
    );
    assert_eq!(frames(&mut rx_c), vec!["[COUNT]:3", "[WAIT]:c"]);

    assert_eq!(engine.partner_of(&a).unwrap(), Some(b));
    assert_eq!(engine.partner_of(&c).unwrap(), None);
    assert_eq!(engine.participant_count().unwrap(), 3);
    assert_eq!(engine.stats().unwrap().queue[0].id, c);
}

#[test]
fn test_blank_name_gets_placeholder() {
    let engine = create_pairing_engine();
    let (_a, mut rx_a) = join(&engine, "   ");
    assert_eq!(frames(&mut rx_a), vec!["[COUNT]:1", "[WAIT]:Stranger"]);
}

#[test]
fn test_stop_command_skips() {
    let engine = create_pairing_engine();
    let (a, mut rx_a) = join(&engine, "a");
    let (b, mut rx_b) = join(&engine, "b");
    let (c, _rx_c) = join(&engine, "c");
    frames(&mut rx_a);
    frames(&mut rx_b);

    engine.route(&a, "[STOP]").unwrap();

    // c waited longest, so b goes to c and a waits
    assert_eq!(engine.partner_of(&b).unwrap(), Some(c));
    assert_eq!(engine.partner_of(&a).unwrap(), None);
    assert_eq!(frames(&mut rx_b), vec!["[NOTI1]:a", "[WAIT]:b", "[CONNECT]:c"]);
    assert_eq!(frames(&mut rx_a), vec!["[WAIT]:a"]);

    // Messages from a waiting participant go nowhere
    engine.route(&a, "hello?").unwrap();
    assert!(frames(&mut rx_b).is_empty());
    assert_consistent(&engine.stats().unwrap());
}

#[test]
fn test_disconnect_twice_is_noop() {
    let engine = create_pairing_engine();
    let (a, _rx_a) = join(&engine, "a");
    let (_b, mut rx_b) = join(&engine, "b");
    frames(&mut rx_b);

    assert!(engine.disconnect(&a).unwrap());
    let after_first = frames(&mut rx_b);
    let stats_first = engine.stats().unwrap();

    assert!(!engine.disconnect(&a).unwrap());
    assert!(frames(&mut rx_b).is_empty());
    let stats_second = engine.stats().unwrap();

    assert_eq!(after_first.len(), 3);
    assert_eq!(stats_first.connected, stats_second.connected);
    assert_eq!(stats_first.waiting, stats_second.waiting);
}

#[test]
fn test_stale_outbox_does_not_block_pairing() {
    let engine = create_pairing_engine();
    let (outbox, rx) = Outbox::channel(1);
    let a = engine.connect("a", outbox).unwrap();
    drop(rx);

    let (b, mut rx_b) = join(&engine, "b");
    assert_eq!(engine.partner_of(&b).unwrap(), Some(a.clone()));
    assert_eq!(frames(&mut rx_b), vec!["[COUNT]:2", "[CONNECT]:a"]);

    // The transport reports the dead connection later
    engine.disconnect(&a).unwrap();
    assert_eq!(engine.waiting_count().unwrap(), 1);
}

#[test]
fn test_concurrent_churn_keeps_invariants() {
    let engine = create_pairing_engine();
    let mut handles = Vec::new();

    for worker in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for round in 0..50 {
                let (outbox, _rx) = Outbox::channel(4);
                let id = engine
                    .connect(&format!("w{}-{}", worker, round), outbox)
                    .unwrap();
                engine.route(&id, "hello").unwrap();
                if round % 3 == 0 {
                    engine.skip(&id).unwrap();
                }
                assert_consistent(&engine.stats().unwrap());
                engine.disconnect(&id).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = engine.stats().unwrap();
    assert_eq!(stats.connected, 0);
    assert_eq!(stats.waiting, 0);
    assert_eq!(engine.drain_queue().unwrap(), 0);
}
