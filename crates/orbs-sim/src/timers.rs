//! Deferred actions keyed to simulation time.
//!
//! Timed effects (stun, slow, temporary power-ups, post-teleport
//! invulnerability) and wave transitions are queued here instead of being
//! polled every tick. Entries may be keyed: scheduling a keyed action replaces
//! the pending one with the same key, so re-applying an effect extends it.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use hecs::Entity;

use orbs_core::enums::{Effect, PowerUpKind};

/// Work to perform once a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    ExpireStun { player: Entity },
    ExpireSlow { player: Entity },
    ExpireOrbEffect { orb: Entity, effect: Effect },
    ExpirePowerUp { player: Entity, kind: PowerUpKind },
    AdvanceWave,
    Victory,
}

/// Identity of a replaceable timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Stun(Entity),
    PowerUp(Entity, PowerUpKind),
    OrbEffect(Entity, Effect),
    WaveTransition,
}

impl TimerKey {
    fn involves(&self, entity: Entity) -> bool {
        match *self {
            TimerKey::Stun(e) | TimerKey::PowerUp(e, _) | TimerKey::OrbEffect(e, _) => e == entity,
            TimerKey::WaveTransition => false,
        }
    }
}

#[derive(Debug)]
struct Scheduled {
    due: f64,
    seq: u64,
    key: Option<TimerKey>,
    action: TimerAction,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of pending actions. Actions due at the same time fire in
/// scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    /// Live sequence number and action per key. Heap entries whose sequence
    /// number no longer matches are stale and skipped when popped.
    keyed: HashMap<TimerKey, (u64, TimerAction)>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` at time `due`.
    pub fn schedule(&mut self, due: f64, action: TimerAction) {
        self.push(due, None, action);
    }

    /// Run `action` at time `due`, replacing any pending timer with the same
    /// key. Returns the replaced action.
    pub fn schedule_keyed(&mut self, due: f64, key: TimerKey, action: TimerAction) -> Option<TimerAction> {
        let seq = self.push(due, Some(key), action);
        self.keyed.insert(key, (seq, action)).map(|(_, replaced)| replaced)
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.keyed.contains_key(&key)
    }

    /// Drop the keyed timers of a despawned entity. Unkeyed actions on a
    /// dead handle are no-ops when dispatched.
    pub fn forget_entity(&mut self, entity: Entity) {
        self.keyed.retain(|key, _| !key.involves(entity));
    }

    /// Pop the next action due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<TimerAction> {
        while self.heap.peek().is_some_and(|next| next.due <= now) {
            let Some(entry) = self.heap.pop() else { break };
            if let Some(key) = entry.key {
                match self.keyed.get(&key) {
                    Some(&(seq, _)) if seq == entry.seq => {
                        self.keyed.remove(&key);
                    }
                    _ => continue,
                }
            }
            return Some(entry.action);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.keyed.clear();
    }

    fn push(&mut self, due: f64, key: Option<TimerKey>, action: TimerAction) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, key, action });
        seq
    }
}
