//! Per-simulation state shared by systems that is not stored in the world.

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use orbs_core::content::ContentTables;
use orbs_core::events::SimEvent;
use orbs_core::types::PlayArea;

use crate::timers::TimerQueue;

/// RNG, timers, event buffer, and static configuration.
pub struct SimContext {
    pub rng: ChaCha8Rng,
    pub timers: TimerQueue,
    /// Events produced since the last snapshot.
    pub events: Vec<SimEvent>,
    pub area: PlayArea,
    pub content: ContentTables,
    /// Symmetric random spread applied to every hit, in percent.
    pub damage_spread_percent: i32,
    /// Simulation time of the current tick, in seconds.
    pub now: f64,
}

impl SimContext {
    pub fn new(seed: u64, area: PlayArea, content: ContentTables, damage_spread_percent: i32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: TimerQueue::new(),
            events: Vec::new(),
            area,
            content,
            damage_spread_percent,
            now: 0.0,
        }
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Stable numeric id of an entity, as used in events and snapshots.
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}
