//! Wave progression: spawner placement per tier, clear detection, rewards,
//! and the delayed transition to the next wave or to victory.

use hecs::World;

use orbs_core::components::{MainPlayer, Player, Spawner};
use orbs_core::constants::WAVE_TRANSITION_SECS;
use orbs_core::enums::{Team, WaveDifficulty};
use orbs_core::events::SimEvent;
use orbs_core::state::WaveView;
use orbs_core::types::Vec2;
use orbs_procgen::placement;

use crate::context::SimContext;
use crate::timers::{TimerAction, TimerKey};
use crate::world_setup;

#[derive(Debug, Default)]
pub struct WaveManager {
    /// Current wave number, starting at 1 once the game starts.
    pub wave: u32,
    active: bool,
}

impl WaveManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn difficulty(&self) -> WaveDifficulty {
        WaveDifficulty::from_wave(self.wave.max(1))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn view(&self, ctx: &SimContext) -> WaveView {
        WaveView {
            number: self.wave,
            difficulty: self.difficulty(),
            transition_pending: ctx.timers.is_pending(TimerKey::WaveTransition),
        }
    }

    /// Begin wave 1.
    pub fn start(&mut self, world: &mut World, ctx: &mut SimContext) {
        self.wave = 0;
        self.active = true;
        self.advance(world, ctx);
    }

    /// Stop tracking waves, e.g. once the game is over.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Move to the next wave and place its spawners.
    pub fn advance(&mut self, world: &mut World, ctx: &mut SimContext) {
        self.wave += 1;
        let difficulty = self.difficulty();
        let placements =
            placement::spawners_for_wave(difficulty, &ctx.content.wave_levels, &ctx.area, &mut ctx.rng);
        for placement in &placements {
            world_setup::spawn_spawner(world, ctx, placement);
        }
        log::info!("wave {} ({:?}) with {} spawners", self.wave, difficulty, placements.len());
        ctx.emit(SimEvent::WaveAdvanced {
            wave: self.wave,
            difficulty,
        });
    }

    /// Detect a cleared wave and schedule what comes next. Returns `true`
    /// on the frame the wave is cleared.
    pub fn check_cleared(&mut self, world: &mut World, ctx: &mut SimContext) -> bool {
        if !self.active || ctx.timers.is_pending(TimerKey::WaveTransition) {
            return false;
        }
        let spawners_left = world.query::<&Spawner>().iter().next().is_some();
        let enemies_left = world.query::<&Player>().iter().any(|(_, p)| p.team == Team::Red);
        if spawners_left || enemies_left {
            return false;
        }

        log::info!("wave {} cleared", self.wave);
        ctx.emit(SimEvent::WaveCleared { wave: self.wave });
        let due = ctx.now + WAVE_TRANSITION_SECS;

        if self.difficulty() == WaveDifficulty::Hard {
            ctx.timers
                .schedule_keyed(due, TimerKey::WaveTransition, TimerAction::Victory);
            return true;
        }

        let avoid = world
            .query::<(&Player, &MainPlayer)>()
            .iter()
            .next()
            .map(|(_, (p, _))| p.position)
            .unwrap_or(Vec2::ZERO);
        for (kind, position) in placement::wave_rewards(&ctx.area, avoid, &mut ctx.rng) {
            world_setup::spawn_power_up(world, ctx, kind, position);
        }
        ctx.timers
            .schedule_keyed(due, TimerKey::WaveTransition, TimerAction::AdvanceWave);
        true
    }
}
