//! Simulation engine: the frame scheduler of the arena.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems in a fixed order, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};

use orbs_core::commands::PlayerCommand;
use orbs_core::components::{Orb, Player};
use orbs_core::constants::{DAMAGE_SPREAD_PERCENT, SLOW_MOBILITY_PENALTY};
use orbs_core::content::{ContentError, ContentTables};
use orbs_core::enums::{Effect, GamePhase};
use orbs_core::events::SimEvent;
use orbs_core::state::GameStateSnapshot;
use orbs_core::types::{frame_scale, PlayArea, SimTime, Vec2};

use crate::abilities::{self, Activation};
use crate::context::{entity_id, SimContext};
use crate::power_ups;
use crate::systems;
use crate::systems::contact::ContactTracker;
use crate::timers::TimerAction;
use crate::waves::WaveManager;
use crate::world_setup::{self, PlayerSpawn};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub play_area: PlayArea,
    /// Symmetric random spread of every hit, in percent. Zero disables it.
    pub damage_spread_percent: i32,
    pub content: ContentTables,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            play_area: PlayArea::default(),
            damage_spread_percent: DAMAGE_SPREAD_PERCENT,
            content: ContentTables::builtin(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    ctx: SimContext,
    command_queue: VecDeque<PlayerCommand>,
    /// Latest joystick direction, applied every active tick.
    move_input: Vec2,
    main_player: Option<Entity>,
    waves: WaveManager,
    contacts: ContactTracker,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine. Fails on invalid content tables.
    pub fn new(config: SimConfig) -> Result<Self, ContentError> {
        config.content.validate()?;
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            ctx: SimContext::new(
                config.seed,
                config.play_area,
                config.content,
                config.damage_spread_percent,
            ),
            command_queue: VecDeque::new(),
            move_input: Vec2::ZERO,
            main_player: None,
            waves: WaveManager::new(),
            contacts: ContactTracker::new(),
            despawn_buffer: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// Time only advances while the game is active. Non-finite or
    /// non-positive `dt` processes commands without advancing.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active && dt.is_finite() && dt > 0.0 {
            self.time.advance(dt);
            self.ctx.now = self.time.elapsed_secs;
            self.run_systems(dt);
        }

        let events = self.ctx.take_events();
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.waves.view(&self.ctx),
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Current wave number (0 before the game starts).
    pub fn wave(&self) -> u32 {
        self.waves.wave
    }

    /// The input-controlled player, while alive.
    pub fn main_player(&self) -> Option<Entity> {
        self.main_player.filter(|&e| self.world.contains(e))
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// An active engine with no main player and no waves, for staging fights.
    #[cfg(test)]
    pub fn sandbox(config: SimConfig) -> Self {
        let mut engine = Self::new(config).expect("valid test content");
        engine.phase = GamePhase::Active;
        engine
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn ctx_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    #[cfg(test)]
    pub fn spawn_test_player(&mut self, spawn: PlayerSpawn) -> Entity {
        let is_main = spawn.is_main;
        let entity = world_setup::spawn_player(&mut self.world, &mut self.ctx, spawn);
        if is_main {
            self.main_player = Some(entity);
        }
        entity
    }

    #[cfg(test)]
    pub fn activate(&mut self, player: Entity, slot: usize) -> Activation {
        abilities::activate(&mut self.world, &mut self.ctx, player, slot)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::Ready | GamePhase::Victory | GamePhase::Defeat) {
                    self.start_game();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::Move { direction } => {
                self.move_input = if direction.is_finite() {
                    direction.clamp_length_max(1.0)
                } else {
                    Vec2::ZERO
                };
            }
            PlayerCommand::TriggerAbility { index } => {
                if self.phase != GamePhase::Active {
                    return;
                }
                if let Some(main) = self.main_player() {
                    let outcome = abilities::activate(&mut self.world, &mut self.ctx, main, index);
                    log::trace!("main player slot {}: {:?}", index, outcome);
                }
            }
            PlayerCommand::TriggerSecondary { index } => {
                if self.phase != GamePhase::Active {
                    return;
                }
                if let Some(main) = self.main_player() {
                    let outcome = abilities::activate_secondary(&self.world, main, index);
                    log::trace!("main player secondary slot {}: {:?}", index, outcome);
                }
            }
        }
    }

    /// Reset the world and begin wave 1.
    fn start_game(&mut self) {
        self.world.clear();
        self.ctx.timers.clear();
        self.ctx.events.clear();
        self.contacts.clear();
        self.time = SimTime::default();
        self.ctx.now = 0.0;
        self.move_input = Vec2::ZERO;

        let spawn = PlayerSpawn::main_player(&self.ctx);
        let main = world_setup::spawn_player(&mut self.world, &mut self.ctx, spawn);
        self.main_player = Some(main);
        self.waves.start(&mut self.world, &mut self.ctx);
        self.phase = GamePhase::Active;
        log::info!("game started, main player {}", entity_id(main));
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let scale = frame_scale(dt);

        // 1. Timers (effect expiry, wave transitions)
        self.dispatch_timers();
        if self.phase != GamePhase::Active {
            return;
        }
        // 2. Ability cooldowns
        abilities::tick_cooldowns(&mut self.world, dt);
        // 3. Orb regeneration
        systems::orb_regen::run(&mut self.world, dt);
        // 4. Aim at the closest visible opponent
        systems::aim::run(&mut self.world, &self.ctx.area);
        // 5. Stance placement
        systems::stance::run(&mut self.world, scale);
        // 6. Main player input
        systems::movement::move_main_player(&mut self.world, self.move_input, &self.ctx.area, scale);
        // 7. Enemy behaviour
        systems::behaviour::run(&mut self.world, &mut self.ctx, scale);
        // 8. Homing and merging orbs
        systems::orb_steering::run(&mut self.world, &mut self.ctx);
        // 9. Orb movement
        systems::movement::run_orbs(&mut self.world, scale);
        // 10. Contacts
        systems::contact::run(&mut self.world, &mut self.ctx, &mut self.contacts);
        // 11. Cleanup (orbs out of bounds)
        systems::cleanup::run(&mut self.world, &mut self.ctx, &mut self.despawn_buffer);
        // 12. Spawners
        systems::spawner::run(&mut self.world, &mut self.ctx, dt);
        // 13. Defeat and wave progression
        self.check_outcome();
    }

    fn dispatch_timers(&mut self) {
        while let Some(action) = self.ctx.timers.pop_due(self.ctx.now) {
            match action {
                TimerAction::ExpireStun { player } => {
                    if let Ok(mut p) = self.world.get::<&mut Player>(player) {
                        p.effects.remove(Effect::Stunning);
                    }
                }
                TimerAction::ExpireSlow { player } => {
                    if let Ok(mut p) = self.world.get::<&mut Player>(player) {
                        p.mobility_modifier -= SLOW_MOBILITY_PENALTY;
                    }
                }
                TimerAction::ExpireOrbEffect { orb, effect } => {
                    if let Ok(mut o) = self.world.get::<&mut Orb>(orb) {
                        o.effects.remove(effect);
                    }
                }
                TimerAction::ExpirePowerUp { player, kind } => {
                    power_ups::revert(&mut self.world, player, kind);
                }
                TimerAction::AdvanceWave => {
                    self.waves.advance(&mut self.world, &mut self.ctx);
                }
                TimerAction::Victory => {
                    self.phase = GamePhase::Victory;
                    self.waves.stop();
                    log::info!("victory after wave {}", self.waves.wave);
                    self.ctx.emit(SimEvent::Victory { wave: self.waves.wave });
                    return;
                }
            }
        }
    }

    fn check_outcome(&mut self) {
        if let Some(main) = self.main_player {
            if !self.world.contains(main) {
                self.phase = GamePhase::Defeat;
                self.main_player = None;
                self.waves.stop();
                self.ctx.timers.clear();
                log::info!("defeat in wave {}", self.waves.wave);
                self.ctx.emit(SimEvent::Defeat { wave: self.waves.wave });
                return;
            }
        }
        self.waves.check_cleared(&mut self.world, &mut self.ctx);
    }
}
