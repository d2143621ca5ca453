//! Engine instance: owns every pool, controller, and the run state
//!
//! The host drives it with `update(dt)` once per display refresh and reads
//! back visual state with `draw()`. Player input arrives through the small
//! command methods below; state changes leave through the event queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::Boss;
use super::deck::Deck;
use super::events::{EventQueue, GameEvent, StatsSnapshot};
use super::pool::Pool;
use super::scheduler::{Deferred, Scheduler};
use super::state::{
    BossShot, Bonus, Enemy, Hazard, Particle, Player, Projectile, RunState,
};
use super::zone::{RoundDescriptor, ZoneTable};
use crate::config::{DeviceClass, GameConfig, StartingInventory};
use crate::consts::*;
use crate::dictionary::{Dictionary, WordId};

/// One game session
#[derive(Debug)]
pub struct Engine {
    pub(crate) config: GameConfig,
    pub(crate) dictionary: Dictionary,
    pub(crate) zones: ZoneTable,
    pub(crate) deck: Deck,
    pub(crate) rng: Pcg32,

    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) device: DeviceClass,

    pub(crate) run: RunState,
    pub(crate) player: Player,
    pub(crate) enemies: Pool<Enemy>,
    pub(crate) projectiles: Pool<Projectile>,
    pub(crate) particles: Pool<Particle>,
    pub(crate) boss_shots: Pool<BossShot>,
    pub(crate) boss: Option<Boss>,
    pub(crate) hazards: Vec<Hazard>,
    pub(crate) bonuses: Vec<Bonus>,

    /// Parameters of the round in play (or last played)
    pub(crate) round: Option<RoundDescriptor>,
    pub(crate) current_word: Option<WordId>,
    /// Seconds since the current round started
    pub(crate) round_time: f32,
    pub(crate) hazard_timer: f32,
    pub(crate) bonus_timer: f32,
    pub(crate) fire_cooldown: f32,
    /// Remaining potion time-slow
    pub(crate) time_slow: f32,
    pub(crate) screen_shake: f32,
    /// Set by any miss during a boss fight
    pub(crate) boss_damage_taken: bool,
    pub(crate) combo_unlocked: bool,
    /// Set by a boss defeat; only then may the host call `next_unit`
    pub(crate) awaiting_next_unit: bool,

    pub(crate) paused: bool,
    pub(crate) game_over: bool,
    pub(crate) cancelled: bool,

    pub(crate) scheduler: Scheduler,
    pub(crate) due: Vec<Deferred>,
    pub(crate) events: EventQueue,
    accumulator: f32,
    /// Simulation seconds elapsed
    pub(crate) time: f32,

    /// Reusable buffers for option assembly
    pub(crate) options: Vec<WordId>,
    pub(crate) scratch: Vec<WordId>,
}

impl Engine {
    /// Create an engine for a viewport, session config, and starting inventory
    pub fn new(width: f32, height: f32, config: GameConfig, inventory: StartingInventory) -> Self {
        let dictionary =
            Dictionary::resolve(config.category.as_deref(), config.custom_dictionary.as_deref());
        let deck = Deck::new(dictionary.len());
        let run = RunState::new(&inventory, config.equipped_skin);
        let seed = config.seed;

        log::info!(
            "Engine created: {}x{}, difficulty={}, {} words, seed={}",
            width,
            height,
            config.difficulty.as_str(),
            dictionary.len(),
            seed
        );

        Self {
            options: Vec::with_capacity(MAX_ENEMIES),
            scratch: Vec::with_capacity(dictionary.len()),
            config,
            dictionary,
            zones: ZoneTable::builtin(),
            deck,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            device: DeviceClass::from_width(width),
            run,
            player: Player::new(width, height),
            enemies: Pool::new(MAX_ENEMIES),
            projectiles: Pool::new(MAX_PROJECTILES),
            particles: Pool::new(MAX_PARTICLES),
            boss_shots: Pool::new(MAX_BOSS_SHOTS),
            boss: None,
            hazards: Vec::with_capacity(16),
            bonuses: Vec::with_capacity(4),
            round: None,
            current_word: None,
            round_time: 0.0,
            hazard_timer: HAZARD_INTERVAL,
            bonus_timer: 10.0,
            fire_cooldown: 0.0,
            time_slow: 0.0,
            screen_shake: 0.0,
            boss_damage_taken: false,
            combo_unlocked: false,
            awaiting_next_unit: false,
            paused: false,
            game_over: false,
            cancelled: false,
            scheduler: Scheduler::new(),
            due: Vec::with_capacity(8),
            events: EventQueue::new(),
            accumulator: 0.0,
            time: 0.0,
        }
    }

    /// Replace the zone table (data-driven tuning)
    pub fn with_zones(mut self, zones: ZoneTable) -> Self {
        self.zones = zones;
        self
    }

    // ---- frame driving ----

    /// Advance by a host frame delta (seconds), in fixed substeps
    pub fn update(&mut self, dt: f32) {
        if self.paused || self.cancelled {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
    }

    /// Current visual state for the renderer
    pub fn draw(&self) -> super::view::RenderView<'_> {
        super::view::RenderView::new(self)
    }

    /// Viewport changed (rotation, window resize)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.device = DeviceClass::from_width(self.width);
        self.player.pos.y = self.height - PLAYER_FLOOR_OFFSET;
        self.player.clamp_to(self.width, self.height);
    }

    // ---- player input ----

    pub fn move_player(&mut self, dx: f32, dy: f32) {
        if self.paused || self.run.is_player_exploding {
            return;
        }
        self.player.pos += Vec2::new(dx, dy);
        self.player.clamp_to(self.width, self.height);
    }

    pub fn set_player_pos(&mut self, x: f32, y: f32) {
        if self.paused || self.run.is_player_exploding {
            return;
        }
        self.player.pos = Vec2::new(x, y);
        self.player.clamp_to(self.width, self.height);
    }

    pub fn toggle_pause(&mut self) {
        if self.game_over {
            return;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    /// Abandon the session: outstanding deferred transitions never fire
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.scheduler.cancel_all();
        log::info!("Engine cancelled at score {}", self.run.score);
    }

    // ---- read access ----

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn boss(&self) -> Option<&Boss> {
        self.boss.as_ref()
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    pub fn particles(&self) -> &Pool<Particle> {
        &self.particles
    }

    pub fn boss_shots(&self) -> &Pool<BossShot> {
        &self.boss_shots
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn round(&self) -> Option<&RoundDescriptor> {
        self.round.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Prompt text of the current round
    pub fn current_word(&self) -> Option<&str> {
        self.current_word
            .map(|id| &*self.dictionary.word(id).source)
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain()
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            score: self.run.score,
            lives: self.run.lives,
            combo: self.run.combo,
            level: self.run.level,
            sub_level: self.run.sub_level,
            shield_charges: self.run.shield_charges,
            bombs: self.run.bomb_count,
            potions: self.run.potion_count,
            boss_hp_percent: self.boss.as_ref().map(Boss::hp_percent),
            weapon: self.run.weapon,
            ammo: self.run.ammo.rounds(),
            word: self
                .current_word
                .map(|id| self.dictionary.word(id).source.clone()),
        }
    }

    // ---- shared helpers ----

    pub(crate) fn emit_stats(&mut self) {
        let stats = self.stats();
        self.events.push(GameEvent::Stats(stats));
    }

    pub(crate) fn shake(&mut self, amount: f32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    /// Speed factor from an active time-slow potion
    pub(crate) fn time_scale(&self) -> f32 {
        if self.time_slow > 0.0 {
            POTION_SPEED_SCALE
        } else {
            1.0
        }
    }

    /// Apply a due deferred action
    pub(crate) fn apply_deferred(&mut self, action: Deferred) {
        // Game over is terminal
        if self.game_over {
            log::debug!("Dropping {:?} after game over", action);
            return;
        }
        match action {
            Deferred::AdvanceRound => {
                self.run.sub_level = (self.run.sub_level + 1).min(super::state::BOSS_SUB_LEVEL);
                self.run.is_transitioning = false;
                self.start_round();
            }
            Deferred::RestartRound => {
                self.run.is_transitioning = false;
                self.start_round();
            }
            Deferred::GameOver => {
                self.game_over = true;
                log::info!("Game over: score {}", self.run.score);
                self.events.push(GameEvent::GameOver {
                    final_score: self.run.score,
                });
            }
            Deferred::UnitComplete => {
                if self.run.is_player_exploding {
                    return;
                }
                let snapshot = super::events::UnitSnapshot {
                    score: self.run.score,
                    combo: self.run.combo,
                    level: self.run.level,
                };
                log::info!("Unit complete at level {}", self.run.level);
                self.events.push(GameEvent::UnitComplete(snapshot));
            }
        }
    }
}
