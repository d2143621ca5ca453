//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod deck;
pub mod engine;
pub mod events;
pub mod pool;
pub mod resources;
pub mod round;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod view;
pub mod zone;

pub use boss::{AttackPattern, Boss, BossKind};
pub use deck::Deck;
pub use engine::Engine;
pub use events::{Achievement, GameEvent, StatsSnapshot, UnitSnapshot};
pub use pool::{Pool, SlotId};
pub use scheduler::{Deferred, Scheduler};
pub use state::{
    Ammo, Bonus, BonusKind, BossShot, Enemy, Hazard, Particle, Player, Projectile, RunState,
    WeaponKind, BOSS_SUB_LEVEL,
};
pub use view::{EnemyView, RenderView};
pub use zone::{Modifier, RoundDescriptor, ZoneDef, ZoneTable};

/// Engine on an 800x600 viewport with default config
#[cfg(test)]
pub(crate) fn test_engine() -> Engine {
    use crate::config::{GameConfig, StartingInventory};
    Engine::new(800.0, 600.0, GameConfig::default(), StartingInventory::default())
}
