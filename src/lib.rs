//! Word Blaster - simulation core of a falling-answers vocabulary shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, rounds, bosses, projectiles, resources)
//! - `config`: Session configuration and difficulty presets
//! - `dictionary`: Vocabulary words and category resolution
//! - `web`: wasm-bindgen facade for a browser presentation shell

pub mod config;
pub mod dictionary;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{DeviceClass, Difficulty, GameConfig, Skin, StartingInventory};
pub use dictionary::{Dictionary, Word, WordId};
pub use sim::{Engine, GameEvent, RenderView};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest host frame delta accepted (absorbs tab-suspend gaps)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 12;

    /// Pool capacities (allocated once, never resized)
    pub const MAX_ENEMIES: usize = 15;
    pub const MAX_PROJECTILES: usize = 60;
    pub const MAX_PARTICLES: usize = 500;
    pub const MAX_BOSS_SHOTS: usize = 120;

    /// Viewports narrower than this are treated as compact (phone) devices
    pub const COMPACT_WIDTH: f32 = 600.0;

    /// Player craft
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_FLOOR_OFFSET: f32 = 80.0;

    /// Resource caps
    pub const MAX_LIVES: u8 = 5;
    pub const MAX_SHIELD_CHARGES: u8 = 2;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 40.0;
    pub const ENEMY_RADIUS_COMPACT: f32 = 32.0;
    pub const ENEMY_SPAWN_Y: f32 = -40.0;
    /// Combo count that unlocks the combo achievement
    pub const COMBO_ACHIEVEMENT: u32 = 10;

    /// Deferred transition delays (seconds)
    pub const ADVANCE_DELAY: f32 = 0.6;
    pub const RESTART_DELAY: f32 = 1.0;
    pub const EXPLOSION_DURATION: f32 = 1.5;
    pub const UNIT_COMPLETE_DELAY: f32 = 2.5;

    /// Projectiles outside this vertical margin are dropped
    pub const PROJECTILE_MARGIN: f32 = 100.0;
    /// Fire projectiles hit over an enlarged area
    pub const FIRE_RADIUS_SCALE: f32 = 2.5;
    /// Beam half-width before device scaling
    pub const BEAM_HALF_WIDTH: f32 = 18.0;
    pub const BEAM_LIFE: f32 = 0.3;
    /// Extra life a beam keeps after freezing on its target
    pub const BEAM_HIT_LINGER: f32 = 0.15;
    pub const MISSILE_TURN_ACCEL: f32 = 900.0;
    pub const MISSILE_MAX_SPEED: f32 = 550.0;

    /// Boss
    pub const BOSS_RADIUS: f32 = 60.0;
    pub const BOSS_TARGET_Y: f32 = 120.0;
    pub const BOSS_SHOT_SPEED: f32 = 220.0;
    pub const BOSS_SHOT_RADIUS: f32 = 8.0;
    pub const BOSS_DEFEAT_BONUS: u64 = 5000;

    /// Potion time-slow
    pub const POTION_DURATION: f32 = 5.0;
    pub const POTION_SPEED_SCALE: f32 = 0.4;

    /// Hazards and bonuses
    pub const HAZARD_RADIUS: f32 = 14.0;
    pub const HAZARD_INTERVAL: f32 = 2.5;
    pub const BONUS_RADIUS: f32 = 16.0;
    pub const BONUS_POINTS: u64 = 500;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_polar_to_cartesian_down() {
        // Screen space: +y is down
        let v = polar_to_cartesian(10.0, PI / 2.0);
        assert!(v.x.abs() < 1e-4);
        assert!((v.y - 10.0).abs() < 1e-4);
    }
}
