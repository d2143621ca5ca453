//! Run state and pooled entity types
//!
//! Pooled types (`Enemy`, `Projectile`, `Particle`, `BossShot`) are plain
//! `Copy` data so a pool can overwrite a slot wholesale on acquire.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{Skin, StartingInventory};
use crate::consts::*;
use crate::dictionary::WordId;

/// Player weapon / projectile behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    #[default]
    Normal,
    Fire,
    Beam,
    Electric,
    Missile,
    Laser,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Normal,
        WeaponKind::Fire,
        WeaponKind::Beam,
        WeaponKind::Electric,
        WeaponKind::Missile,
        WeaponKind::Laser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "normal",
            WeaponKind::Fire => "fire",
            WeaponKind::Beam => "beam",
            WeaponKind::Electric => "electric",
            WeaponKind::Missile => "missile",
            WeaponKind::Laser => "laser",
        }
    }

    /// Damage dealt to a boss by one projectile of this kind
    pub fn damage(&self) -> f32 {
        match self {
            WeaponKind::Normal | WeaponKind::Electric => 1.0,
            WeaponKind::Fire | WeaponKind::Laser => 2.0,
            WeaponKind::Beam | WeaponKind::Missile => 3.0,
        }
    }

    /// Seconds between shots
    pub fn cooldown(&self) -> f32 {
        match self {
            WeaponKind::Normal => 0.25,
            WeaponKind::Fire => 0.4,
            WeaponKind::Beam => 0.6,
            WeaponKind::Electric => 0.3,
            WeaponKind::Missile => 0.5,
            WeaponKind::Laser => 0.15,
        }
    }

    /// Launch speed (pixels/s); beams do not travel
    pub fn speed(&self) -> f32 {
        match self {
            WeaponKind::Normal => 600.0,
            WeaponKind::Fire => 450.0,
            WeaponKind::Beam => 0.0,
            WeaponKind::Electric => 650.0,
            WeaponKind::Missile => 250.0,
            WeaponKind::Laser => 1100.0,
        }
    }

    /// Ammo granted by a weapon pickup
    pub fn pickup_ammo(&self) -> u32 {
        match self {
            WeaponKind::Normal => 40,
            WeaponKind::Fire => 25,
            WeaponKind::Beam => 10,
            WeaponKind::Electric => 30,
            WeaponKind::Missile => 12,
            WeaponKind::Laser => 35,
        }
    }
}

/// Remaining shots for the current weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ammo {
    /// Skin loadouts never run dry
    Infinite,
    Rounds(u32),
}

impl Ammo {
    /// Finite count, if any
    pub fn rounds(&self) -> Option<u32> {
        match self {
            Ammo::Infinite => None,
            Ammo::Rounds(n) => Some(*n),
        }
    }
}

/// A falling answer option
#[derive(Debug, Clone, Copy, Default)]
pub struct Enemy {
    pub pos: Vec2,
    /// Lane centre the motion modifiers sway around
    pub base_x: f32,
    pub wave_offset: f32,
    pub word: WordId,
    pub is_correct: bool,
    pub radius: f32,
    pub speed: f32,
    pub rotation: f32,
    /// False while blinked out (rendering hint only)
    pub visible: bool,
}

/// A player projectile
#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: WeaponKind,
    /// Remaining life in seconds (beams only)
    pub life: f32,
    /// Facing angle (radians)
    pub angle: f32,
    /// Set once the projectile has resolved its single damage event
    pub has_hit: bool,
    /// Top of the beam; frozen at the target's y after a hit
    pub beam_target_y: f32,
}

/// Cosmetic particle
#[derive(Debug, Clone, Copy, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alpha: f32,
    pub size: f32,
    pub decay: f32,
    pub color: u32,
}

/// Boss projectile
#[derive(Debug, Clone, Copy, Default)]
pub struct BossShot {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Falling hazard; touching it forces a miss
#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Lightning bolts are faster and drawn differently
    pub lightning: bool,
}

/// What a bonus grants on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    Points,
    ExtraLife,
    Bomb,
    Potion,
    Shield,
    Weapon(WeaponKind),
}

/// Falling bonus pickup
#[derive(Debug, Clone, Copy)]
pub struct Bonus {
    pub kind: BonusKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// The player's craft
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width / 2.0, height - PLAYER_FLOOR_OFFSET),
            radius: PLAYER_RADIUS,
        }
    }

    /// Keep the craft inside the viewport
    pub fn clamp_to(&mut self, width: f32, height: f32) {
        self.pos.x = self.pos.x.clamp(self.radius, (width - self.radius).max(self.radius));
        self.pos.y = self.pos.y.clamp(self.radius, (height - self.radius).max(self.radius));
    }
}

/// Progression and resources for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u64,
    pub combo: u32,
    pub level: u32,
    /// Correct-answer rounds within the zone (1..=9)
    pub sub_level: u8,
    pub lives: u8,
    /// Active shield strength (0..=2)
    pub shield_charges: u8,
    /// Shield activations in inventory
    pub shield_stock: u32,
    pub bomb_count: u32,
    pub potion_count: u32,
    pub weapon: WeaponKind,
    pub ammo: Ammo,
    pub is_transitioning: bool,
    pub is_player_exploding: bool,
}

/// Sub-level on which the zone boss appears
pub const BOSS_SUB_LEVEL: u8 = 9;

impl RunState {
    pub fn new(inventory: &StartingInventory, skin: Skin) -> Self {
        Self {
            score: 0,
            combo: 0,
            level: 1,
            sub_level: 1,
            lives: inventory.lives.min(MAX_LIVES),
            shield_charges: inventory.shield_charges.min(MAX_SHIELD_CHARGES),
            shield_stock: inventory.shields,
            bomb_count: inventory.bombs,
            potion_count: inventory.potions,
            weapon: skin.default_weapon(),
            ammo: Ammo::Infinite,
            is_transitioning: false,
            is_player_exploding: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_clamps_inventory() {
        let inventory = StartingInventory {
            lives: 9,
            shield_charges: 4,
            ..Default::default()
        };
        let run = RunState::new(&inventory, Skin::Inferno);
        assert_eq!(run.lives, MAX_LIVES);
        assert_eq!(run.shield_charges, MAX_SHIELD_CHARGES);
        assert_eq!(run.weapon, WeaponKind::Fire);
        assert_eq!(run.ammo, Ammo::Infinite);
        assert_eq!((run.level, run.sub_level), (1, 1));
    }

    #[test]
    fn test_player_clamp() {
        let mut player = Player::new(800.0, 600.0);
        player.pos = Vec2::new(-50.0, 900.0);
        player.clamp_to(800.0, 600.0);
        assert_eq!(player.pos, Vec2::new(PLAYER_RADIUS, 600.0 - PLAYER_RADIUS));
    }
}
