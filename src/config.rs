//! Session configuration and presets
//!
//! Everything here is fixed for the lifetime of an engine instance. Per-round
//! zone data is resolved separately (see `sim::zone::RoundDescriptor`).

use serde::{Deserialize, Serialize};

use crate::consts::COMPACT_WIDTH;
use crate::dictionary::Word;
use crate::sim::state::WeaponKind;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Points for a correct hit before the combo multiplier
    pub fn base_score(&self) -> u64 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Medium => 200,
            Difficulty::Hard => 300,
        }
    }

    /// Answer options shown per round (before device cap and modifiers)
    pub fn option_count(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
        }
    }

    /// Enemy fall speed at level 1 (pixels/s)
    pub fn base_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 40.0,
            Difficulty::Medium => 55.0,
            Difficulty::Hard => 70.0,
        }
    }

    /// Boss hit point multiplier
    pub fn boss_hp_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.3,
        }
    }
}

/// Coarse device size class derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    Compact,
    Regular,
}

impl DeviceClass {
    pub fn from_width(width: f32) -> Self {
        if width < COMPACT_WIDTH {
            DeviceClass::Compact
        } else {
            DeviceClass::Regular
        }
    }

    /// Upper bound on answer options that fit across the screen
    pub fn option_cap(&self) -> usize {
        match self {
            DeviceClass::Compact => 4,
            DeviceClass::Regular => usize::MAX,
        }
    }

    /// Enemy fall speed factor
    pub fn speed_factor(&self) -> f32 {
        match self {
            DeviceClass::Compact => 0.85,
            DeviceClass::Regular => 1.0,
        }
    }

    /// Hit radius tolerance (fingers are less precise than mice)
    pub fn hit_tolerance(&self) -> f32 {
        match self {
            DeviceClass::Compact => 1.3,
            DeviceClass::Regular => 1.0,
        }
    }
}

/// Cosmetic craft skin; some skins ship with a non-standard default weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Skin {
    #[default]
    Classic,
    Inferno,
    Phantom,
    Thunder,
}

impl Skin {
    /// Weapon the craft falls back to when pickup ammo runs out
    pub fn default_weapon(&self) -> WeaponKind {
        match self {
            Skin::Classic => WeaponKind::Normal,
            Skin::Inferno => WeaponKind::Fire,
            Skin::Phantom => WeaponKind::Laser,
            Skin::Thunder => WeaponKind::Electric,
        }
    }
}

/// Session configuration supplied by the presentation shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Dictionary category; `None` uses every built-in word
    pub category: Option<String>,
    pub equipped_skin: Skin,
    /// Instructor-supplied word list; replaces the built-in dictionary when non-empty
    pub custom_dictionary: Option<Vec<Word>>,
    /// Run seed for reproducibility
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            category: None,
            equipped_skin: Skin::Classic,
            custom_dictionary: None,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Starting resource counts carried in from the shell's inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingInventory {
    pub lives: u8,
    pub shield_charges: u8,
    pub shields: u32,
    pub bombs: u32,
    pub potions: u32,
}

impl Default for StartingInventory {
    fn default() -> Self {
        Self {
            lives: 3,
            shield_charges: 0,
            shields: 1,
            bombs: 1,
            potions: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_device_class_threshold() {
        assert_eq!(DeviceClass::from_width(390.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_width(1280.0), DeviceClass::Regular);
    }

    #[test]
    fn test_partial_config_json() {
        let config = GameConfig::from_json(r#"{"difficulty":"hard","seed":7}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, 7);
        assert_eq!(config.equipped_skin, Skin::Classic);
        assert!(config.custom_dictionary.is_none());
    }
}
