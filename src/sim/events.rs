//! Outbound events consumed by the presentation shell

use std::sync::Arc;

use serde::Serialize;

use super::state::WeaponKind;

/// Achievement unlocks reported to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Reached a 10x combo
    Combo10,
    /// Defeated any boss
    BossSlayer,
    /// Defeated a boss without taking damage
    FlawlessBoss,
}

impl Achievement {
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::Combo10 => "combo_10",
            Achievement::BossSlayer => "boss_slayer",
            Achievement::FlawlessBoss => "flawless_boss",
        }
    }
}

/// HUD-facing stats snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub level: u32,
    pub sub_level: u8,
    pub shield_charges: u8,
    pub bombs: u32,
    pub potions: u32,
    /// Boss health, 0-100, while a boss is present
    pub boss_hp_percent: Option<u8>,
    pub weapon: WeaponKind,
    /// `None` for infinite ammo
    pub ammo: Option<u32>,
    /// Prompt word of the current round
    pub word: Option<Arc<str>>,
}

/// Carried by `GameEvent::UnitComplete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    pub score: u64,
    pub combo: u32,
    pub level: u32,
}

/// Something the shell should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Stats(StatsSnapshot),
    Feedback { message: &'static str, positive: bool },
    Achievement { id: &'static str },
    UnitComplete(UnitSnapshot),
    GameOver { final_score: u64 },
}

/// Events produced during `update`, drained by the host each frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn feedback(&mut self, message: &'static str, positive: bool) {
        self.push(GameEvent::Feedback { message, positive });
    }

    pub fn achievement(&mut self, achievement: Achievement) {
        self.push(GameEvent::Achievement {
            id: achievement.id(),
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}
