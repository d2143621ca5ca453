//! Read-only snapshot of everything the renderer draws
//!
//! Borrowed from the engine for the duration of a frame; nothing here
//! allocates.

use glam::Vec2;

use super::boss::Boss;
use super::engine::Engine;
use super::state::{Bonus, BossShot, Hazard, Particle, Player, Projectile, RunState};
use super::zone::Modifier;

/// Drawable view of one falling answer option
#[derive(Debug, Clone, Copy)]
pub struct EnemyView<'a> {
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    /// Translation text painted on the enemy
    pub label: &'a str,
    pub visible: bool,
}

/// Frame snapshot handed to the presentation shell
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    engine: &'a Engine,
}

impl<'a> RenderView<'a> {
    pub(crate) fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.engine.viewport()
    }

    pub fn player(&self) -> &'a Player {
        &self.engine.player
    }

    /// False once the last life is gone and the craft is blowing up
    pub fn player_visible(&self) -> bool {
        !self.engine.run.is_player_exploding
    }

    pub fn enemies(&self) -> impl Iterator<Item = EnemyView<'a>> + 'a {
        let dictionary = &self.engine.dictionary;
        self.engine.enemies.iter().map(move |(_, e)| EnemyView {
            pos: e.pos,
            radius: e.radius,
            rotation: e.rotation,
            label: &dictionary.word(e.word).target,
            visible: e.visible,
        })
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &'a Projectile> + 'a {
        self.engine.projectiles.iter().map(|(_, p)| p)
    }

    pub fn particles(&self) -> impl Iterator<Item = &'a Particle> + 'a {
        self.engine.particles.iter().map(|(_, p)| p)
    }

    pub fn boss_shots(&self) -> impl Iterator<Item = &'a BossShot> + 'a {
        self.engine.boss_shots.iter().map(|(_, s)| s)
    }

    pub fn boss(&self) -> Option<&'a Boss> {
        self.engine.boss.as_ref()
    }

    pub fn hazards(&self) -> &'a [Hazard] {
        &self.engine.hazards
    }

    pub fn bonuses(&self) -> &'a [Bonus] {
        &self.engine.bonuses
    }

    pub fn run(&self) -> &'a RunState {
        &self.engine.run
    }

    /// Prompt word for the current round
    pub fn prompt(&self) -> Option<&'a str> {
        self.engine.current_word()
    }

    /// Shake amplitude in pixels; the renderer picks the jitter
    pub fn screen_shake(&self) -> f32 {
        self.engine.screen_shake
    }

    /// Radius of the lit circle around the player in dark zones
    pub fn visibility_radius(&self) -> Option<f32> {
        self.engine
            .round
            .and_then(|r| r.modifier)
            .and_then(Modifier::visibility_radius)
    }

    pub fn time_slowed(&self) -> bool {
        self.engine.time_slow > 0.0
    }

    pub fn is_paused(&self) -> bool {
        self.engine.paused
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::test_engine;

    #[test]
    fn test_view_labels_are_targets() {
        let mut e = test_engine();
        e.start_round();
        let view = e.draw();
        let labels: Vec<&str> = view.enemies().map(|en| en.label).collect();
        assert_eq!(labels.len(), e.enemies().len());
        for label in labels {
            assert!(e.dictionary().ids().any(|id| &*e.dictionary().word(id).target == label));
        }
        assert_eq!(view.prompt(), e.current_word());
        assert!(view.visibility_radius().is_none());
    }

    #[test]
    fn test_darkness_reports_visibility() {
        let mut e = test_engine();
        e.run.level = e.zones().get(6).threshold;
        e.start_round();
        assert_eq!(e.draw().visibility_radius(), Some(220.0));
    }
}
