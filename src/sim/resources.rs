//! Abilities and consumables: firing, bombs, shields, potions, pickups

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;

use super::engine::Engine;
use super::scheduler::Deferred;
use super::state::{Ammo, BonusKind, Particle, Projectile, WeaponKind};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Electric shots fan out slightly
const ELECTRIC_SPREAD: f32 = 0.15;

impl Engine {
    /// Fire the current weapon. Returns false if nothing was fired.
    pub fn fire(&mut self) -> bool {
        if self.paused || self.game_over || self.run.is_player_exploding || self.fire_cooldown > 0.0
        {
            return false;
        }
        let kind = self.run.weapon;
        let origin = self.player.pos - Vec2::new(0.0, self.player.radius);

        let spawned = match kind {
            WeaponKind::Beam => self
                .projectiles
                .acquire(Projectile {
                    pos: self.player.pos,
                    vel: Vec2::ZERO,
                    kind,
                    life: BEAM_LIFE,
                    angle: -FRAC_PI_2,
                    has_hit: false,
                    beam_target_y: 0.0,
                })
                .is_some(),
            WeaponKind::Electric => {
                let mut any = false;
                for offset in [-ELECTRIC_SPREAD, 0.0, ELECTRIC_SPREAD] {
                    any |= self.launch(origin, kind, -FRAC_PI_2 + offset);
                }
                any
            }
            _ => self.launch(origin, kind, -FRAC_PI_2),
        };
        if !spawned {
            log::debug!("Projectile pool exhausted");
            return false;
        }

        self.fire_cooldown = kind.cooldown();
        self.consume_ammo();
        true
    }

    fn launch(&mut self, origin: Vec2, kind: WeaponKind, angle: f32) -> bool {
        self.projectiles
            .acquire(Projectile {
                pos: origin,
                vel: polar_to_cartesian(kind.speed(), angle),
                kind,
                life: 0.0,
                angle,
                has_hit: false,
                beam_target_y: 0.0,
            })
            .is_some()
    }

    fn consume_ammo(&mut self) {
        let Ammo::Rounds(n) = self.run.ammo else {
            return;
        };
        let left = n.saturating_sub(1);
        if left > 0 {
            self.run.ammo = Ammo::Rounds(left);
        } else {
            // Back to the skin's loadout
            self.run.weapon = self.config.equipped_skin.default_weapon();
            self.run.ammo = Ammo::Infinite;
            self.events.feedback("Out of ammo!", false);
        }
        self.emit_stats();
    }

    /// Swap to a pickup weapon with a fixed ammo allotment
    pub fn grant_weapon(&mut self, kind: WeaponKind) {
        self.run.weapon = kind;
        self.run.ammo = Ammo::Rounds(kind.pickup_ammo());
        self.fire_cooldown = 0.0;
        self.events.feedback("Weapon upgraded!", true);
        self.emit_stats();
    }

    /// Clear every enemy and boss shot. Returns false without a charge.
    pub fn use_bomb(&mut self) -> bool {
        if self.run.bomb_count == 0 || self.paused || self.game_over || self.run.is_player_exploding
        {
            return false;
        }
        self.run.bomb_count -= 1;

        let had_enemies = !self.enemies.is_empty();
        for i in 0..self.enemies.capacity() {
            if let Some(enemy) = self.enemies.get(i) {
                let pos = enemy.pos;
                self.burst(pos, 25, 0xFF9800, 320.0);
            }
        }
        self.enemies.clear();
        self.boss_shots.clear();
        self.shake(25.0);
        self.events.feedback("Boom!", true);
        self.emit_stats();

        // The answer went with the blast: deal a fresh round
        if had_enemies && self.boss.is_none() && !self.run.is_transitioning {
            self.run.is_transitioning = true;
            self.scheduler.schedule(RESTART_DELAY, Deferred::RestartRound);
        }
        true
    }

    /// Raise the shield to full strength. Does not stack.
    pub fn use_shield(&mut self) -> bool {
        if self.run.shield_stock == 0
            || self.run.shield_charges >= MAX_SHIELD_CHARGES
            || self.game_over
        {
            return false;
        }
        self.run.shield_stock -= 1;
        self.run.shield_charges = MAX_SHIELD_CHARGES;
        self.events.feedback("Shield up!", true);
        self.emit_stats();
        true
    }

    /// Slow every enemy for a while
    pub fn use_potion(&mut self) -> bool {
        if self.run.potion_count == 0 || self.game_over {
            return false;
        }
        self.run.potion_count -= 1;
        self.time_slow = POTION_DURATION;
        self.events.feedback("Time slowed!", true);
        self.emit_stats();
        true
    }

    /// Apply a caught bonus
    pub fn collect_bonus(&mut self, kind: BonusKind) {
        match kind {
            BonusKind::Points => {
                self.run.score += BONUS_POINTS;
                self.events.feedback("+500", true);
            }
            BonusKind::ExtraLife => {
                self.run.lives = (self.run.lives + 1).min(MAX_LIVES);
                self.events.feedback("Extra life!", true);
            }
            BonusKind::Bomb => {
                self.run.bomb_count += 1;
                self.events.feedback("Bomb +1", true);
            }
            BonusKind::Potion => {
                self.run.potion_count += 1;
                self.events.feedback("Potion +1", true);
            }
            BonusKind::Shield => {
                self.run.shield_stock += 1;
                self.events.feedback("Shield +1", true);
            }
            BonusKind::Weapon(weapon) => {
                self.grant_weapon(weapon);
                return;
            }
        }
        self.emit_stats();
    }

    /// Random bonus kind for a spawn
    pub(crate) fn roll_bonus(&mut self) -> BonusKind {
        match self.rng.random_range(0..10) {
            0..=2 => BonusKind::Points,
            3 => BonusKind::ExtraLife,
            4 => BonusKind::Bomb,
            5 => BonusKind::Potion,
            6 => BonusKind::Shield,
            _ => {
                let weapons = &WeaponKind::ALL[1..];
                BonusKind::Weapon(weapons[self.rng.random_range(0..weapons.len())])
            }
        }
    }

    /// Count down ability timers
    pub(crate) fn update_timers(&mut self, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.time_slow = (self.time_slow - dt).max(0.0);
    }

    /// Particle burst; pool exhaustion truncates it
    pub(crate) fn burst(&mut self, pos: Vec2, count: usize, color: u32, speed: f32) {
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..TAU);
            let particle = Particle {
                pos,
                vel: polar_to_cartesian(speed * self.rng.random_range(0.3..1.0), angle),
                alpha: 1.0,
                size: self.rng.random_range(2.0..5.0),
                decay: self.rng.random_range(1.2..2.4),
                color,
            };
            if self.particles.acquire(particle).is_none() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, Skin, StartingInventory};
    use crate::sim::test_engine;

    #[test]
    fn test_bomb_clears_enemies_and_boss_shots() {
        let mut e = test_engine();
        e.start_round();
        let bombs = e.run().bomb_count;
        assert!(e.use_bomb());
        assert_eq!(e.run().bomb_count, bombs - 1);
        assert!(e.enemies().is_empty());
        assert!(!e.particles().is_empty());
        assert!(e.scheduler.is_pending(Deferred::RestartRound));

        e.run.bomb_count = 0;
        assert!(!e.use_bomb());
    }

    #[test]
    fn test_shield_does_not_stack() {
        let mut e = test_engine();
        e.run.shield_stock = 2;
        assert!(e.use_shield());
        assert_eq!(e.run().shield_charges, MAX_SHIELD_CHARGES);
        assert_eq!(e.run().shield_stock, 1);
        // Already at full strength: charge kept
        assert!(!e.use_shield());
        assert_eq!(e.run().shield_stock, 1);
    }

    #[test]
    fn test_potion_slows_time() {
        let mut e = test_engine();
        e.run.potion_count = 1;
        assert!(e.use_potion());
        assert_eq!(e.time_scale(), POTION_SPEED_SCALE);
        e.update_timers(POTION_DURATION + 0.1);
        assert_eq!(e.time_scale(), 1.0);
        assert!(!e.use_potion());
    }

    #[test]
    fn test_ammo_depletes_to_skin_default() {
        let config = GameConfig {
            equipped_skin: Skin::Phantom,
            ..Default::default()
        };
        let mut e = Engine::new(800.0, 600.0, config, StartingInventory::default());
        e.grant_weapon(WeaponKind::Missile);
        let shots = WeaponKind::Missile.pickup_ammo();
        for _ in 0..shots {
            e.fire_cooldown = 0.0;
            e.projectiles.clear();
            assert!(e.fire());
        }
        assert_eq!(e.run().weapon, WeaponKind::Laser);
        assert_eq!(e.run().ammo, Ammo::Infinite);

        // Skin loadout never runs out
        for _ in 0..100 {
            e.fire_cooldown = 0.0;
            e.projectiles.clear();
            e.fire();
        }
        assert_eq!(e.run().ammo, Ammo::Infinite);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut e = test_engine();
        assert!(e.fire());
        assert!(!e.fire());
        e.update_timers(WeaponKind::Normal.cooldown());
        assert!(e.fire());
    }

    #[test]
    fn test_electric_fires_three() {
        let mut e = test_engine();
        e.run.weapon = WeaponKind::Electric;
        e.fire();
        assert_eq!(e.projectiles().len(), 3);
    }

    #[test]
    fn test_extra_life_caps_at_five() {
        let mut e = test_engine();
        for _ in 0..10 {
            e.collect_bonus(BonusKind::ExtraLife);
        }
        assert_eq!(e.run().lives, MAX_LIVES);
    }

    #[test]
    fn test_burst_truncates_at_capacity() {
        let mut e = test_engine();
        e.burst(Vec2::ZERO, MAX_PARTICLES + 200, 0xFFFFFF, 100.0);
        assert_eq!(e.particles().len(), MAX_PARTICLES);
    }
}
