//! Boss fights
//!
//! Dormant → Entering → Active → Defeated → (unit complete). Each archetype
//! maps to a fixed table of attack patterns; the hardest archetype fires
//! several patterns in the same volley.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::Serialize;

use super::engine::Engine;
use super::events::Achievement;
use super::pool::Pool;
use super::scheduler::Deferred;
use super::state::{BossShot, WeaponKind};
use crate::consts::*;
use crate::{normalize_angle, polar_to_cartesian};

/// Boss archetypes, in tier order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    Twin,
    Fan,
    Radial,
    Aimed,
    Spiral,
    Overlord,
}

/// One volley geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackPattern {
    /// Two parallel shots straight down
    TwinShot { gap: f32 },
    /// `count` shots spread over `arc` radians around straight down
    FanSpread { count: u32, arc: f32 },
    /// `count` shots evenly around the boss
    RadialBurst { count: u32 },
    /// `count` shots in a cone centred on the player
    AimedCone { count: u32, spread: f32 },
    /// Radial burst whose start angle advances by `step` every volley
    RotatingRadial { count: u32, step: f32 },
}

const TWIN: &[AttackPattern] = &[AttackPattern::TwinShot { gap: 30.0 }];
const FAN: &[AttackPattern] = &[AttackPattern::FanSpread { count: 5, arc: 1.4 }];
const RADIAL: &[AttackPattern] = &[AttackPattern::RadialBurst { count: 12 }];
const AIMED: &[AttackPattern] = &[AttackPattern::AimedCone { count: 3, spread: 0.35 }];
const SPIRAL: &[AttackPattern] = &[AttackPattern::RotatingRadial { count: 8, step: 0.35 }];
const OVERLORD: &[AttackPattern] = &[
    AttackPattern::FanSpread { count: 5, arc: 1.4 },
    AttackPattern::AimedCone { count: 3, spread: 0.35 },
    AttackPattern::RotatingRadial { count: 10, step: 0.3 },
];

impl BossKind {
    pub const ALL: [BossKind; 6] = [
        BossKind::Twin,
        BossKind::Fan,
        BossKind::Radial,
        BossKind::Aimed,
        BossKind::Spiral,
        BossKind::Overlord,
    ];

    /// Archetype for a progression (zone) index
    pub fn from_progression(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossKind::Twin => "Twin Sentinel",
            BossKind::Fan => "Fan Warden",
            BossKind::Radial => "Nova Core",
            BossKind::Aimed => "Hunter",
            BossKind::Spiral => "Spiral Engine",
            BossKind::Overlord => "Overlord",
        }
    }

    pub fn patterns(&self) -> &'static [AttackPattern] {
        match self {
            BossKind::Twin => TWIN,
            BossKind::Fan => FAN,
            BossKind::Radial => RADIAL,
            BossKind::Aimed => AIMED,
            BossKind::Spiral => SPIRAL,
            BossKind::Overlord => OVERLORD,
        }
    }

    /// Shots in one volley
    pub fn volley_size(&self) -> usize {
        self.patterns().iter().map(AttackPattern::shot_count).sum()
    }
}

impl AttackPattern {
    pub fn shot_count(&self) -> usize {
        match *self {
            AttackPattern::TwinShot { .. } => 2,
            AttackPattern::FanSpread { count, .. }
            | AttackPattern::RadialBurst { count }
            | AttackPattern::AimedCone { count, .. }
            | AttackPattern::RotatingRadial { count, .. } => count as usize,
        }
    }

    /// Spawn this pattern's shots; pool exhaustion truncates the volley
    pub fn fire(&self, origin: Vec2, player: Vec2, phase: f32, shots: &mut Pool<BossShot>) {
        let mut emit = |pos: Vec2, angle: f32| {
            shots
                .acquire(BossShot {
                    pos,
                    vel: polar_to_cartesian(BOSS_SHOT_SPEED, angle),
                })
                .is_some()
        };

        match *self {
            AttackPattern::TwinShot { gap } => {
                emit(origin - Vec2::new(gap, 0.0), FRAC_PI_2);
                emit(origin + Vec2::new(gap, 0.0), FRAC_PI_2);
            }
            AttackPattern::FanSpread { count, arc } => {
                for i in 0..count {
                    let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.5 };
                    if !emit(origin, FRAC_PI_2 - arc / 2.0 + arc * t) {
                        break;
                    }
                }
            }
            AttackPattern::RadialBurst { count } => {
                for i in 0..count {
                    if !emit(origin, TAU * i as f32 / count as f32) {
                        break;
                    }
                }
            }
            AttackPattern::AimedCone { count, spread } => {
                let to_player = player - origin;
                let aim = to_player.y.atan2(to_player.x);
                for i in 0..count {
                    let t = if count > 1 { i as f32 / (count - 1) as f32 - 0.5 } else { 0.0 };
                    if !emit(origin, aim + spread * t) {
                        break;
                    }
                }
            }
            AttackPattern::RotatingRadial { count, .. } => {
                for i in 0..count {
                    if !emit(origin, phase + TAU * i as f32 / count as f32) {
                        break;
                    }
                }
            }
        }
    }

    /// How far this pattern rotates the shared phase per volley
    fn phase_step(&self) -> f32 {
        match *self {
            AttackPattern::RotatingRadial { step, .. } => step,
            _ => 0.0,
        }
    }
}

/// The singleton boss of a fight
#[derive(Debug, Clone, Serialize)]
pub struct Boss {
    pub kind: BossKind,
    pub pos: Vec2,
    pub target_y: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub attack_timer: f32,
    /// Seconds between volleys
    pub attack_rate: f32,
    pub entry_complete: bool,
    /// Rotation of rotating patterns
    pub pattern_phase: f32,
    /// Seconds since spawn
    pub age: f32,
}

impl Boss {
    pub fn new(kind: BossKind, zone_index: usize, hp_scale: f32, width: f32) -> Self {
        let hp = (30.0 + 12.0 * zone_index as f32) * hp_scale;
        Self {
            kind,
            pos: Vec2::new(width / 2.0, -BOSS_RADIUS * 2.0),
            target_y: BOSS_TARGET_Y,
            hp,
            max_hp: hp,
            attack_timer: 0.0,
            attack_rate: (2.2 - 0.15 * zone_index as f32).max(0.8),
            entry_complete: false,
            pattern_phase: 0.0,
            age: 0.0,
        }
    }

    /// Remaining health, 0-100
    pub fn hp_percent(&self) -> u8 {
        if self.max_hp <= 0.0 {
            return 0;
        }
        ((self.hp / self.max_hp).clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Fire every pattern of this archetype together
    pub fn fire_volley(&mut self, player: Vec2, shots: &mut Pool<BossShot>) {
        let mut step = 0.0;
        for pattern in self.kind.patterns() {
            pattern.fire(self.pos, player, self.pattern_phase, shots);
            step += pattern.phase_step();
        }
        self.pattern_phase = normalize_angle(self.pattern_phase + step);
    }
}

impl Engine {
    /// Spawn the zone boss (no-op while one exists)
    pub fn start_boss_fight(&mut self) {
        if self.boss.is_some() || self.game_over {
            return;
        }
        let zone_index = self.zones.index_for_level(self.run.level);
        let kind = BossKind::from_progression(zone_index);
        let boss = Boss::new(kind, zone_index, self.config.difficulty.boss_hp_scale(), self.width);
        log::info!("Boss fight: {} (hp {})", kind.name(), boss.max_hp);

        self.boss = Some(boss);
        self.boss_damage_taken = false;
        self.enemies.clear();
        self.hazards.clear();
        self.bonuses.clear();
        self.boss_shots.clear();
        self.current_word = None;
        self.run.is_transitioning = false;
        // Nothing queued for the regular round may fire during the fight
        self.scheduler.invalidate_rounds();

        self.events.feedback("Boss incoming!", false);
        self.emit_stats();
    }

    /// Apply one projectile's damage to the boss
    pub fn damage_boss(&mut self, kind: WeaponKind) {
        self.apply_boss_damage(kind.damage());
    }

    pub(crate) fn apply_boss_damage(&mut self, amount: f32) {
        if self.run.is_player_exploding || self.game_over {
            return;
        }
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        boss.hp -= amount;
        let (pos, dead) = (boss.pos, boss.hp <= 0.0);
        self.burst(pos, 6, 0xFFD54F, 160.0);
        self.emit_stats();
        if dead {
            self.end_boss_fight();
        }
    }

    /// Defeat sequence. Safe to call with no boss present; inert once the
    /// player is exploding or the game is over.
    pub fn end_boss_fight(&mut self) {
        if self.run.is_player_exploding || self.game_over {
            return;
        }
        let Some(boss) = self.boss.take() else {
            return;
        };
        log::info!(
            "Boss {} defeated (flawless: {})",
            boss.kind.name(),
            !self.boss_damage_taken
        );

        self.run.score += BOSS_DEFEAT_BONUS;
        self.run.is_transitioning = true;
        self.boss_shots.clear();
        self.burst(boss.pos, 150, 0xFFC107, 420.0);
        self.shake(20.0);

        self.events.feedback("Boss defeated!", true);
        self.events.achievement(Achievement::BossSlayer);
        if !self.boss_damage_taken {
            self.events.achievement(Achievement::FlawlessBoss);
        }
        self.emit_stats();
        self.awaiting_next_unit = true;
        self.scheduler.schedule(UNIT_COMPLETE_DELAY, Deferred::UnitComplete);
    }

    /// Continue after the unit-complete screen: jump to the next zone.
    ///
    /// Ignored unless a boss was just defeated.
    pub fn next_unit(&mut self) {
        if self.game_over || self.cancelled || !self.awaiting_next_unit {
            return;
        }
        self.awaiting_next_unit = false;
        let next = self.zones.next_threshold(self.run.level);
        log::info!("Next unit: level {} -> {}", self.run.level, next);

        self.run.level = next;
        self.run.sub_level = 1;
        self.run.is_transitioning = false;
        self.boss = None;
        self.enemies.clear();
        self.hazards.clear();
        self.boss_shots.clear();
        self.scheduler.invalidate_rounds();
        // A celebration still counting down belongs to the finished unit
        self.scheduler.invalidate_unit();
        self.emit_stats();
        self.start_round();
    }

    /// Entry glide, oscillation, and volleys
    pub(crate) fn update_boss(&mut self, dt: f32) {
        let time_scale = self.time_scale();
        let (width, player) = (self.width, self.player.pos);
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        boss.age += dt;

        if !boss.entry_complete {
            boss.pos.y += (boss.target_y - boss.pos.y) * (3.0 * dt).min(1.0);
            if (boss.target_y - boss.pos.y).abs() < 1.0 {
                boss.pos.y = boss.target_y;
                boss.entry_complete = true;
            }
            return;
        }

        boss.pos.x = width / 2.0 + (boss.age * 0.8).sin() * width * 0.3;
        boss.attack_timer += dt * time_scale;
        if boss.attack_timer >= boss.attack_rate {
            boss.attack_timer = 0.0;
            boss.fire_volley(player, &mut self.boss_shots);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameEvent;
    use crate::sim::test_engine;

    #[test]
    fn test_kind_from_progression_wraps() {
        assert_eq!(BossKind::from_progression(0), BossKind::Twin);
        assert_eq!(BossKind::from_progression(5), BossKind::Overlord);
        assert_eq!(BossKind::from_progression(6), BossKind::Twin);
    }

    #[test]
    fn test_volley_sizes() {
        let mut shots: Pool<BossShot> = Pool::new(MAX_BOSS_SHOTS);
        for kind in BossKind::ALL {
            shots.clear();
            let mut boss = Boss::new(kind, 0, 1.0, 800.0);
            boss.fire_volley(Vec2::new(400.0, 500.0), &mut shots);
            assert_eq!(shots.len(), kind.volley_size(), "{:?}", kind);
        }
        assert_eq!(BossKind::Overlord.volley_size(), 18);
    }

    #[test]
    fn test_aimed_cone_points_at_player() {
        let mut shots: Pool<BossShot> = Pool::new(8);
        AttackPattern::AimedCone { count: 1, spread: 0.0 }.fire(
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 400.0),
            0.0,
            &mut shots,
        );
        let (_, shot) = shots.iter().next().unwrap();
        assert!(shot.vel.x.abs() < 1e-3);
        assert!(shot.vel.y > 0.0);
    }

    #[test]
    fn test_rotating_pattern_advances_phase() {
        let mut shots: Pool<BossShot> = Pool::new(64);
        let mut boss = Boss::new(BossKind::Spiral, 4, 1.0, 800.0);
        boss.fire_volley(Vec2::ZERO, &mut shots);
        assert!((boss.pattern_phase - 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_volley_truncates_on_full_pool() {
        let mut shots: Pool<BossShot> = Pool::new(5);
        let mut boss = Boss::new(BossKind::Radial, 2, 1.0, 800.0);
        boss.fire_volley(Vec2::ZERO, &mut shots);
        assert_eq!(shots.len(), 5);
    }

    #[test]
    fn test_boss_entry_then_attacks() {
        let mut e = test_engine();
        e.start_boss_fight();
        assert!(e.boss().is_some());
        for _ in 0..(120 * 6) {
            e.update_boss(SIM_DT);
        }
        let boss = e.boss().unwrap();
        assert!(boss.entry_complete);
        assert_eq!(boss.pos.y, BOSS_TARGET_Y);
        assert!(!e.boss_shots().is_empty());
    }

    #[test]
    fn test_damage_boss_reports_percent_and_defeats_once() {
        let mut e = test_engine();
        e.start_boss_fight();
        let max = e.boss().unwrap().max_hp;
        e.drain_events().for_each(drop);

        e.damage_boss(WeaponKind::Missile);
        let pct = e.stats().boss_hp_percent.unwrap();
        assert_eq!(pct, ((max - 3.0) / max * 100.0).round() as u8);

        let score_before = e.run().score;
        e.apply_boss_damage(max);
        assert!(e.boss().is_none());
        assert_eq!(e.run().score, score_before + BOSS_DEFEAT_BONUS);

        // Second defeat attempt with no boss: nothing changes
        e.end_boss_fight();
        e.damage_boss(WeaponKind::Beam);
        assert_eq!(e.run().score, score_before + BOSS_DEFEAT_BONUS);

        for _ in 0..(120 * 3) {
            e.step(SIM_DT);
        }
        let events: Vec<GameEvent> = e.drain_events().collect();
        let completes = events
            .iter()
            .filter(|ev| matches!(ev, GameEvent::UnitComplete(_)))
            .count();
        assert_eq!(completes, 1);
        assert!(events.contains(&GameEvent::Achievement { id: "flawless_boss" }));
        assert!(e.run().is_transitioning);
    }

    #[test]
    fn test_miss_during_boss_blocks_flawless() {
        let mut e = test_engine();
        e.run.shield_charges = 2;
        e.start_boss_fight();
        e.handle_miss();
        assert!(e.boss().is_some());
        e.end_boss_fight();
        let events: Vec<GameEvent> = e.drain_events().collect();
        assert!(!events.contains(&GameEvent::Achievement { id: "flawless_boss" }));
        assert!(events.contains(&GameEvent::Achievement { id: "boss_slayer" }));
    }

    #[test]
    fn test_next_unit_jumps_to_next_zone() {
        let mut e = test_engine();
        e.run.level = 8;
        e.run.sub_level = 9;
        e.start_round();
        e.end_boss_fight();
        assert!(e.run().is_transitioning);
        e.next_unit();
        assert_eq!(e.run().level, 15);
        assert_eq!(e.run().sub_level, 1);
        assert!(!e.run().is_transitioning);
        assert!(!e.enemies().is_empty());
    }

    #[test]
    fn test_next_unit_ignored_mid_round() {
        let mut e = test_engine();
        e.start_round();
        e.run.sub_level = 3;
        e.next_unit();
        assert_eq!((e.run().level, e.run().sub_level), (1, 3));
        assert!(!e.enemies().is_empty());
    }

    #[test]
    fn test_early_next_unit_drops_pending_unit_complete() {
        let mut e = test_engine();
        e.run.level = 8;
        e.start_boss_fight();
        let max = e.boss().unwrap().max_hp;
        e.apply_boss_damage(max);
        // Shell continues before the celebration delay runs out
        e.next_unit();
        assert_eq!(e.run().level, 15);
        e.drain_events().for_each(drop);

        for _ in 0..(120 * 3) {
            e.step(SIM_DT);
        }
        let completes = e
            .drain_events()
            .filter(|ev| matches!(ev, GameEvent::UnitComplete(_)))
            .count();
        assert_eq!(completes, 0);
        assert_eq!(e.run().level, 15);
    }

    #[test]
    fn test_boss_cannot_die_after_last_life() {
        let mut e = test_engine();
        e.run.lives = 1;
        e.start_boss_fight();
        e.handle_miss();
        assert!(e.run().is_player_exploding);

        // A shot already in flight reaches the boss during the explosion
        let boss_pos = e.boss().unwrap().pos;
        e.projectiles
            .acquire(crate::sim::state::Projectile {
                pos: boss_pos,
                kind: WeaponKind::Laser,
                ..Default::default()
            })
            .unwrap();
        let max = e.boss().unwrap().max_hp;
        e.apply_boss_damage(max);
        e.end_boss_fight();
        assert!(e.boss().is_some());
        assert_eq!(e.run().score, 0);

        for _ in 0..(120 * 4) {
            e.step(SIM_DT);
        }
        let events: Vec<GameEvent> = e.drain_events().collect();
        assert!(events.iter().any(|ev| matches!(ev, GameEvent::GameOver { .. })));
        assert!(!events.contains(&GameEvent::Achievement { id: "boss_slayer" }));
        assert!(!events.iter().any(|ev| matches!(ev, GameEvent::UnitComplete(_))));
        assert_eq!(e.run().score, 0);
    }
}
