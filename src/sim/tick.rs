//! Fixed timestep simulation step
//!
//! Advances scheduler, enemies, projectiles, boss, hazards, bonuses and
//! particles once, in that order.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, projectile_hits, steer_missile};
use super::engine::Engine;
use super::state::{Bonus, Hazard, WeaponKind};
use super::zone::Modifier;
use crate::consts::*;

impl Engine {
    /// Advance the simulation by one fixed step
    pub fn step(&mut self, dt: f32) {
        if self.cancelled {
            return;
        }
        self.time += dt;

        // Decay screen shake
        self.screen_shake *= 0.9;
        if self.screen_shake < 0.01 {
            self.screen_shake = 0.0;
        }

        // Deferred transitions first so a due restart plays this step
        let mut due = std::mem::take(&mut self.due);
        self.scheduler.advance(dt, &mut due);
        for action in due.drain(..) {
            self.apply_deferred(action);
        }
        self.due = due;

        self.update_particles(dt);
        if self.game_over {
            return;
        }

        self.update_timers(dt);
        self.update_enemies(dt);
        self.update_projectiles(dt);
        self.update_boss(dt);
        self.update_boss_shots(dt);
        self.update_hazards(dt);
        self.update_bonuses(dt);
        self.recover_idle();
    }

    /// Fall, per-modifier lateral motion, floor and contact checks
    fn update_enemies(&mut self, dt: f32) {
        if self.enemies.is_empty() {
            return;
        }
        let Some(round) = self.round else {
            return;
        };
        self.round_time += dt;

        let time_scale = self.time_scale();
        let accel = if round.has(Modifier::accelerates) {
            1.0 + 0.25 * self.round_time
        } else {
            1.0
        };
        let t = self.round_time;
        let (width, height) = (self.width, self.height);
        let player = self.player;
        let floor = player.pos.y + player.radius;

        let mut missed = false;
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.pos.y += enemy.speed * accel * time_scale * dt;

            match round.modifier {
                Some(m) if m.sways() => {
                    enemy.pos.x = enemy.base_x + (enemy.wave_offset + t * 2.0).sin() * 40.0;
                }
                Some(m) if m.jitters() => {
                    enemy.base_x += self.rng.random_range(-1.0..1.0) * 90.0 * dt;
                    enemy.base_x = enemy.base_x.clamp(enemy.radius, width - enemy.radius);
                    enemy.pos.x = enemy.base_x;
                }
                Some(m) if m.orbits() => {
                    enemy.rotation += 1.5 * dt * time_scale;
                    enemy.pos.x = enemy.base_x + (enemy.rotation + enemy.wave_offset).cos() * 30.0;
                }
                Some(m) if m.drifts() => {
                    enemy.base_x += 35.0 * dt * time_scale;
                    if enemy.base_x > width + enemy.radius {
                        enemy.base_x = -enemy.radius;
                    }
                    enemy.pos.x = enemy.base_x;
                }
                _ => {
                    enemy.pos.x = enemy.base_x;
                }
            }
            if !round.has(Modifier::orbits) {
                enemy.rotation += 0.5 * dt;
            }

            enemy.visible = !round.has(Modifier::blinks)
                || ((t + enemy.wave_offset) * 2.0).floor().rem_euclid(2.0) < 1.0;

            // The right answer got away
            if enemy.is_correct && enemy.pos.y - enemy.radius > floor {
                missed = true;
            }
            if circles_overlap(enemy.pos, enemy.radius * 0.8, player.pos, player.radius) {
                missed = true;
            }
        }
        // Distractors past the bottom leave quietly
        self.enemies.retain(|e| e.pos.y - e.radius <= height);

        if missed {
            self.handle_miss();
        }
    }

    /// Movement, steering, and hit resolution for player projectiles
    fn update_projectiles(&mut self, dt: f32) {
        if self.projectiles.is_empty() {
            return;
        }
        let wind = self
            .round
            .and_then(|r| r.modifier)
            .map_or(0.0, Modifier::wind);
        let tolerance = self
            .round
            .map_or_else(|| self.device.hit_tolerance(), |r| r.hit_tolerance);
        let (width, height) = (self.width, self.height);
        let anchor = self.player.pos;

        // Missiles chase the boss when present, else the right answer
        let homing_target = match &self.boss {
            Some(boss) => Some(boss.pos),
            None => self
                .enemies
                .iter()
                .filter(|(_, e)| e.is_correct)
                .map(|(_, e)| e.pos)
                .next(),
        };

        let mut enemy_hit: Option<(usize, bool, Vec2)> = None;
        let mut boss_damage = 0.0;

        for (_, p) in self.projectiles.iter_mut() {
            match p.kind {
                WeaponKind::Beam => {
                    p.pos = anchor;
                    p.life -= dt;
                }
                WeaponKind::Missile => {
                    steer_missile(p, homing_target, dt);
                    p.pos += p.vel * dt;
                }
                _ => {
                    p.vel.x += wind * dt;
                    p.pos += p.vel * dt;
                }
            }
            if p.has_hit {
                continue;
            }

            if enemy_hit.is_none() {
                for (id, enemy) in self.enemies.iter() {
                    if projectile_hits(p, enemy.pos, enemy.radius, tolerance, width) {
                        p.has_hit = true;
                        if p.kind == WeaponKind::Beam {
                            p.beam_target_y = enemy.pos.y;
                            p.life = BEAM_HIT_LINGER;
                        }
                        enemy_hit = Some((id, enemy.is_correct, enemy.pos));
                        break;
                    }
                }
            }

            if let Some(boss) = &self.boss {
                if !p.has_hit && projectile_hits(p, boss.pos, BOSS_RADIUS, 1.0, width) {
                    p.has_hit = true;
                    if p.kind == WeaponKind::Beam {
                        p.beam_target_y = boss.pos.y;
                        p.life = BEAM_HIT_LINGER;
                    }
                    boss_damage += p.kind.damage();
                }
            }
        }

        self.projectiles.retain(|p| {
            if p.kind == WeaponKind::Beam {
                return p.life > 0.0;
            }
            !p.has_hit
                && p.pos.y > -PROJECTILE_MARGIN
                && p.pos.y < height + PROJECTILE_MARGIN
                && p.pos.x > -PROJECTILE_MARGIN
                && p.pos.x < width + PROJECTILE_MARGIN
        });

        if let Some((id, is_correct, pos)) = enemy_hit {
            self.enemies.release(id);
            self.handle_hit(is_correct, pos);
        }
        if boss_damage > 0.0 {
            self.apply_boss_damage(boss_damage);
        }
    }

    fn update_boss_shots(&mut self, dt: f32) {
        if self.boss_shots.is_empty() {
            return;
        }
        let scale = self.time_scale();
        let (width, height) = (self.width, self.height);
        let player = self.player;
        let mut struck = false;

        self.boss_shots.retain(|shot| {
            shot.pos += shot.vel * dt * scale;
            if circles_overlap(shot.pos, BOSS_SHOT_RADIUS, player.pos, player.radius) {
                struck = true;
                return false;
            }
            shot.pos.y > -PROJECTILE_MARGIN
                && shot.pos.y < height + PROJECTILE_MARGIN
                && shot.pos.x > -PROJECTILE_MARGIN
                && shot.pos.x < width + PROJECTILE_MARGIN
        });

        if struck {
            self.handle_miss();
        }
    }

    /// Environmental hazards for hazard/storm/final zones
    fn update_hazards(&mut self, dt: f32) {
        let spawning = !self.enemies.is_empty()
            && self.boss.is_none()
            && !self.run.is_transitioning
            && self
                .round
                .is_some_and(|r| r.has(Modifier::spawns_hazards));

        if spawning {
            self.hazard_timer -= dt;
            if self.hazard_timer <= 0.0 {
                self.hazard_timer = HAZARD_INTERVAL;
                let lightning = self.round.is_some_and(|r| r.modifier == Some(Modifier::Storm));
                let x = self.rng.random_range(HAZARD_RADIUS..(self.width - HAZARD_RADIUS).max(HAZARD_RADIUS + 1.0));
                let speed = if lightning { 420.0 } else { 160.0 };
                self.hazards.push(Hazard {
                    pos: Vec2::new(x, -HAZARD_RADIUS),
                    vel: Vec2::new(0.0, speed),
                    lightning,
                });
            }
        }

        if self.hazards.is_empty() {
            return;
        }
        let scale = self.time_scale();
        let height = self.height;
        let player = self.player;
        let mut struck = false;
        self.hazards.retain_mut(|h| {
            h.pos += h.vel * dt * scale;
            if circles_overlap(h.pos, HAZARD_RADIUS, player.pos, player.radius) {
                struck = true;
                return false;
            }
            h.pos.y - HAZARD_RADIUS <= height
        });
        if struck {
            self.handle_miss();
        }
    }

    /// Occasional falling bonuses during regular rounds
    fn update_bonuses(&mut self, dt: f32) {
        if !self.enemies.is_empty() && self.boss.is_none() && !self.run.is_transitioning {
            self.bonus_timer -= dt;
            if self.bonus_timer <= 0.0 {
                self.bonus_timer = self.rng.random_range(8.0..14.0);
                let kind = self.roll_bonus();
                let x = self.rng.random_range(BONUS_RADIUS..(self.width - BONUS_RADIUS).max(BONUS_RADIUS + 1.0));
                self.bonuses.push(Bonus {
                    kind,
                    pos: Vec2::new(x, -BONUS_RADIUS),
                    vel: Vec2::new(0.0, 120.0),
                });
            }
        }

        if self.bonuses.is_empty() {
            return;
        }
        let height = self.height;
        let player = self.player;
        let mut caught = None;
        self.bonuses.retain_mut(|b| {
            b.pos += b.vel * dt;
            if caught.is_none() && circles_overlap(b.pos, BONUS_RADIUS, player.pos, player.radius) {
                caught = Some(b.kind);
                return false;
            }
            b.pos.y - BONUS_RADIUS <= height
        });
        if let Some(kind) = caught {
            self.collect_bonus(kind);
        }
    }

    fn update_particles(&mut self, dt: f32) {
        self.particles.retain(|p| {
            p.pos += p.vel * dt;
            p.vel *= 0.98;
            p.alpha -= p.decay * dt;
            p.alpha > 0.0
        });
    }

    /// Deal a round when the field is empty and nothing else will.
    ///
    /// Only acts when no round transition is pending, so it can never race
    /// a scheduled restart.
    fn recover_idle(&mut self) {
        if self.run.is_transitioning
            || self.run.is_player_exploding
            || self.boss.is_some()
            || !self.enemies.is_empty()
            || self.scheduler.has_pending_round_transition()
        {
            return;
        }
        self.start_round();
    }
}
