//! Round controller: spawning answer options, resolving hits and misses
//!
//! Idle → Spawning → Combat → {Correct | Incorrect} → Transition → next round
//! (or the boss on sub-level 9). Every restart goes through the scheduler.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::engine::Engine;
use super::events::Achievement;
use super::scheduler::Deferred;
use super::state::{BOSS_SUB_LEVEL, Enemy, WeaponKind};
use super::zone::RoundDescriptor;
use crate::consts::*;
use crate::dictionary::WordId;

impl Engine {
    /// Begin a round. No-op while enemies are on the field, a boss exists,
    /// or the player is exploding. On sub-level 9 the boss spawns instead.
    pub fn start_round(&mut self) {
        if self.game_over || self.cancelled {
            return;
        }
        if !self.enemies.is_empty() || self.boss.is_some() || self.run.is_player_exploding {
            return;
        }
        if self.run.sub_level >= BOSS_SUB_LEVEL {
            self.start_boss_fight();
            return;
        }

        let round = RoundDescriptor::resolve(
            &self.zones,
            self.run.level,
            self.config.difficulty,
            self.device,
        );
        let Some(correct) = self.deck.next(&mut self.rng) else {
            return;
        };
        self.assemble_options(correct, round.option_count);
        self.options.shuffle(&mut self.rng);

        let lanes = self.options.len();
        let spacing = self.width / (lanes + 1) as f32;
        for i in 0..lanes {
            let word = self.options[i];
            let x = spacing * (i + 1) as f32;
            let enemy = Enemy {
                pos: Vec2::new(x, ENEMY_SPAWN_Y - self.rng.random_range(0.0..60.0)),
                base_x: x,
                wave_offset: self.rng.random_range(0.0..TAU),
                word,
                is_correct: word == correct,
                radius: round.radius,
                speed: round.speed * self.rng.random_range(0.9..1.1),
                rotation: 0.0,
                visible: true,
            };
            if self.enemies.acquire(enemy).is_none() {
                log::debug!("Enemy pool exhausted, option {} skipped", i);
                break;
            }
        }
        debug_assert_eq!(
            self.enemies.count(|e| e.is_correct),
            1,
            "a populated round must carry exactly one correct answer"
        );

        self.round = Some(round);
        self.current_word = Some(correct);
        self.round_time = 0.0;
        self.hazard_timer = HAZARD_INTERVAL;
        self.run.is_transitioning = false;

        log::info!(
            "Round {}-{}: '{}' with {} options",
            self.run.level,
            self.run.sub_level,
            self.dictionary.word(correct).source,
            lanes
        );
        self.emit_stats();
    }

    /// Fill `options` with the correct word plus distinct distractors
    ///
    /// Distractors are drawn without replacement and never share target
    /// text with any option already chosen.
    fn assemble_options(&mut self, correct: WordId, count: usize) {
        self.options.clear();
        self.options.push(correct);

        self.scratch.clear();
        self.scratch.extend(self.dictionary.ids());
        self.scratch.shuffle(&mut self.rng);

        for &candidate in &self.scratch {
            if self.options.len() >= count {
                break;
            }
            let target = &self.dictionary.word(candidate).target;
            let duplicate = self
                .options
                .iter()
                .any(|&o| self.dictionary.word(o).target == *target);
            if !duplicate {
                self.options.push(candidate);
            }
        }
    }

    /// Resolve a shot that struck an answer option
    pub fn handle_hit(&mut self, is_correct: bool, pos: Vec2) {
        if self.run.is_transitioning || self.run.is_player_exploding || self.game_over {
            return;
        }
        if !is_correct {
            self.shake(10.0);
            self.burst(pos, 20, 0xE53935, 220.0);
            self.handle_miss();
            return;
        }

        self.run.is_transitioning = true;
        self.run.score += self.config.difficulty.base_score() * u64::from(self.run.combo + 1);
        self.run.combo += 1;
        if self.run.combo >= COMBO_ACHIEVEMENT && !self.combo_unlocked {
            self.combo_unlocked = true;
            self.events.achievement(Achievement::Combo10);
        }

        self.burst(pos, 30, 0x66BB6A, 260.0);
        self.clear_field();
        self.emit_stats();
        self.scheduler.schedule(ADVANCE_DELAY, Deferred::AdvanceRound);
    }

    /// Wrong answer, answer lost, or player struck
    pub fn handle_miss(&mut self) {
        if self.run.is_player_exploding || self.game_over {
            return;
        }
        let in_boss_fight = self.boss.is_some();
        if in_boss_fight {
            self.boss_damage_taken = true;
        }

        self.clear_field();
        self.boss_shots.clear();
        // Beams finish their persistence window
        self.projectiles.retain(|p| p.kind == WeaponKind::Beam);

        if self.run.shield_charges > 0 {
            self.run.shield_charges -= 1;
            self.shake(6.0);
            let message = if self.run.shield_charges == 0 {
                "Shield broken!"
            } else {
                "Shield cracked!"
            };
            self.events.feedback(message, false);
            self.emit_stats();
            if !in_boss_fight {
                self.schedule_restart();
            }
            return;
        }

        self.run.lives = self.run.lives.saturating_sub(1);
        self.run.combo = 0;
        self.shake(15.0);
        let player = self.player.pos;
        self.burst(player, 40, 0xFF7043, 300.0);
        self.emit_stats();

        if self.run.lives == 0 {
            log::info!("Out of lives at score {}", self.run.score);
            self.run.is_player_exploding = true;
            self.run.is_transitioning = true;
            self.scheduler.invalidate_rounds();
            self.scheduler.schedule(EXPLOSION_DURATION, Deferred::GameOver);
        } else if !in_boss_fight {
            self.schedule_restart();
        }
    }

    fn schedule_restart(&mut self) {
        self.run.is_transitioning = true;
        self.scheduler.schedule(RESTART_DELAY, Deferred::RestartRound);
    }

    /// Remove every answer option and environmental entity
    pub(crate) fn clear_field(&mut self) {
        self.enemies.clear();
        self.hazards.clear();
        self.bonuses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, GameConfig, StartingInventory};
    use crate::dictionary::Word;
    use crate::sim::events::GameEvent;
    use crate::sim::test_engine;

    fn correct_pos(e: &Engine) -> Vec2 {
        e.enemies()
            .iter()
            .find(|(_, en)| en.is_correct)
            .map(|(_, en)| en.pos)
            .unwrap()
    }

    #[test]
    fn test_exactly_one_correct_and_unique_targets() {
        let mut e = test_engine();
        for _ in 0..30 {
            e.clear_field();
            e.start_round();
            assert_eq!(e.enemies().count(|en| en.is_correct), 1);
            let mut targets: Vec<&str> = e
                .enemies()
                .iter()
                .map(|(_, en)| &*e.dictionary().word(en.word).target)
                .collect();
            let n = targets.len();
            targets.sort_unstable();
            targets.dedup();
            assert_eq!(targets.len(), n);
        }
    }

    #[test]
    fn test_correct_enemy_matches_prompt() {
        let mut e = test_engine();
        e.start_round();
        let (_, correct) = e.enemies().iter().find(|(_, en)| en.is_correct).unwrap();
        let word = e.dictionary().word(correct.word);
        assert_eq!(Some(&*word.source), e.current_word());
    }

    #[test]
    fn test_start_round_guarded() {
        let mut e = test_engine();
        e.start_round();
        let first: Vec<_> = e.enemies().iter().map(|(_, en)| en.word).collect();
        // Enemies active: second call is a no-op
        e.start_round();
        let second: Vec<_> = e.enemies().iter().map(|(_, en)| en.word).collect();
        assert_eq!(first, second);

        e.clear_field();
        e.run.is_player_exploding = true;
        e.start_round();
        assert!(e.enemies().is_empty());
    }

    #[test]
    fn test_sub_level_nine_spawns_boss() {
        let mut e = test_engine();
        e.run.sub_level = 9;
        e.start_round();
        assert!(e.boss().is_some());
        assert!(e.enemies().is_empty());
    }

    #[test]
    fn test_correct_hit_scores_with_combo() {
        let mut e = test_engine();
        assert_eq!(e.config().difficulty, Difficulty::Medium);
        e.start_round();
        e.run.combo = 3;
        let pos = correct_pos(&e);
        e.handle_hit(true, pos);
        assert_eq!(e.run().score, 800);
        assert_eq!(e.run().combo, 4);
        assert!(e.run().is_transitioning);
        assert!(e.enemies().is_empty());

        // After the advance delay the next sub-level starts
        for _ in 0..((ADVANCE_DELAY / SIM_DT) as usize + 2) {
            e.step(SIM_DT);
        }
        assert_eq!(e.run().sub_level, 2);
        assert!(!e.run().is_transitioning);
        assert!(!e.enemies().is_empty());
    }

    #[test]
    fn test_combo_achievement_fires_once() {
        let mut e = test_engine();
        e.run.combo = 9;
        e.start_round();
        e.handle_hit(true, Vec2::ZERO);
        e.run.is_transitioning = false;
        e.start_round();
        e.handle_hit(true, Vec2::ZERO);
        let unlocks = e
            .drain_events()
            .filter(|ev| *ev == GameEvent::Achievement { id: "combo_10" })
            .count();
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn test_shield_absorbs_two_misses() {
        let mut e = Engine::new(
            800.0,
            600.0,
            GameConfig::default(),
            StartingInventory {
                shield_charges: 2,
                ..Default::default()
            },
        );
        let lives = e.run().lives;
        e.start_round();
        e.handle_miss();
        assert_eq!(e.run().shield_charges, 1);
        e.run.is_transitioning = false;
        e.start_round();
        e.handle_miss();
        assert_eq!(e.run().shield_charges, 0);
        assert_eq!(e.run().lives, lives);

        e.run.is_transitioning = false;
        e.start_round();
        e.handle_miss();
        assert_eq!(e.run().lives, lives - 1);
        assert_eq!(e.run().combo, 0);
    }

    #[test]
    fn test_miss_keeps_beams_only() {
        let mut e = test_engine();
        e.start_round();
        e.run.weapon = WeaponKind::Beam;
        e.fire_cooldown = 0.0;
        e.fire();
        e.run.weapon = WeaponKind::Normal;
        e.fire_cooldown = 0.0;
        e.fire();
        assert_eq!(e.projectiles().len(), 2);
        e.handle_miss();
        assert_eq!(e.projectiles().len(), 1);
        assert!(e.projectiles().iter().all(|(_, p)| p.kind == WeaponKind::Beam));
    }

    #[test]
    fn test_last_life_triggers_single_game_over() {
        let mut e = test_engine();
        e.run.lives = 1;
        e.start_round();
        e.handle_miss();
        assert!(e.run().is_player_exploding);
        assert_eq!(e.run().lives, 0);
        // Further misses while exploding change nothing
        e.handle_miss();
        assert_eq!(e.run().lives, 0);

        for _ in 0..((EXPLOSION_DURATION / SIM_DT) as usize * 3) {
            e.step(SIM_DT);
        }
        let overs = e
            .drain_events()
            .filter(|ev| matches!(ev, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(e.is_game_over());
    }

    #[test]
    fn test_wrong_hit_is_a_miss() {
        let mut e = test_engine();
        e.start_round();
        let lives = e.run().lives;
        e.handle_hit(false, Vec2::new(100.0, 100.0));
        assert_eq!(e.run().lives, lives - 1);
        assert!(e.enemies().is_empty());
        assert!(e.scheduler.is_pending(Deferred::RestartRound));
    }

    #[test]
    fn test_tiny_custom_dictionary_still_one_correct() {
        let config = GameConfig {
            custom_dictionary: Some(vec![
                Word::new("one", "אחד", "numbers"),
                Word::new("first", "אחד", "numbers"),
            ]),
            ..Default::default()
        };
        let mut e = Engine::new(800.0, 600.0, config, StartingInventory::default());
        e.start_round();
        // Same target text: no valid distractor exists
        assert_eq!(e.enemies().len(), 1);
        assert_eq!(e.enemies().count(|en| en.is_correct), 1);
    }
}
