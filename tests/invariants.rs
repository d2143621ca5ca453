//! Property tests for pools, the word deck, and whole-run invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use word_blaster::consts::*;
use word_blaster::sim::{Deck, Pool};
use word_blaster::{Difficulty, Engine, GameConfig, StartingInventory};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Slot(u16);

#[derive(Debug, Clone, Copy)]
enum Input {
    Idle,
    Move(f32),
    Fire,
    Bomb,
    Shield,
    Potion,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        4 => Just(Input::Idle),
        4 => (-30.0f32..30.0).prop_map(Input::Move),
        3 => Just(Input::Fire),
        1 => Just(Input::Bomb),
        1 => Just(Input::Shield),
        1 => Just(Input::Potion),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

proptest! {
    #[test]
    fn pool_never_exceeds_capacity(
        capacity in 1usize..100,
        ops in prop::collection::vec((any::<bool>(), 0usize..120), 0..400),
    ) {
        let mut pool: Pool<Slot> = Pool::new(capacity);
        for (acquire, index) in ops {
            if acquire {
                let was_full = pool.is_full();
                let id = pool.acquire(Slot(index as u16));
                prop_assert_eq!(id.is_none(), was_full);
            } else {
                pool.release(index);
            }
            prop_assert!(pool.len() <= capacity);
            prop_assert_eq!(pool.iter().count(), pool.len());
            prop_assert_eq!(pool.capacity(), capacity);
        }
    }

    #[test]
    fn deck_deals_each_word_once_per_cycle(size in 1usize..80, seed in any::<u64>()) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut deck = Deck::new(size);
        for _ in 0..2 {
            let mut seen = vec![false; size];
            for _ in 0..size {
                let id = deck.next(&mut rng).unwrap();
                prop_assert!(!seen[id.index()], "word dealt twice in one cycle");
                seen[id.index()] = true;
            }
            prop_assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn random_play_keeps_run_invariants(
        seed in any::<u64>(),
        difficulty in difficulty(),
        width in 320.0f32..1400.0,
        inputs in prop::collection::vec(input(), 200..800),
    ) {
        let config = GameConfig { difficulty, seed, ..Default::default() };
        let mut engine = Engine::new(width, 700.0, config, StartingInventory::default());

        for input in inputs {
            match input {
                Input::Idle => {}
                Input::Move(dx) => engine.move_player(dx, 0.0),
                Input::Fire => { engine.fire(); }
                Input::Bomb => { engine.use_bomb(); }
                Input::Shield => { engine.use_shield(); }
                Input::Potion => { engine.use_potion(); }
            }
            engine.update(1.0 / 30.0);
            engine.drain_events().for_each(drop);

            let run = engine.run();
            prop_assert!(run.lives <= MAX_LIVES);
            prop_assert!(run.shield_charges <= MAX_SHIELD_CHARGES);
            prop_assert!((1..=9).contains(&run.sub_level));

            let enemies = engine.enemies();
            prop_assert!(enemies.len() <= MAX_ENEMIES);
            if !enemies.is_empty() {
                prop_assert_eq!(enemies.count(|e| e.is_correct), 1);
                prop_assert!(engine.boss().is_none());
            }
            prop_assert!(engine.projectiles().len() <= MAX_PROJECTILES);
            prop_assert!(engine.particles().len() <= MAX_PARTICLES);
            prop_assert!(engine.boss_shots().len() <= MAX_BOSS_SHOTS);

            if engine.is_game_over() {
                prop_assert_eq!(run.lives, 0);
                break;
            }
        }
    }
}

#[test]
fn seeded_runs_replay_identically() {
    let play = || {
        let config = GameConfig {
            seed: 99,
            ..Default::default()
        };
        let mut engine = Engine::new(800.0, 600.0, config, StartingInventory::default());
        let mut log = Vec::new();
        for frame in 0..900 {
            if frame % 20 == 0 {
                engine.fire();
            }
            engine.move_player(if frame % 90 < 45 { 4.0 } else { -4.0 }, 0.0);
            engine.update(1.0 / 60.0);
            log.extend(engine.drain_events());
        }
        (engine.stats(), log)
    };
    assert_eq!(play(), play());
}
