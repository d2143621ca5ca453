//! Browser facade
//!
//! Thin `wasm-bindgen` wrapper so a JavaScript shell can own the canvas, the
//! DOM overlays, audio, and persistence while this crate owns the game.
//! Events reach JS as JSON strings through a registered callback.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{GameConfig, StartingInventory};
use crate::sim::{Engine, GameEvent};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the existing logger
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Word Blaster core loaded");
    }
}

fn js_error(err: serde_json::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[derive(Serialize)]
struct FrameEnemy<'a> {
    x: f32,
    y: f32,
    radius: f32,
    rotation: f32,
    label: &'a str,
    visible: bool,
}

#[derive(Serialize)]
struct FrameShot {
    x: f32,
    y: f32,
    angle: f32,
    kind: crate::sim::WeaponKind,
    /// Top of the beam, beams only
    beam_top: Option<f32>,
}

#[derive(Serialize)]
struct FrameDot {
    x: f32,
    y: f32,
    size: f32,
    alpha: f32,
    color: u32,
}

#[derive(Serialize)]
struct FrameBoss {
    kind: crate::sim::BossKind,
    x: f32,
    y: f32,
    hp_percent: u8,
}

#[derive(Serialize)]
struct Frame<'a> {
    player_x: f32,
    player_y: f32,
    player_visible: bool,
    prompt: Option<&'a str>,
    enemies: Vec<FrameEnemy<'a>>,
    shots: Vec<FrameShot>,
    particles: Vec<FrameDot>,
    boss_shots: Vec<[f32; 2]>,
    hazards: Vec<[f32; 3]>,
    bonuses: Vec<[f32; 2]>,
    boss: Option<FrameBoss>,
    shake: f32,
    visibility_radius: Option<f32>,
    time_slowed: bool,
}

/// Engine handle owned by the JavaScript shell
#[wasm_bindgen]
pub struct WebEngine {
    engine: Engine,
    on_event: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WebEngine {
    /// `config_json` and `inventory_json` may be partial or empty objects
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        config_json: &str,
        inventory_json: &str,
    ) -> Result<WebEngine, JsValue> {
        let config = GameConfig::from_json(config_json).map_err(js_error)?;
        let inventory: StartingInventory =
            serde_json::from_str(inventory_json).map_err(js_error)?;
        Ok(Self {
            engine: Engine::new(width, height, config, inventory),
            on_event: None,
        })
    }

    /// Replace the zone table with a JSON array of zone definitions
    #[wasm_bindgen(js_name = loadZones)]
    pub fn load_zones(&mut self, zones_json: &str) -> Result<(), JsValue> {
        let zones = crate::sim::ZoneTable::from_json(zones_json).map_err(js_error)?;
        self.engine.zones = zones;
        Ok(())
    }

    /// Register `callback(json)` for outbound events
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: js_sys::Function) {
        self.on_event = Some(callback);
    }

    /// Advance by the frame delta in seconds and flush events
    pub fn update(&mut self, dt: f32) {
        self.engine.update(dt);
        self.flush_events();
    }

    /// Current frame as JSON for the canvas renderer
    pub fn draw(&self) -> Result<String, JsValue> {
        let view = self.engine.draw();
        let player = view.player();
        let frame = Frame {
            player_x: player.pos.x,
            player_y: player.pos.y,
            player_visible: view.player_visible(),
            prompt: view.prompt(),
            enemies: view
                .enemies()
                .map(|e| FrameEnemy {
                    x: e.pos.x,
                    y: e.pos.y,
                    radius: e.radius,
                    rotation: e.rotation,
                    label: e.label,
                    visible: e.visible,
                })
                .collect(),
            shots: view
                .projectiles()
                .map(|p| FrameShot {
                    x: p.pos.x,
                    y: p.pos.y,
                    angle: p.angle,
                    kind: p.kind,
                    beam_top: (p.kind == crate::sim::WeaponKind::Beam)
                        .then_some(if p.has_hit { p.beam_target_y } else { 0.0 }),
                })
                .collect(),
            particles: view
                .particles()
                .map(|p| FrameDot {
                    x: p.pos.x,
                    y: p.pos.y,
                    size: p.size,
                    alpha: p.alpha,
                    color: p.color,
                })
                .collect(),
            boss_shots: view.boss_shots().map(|s| [s.pos.x, s.pos.y]).collect(),
            hazards: view
                .hazards()
                .iter()
                .map(|h| [h.pos.x, h.pos.y, if h.lightning { 1.0 } else { 0.0 }])
                .collect(),
            bonuses: view.bonuses().iter().map(|b| [b.pos.x, b.pos.y]).collect(),
            boss: view.boss().map(|b| FrameBoss {
                kind: b.kind,
                x: b.pos.x,
                y: b.pos.y,
                hp_percent: b.hp_percent(),
            }),
            shake: view.screen_shake(),
            visibility_radius: view.visibility_radius(),
            time_slowed: view.time_slowed(),
        };
        serde_json::to_string(&frame).map_err(js_error)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(width, height);
    }

    #[wasm_bindgen(js_name = movePlayer)]
    pub fn move_player(&mut self, dx: f32, dy: f32) {
        self.engine.move_player(dx, dy);
    }

    #[wasm_bindgen(js_name = setPlayerPos)]
    pub fn set_player_pos(&mut self, x: f32, y: f32) {
        self.engine.set_player_pos(x, y);
    }

    pub fn fire(&mut self) -> bool {
        let fired = self.engine.fire();
        self.flush_events();
        fired
    }

    #[wasm_bindgen(js_name = useBomb)]
    pub fn use_bomb(&mut self) -> bool {
        let used = self.engine.use_bomb();
        self.flush_events();
        used
    }

    #[wasm_bindgen(js_name = useShield)]
    pub fn use_shield(&mut self) -> bool {
        let used = self.engine.use_shield();
        self.flush_events();
        used
    }

    #[wasm_bindgen(js_name = usePotion)]
    pub fn use_potion(&mut self) -> bool {
        let used = self.engine.use_potion();
        self.flush_events();
        used
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
    }

    #[wasm_bindgen(js_name = nextUnit)]
    pub fn next_unit(&mut self) {
        self.engine.next_unit();
        self.flush_events();
    }

    /// Stop the session; pending transitions never fire
    pub fn cancel(&mut self) {
        self.engine.cancel();
        self.on_event = None;
    }

    /// HUD stats as JSON
    pub fn stats(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.stats()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }
}

impl WebEngine {
    fn flush_events(&mut self) {
        let events: Vec<GameEvent> = self.engine.drain_events().collect();
        let Some(callback) = &self.on_event else {
            return;
        };
        for event in events {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::warn!("Event callback threw: {:?}", err);
                    }
                }
                Err(err) => log::warn!("Failed to encode event: {}", err),
            }
        }
    }
}
