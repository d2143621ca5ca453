//! Zones, environment modifiers, and per-round resolution
//!
//! A zone is a themed stretch of levels with one behaviour modifier. The
//! active zone is never written back into the session config; each round
//! resolves an immutable `RoundDescriptor` from the current level instead.

use serde::{Deserialize, Serialize};

use crate::config::{DeviceClass, Difficulty};
use crate::consts::*;

/// Environment behaviour flag for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Enemies sway sinusoidally around their lane
    Wave,
    /// Random lateral jitter
    Chaos,
    /// Enemies orbit their lane centre
    Vortex,
    /// Constant lateral drift with wrap-around
    Drift,
    /// Falling hazards
    Hazards,
    /// Limited visibility around the player
    Darkness,
    /// Fall speed grows during the round
    Acceleration,
    /// One extra answer option
    Density,
    /// Smaller hit radius
    Sharpness,
    /// Enemies flicker in and out of view
    Blink,
    /// Wind pushes projectiles, lightning hazards
    Storm,
    /// Wave + hazards + density together
    Final,
}

impl Modifier {
    pub fn sways(self) -> bool {
        matches!(self, Modifier::Wave | Modifier::Final)
    }

    pub fn jitters(self) -> bool {
        self == Modifier::Chaos
    }

    pub fn orbits(self) -> bool {
        self == Modifier::Vortex
    }

    pub fn drifts(self) -> bool {
        self == Modifier::Drift
    }

    pub fn spawns_hazards(self) -> bool {
        matches!(self, Modifier::Hazards | Modifier::Storm | Modifier::Final)
    }

    pub fn accelerates(self) -> bool {
        self == Modifier::Acceleration
    }

    pub fn blinks(self) -> bool {
        self == Modifier::Blink
    }

    /// Horizontal wind applied to travelling projectiles (pixels/s²)
    pub fn wind(self) -> f32 {
        if self == Modifier::Storm { 120.0 } else { 0.0 }
    }

    /// Visibility radius around the player, if the zone is dark
    pub fn visibility_radius(self) -> Option<f32> {
        (self == Modifier::Darkness).then_some(220.0)
    }

    pub fn extra_options(self) -> usize {
        usize::from(matches!(self, Modifier::Density | Modifier::Final))
    }

    pub fn radius_scale(self) -> f32 {
        if self == Modifier::Sharpness { 0.7 } else { 1.0 }
    }
}

/// A themed level segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDef {
    pub id: String,
    pub title: String,
    /// First level that belongs to this zone
    pub threshold: u32,
    #[serde(default)]
    pub modifier: Option<Modifier>,
}

impl ZoneDef {
    fn new(id: &str, title: &str, threshold: u32, modifier: Option<Modifier>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            threshold,
            modifier,
        }
    }
}

/// Ordered zone definitions, never empty
///
/// Serialized as a plain array. Deserializing goes through `from_defs`, so an
/// empty array degrades to the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<ZoneDef>", into = "Vec<ZoneDef>")]
pub struct ZoneTable {
    zones: Vec<ZoneDef>,
}

impl From<Vec<ZoneDef>> for ZoneTable {
    fn from(zones: Vec<ZoneDef>) -> Self {
        Self::from_defs(zones)
    }
}

impl From<ZoneTable> for Vec<ZoneDef> {
    fn from(table: ZoneTable) -> Self {
        table.zones
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ZoneTable {
    /// Built-in progression: a new zone every 7 levels
    pub fn builtin() -> Self {
        use Modifier::*;
        let defs: [(&str, &str, Option<Modifier>); 13] = [
            ("meadow", "First Words", None),
            ("tides", "Rolling Tides", Some(Wave)),
            ("static", "Static Field", Some(Chaos)),
            ("maelstrom", "Maelstrom", Some(Vortex)),
            ("drift", "Solar Drift", Some(Drift)),
            ("minefield", "Minefield", Some(Hazards)),
            ("eclipse", "Eclipse", Some(Darkness)),
            ("rush", "Rush Hour", Some(Acceleration)),
            ("swarm", "The Swarm", Some(Density)),
            ("needle", "Needle Point", Some(Sharpness)),
            ("flicker", "Flicker", Some(Blink)),
            ("tempest", "Tempest", Some(Storm)),
            ("finale", "Final Exam", Some(Final)),
        ];
        let zones = defs
            .iter()
            .enumerate()
            .map(|(i, (id, title, modifier))| ZoneDef::new(id, title, 1 + 7 * i as u32, *modifier))
            .collect();
        Self { zones }
    }

    /// Build from explicit definitions; falls back to built-in when empty
    pub fn from_defs(mut zones: Vec<ZoneDef>) -> Self {
        if zones.is_empty() {
            log::warn!("Empty zone table, using built-in zones");
            return Self::builtin();
        }
        zones.sort_by_key(|z| z.threshold);
        Self { zones }
    }

    /// Parse a JSON array of zone definitions
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, index: usize) -> &ZoneDef {
        &self.zones[index.min(self.zones.len() - 1)]
    }

    /// Index of the zone containing `level` (last zone whose threshold ≤ level)
    pub fn index_for_level(&self, level: u32) -> usize {
        self.zones
            .iter()
            .rposition(|z| z.threshold <= level)
            .unwrap_or(0)
    }

    /// Level at which the next unit starts
    ///
    /// The next zone's threshold, or one past `level` beyond the last zone.
    pub fn next_threshold(&self, level: u32) -> u32 {
        self.zones
            .iter()
            .map(|z| z.threshold)
            .find(|&t| t > level)
            .unwrap_or(level + 1)
    }
}

/// Immutable per-round parameters resolved from the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundDescriptor {
    pub zone_index: usize,
    pub modifier: Option<Modifier>,
    pub option_count: usize,
    /// Enemy fall speed (pixels/s)
    pub speed: f32,
    /// Enemy hit radius
    pub radius: f32,
    /// Device-dependent hit test scale
    pub hit_tolerance: f32,
}

impl RoundDescriptor {
    pub fn resolve(
        zones: &ZoneTable,
        level: u32,
        difficulty: Difficulty,
        device: DeviceClass,
    ) -> Self {
        let zone_index = zones.index_for_level(level);
        let modifier = zones.get(zone_index).modifier;

        let extra = modifier.map_or(0, Modifier::extra_options);
        let option_count = (difficulty.option_count().min(device.option_cap()) + extra)
            .clamp(1, MAX_ENEMIES);

        let growth = (1.0 + 0.06 * level.saturating_sub(1) as f32).min(3.0);
        let speed = difficulty.base_speed() * growth * device.speed_factor();

        let base_radius = match device {
            DeviceClass::Compact => ENEMY_RADIUS_COMPACT,
            DeviceClass::Regular => ENEMY_RADIUS,
        };
        let radius = base_radius * modifier.map_or(1.0, Modifier::radius_scale);

        Self {
            zone_index,
            modifier,
            option_count,
            speed,
            radius,
            hit_tolerance: device.hit_tolerance(),
        }
    }

    /// Whether the active modifier satisfies `f`
    #[inline]
    pub fn has(&self, f: impl Fn(Modifier) -> bool) -> bool {
        self.modifier.is_some_and(f)
    }
}
