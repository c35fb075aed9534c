//! Gameplay tuning knobs
//!
//! Everything a designer would want to nudge without touching sim code
//! lives in one flat struct. It loads from a JSON file when one is given
//! and silently falls back to the built-in values otherwise, so a missing
//! or broken file never stops a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play area size in world units
    pub play_width: f32,
    pub play_height: f32,

    /// Per-axis acceleration applied while a direction key is held
    pub hero_move_acceleration: f32,
    pub hero_max_velocity: f32,

    /// Seek acceleration magnitude for rival agents
    pub enemy_move_acceleration: f32,
    pub enemy_count: usize,
    /// Minimum spawn distance between a rival and the hero spawn point
    pub min_enemy_spawn_distance: f32,

    pub max_health: f32,
    pub round_seconds: u32,

    /// Toilets placeable per round
    pub toilet_budget: u32,
    pub toilet_hp: f32,
    /// Rivals within this range prefer a toilet over the hero
    pub toilet_detection_radius: f32,

    /// Range of the post-physics contact sweep
    pub contact_range: f32,
    /// Vitality drained per second from the hero by a rival in contact
    pub hero_contact_dps: f32,
    /// Hit points drained per second from a toilet by a rival in contact
    pub toilet_contact_dps: f32,

    pub jump_height: f32,
    pub jump_duration_ms: f32,

    /// Sprite footprint height; raises the top bound by half of it
    pub visual_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: 1336.0,
            play_height: 1024.0,
            hero_move_acceleration: 0.2,
            hero_max_velocity: 4.0,
            enemy_move_acceleration: 0.2,
            enemy_count: 250,
            min_enemy_spawn_distance: 200.0,
            max_health: 100.0,
            round_seconds: 60,
            toilet_budget: 10,
            toilet_hp: 100.0,
            toilet_detection_radius: 220.0,
            contact_range: 18.0,
            hero_contact_dps: 6.0,
            toilet_contact_dps: 20.0,
            jump_height: 80.0,
            jump_duration_ms: 600.0,
            visual_height: 64.0,
        }
    }
}

impl Tuning {
    /// Load from a JSON file, falling back to defaults on any failure.
    /// Unknown fields are ignored; missing fields take their defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("bad tuning file {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("cannot read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
