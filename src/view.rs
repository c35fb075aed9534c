//! Per-frame view extraction
//!
//! The sim owns positions and animation labels; this pass turns them into
//! flat draw records a renderer can sort and blit. Depth is keyed on the
//! y coordinate so lower bodies draw in front, and the jump arc only moves
//! the drawn position, never the simulated one.

use glam::Vec2;

use crate::consts::{ANIMATION_RATE_FACTOR, FRAME_MS};
use crate::sim::{Animation, EntityId, World};

/// One drawable body for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityVisual {
    pub id: EntityId,
    /// Body position plus the jump offset
    pub draw_pos: Vec2,
    /// Sort key, ascending back to front
    pub depth: i32,
    pub animation: Option<Animation>,
    pub flip_x: bool,
    /// Animation playback rate, scaled by movement speed
    pub playback_speed: f32,
    pub rotation: f32,
}

/// Refresh movement-driven animation labels and collect draw records.
/// Bodies whose FSM owns the label are left alone.
pub fn render(world: &mut World, dt_ms: f32) -> Vec<EntityVisual> {
    let dt = dt_ms / FRAME_MS;
    let mut visuals = Vec::with_capacity(world.entities.len());

    for e in &mut world.entities {
        e.update_animation_from_movement();
        visuals.push(EntityVisual {
            id: e.id,
            draw_pos: e.pos + Vec2::new(0.0, e.jump.visual_offset_y),
            depth: e.depth_override.unwrap_or_else(|| e.pos.y.round() as i32),
            animation: e.animation,
            flip_x: e.flip_x,
            playback_speed: e.speed * ANIMATION_RATE_FACTOR * dt,
            rotation: e.rotation,
        });
    }

    visuals
}
