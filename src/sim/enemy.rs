//! Autonomous rival agents
//!
//! An enemy is a plain seeking body: its brain steers a fixed acceleration
//! toward an assigned target. Target choice happens in the world loop, not
//! here, so every agent acts on the current frame's pick. Toilets inside
//! the detection radius win over the hero, nearest first.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

use super::entity::{AnimationSet, Entity, EntityId, Role};
use super::geom::{Rect, distance};
use super::world::{Toilet, ToiletId};

/// What an enemy is currently chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Hero(EntityId),
    Toilet(ToiletId),
}

pub fn new_enemy(id: EntityId, pos: Vec2, tuning: &Tuning) -> Entity {
    // Rival sheets ship without a death pose; the label lookup degrades
    let mut e = Entity::body(
        id,
        pos,
        AnimationSet {
            death: false,
            ..AnimationSet::full()
        },
    );
    e.role = Role::Enemy;
    e.move_acceleration = tuning.enemy_move_acceleration;
    e.visual_height = tuning.visual_height;
    e.active = false;
    e
}

/// Seek brain: accelerate straight at the target. Inactive agents and
/// agents without a target coast.
pub fn steer(e: &mut Entity, target_pos: Option<Vec2>) {
    if !e.active {
        return;
    }
    let Some(target_pos) = target_pos else { return };
    let dir = (target_pos - e.pos).normalize_or_zero();
    e.accel = dir * e.move_acceleration;
}

/// Targeting policy, recomputed by the world loop every frame: the nearest
/// active toilet within the detection radius, else the hero. Range beats
/// absolute proximity, so a toilet at 150 units outdraws a hero at 50.
pub fn choose_target(
    pos: Vec2,
    hero_id: EntityId,
    toilets: &[Toilet],
    detection_radius: f32,
) -> Target {
    let mut nearest: Option<(f32, ToiletId)> = None;
    for t in toilets.iter().filter(|t| !t.destroyed) {
        let d = distance(pos, t.pos);
        if d < detection_radius && nearest.is_none_or(|(best, _)| d < best) {
            nearest = Some((d, t.id));
        }
    }
    match nearest {
        Some((_, id)) => Target::Toilet(id),
        None => Target::Hero(hero_id),
    }
}

/// Rejection-sample a spawn position: uniform over the play area, at least
/// `min_distance` away from the hero spawn
pub fn scatter_position(
    area: &Rect,
    hero_spawn: Vec2,
    min_distance: f32,
    rng: &mut impl Rng,
) -> Vec2 {
    loop {
        let pos = Vec2::new(
            area.x + rng.random::<f32>() * area.width,
            area.y + rng.random::<f32>() * area.height,
        );
        if distance(pos, hero_spawn) >= min_distance {
            return pos;
        }
    }
}

/// Small random drift so freshly spawned agents don't stand in lockstep
pub fn scatter_velocity(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * 2.0,
        (rng.random::<f32>() - 0.5) * 2.0,
    )
}

/// Recycle an agent for a new round at a fresh scatter position
pub fn reset(e: &mut Entity, pos: Vec2, rng: &mut impl Rng) {
    e.pos = pos;
    e.vel = scatter_velocity(rng);
    e.accel = Vec2::ZERO;
    e.target = None;
}
