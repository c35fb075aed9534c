//! Base simulated body
//!
//! Owns kinematic state, a collision radius, animation hints for the view
//! layer, and an optional behavioral FSM. The integration step order is
//! load-bearing: acceleration resets first, behavior runs both before and
//! after the motion integration so transitions see post-move state, and
//! bounds clamping zeroes the velocity component on any axis that hit.

use glam::Vec2;

use crate::consts::*;
use crate::radians_to_degrees;

use super::enemy::Target;
use super::fsm::{Fsm, StateId};
use super::geom::{Rect, clamp_magnitude};
use super::hero::{InputState, JumpState};

pub type EntityId = u32;

/// Collision-rule role tag. Pair rules dispatch on `(self.role, other.role)`
/// so special cases cost one match per pair instead of runtime type tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Hero,
    Enemy,
    #[default]
    Generic,
}

/// Animation labels the sim writes for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Idle,
    Walk,
    Front,
    Back,
    Death,
}

/// Which animation labels the loaded sprite sheet actually provides.
/// Switching to a missing label degrades to keeping the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationSet {
    pub idle: bool,
    pub walk: bool,
    pub front: bool,
    pub back: bool,
    pub death: bool,
}

impl AnimationSet {
    pub fn full() -> Self {
        Self {
            idle: true,
            walk: true,
            front: true,
            back: true,
            death: true,
        }
    }

    pub fn has(&self, anim: Animation) -> bool {
        match anim {
            Animation::Idle => self.idle,
            Animation::Walk => self.walk,
            Animation::Front => self.front,
            Animation::Back => self.back,
            Animation::Death => self.death,
        }
    }

    pub fn first_available(&self) -> Option<Animation> {
        [
            Animation::Idle,
            Animation::Walk,
            Animation::Front,
            Animation::Back,
            Animation::Death,
        ]
        .into_iter()
        .find(|&a| self.has(a))
    }
}

/// A simulated body on the field.
///
/// `Default` yields an inert placeholder (non-solid, no caps); it exists so
/// a body can be temporarily moved out of the entity list during its tick.
/// Real bodies come from [`Entity::body`] and the hero/enemy constructors.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,

    // Kinematics
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    pub max_acceleration: f32,
    pub max_velocity: f32,
    /// Acceleration magnitude the brain applies per axis or toward a target
    pub move_acceleration: f32,
    /// Facing angle in degrees, `atan2(vel.y, vel.x)`
    pub facing_deg: f32,
    /// Cached velocity magnitude, refreshed by integration
    pub speed: f32,

    // Collision
    pub collision_radius: f32,
    pub is_solid: bool,
    pub can_push_others: bool,

    /// Sprite footprint height. The sprite anchor sits at the feet, so the
    /// effective top bound is raised by half of this.
    pub visual_height: f32,

    // Behavior
    pub fsm: Option<Fsm>,

    // View hints, written by the sim and read by the view layer
    pub animations: AnimationSet,
    pub animation: Option<Animation>,
    pub flip_x: bool,
    pub rotation: f32,
    pub depth_override: Option<i32>,

    // Hero-only
    pub input: InputState,
    pub input_enabled: bool,
    pub jump: JumpState,

    // Enemy-only
    pub active: bool,
    pub target: Option<Target>,
}

impl Entity {
    /// A plain solid body with default caps, starting on `idle` if the
    /// sheet has it, otherwise the first available label.
    pub fn body(id: EntityId, pos: Vec2, animations: AnimationSet) -> Self {
        let animation = if animations.idle {
            Some(Animation::Idle)
        } else {
            animations.first_available()
        };
        Self {
            id,
            pos,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            max_velocity: DEFAULT_MAX_VELOCITY,
            collision_radius: DEFAULT_COLLISION_RADIUS,
            is_solid: true,
            can_push_others: true,
            animations,
            animation,
            ..Self::default()
        }
    }

    /// Switch the animation label. No-op when already showing it; missing
    /// labels warn and keep the current one.
    pub fn change_animation(&mut self, anim: Animation) {
        if self.animation == Some(anim) {
            return;
        }
        if !self.animations.has(anim) {
            log::warn!("entity {}: unknown animation {:?}", self.id, anim);
            return;
        }
        self.animation = Some(anim);
    }

    /// Mirror the sprite when moving left
    pub fn apply_horizontal_flip(&mut self) {
        self.flip_x = self.vel.x < 0.0;
    }

    /// Kinematic integration for one tick. `dt` is in 60 Hz frame units.
    ///
    /// Clamps acceleration, integrates velocity, damps it exponentially,
    /// clamps it, integrates position, then refreshes facing and speed.
    pub fn integrate(&mut self, dt: f32) {
        self.accel = clamp_magnitude(self.accel, self.max_acceleration);
        self.vel += self.accel * dt;
        self.vel *= FRICTION_FACTOR.powf(dt);
        self.vel = clamp_magnitude(self.vel, self.max_velocity);
        self.pos += self.vel * dt;
        self.facing_deg = radians_to_degrees(self.vel.y.atan2(self.vel.x));
        self.speed = self.vel.length();
    }

    /// Clamp the position to the play area, zeroing velocity on any axis
    /// that hit a bound. The top bound is raised by half the sprite height
    /// so a feet-anchored sprite stays fully on screen.
    pub fn apply_bounds(&mut self, area: &Rect) {
        if self.pos.x < area.x {
            self.pos.x = area.x;
            self.vel.x = 0.0;
        }
        if self.pos.x > area.right() {
            self.pos.x = area.right();
            self.vel.x = 0.0;
        }
        let min_y = area.y + self.visual_height * 0.5;
        if self.pos.y < min_y {
            self.pos.y = min_y;
            self.vel.y = 0.0;
        }
        if self.pos.y > area.bottom() {
            self.pos.y = area.bottom();
            self.vel.y = 0.0;
        }
    }

    /// Movement-driven animation selection, used only while no FSM has
    /// claimed the label: slow means idle, steep angles map to front/back,
    /// the rest walks with a horizontal mirror when heading left.
    pub fn update_animation_from_movement(&mut self) {
        if self.fsm.as_ref().is_some_and(|f| f.is_active()) {
            return;
        }

        if self.speed < IDLE_SPEED_THRESHOLD {
            if self.animations.idle {
                self.change_animation(Animation::Idle);
            }
            return;
        }

        // Screen-down is positive y, so (45, 135) faces the camera
        let a = self.facing_deg;
        if a > 45.0 && a < 135.0 {
            if self.animations.front {
                self.change_animation(Animation::Front);
            }
        } else if a < -45.0 && a > -135.0 {
            if self.animations.back {
                self.change_animation(Animation::Back);
            }
        } else if self.animations.walk {
            self.change_animation(Animation::Walk);
            self.apply_horizontal_flip();
        }
    }

    pub fn is_dead(&self) -> bool {
        self.fsm
            .as_ref()
            .is_some_and(|f| f.current() == Some(StateId::Dead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(pos: Vec2) -> Entity {
        Entity::body(1, pos, AnimationSet::full())
    }

    #[test]
    fn test_integrate_clamps_velocity_exactly() {
        // Velocity (5, 0) against a cap of 3: one tick clamps the magnitude
        // to the cap and keeps the direction
        let mut e = body_at(Vec2::ZERO);
        e.vel = Vec2::new(5.0, 0.0);
        e.integrate(1.0);

        assert!((e.vel.length() - 3.0).abs() < 1e-5);
        assert_eq!(e.vel.y, 0.0);
        assert!((e.speed - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_integrate_caps_acceleration() {
        let mut e = body_at(Vec2::ZERO);
        e.accel = Vec2::new(10.0, 10.0);
        e.integrate(1.0);
        // One frame of capped acceleration with friction applied once
        assert!(e.vel.length() <= DEFAULT_MAX_ACCELERATION + 1e-5);
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut e = body_at(Vec2::ZERO);
        e.vel = Vec2::new(1.0, 0.0);
        e.integrate(1.0);
        assert!((e.vel.x - 0.95).abs() < 1e-5);
        // Larger delta, more damping per step
        let mut slow = body_at(Vec2::ZERO);
        slow.vel = Vec2::new(1.0, 0.0);
        slow.integrate(2.0);
        assert!(slow.vel.x < e.vel.x);
    }

    #[test]
    fn test_bounds_clamp_and_zero_velocity() {
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut e = body_at(Vec2::new(-5.0, 120.0));
        e.vel = Vec2::new(-2.0, 3.0);
        e.apply_bounds(&area);

        assert_eq!(e.pos, Vec2::new(0.0, 100.0));
        assert_eq!(e.vel, Vec2::ZERO);
    }

    #[test]
    fn test_bounds_raised_top_for_sprite_height() {
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut e = body_at(Vec2::new(50.0, 10.0));
        e.visual_height = 64.0;
        e.vel = Vec2::new(0.0, -1.0);
        e.apply_bounds(&area);

        assert_eq!(e.pos.y, 32.0);
        assert_eq!(e.vel.y, 0.0);
    }

    #[test]
    fn test_movement_mapping_idle_below_threshold() {
        let mut e = body_at(Vec2::ZERO);
        e.animation = Some(Animation::Walk);
        e.speed = 0.1;
        e.update_animation_from_movement();
        assert_eq!(e.animation, Some(Animation::Idle));
    }

    #[test]
    fn test_movement_mapping_directions() {
        let mut e = body_at(Vec2::ZERO);
        e.speed = 2.0;

        e.facing_deg = 90.0;
        e.update_animation_from_movement();
        assert_eq!(e.animation, Some(Animation::Front));

        e.facing_deg = -90.0;
        e.update_animation_from_movement();
        assert_eq!(e.animation, Some(Animation::Back));

        e.facing_deg = 180.0;
        e.vel = Vec2::new(-2.0, 0.0);
        e.update_animation_from_movement();
        assert_eq!(e.animation, Some(Animation::Walk));
        assert!(e.flip_x);
    }

    #[test]
    fn test_change_animation_missing_label_keeps_current() {
        let mut e = Entity::body(
            1,
            Vec2::ZERO,
            AnimationSet {
                death: false,
                ..AnimationSet::full()
            },
        );
        e.change_animation(Animation::Death);
        assert_eq!(e.animation, Some(Animation::Idle));
    }

    #[test]
    fn test_body_falls_back_to_first_available_label() {
        let e = Entity::body(
            1,
            Vec2::ZERO,
            AnimationSet {
                idle: false,
                walk: true,
                ..AnimationSet::default()
            },
        );
        assert_eq!(e.animation, Some(Animation::Walk));
    }
}
