//! The player agent
//!
//! An input-driven body with two discrete override states layered on the
//! FSM: a jump that only moves the sprite (never the collision position)
//! and a terminal dead state. Perception runs a strict priority chain
//! every tick: dead beats jumping beats the idle/walk speed split.

use glam::Vec2;

use crate::consts::*;
use crate::tuning::Tuning;

use super::entity::{Animation, AnimationSet, Entity, EntityId, Role};
use super::fsm::{Fsm, FsmCtx, StateHandlers, StateId};
use super::geom::Rect;
use super::world::GameEvent;

/// Held directional input flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Jump progress. The arc is cosmetic: only `visual_offset_y` moves, the
/// body position stays on the ground plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpState {
    pub airborne: bool,
    pub elapsed_ms: f32,
    pub height: f32,
    pub duration_ms: f32,
    pub visual_offset_y: f32,
}

/// Hero spawn point: right edge of the play area, vertically centered
pub fn spawn_point(area: &Rect) -> Vec2 {
    Vec2::new(area.right(), area.y + area.height * 0.5)
}

pub fn new_hero(id: EntityId, area: &Rect, tuning: &Tuning) -> Entity {
    let mut e = Entity::body(id, spawn_point(area), AnimationSet::full());
    e.role = Role::Hero;
    e.move_acceleration = tuning.hero_move_acceleration;
    e.max_velocity = tuning.hero_max_velocity;
    e.visual_height = tuning.visual_height;
    e.jump.height = tuning.jump_height;
    e.jump.duration_ms = tuning.jump_duration_ms;
    e.fsm = Some(build_fsm());
    e
}

fn build_fsm() -> Fsm {
    let mut fsm = Fsm::new();
    fsm.add_state(
        StateId::Idle,
        StateHandlers {
            on_enter: idle_enter,
            ..StateHandlers::default()
        },
    );
    fsm.add_state(
        StateId::Walk,
        StateHandlers {
            on_update: walk_update,
            ..StateHandlers::default()
        },
    );
    fsm.add_state(
        StateId::Jump,
        StateHandlers {
            on_enter: jump_enter,
            on_update: jump_update,
        },
    );
    fsm.add_state(
        StateId::Dead,
        StateHandlers {
            on_enter: dead_enter,
            ..StateHandlers::default()
        },
    );
    fsm
}

fn idle_enter(e: &mut Entity, _ctx: &mut FsmCtx) {
    e.change_animation(Animation::Idle);
}

fn walk_update(e: &mut Entity, _ctx: &mut FsmCtx, _dt_ms: f32) {
    let speed = e.vel.length();
    if speed <= IDLE_SPEED_THRESHOLD {
        return;
    }
    let a = e.facing_deg;
    if a > 45.0 && a < 135.0 && e.animations.front {
        e.change_animation(Animation::Front);
        e.apply_horizontal_flip();
    } else if a < -45.0 && a > -135.0 && e.animations.back {
        e.change_animation(Animation::Back);
        e.apply_horizontal_flip();
    } else if e.animations.walk {
        e.change_animation(Animation::Walk);
        e.apply_horizontal_flip();
    }
}

fn jump_enter(e: &mut Entity, ctx: &mut FsmCtx) {
    ctx.events.push(GameEvent::HeroJumped);
    e.jump.airborne = true;
    e.jump.elapsed_ms = 0.0;
}

fn jump_update(e: &mut Entity, _ctx: &mut FsmCtx, dt_ms: f32) {
    if !e.jump.airborne {
        return;
    }
    e.jump.elapsed_ms += dt_ms;
    let progress = (e.jump.elapsed_ms / e.jump.duration_ms).min(1.0);
    // Half sine: up and back down in one smooth arc
    e.jump.visual_offset_y = -e.jump.height * (progress * std::f32::consts::PI).sin();

    if progress >= 1.0 {
        e.jump.airborne = false;
        e.jump.visual_offset_y = 0.0;
        // The next perception pass settles back to idle/walk
    }
}

fn dead_enter(e: &mut Entity, ctx: &mut FsmCtx) {
    log::info!("hero died at ({:.1}, {:.1})", e.pos.x, e.pos.y);
    ctx.events.push(GameEvent::HeroDied);

    e.input_enabled = false;
    e.input = InputState::default();
    e.vel = Vec2::ZERO;

    // Cosmetics: slide sideways, fall over, draw in front of everything
    e.pos.x += DEATH_SLIDE_X;
    e.rotation = std::f32::consts::FRAC_PI_2;
    e.depth_override = Some(DEATH_DEPTH_KEY);
    if e.animations.death {
        e.change_animation(Animation::Death);
    }
}

/// Decide the behavioral state from current conditions, in strict priority
/// order: dead, then jumping, then idle/walk by speed. Each check returns
/// immediately, so death preempts everything until an explicit reset.
pub fn perceive(e: &mut Entity, health: f32, events: &mut Vec<GameEvent>) {
    let Some(mut fsm) = e.fsm.take() else { return };
    let mut ctx = FsmCtx { health, events };

    if health <= 0.0 {
        fsm.set_state(StateId::Dead, e, &mut ctx);
    } else if e.jump.airborne {
        fsm.set_state(StateId::Jump, e, &mut ctx);
    } else if e.vel.length() <= IDLE_SPEED_THRESHOLD {
        fsm.set_state(StateId::Idle, e, &mut ctx);
    } else {
        fsm.set_state(StateId::Walk, e, &mut ctx);
    }

    e.fsm = Some(fsm);
}

/// Input brain: one fixed acceleration per held axis, suppressed entirely
/// while dead
pub fn steer(e: &mut Entity) {
    if e.is_dead() {
        return;
    }
    if e.input.up {
        e.accel.y -= e.move_acceleration;
    }
    if e.input.down {
        e.accel.y += e.move_acceleration;
    }
    if e.input.left {
        e.accel.x -= e.move_acceleration;
    }
    if e.input.right {
        e.accel.x += e.move_acceleration;
    }
}

/// Explicit jump trigger. Ignored while airborne or dead.
pub fn trigger_jump(e: &mut Entity, health: f32, events: &mut Vec<GameEvent>) {
    if e.jump.airborne || e.is_dead() {
        return;
    }
    let Some(mut fsm) = e.fsm.take() else { return };
    let mut ctx = FsmCtx { health, events };
    fsm.set_state(StateId::Jump, e, &mut ctx);
    e.fsm = Some(fsm);
}

/// Force the dead state immediately (called from the damage path the frame
/// vitality reaches zero, not waiting for the next perception pass)
pub fn enter_dead(e: &mut Entity, health: f32, events: &mut Vec<GameEvent>) {
    let Some(mut fsm) = e.fsm.take() else { return };
    let mut ctx = FsmCtx { health, events };
    fsm.set_state(StateId::Dead, e, &mut ctx);
    e.fsm = Some(fsm);
}

/// Restore the spawn state for a round restart: spawn position, zeroed
/// motion and jump progress, cleared death cosmetics, FSM back to idle,
/// input re-enabled.
pub fn reset(e: &mut Entity, area: &Rect, health: f32, events: &mut Vec<GameEvent>) {
    e.pos = spawn_point(area);
    e.vel = Vec2::ZERO;
    e.accel = Vec2::ZERO;

    e.jump.airborne = false;
    e.jump.elapsed_ms = 0.0;
    e.jump.visual_offset_y = 0.0;

    e.rotation = 0.0;
    e.depth_override = None;

    if let Some(mut fsm) = e.fsm.take() {
        let mut ctx = FsmCtx { health, events };
        fsm.set_state(StateId::Idle, e, &mut ctx);
        e.fsm = Some(fsm);
    }

    e.input = InputState::default();
    e.input_enabled = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Entity {
        let area = Rect::new(0.0, 0.0, 1336.0, 1024.0);
        new_hero(1, &area, &Tuning::default())
    }

    #[test]
    fn test_perceive_priority_dead_over_jump() {
        let mut e = hero();
        e.jump.airborne = true;
        let mut events = Vec::new();
        perceive(&mut e, 0.0, &mut events);
        assert!(e.is_dead());
        assert!(events.contains(&GameEvent::HeroDied));
    }

    #[test]
    fn test_perceive_speed_split() {
        let mut e = hero();
        let mut events = Vec::new();

        e.vel = Vec2::new(0.1, 0.0);
        perceive(&mut e, 100.0, &mut events);
        assert_eq!(e.fsm.as_ref().unwrap().current(), Some(StateId::Idle));

        e.vel = Vec2::new(1.0, 0.0);
        perceive(&mut e, 100.0, &mut events);
        assert_eq!(e.fsm.as_ref().unwrap().current(), Some(StateId::Walk));
    }

    #[test]
    fn test_jump_arc_and_auto_exit() {
        let mut e = hero();
        let mut events = Vec::new();
        trigger_jump(&mut e, 100.0, &mut events);
        assert!(e.jump.airborne);
        assert_eq!(events, vec![GameEvent::HeroJumped]);

        let mut fsm = e.fsm.take().unwrap();
        let mut ctx = FsmCtx {
            health: 100.0,
            events: &mut events,
        };

        // Mid-jump: offset is the full height at the apex
        fsm.update(&mut e, &mut ctx, 300.0);
        assert!((e.jump.visual_offset_y - (-80.0)).abs() < 1e-3);

        // Past the duration: back on the ground
        fsm.update(&mut e, &mut ctx, 400.0);
        assert!(!e.jump.airborne);
        assert_eq!(e.jump.visual_offset_y, 0.0);
    }

    #[test]
    fn test_jump_ignored_while_airborne_or_dead() {
        let mut e = hero();
        let mut events = Vec::new();
        trigger_jump(&mut e, 100.0, &mut events);
        events.clear();
        trigger_jump(&mut e, 100.0, &mut events);
        assert!(events.is_empty());

        let mut dead = hero();
        enter_dead(&mut dead, 0.0, &mut events);
        events.clear();
        trigger_jump(&mut dead, 0.0, &mut events);
        assert!(events.is_empty());
        assert!(dead.is_dead());
    }

    #[test]
    fn test_dead_cosmetics_and_input_freeze() {
        let mut e = hero();
        e.input_enabled = true;
        e.vel = Vec2::new(2.0, 1.0);
        let x_before = e.pos.x;
        let mut events = Vec::new();
        enter_dead(&mut e, 0.0, &mut events);

        assert!(!e.input_enabled);
        assert_eq!(e.vel, Vec2::ZERO);
        assert_eq!(e.pos.x, x_before + DEATH_SLIDE_X);
        assert_eq!(e.depth_override, Some(DEATH_DEPTH_KEY));
        assert_eq!(e.animation, Some(Animation::Death));

        // Steering is suppressed while dead
        e.input.left = true;
        steer(&mut e);
        assert_eq!(e.accel, Vec2::ZERO);
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let area = Rect::new(0.0, 0.0, 1336.0, 1024.0);
        let mut e = new_hero(1, &area, &Tuning::default());
        let mut events = Vec::new();
        enter_dead(&mut e, 0.0, &mut events);

        reset(&mut e, &area, 100.0, &mut events);
        assert_eq!(e.pos, spawn_point(&area));
        assert_eq!(e.vel, Vec2::ZERO);
        assert!(e.input_enabled);
        assert_eq!(e.rotation, 0.0);
        assert_eq!(e.depth_override, None);
        assert_eq!(e.fsm.as_ref().unwrap().current(), Some(StateId::Idle));
        assert!(!e.is_dead());
    }

    #[test]
    fn test_steer_combines_axes() {
        let mut e = hero();
        e.input.up = true;
        e.input.right = true;
        steer(&mut e);
        assert_eq!(e.accel, Vec2::new(0.2, -0.2));
    }
}
