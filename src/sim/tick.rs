//! The per-frame simulation pass
//!
//! Fixed order per frame: retarget every enemy, tick every entity
//! (integration + behavior + bounds + collisions, one entity fully before
//! the next), run the contact-range damage sweep, advance the countdown,
//! then settle the round phase. `dt_ms` is elapsed wall milliseconds; the
//! kinematic delta is `dt_ms / FRAME_MS` (1.0 at 60 Hz).

use glam::Vec2;

use crate::consts::FRAME_MS;

use super::enemy::{self, Target};
use super::entity::{Entity, Role};
use super::fsm::FsmCtx;
use super::geom;
use super::hero::{self, InputState};
use super::world::{GameEvent, RoundPhase, RoundState, World};

/// Input sampled for a single frame. Directional flags are held state;
/// `jump` and `place_toilet` are edge triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub place_toilet: bool,
}

/// Advance the world by one frame. Does nothing outside the active phase.
pub fn frame(world: &mut World, input: &FrameInput, dt_ms: f32) {
    world.elapsed_ms += dt_ms as f64;
    if world.phase != RoundPhase::Active {
        return;
    }

    apply_input(world, input);
    retarget(world);

    for i in 0..world.entities.len() {
        entity_tick(world, i, dt_ms);
    }

    contact_damage(world, dt_ms);
    world.round.tick_timer(dt_ms);
    settle_round(world);
}

/// Feed held flags and edge triggers to the hero, honoring the input gate
fn apply_input(world: &mut World, input: &FrameInput) {
    let Some(idx) = world.hero_index() else { return };

    if !world.entities[idx].input_enabled {
        world.entities[idx].input = InputState::default();
        return;
    }

    world.entities[idx].input = InputState {
        up: input.up,
        down: input.down,
        left: input.left,
        right: input.right,
    };

    if input.place_toilet {
        let pos = world.entities[idx].pos;
        world.place_toilet(pos);
    }
    if input.jump {
        let health = world.round.health;
        let World {
            entities, events, ..
        } = world;
        hero::trigger_jump(&mut entities[idx], health, events);
    }
}

/// Recompute every enemy's target before any entity moves, so all agents
/// act on this frame's pick
fn retarget(world: &mut World) {
    let Some(hero_idx) = world.hero_index() else {
        return;
    };
    let hero_id = world.entities[hero_idx].id;
    let detection = world.tuning.toilet_detection_radius;

    for i in 0..world.entities.len() {
        if world.entities[i].role != Role::Enemy {
            continue;
        }
        let pos = world.entities[i].pos;
        let target = enemy::choose_target(pos, hero_id, &world.toilets, detection);
        world.entities[i].target = Some(target);
    }
}

/// One entity's full tick. The body is moved out of the list while it
/// runs, leaving an inert placeholder the collision loop skips as
/// non-solid.
fn entity_tick(world: &mut World, i: usize, dt_ms: f32) {
    let dt = dt_ms / FRAME_MS;
    let mut e = std::mem::take(&mut world.entities[i]);

    e.accel = Vec2::ZERO;
    behave(world, &mut e, dt_ms);
    steer(world, &mut e);
    e.integrate(dt);
    // Behavior runs again after integration so transitions see the
    // post-move position and velocity
    behave(world, &mut e, dt_ms);
    e.apply_bounds(&world.play_area);
    resolve_collisions(world, &mut e, dt_ms);

    world.entities[i] = e;
}

/// Perception plus FSM update for one entity
fn behave(world: &mut World, e: &mut Entity, dt_ms: f32) {
    if e.role == Role::Hero {
        hero::perceive(e, world.round.health, &mut world.events);
    }
    if let Some(mut fsm) = e.fsm.take() {
        let mut ctx = FsmCtx {
            health: world.round.health,
            events: &mut world.events,
        };
        fsm.update(e, &mut ctx, dt_ms);
        e.fsm = Some(fsm);
    }
}

/// Brain dispatch: input for the hero, seek for enemies
fn steer(world: &World, e: &mut Entity) {
    match e.role {
        Role::Hero => hero::steer(e),
        Role::Enemy => {
            let target_pos = resolve_target_pos(world, e.target);
            enemy::steer(e, target_pos);
        }
        Role::Generic => {}
    }
}

fn resolve_target_pos(world: &World, target: Option<Target>) -> Option<Vec2> {
    match target? {
        Target::Hero(id) => world.entity_by_id(id).map(|e| e.pos),
        Target::Toilet(id) => world
            .toilet_by_id(id)
            .filter(|t| !t.destroyed)
            .map(|t| t.pos),
    }
}

/// Collision resolution for one entity against all other solid bodies and
/// all standing toilets.
///
/// Pair rules dispatch on the role pair. Contact damage is owned by the
/// enemy side of an enemy/hero pair, so an overlapping pair is charged
/// exactly once per frame; the hero side only shoves back while a
/// directional input is held.
fn resolve_collisions(world: &mut World, e: &mut Entity, dt_ms: f32) {
    if e.jump.airborne || !e.is_solid {
        return;
    }
    let delta_seconds = dt_ms / 1000.0;

    for j in 0..world.entities.len() {
        // Meeting an airborne body ends collision handling for this
        // entity's frame entirely, toilets included
        if world.entities[j].jump.airborne {
            return;
        }
        let other = &mut world.entities[j];
        if !other.is_solid {
            continue;
        }
        if !geom::circles_overlap(e.pos, other.pos, e.collision_radius, other.collision_radius) {
            continue;
        }

        match (e.role, other.role) {
            (Role::Enemy, Role::Hero) => {
                // Damage without displacement
                let amount = world.tuning.hero_contact_dps * delta_seconds;
                hurt_hero(&mut world.round, other, &mut world.events, amount);
            }
            (Role::Hero, Role::Enemy) => {
                // The hero shoves rivals only while pushing into them
                if e.input.any() {
                    geom::separate(
                        &mut e.pos,
                        &mut other.pos,
                        e.collision_radius,
                        other.collision_radius,
                        &mut world.rng,
                    );
                    resolve_impulse(e, other);
                }
            }
            _ => {
                geom::separate(
                    &mut e.pos,
                    &mut other.pos,
                    e.collision_radius,
                    other.collision_radius,
                    &mut world.rng,
                );
                resolve_impulse(e, other);
            }
        }
    }

    for t in world.toilets.iter_mut() {
        if t.destroyed {
            continue;
        }
        if !geom::circles_overlap(e.pos, t.pos, e.collision_radius, t.collision_radius) {
            continue;
        }

        if e.role == Role::Enemy
            && t.apply_damage(world.tuning.toilet_contact_dps * delta_seconds)
        {
            world.events.push(GameEvent::ToiletDestroyed);
        }

        // Nobody passes through a toilet: push out by the full overlap
        let delta = e.pos - t.pos;
        let dist = delta.length();
        if dist > 0.0 {
            let overlap = (e.collision_radius + t.collision_radius) - dist;
            e.pos += delta / dist * overlap;
        }
        // Hard stop when moving into it, both components
        if e.vel.dot(delta) < 0.0 {
            e.vel = Vec2::ZERO;
        }
    }
}

/// Half-impulse exchange along the collision normal; skipped when the
/// pair is already separating
fn resolve_impulse(e: &mut Entity, other: &mut Entity) {
    let delta = e.pos - other.pos;
    let dist = delta.length();
    if dist == 0.0 {
        return;
    }
    let normal = delta / dist;
    let relative = e.vel - other.vel;
    let along = relative.dot(normal);
    if along > 0.0 {
        return;
    }

    let impulse = along * 0.5;
    e.vel -= normal * impulse;
    if other.can_push_others {
        other.vel += normal * impulse;
    }
}

/// Vitality loss funneled through the round state; the killing blow flips
/// the hero to dead immediately and suppresses the damage event
fn hurt_hero(round: &mut RoundState, hero: &mut Entity, events: &mut Vec<GameEvent>, amount: f32) {
    if round.apply_hero_damage(amount) {
        hero::enter_dead(hero, round.health, events);
    } else {
        events.push(GameEvent::HeroDamaged);
    }
}

/// Post-physics sweep: every enemy within contact range of its target
/// wears it down, whether or not the circles overlap
fn contact_damage(world: &mut World, dt_ms: f32) {
    let delta_seconds = dt_ms / 1000.0;
    let range = world.tuning.contact_range;
    let Some(hero_idx) = world.hero_index() else {
        return;
    };

    for i in 0..world.entities.len() {
        if world.entities[i].role != Role::Enemy {
            continue;
        }
        let (pos, target) = (world.entities[i].pos, world.entities[i].target);

        match target {
            Some(Target::Hero(_)) => {
                if geom::distance(pos, world.entities[hero_idx].pos) <= range {
                    let amount = world.tuning.hero_contact_dps * delta_seconds;
                    let World {
                        entities,
                        round,
                        events,
                        ..
                    } = world;
                    hurt_hero(round, &mut entities[hero_idx], events, amount);
                }
            }
            Some(Target::Toilet(id)) => {
                let amount = world.tuning.toilet_contact_dps * delta_seconds;
                let mut destroyed = false;
                if let Some(t) = world.toilet_by_id_mut(id) {
                    if !t.destroyed && geom::distance(pos, t.pos) <= range {
                        destroyed = t.apply_damage(amount);
                    }
                }
                if destroyed {
                    world.events.push(GameEvent::ToiletDestroyed);
                }
            }
            None => {}
        }
    }
}

/// End the round when vitality or the clock ran out; vitality wins ties
fn settle_round(world: &mut World) {
    if world.round.health <= 0.0 {
        world.end_round(RoundPhase::GameOver);
    } else if world.round.remaining_seconds == 0 {
        world.end_round(RoundPhase::Won);
    }
}
