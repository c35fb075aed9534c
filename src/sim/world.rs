//! World state and round-level machine
//!
//! Owns the entity set, the toilet list, the seeded RNG, and the
//! round-scoped counters (vitality, countdown, toilet budget). All counter
//! mutation funnels through named operations on [`RoundState`] so the
//! clamping invariants live in one place. Round phases follow
//! not-started -> onboarding -> active -> (game-over | won) -> active.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::TOILET_COLLISION_RADIUS;
use crate::tuning::Tuning;

use super::entity::{Entity, EntityId, Role};
use super::geom::Rect;
use super::{enemy, hero};

pub type ToiletId = u32;

/// Notifications the sim emits for the audio and overlay collaborators.
/// Drained once per frame; the sim never waits on a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    GameOver,
    RoundWon,
    HeroDamaged,
    HeroDied,
    HeroJumped,
    ToiletPlaced,
    ToiletRejected,
    ToiletDestroyed,
}

/// Round phase at the world level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    NotStarted,
    Onboarding,
    Active,
    GameOver,
    Won,
}

/// A placed distraction object. Destructible, never moves, blocks bodies,
/// and draws nearby enemies away from the hero.
#[derive(Debug, Clone)]
pub struct Toilet {
    pub id: ToiletId,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub destroyed: bool,
    pub collision_radius: f32,
}

impl Toilet {
    pub fn new(id: ToiletId, pos: Vec2, hp: f32) -> Self {
        Self {
            id,
            pos,
            hp,
            max_hp: hp,
            destroyed: false,
            collision_radius: TOILET_COLLISION_RADIUS,
        }
    }

    /// Apply damage; returns true when this call destroyed it
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.destroyed {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.destroyed = true;
            return true;
        }
        false
    }
}

/// Round-scoped counters. Non-negativity and clamping are enforced here
/// and nowhere else.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub health: f32,
    pub max_health: f32,
    pub remaining_seconds: u32,
    pub toilet_budget: u32,
    timer_accumulator_ms: f32,
}

impl RoundState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            remaining_seconds: tuning.round_seconds,
            toilet_budget: tuning.toilet_budget,
            timer_accumulator_ms: 0.0,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Subtract vitality, clamped to zero. Returns true while at zero.
    pub fn apply_hero_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount).max(0.0);
        self.health <= 0.0
    }

    /// Advance the countdown by elapsed milliseconds. One whole second is
    /// consumed per 1000 ms accumulated; fractional remainders carry over
    /// and the counter never goes below zero.
    pub fn tick_timer(&mut self, dt_ms: f32) {
        if self.remaining_seconds == 0 {
            return;
        }
        self.timer_accumulator_ms += dt_ms;
        while self.timer_accumulator_ms >= 1000.0 && self.remaining_seconds > 0 {
            self.timer_accumulator_ms -= 1000.0;
            self.remaining_seconds -= 1;
        }
    }

    /// Take one unit of toilet budget; false when exhausted
    pub fn consume_toilet(&mut self) -> bool {
        if self.toilet_budget == 0 {
            return false;
        }
        self.toilet_budget -= 1;
        true
    }

    /// Vitality as a 0..=1 ratio for the health bar
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Countdown formatted as `M:SS` for the HUD
    pub fn format_clock(&self) -> String {
        format!(
            "{}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}

/// The whole simulation: bounded field, bodies, toilets, round counters,
/// and the seeded RNG every random decision draws from
#[derive(Debug)]
pub struct World {
    pub play_area: Rect,
    pub tuning: Tuning,
    pub entities: Vec<Entity>,
    pub toilets: Vec<Toilet>,
    pub round: RoundState,
    pub phase: RoundPhase,
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    /// Simulation clock in milliseconds, advanced every frame call
    pub elapsed_ms: f64,
    next_entity_id: EntityId,
    next_toilet_id: ToiletId,
}

impl World {
    /// Build a world with the hero at its spawn point and the configured
    /// crowd of enemies scattered at a safe distance
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let play_area = Rect::new(0.0, 0.0, tuning.play_width, tuning.play_height);
        let mut world = Self {
            play_area,
            round: RoundState::new(&tuning),
            tuning,
            entities: Vec::new(),
            toilets: Vec::new(),
            phase: RoundPhase::NotStarted,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            elapsed_ms: 0.0,
            next_entity_id: 1,
            next_toilet_id: 1,
        };

        let hero_id = world.alloc_entity_id();
        let mut hero = hero::new_hero(hero_id, &world.play_area, &world.tuning);
        hero.vel = enemy::scatter_velocity(&mut world.rng);
        world.entities.push(hero);

        let hero_spawn = hero::spawn_point(&world.play_area);
        for _ in 0..world.tuning.enemy_count {
            let pos = enemy::scatter_position(
                &world.play_area,
                hero_spawn,
                world.tuning.min_enemy_spawn_distance,
                &mut world.rng,
            );
            world.spawn_enemy_at(pos);
        }

        log::info!(
            "world ready: seed {seed}, {} entities, {}x{} field",
            world.entities.len(),
            world.play_area.width,
            world.play_area.height
        );
        world
    }

    fn alloc_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Add one enemy at an explicit position
    pub fn spawn_enemy_at(&mut self, pos: Vec2) -> EntityId {
        let id = self.alloc_entity_id();
        let mut e = enemy::new_enemy(id, pos, &self.tuning);
        e.vel = enemy::scatter_velocity(&mut self.rng);
        self.entities.push(e);
        id
    }

    pub fn hero_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.role == Role::Hero)
    }

    pub fn hero(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.role == Role::Hero)
    }

    pub fn hero_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.role == Role::Hero)
    }

    pub fn entity_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn toilet_by_id(&self, id: ToiletId) -> Option<&Toilet> {
        self.toilets.iter().find(|t| t.id == id)
    }

    pub fn toilet_by_id_mut(&mut self, id: ToiletId) -> Option<&mut Toilet> {
        self.toilets.iter_mut().find(|t| t.id == id)
    }

    /// Toilets still standing
    pub fn active_toilet_count(&self) -> usize {
        self.toilets.iter().filter(|t| !t.destroyed).count()
    }

    /// Hand the frame's events to the caller, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Freeze or unfreeze all agents: hero input gate plus enemy brains
    pub fn set_agents_enabled(&mut self, enabled: bool) {
        for e in &mut self.entities {
            match e.role {
                Role::Hero => {
                    e.input_enabled = enabled;
                    if !enabled {
                        e.input = Default::default();
                    }
                }
                Role::Enemy => e.active = enabled,
                Role::Generic => {}
            }
        }
    }

    /// Enter onboarding with everything frozen and counters restored
    pub fn start_round(&mut self) {
        self.phase = RoundPhase::Onboarding;
        self.set_agents_enabled(false);
        self.round.health = self.round.max_health;
        self.round.toilet_budget = self.tuning.toilet_budget;
        log::info!("onboarding started");
    }

    /// Leave onboarding and let the round run
    pub fn finish_onboarding(&mut self) {
        self.phase = RoundPhase::Active;
        self.set_agents_enabled(true);
        self.events.push(GameEvent::RoundStarted);
        log::info!("round active");
    }

    /// Full round reset: counters, toilets cleared, hero back at spawn,
    /// enemies re-scattered away from the spawn, straight into the active
    /// phase
    pub fn restart(&mut self) {
        self.toilets.clear();
        self.round.reset(&self.tuning);

        let area = self.play_area;
        let hero_spawn = hero::spawn_point(&area);
        let health = self.round.health;
        let min_distance = self.tuning.min_enemy_spawn_distance;

        for i in 0..self.entities.len() {
            match self.entities[i].role {
                Role::Hero => {
                    hero::reset(&mut self.entities[i], &area, health, &mut self.events);
                }
                Role::Enemy => {
                    let pos =
                        enemy::scatter_position(&area, hero_spawn, min_distance, &mut self.rng);
                    enemy::reset(&mut self.entities[i], pos, &mut self.rng);
                }
                Role::Generic => {}
            }
        }

        self.phase = RoundPhase::Active;
        self.set_agents_enabled(true);
        self.events.push(GameEvent::RoundStarted);
        log::info!("round restarted");
    }

    /// End the active round. Vitality loss wins over the clock when both
    /// trip on the same frame.
    pub fn end_round(&mut self, phase: RoundPhase) {
        debug_assert!(matches!(phase, RoundPhase::GameOver | RoundPhase::Won));
        self.phase = phase;
        self.set_agents_enabled(false);
        self.events.push(match phase {
            RoundPhase::Won => GameEvent::RoundWon,
            _ => GameEvent::GameOver,
        });
        log::info!("round ended: {phase:?}");
    }

    /// Place a toilet, spending one budget unit. Exhausted budget rejects
    /// with an event for the error cue, never an error value.
    pub fn place_toilet(&mut self, pos: Vec2) -> Option<ToiletId> {
        if !self.round.consume_toilet() {
            self.events.push(GameEvent::ToiletRejected);
            return None;
        }
        self.events.push(GameEvent::ToiletPlaced);
        let id = self.next_toilet_id;
        self.next_toilet_id += 1;
        self.toilets
            .push(Toilet::new(id, pos, self.tuning.toilet_hp));
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        let tuning = Tuning {
            enemy_count: 3,
            ..Tuning::default()
        };
        World::new(99, tuning)
    }

    #[test]
    fn test_new_world_population() {
        let w = small_world();
        assert_eq!(w.entities.len(), 4);
        assert_eq!(w.entities[0].role, Role::Hero);
        assert_eq!(w.phase, RoundPhase::NotStarted);

        // All ids unique
        let mut ids: Vec<_> = w.entities.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut round = RoundState::new(&Tuning::default());
        round.health = 6.0;
        assert!(round.apply_hero_damage(10.0));
        assert_eq!(round.health, 0.0);
    }

    #[test]
    fn test_timer_carries_fractional_remainder() {
        let mut round = RoundState::new(&Tuning::default());
        assert_eq!(round.remaining_seconds, 60);
        round.tick_timer(1000.0);
        round.tick_timer(500.0);
        assert_eq!(round.remaining_seconds, 59);
        // The 500 ms remainder completes the next second
        round.tick_timer(500.0);
        assert_eq!(round.remaining_seconds, 58);
    }

    #[test]
    fn test_timer_stops_at_zero() {
        let mut round = RoundState::new(&Tuning::default());
        round.remaining_seconds = 1;
        round.tick_timer(5000.0);
        assert_eq!(round.remaining_seconds, 0);
        round.tick_timer(5000.0);
        assert_eq!(round.remaining_seconds, 0);
    }

    #[test]
    fn test_format_clock() {
        let mut round = RoundState::new(&Tuning::default());
        assert_eq!(round.format_clock(), "1:00");
        round.remaining_seconds = 59;
        assert_eq!(round.format_clock(), "0:59");
        round.remaining_seconds = 5;
        assert_eq!(round.format_clock(), "0:05");
    }

    #[test]
    fn test_toilet_budget_rejection() {
        let mut w = small_world();
        w.round.toilet_budget = 1;
        assert!(w.place_toilet(Vec2::new(10.0, 10.0)).is_some());
        assert!(w.place_toilet(Vec2::new(20.0, 20.0)).is_none());

        let events = w.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::ToiletPlaced, GameEvent::ToiletRejected]
        );
        assert_eq!(w.toilets.len(), 1);
    }

    #[test]
    fn test_toilet_destruction() {
        let mut t = Toilet::new(1, Vec2::ZERO, 100.0);
        assert!(!t.apply_damage(60.0));
        assert!(t.apply_damage(60.0));
        assert!(t.destroyed);
        assert_eq!(t.hp, 0.0);
        // Further damage reports nothing new
        assert!(!t.apply_damage(10.0));
    }

    #[test]
    fn test_restart_round_trip() {
        let mut w = small_world();
        w.start_round();
        w.finish_onboarding();
        w.round.health = 10.0;
        w.round.toilet_budget = 2;
        w.round.remaining_seconds = 3;
        w.place_toilet(Vec2::new(100.0, 100.0));
        w.drain_events();

        w.restart();
        assert_eq!(w.phase, RoundPhase::Active);
        assert_eq!(w.round.health, w.round.max_health);
        assert_eq!(w.round.remaining_seconds, w.tuning.round_seconds);
        assert_eq!(w.round.toilet_budget, w.tuning.toilet_budget);
        assert_eq!(w.active_toilet_count(), 0);
        assert!(w.drain_events().contains(&GameEvent::RoundStarted));

        // Every enemy respawned clear of the hero spawn
        let spawn = hero::spawn_point(&w.play_area);
        for e in w.entities.iter().filter(|e| e.role == Role::Enemy) {
            assert!(super::super::geom::distance(e.pos, spawn) >= 200.0);
            assert!(e.active);
        }
        assert!(w.hero().unwrap().input_enabled);
    }

    #[test]
    fn test_freeze_clears_held_input() {
        let mut w = small_world();
        w.finish_onboarding();
        w.hero_mut().unwrap().input.left = true;
        w.set_agents_enabled(false);
        assert!(!w.hero().unwrap().input.any());
        assert!(!w.hero().unwrap().input_enabled);
        assert!(w.entities.iter().filter(|e| e.role == Role::Enemy).all(|e| !e.active));
    }
}
