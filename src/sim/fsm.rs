//! Per-entity behavioral state machine
//!
//! A small typed FSM: each registered state pairs an enter hook with an
//! update hook, both plain function pointers receiving the owning entity
//! and an explicit context. Transitions are imperative and decided by the
//! owner's perception pass; there is no transition table or guard concept.

use super::entity::Entity;
use super::world::GameEvent;

/// Behavioral state tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateId {
    Idle,
    Walk,
    Jump,
    Dead,
}

/// Context handed to state hooks. Carries the round data a hook may read
/// and the event queue it may append to, nothing else.
pub struct FsmCtx<'a> {
    /// Current player vitality
    pub health: f32,
    /// Frame event queue (sound cues, round notifications)
    pub events: &'a mut Vec<GameEvent>,
}

pub type EnterFn = fn(&mut Entity, &mut FsmCtx);
pub type UpdateFn = fn(&mut Entity, &mut FsmCtx, f32);

fn noop_enter(_: &mut Entity, _: &mut FsmCtx) {}
fn noop_update(_: &mut Entity, _: &mut FsmCtx, _: f32) {}

/// Hook pair for one state
#[derive(Debug, Clone, Copy)]
pub struct StateHandlers {
    pub on_enter: EnterFn,
    pub on_update: UpdateFn,
}

impl Default for StateHandlers {
    fn default() -> Self {
        Self {
            on_enter: noop_enter,
            on_update: noop_update,
        }
    }
}

/// Outcome of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed and its enter hook ran
    Entered,
    /// Requested state was already current, nothing ran
    AlreadyCurrent,
    /// State not registered on this machine, nothing ran
    Unknown,
}

/// State container owned by exactly one entity.
///
/// Inactive until the first successful `set_state`; the render layer uses
/// [`Fsm::is_active`] to decide whether the machine owns the animation
/// label.
#[derive(Debug, Clone, Default)]
pub struct Fsm {
    states: Vec<(StateId, StateHandlers)>,
    current: Option<StateId>,
}

impl Fsm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state, replacing any previous registration for the tag
    pub fn add_state(&mut self, id: StateId, handlers: StateHandlers) {
        if let Some(slot) = self.states.iter_mut().find(|(s, _)| *s == id) {
            slot.1 = handlers;
        } else {
            self.states.push((id, handlers));
        }
    }

    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    /// True once any state has been entered
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Request a transition. Re-entering the current state is a no-op;
    /// otherwise the enter hook runs exactly once. Unknown tags warn and
    /// change nothing.
    pub fn set_state(&mut self, id: StateId, entity: &mut Entity, ctx: &mut FsmCtx) -> Transition {
        if self.current == Some(id) {
            return Transition::AlreadyCurrent;
        }
        let Some(&(_, handlers)) = self.states.iter().find(|(s, _)| *s == id) else {
            log::warn!("entity {}: unknown fsm state {:?}", entity.id, id);
            return Transition::Unknown;
        };
        self.current = Some(id);
        (handlers.on_enter)(entity, ctx);
        Transition::Entered
    }

    /// Run the current state's update hook
    pub fn update(&mut self, entity: &mut Entity, ctx: &mut FsmCtx, dt_ms: f32) {
        let Some(current) = self.current else { return };
        if let Some(&(_, handlers)) = self.states.iter().find(|(s, _)| *s == current) {
            (handlers.on_update)(entity, ctx, dt_ms);
        }
    }
}
