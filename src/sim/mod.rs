//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One clock (milliseconds per frame), no wall time
//! - Seeded RNG only, owned by the world
//! - Stable entity iteration order (insertion order, hero first)
//! - No rendering or platform dependencies

pub mod enemy;
pub mod entity;
pub mod fsm;
pub mod geom;
pub mod hero;
pub mod tick;
pub mod world;

pub use enemy::Target;
pub use entity::{Animation, AnimationSet, Entity, EntityId, Role};
pub use fsm::{Fsm, FsmCtx, StateHandlers, StateId, Transition};
pub use geom::{Rect, circles_overlap, clamp_magnitude, distance, separate};
pub use hero::{InputState, JumpState};
pub use tick::{FrameInput, frame};
pub use world::{GameEvent, RoundPhase, RoundState, Toilet, ToiletId, World};
