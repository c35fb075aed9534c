//! Terrace Rush - a top-down stadium survival arcade sim
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, FSM, collisions, round state)
//! - `view`: Rendering-side contract (visual records the sim writes)
//! - `audio`: Audio-side contract (cues, sink trait, rate limiting)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod sim;
pub mod tuning;
pub mod view;

pub use tuning::Tuning;

/// Engine-level constants. Balance knobs live in [`tuning::Tuning`].
pub mod consts {
    /// Milliseconds of one nominal 60 Hz frame. The integration delta of a
    /// frame is `dt_ms / FRAME_MS`, so 1.0 at 60 Hz.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Exponential velocity damping base, applied as `FRICTION^dt` per tick
    pub const FRICTION_FACTOR: f32 = 0.95;
    /// Speed below which a body reads as standing still
    pub const IDLE_SPEED_THRESHOLD: f32 = 0.2;

    /// Body defaults
    pub const DEFAULT_MAX_ACCELERATION: f32 = 0.2;
    pub const DEFAULT_MAX_VELOCITY: f32 = 3.0;
    pub const DEFAULT_COLLISION_RADIUS: f32 = 18.0;
    pub const TOILET_COLLISION_RADIUS: f32 = 20.0;

    /// Animation playback rate per unit of speed per frame unit
    pub const ANIMATION_RATE_FACTOR: f32 = 0.05;

    /// Death cosmetics: slide distance and forced draw-order key
    pub const DEATH_SLIDE_X: f32 = 100.0;
    pub const DEATH_DEPTH_KEY: i32 = 9999;

    /// Minimum interval between two damage sound cues
    pub const DAMAGE_CUE_THROTTLE_MS: f64 = 500.0;
}

/// Convert radians to degrees
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}
