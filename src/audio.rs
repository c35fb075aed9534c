//! Audio-side contract
//!
//! The sim never plays sound. It emits [`GameEvent`]s; the cue router maps
//! them to fire-and-forget cues on whatever sink the embedding provides,
//! rate-limiting the damage cue so a crowd grinding on the hero doesn't
//! machine-gun the speaker.

use crate::consts::DAMAGE_CUE_THROTTLE_MS;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Hero took a hit
    Damage,
    /// Hero died
    Death,
    /// Hero left the ground
    Jump,
    /// Toilet placed
    PutItem,
    /// Action rejected (no budget left)
    Error,
}

/// Anything that can play a cue. Calls must not block the frame.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that swallows everything (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Maps drained frame events to cues. Owns the damage throttle clock.
#[derive(Debug)]
pub struct CueRouter {
    last_damage_ms: f64,
    throttle_ms: f64,
}

impl Default for CueRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl CueRouter {
    pub fn new() -> Self {
        Self {
            // Far enough in the past that the first damage cue always plays
            last_damage_ms: f64::MIN,
            throttle_ms: DAMAGE_CUE_THROTTLE_MS,
        }
    }

    /// Route one frame's events. `now_ms` is the simulation clock.
    pub fn route(&mut self, events: &[GameEvent], now_ms: f64, sink: &mut dyn AudioSink) {
        for event in events {
            match event {
                GameEvent::HeroDamaged => {
                    if now_ms - self.last_damage_ms < self.throttle_ms {
                        continue;
                    }
                    self.last_damage_ms = now_ms;
                    sink.play(SoundCue::Damage);
                }
                GameEvent::HeroDied => sink.play(SoundCue::Death),
                GameEvent::HeroJumped => sink.play(SoundCue::Jump),
                GameEvent::ToiletPlaced => sink.play(SoundCue::PutItem),
                GameEvent::ToiletRejected => sink.play(SoundCue::Error),
                // Round transitions and toilet destruction are overlay
                // concerns, not cues
                GameEvent::RoundStarted
                | GameEvent::GameOver
                | GameEvent::RoundWon
                | GameEvent::ToiletDestroyed => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        played: Vec<SoundCue>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, cue: SoundCue) {
            self.played.push(cue);
        }
    }

    #[test]
    fn test_cue_mapping() {
        let mut router = CueRouter::new();
        let mut sink = RecordingSink::default();
        router.route(
            &[
                GameEvent::HeroJumped,
                GameEvent::ToiletPlaced,
                GameEvent::ToiletRejected,
                GameEvent::HeroDied,
                GameEvent::RoundStarted,
            ],
            0.0,
            &mut sink,
        );
        assert_eq!(
            sink.played,
            vec![
                SoundCue::Jump,
                SoundCue::PutItem,
                SoundCue::Error,
                SoundCue::Death
            ]
        );
    }

    #[test]
    fn test_damage_cue_throttled() {
        let mut router = CueRouter::new();
        let mut sink = RecordingSink::default();

        // Damage every 100 ms for a second: only t=0, t=500 get through
        for i in 0..10 {
            router.route(&[GameEvent::HeroDamaged], i as f64 * 100.0, &mut sink);
        }
        assert_eq!(sink.played, vec![SoundCue::Damage, SoundCue::Damage]);
    }

    #[test]
    fn test_damage_throttle_does_not_gate_other_cues() {
        let mut router = CueRouter::new();
        let mut sink = RecordingSink::default();
        router.route(
            &[GameEvent::HeroDamaged, GameEvent::HeroDamaged, GameEvent::HeroJumped],
            0.0,
            &mut sink,
        );
        assert_eq!(sink.played, vec![SoundCue::Damage, SoundCue::Jump]);
    }
}
