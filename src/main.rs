//! Headless demo driver
//!
//! Runs a scripted round without a renderer: seeds a world, scripts some
//! input, pumps the frame loop at a fixed 60 Hz, routes events to a
//! logging audio sink, and prints the round result.
//!
//! Usage: terrace-rush [seed] [max_frames]
//! Set TERRACE_TUNING to a JSON file to override the built-in balance.

use terrace_rush::audio::{AudioSink, CueRouter, SoundCue};
use terrace_rush::consts::FRAME_MS;
use terrace_rush::sim::{FrameInput, RoundPhase, World, frame};
use terrace_rush::tuning::Tuning;
use terrace_rush::view;

struct LoggingSink;

impl AudioSink for LoggingSink {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("cue: {cue:?}");
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(0xC0FFEE);
    let max_frames: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(7200);

    let tuning = match std::env::var("TERRACE_TUNING") {
        Ok(path) => Tuning::load_or_default(path),
        Err(_) => Tuning::default(),
    };

    log::info!(
        "seed {seed}, {} rivals, {} s round",
        tuning.enemy_count,
        tuning.round_seconds
    );

    let mut world = World::new(seed, tuning);
    world.start_round();
    world.finish_onboarding();

    let mut router = CueRouter::new();
    let mut sink = LoggingSink;

    for n in 0..max_frames {
        // Scripted pilot: run left, hop every few seconds, drop a toilet
        // once a second for the first ten seconds
        let input = FrameInput {
            left: true,
            up: n % 360 < 60,
            jump: n % 240 == 0,
            place_toilet: n % 60 == 0 && n < 600,
            ..FrameInput::default()
        };

        frame(&mut world, &input, FRAME_MS);
        let visuals = view::render(&mut world, FRAME_MS);

        let events = world.drain_events();
        router.route(&events, world.elapsed_ms, &mut sink);

        if n % 600 == 0 {
            log::info!(
                "t={} health={:.0} toilets={} drawn={}",
                world.round.format_clock(),
                world.round.health,
                world.active_toilet_count(),
                visuals.len()
            );
        }

        if world.phase != RoundPhase::Active {
            break;
        }
    }

    let verdict = match world.phase {
        RoundPhase::Won => "survived",
        RoundPhase::GameOver => "overrun",
        _ => "interrupted",
    };
    println!(
        "{verdict}: health {:.0}/{:.0}, clock {}, toilets left {}",
        world.round.health,
        world.round.max_health,
        world.round.format_clock(),
        world.round.toilet_budget
    );
}
