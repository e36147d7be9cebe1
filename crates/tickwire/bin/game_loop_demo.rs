//! # Fixed-Step Game Loop Demo
//!
//! Wires every tickwire primitive into a small real-time loop:
//!
//! - An **input thread** pushes timestamped key presses into an SPSC `Queue`
//!   (overwriting the oldest if the loop falls behind).
//! - The **simulation loop** runs on a 60 Hz `Clock`, pushes one `Snapshot`
//!   per iteration into a `SnapshotCache`, maps each input back to the frame it
//!   happened in, and drives a `ScheduledAction` respawn timer.
//! - A **render thread** reads the latest world state from a `DoubleBuffer`.
//! - A **telemetry thread** follows an SPMC `RingBuffer` of frame events with
//!   its own `Cursor` and reports how many it missed.
//! - Halfway through the loop pauses for a moment, then resumes at 2x speed.
//!
//! ## Running
//!
//! ```bash
//! # Quick mode (0.5 s of simulation)
//! cargo run -p tickwire --features demo --bin game_loop_demo --release -- --quick
//!
//! # With per-frame debug logs
//! RUST_LOG=tickwire=debug cargo run -p tickwire --features demo --bin game_loop_demo -- --verbose
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tickwire::{
    Buffer, CacheMatchStatus, Clock, ClockConfig, DoubleBuffer, Duration, Queue, RingBuffer,
    ScheduledAction, SnapshotCache, SteadyClock, TimeSource, FIXED_60HZ_CONFIG,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

// =============================================================================
// EVENTS & STATE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Input {
    #[default]
    None,
    Jump {
        at: Duration,
    },
    Fire {
        at: Duration,
    },
}

#[derive(Debug, Clone, Copy, Default)]
enum FrameEvent {
    #[default]
    Idle,
    Stepped {
        frame: u64,
    },
    Jumped {
        frame: u64,
    },
    Fired {
        frame: u64,
    },
    Respawned {
        frame: u64,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct World {
    frame: u64,
    height: f32,
    shots: u32,
    alpha: f64,
}

struct Options {
    run_for: Duration,
    verbose: bool,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let quick = args.iter().any(|a| a == "--quick");
        Self {
            run_for: Duration::from_secs_f64(if quick { 0.5 } else { 2.0 }),
            verbose: args.iter().any(|a| a == "--verbose"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::from_args();

    let default_level = if options.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let source = SteadyClock::new();
    let config: ClockConfig = FIXED_60HZ_CONFIG;
    let mut clock = Clock::from_config(config, source)?;
    info!(
        tick_rate_hz = config.tick_rate_hz,
        tick = %clock.tick_duration(),
        "starting simulation"
    );

    let inputs = Arc::new(Queue::<Input, 32>::new());
    let frame_events = Arc::new(RingBuffer::<FrameEvent, 256>::new());
    let world = Arc::new(DoubleBuffer::new(World::default()));
    let snapshots = SnapshotCache::<128>::new();
    let running = Arc::new(AtomicBool::new(true));

    // -------------------------------------------------------------------------
    // INPUT THREAD
    // -------------------------------------------------------------------------
    let input_thread = {
        let inputs = Arc::clone(&inputs);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut presses = 0u32;
            while running.load(Ordering::Acquire) {
                let at = source.now();
                inputs.push(if presses % 3 == 0 {
                    Input::Jump { at }
                } else {
                    Input::Fire { at }
                });
                presses += 1;
                thread::sleep(std::time::Duration::from_millis(37));
            }
            presses
        })
    };

    // -------------------------------------------------------------------------
    // RENDER THREAD
    // -------------------------------------------------------------------------
    let render_thread = {
        let world = Arc::clone(&world);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut rendered = 0u64;
            let mut last_frame = 0;
            while running.load(Ordering::Acquire) {
                let state = world.read();
                if state.frame != last_frame {
                    last_frame = state.frame;
                    rendered += 1;
                }
                thread::sleep(std::time::Duration::from_millis(8));
            }
            rendered
        })
    };

    // -------------------------------------------------------------------------
    // TELEMETRY THREAD
    // -------------------------------------------------------------------------
    let telemetry_thread = {
        let frame_events = Arc::clone(&frame_events);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut cursor = frame_events.cursor_at(0);
            let (mut jumps, mut shots, mut respawns) = (0u32, 0u32, 0u32);
            loop {
                match cursor.next_with_backoff() {
                    Some(FrameEvent::Jumped { .. }) => jumps += 1,
                    Some(FrameEvent::Fired { .. }) => shots += 1,
                    Some(FrameEvent::Respawned { frame }) => {
                        respawns += 1;
                        debug!(frame, "respawn observed");
                    }
                    Some(FrameEvent::Stepped { .. } | FrameEvent::Idle) => {}
                    None if !running.load(Ordering::Acquire) && cursor.pending() == 0 => break,
                    None => thread::sleep(std::time::Duration::from_millis(1)),
                }
            }
            (jumps, shots, respawns, cursor.missed())
        })
    };

    // -------------------------------------------------------------------------
    // SIMULATION LOOP
    // -------------------------------------------------------------------------
    let mut respawn = ScheduledAction::new(Duration::from_millis(250.0));
    let mut state = World::default();
    let mut last_frame = 0u64;
    let mut phase = 0;
    let mut stale_inputs = 0u32;

    while clock.real_time() < options.run_for {
        let snapshot = clock.snapshot();
        snapshots.push(snapshot);

        // pause at 40%, resume at double speed at 55%
        let progress = clock.real_time() / options.run_for;
        if phase == 0 && progress > 0.4 {
            clock.set_time_scale(0.0)?;
            info!(frame = snapshot.frame, "paused");
            phase = 1;
        } else if phase == 1 && progress > 0.55 {
            clock.set_time_scale(2.0)?;
            info!(frame = snapshot.frame, "resumed at 2x");
            phase = 2;
        }

        while let Some(input) = inputs.pop_front() {
            let at = match input {
                Input::Jump { at } | Input::Fire { at } => at,
                Input::None => continue,
            };
            let (origin, status) = snapshots.find_by_time(at);
            if status != CacheMatchStatus::Matched {
                stale_inputs += 1;
                warn!(?status, at = %at, "input outside snapshot history");
                continue;
            }
            let event = match input {
                Input::Jump { .. } => {
                    state.height = 1.0;
                    FrameEvent::Jumped {
                        frame: origin.frame,
                    }
                }
                _ => {
                    state.shots += 1;
                    FrameEvent::Fired {
                        frame: origin.frame,
                    }
                }
            };
            frame_events.push(event);
        }

        for frame in last_frame..snapshot.frame {
            state.height = (state.height - 0.05).max(0.0);
            frame_events.push(FrameEvent::Stepped { frame: frame + 1 });
        }

        let tick = snapshot.tick_duration;
        respawn.update(tick * (snapshot.frame - last_frame));
        if respawn.is_complete() {
            frame_events.push(FrameEvent::Respawned {
                frame: snapshot.frame,
            });
            respawn.reset(Duration::from_millis(250.0));
        }

        last_frame = snapshot.frame;
        state.frame = snapshot.frame;
        state.alpha = snapshot.alpha();
        world.write(state);

        thread::sleep(std::time::Duration::from_millis(2));
    }

    running.store(false, Ordering::Release);

    let presses = input_thread.join().map_err(|_| "input thread panicked")?;
    let rendered = render_thread.join().map_err(|_| "render thread panicked")?;
    let (jumps, shots, respawns, missed) = telemetry_thread
        .join()
        .map_err(|_| "telemetry thread panicked")?;

    info!(
        frames = clock.ticks(),
        game_time = %clock.game_time(),
        real_time = %clock.real_time(),
        "simulation finished"
    );
    info!(presses, stale_inputs, jumps, shots, "input");
    info!(rendered, "render");
    info!(respawns, missed, events = frame_events.write_head(), "telemetry");

    Ok(())
}
