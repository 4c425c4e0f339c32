//! Lane Dodge entry point
//!
//! Runs a headless session at 60 Hz with a simple autopilot so the core can
//! be watched from the log. Pass a tuning JSON file as the first argument to
//! override the defaults. Set `RUST_LOG=debug` for per-entity detail.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use lane_dodge::sim::{EntityKind, FrameInput, GameEvent, GameState, Session};
use lane_dodge::{HeadlessPlatform, Tuning};

/// Frame delta for the headless loop (60 Hz)
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Hard stop for sessions that never end
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Average gap between bonus vehicles from the demo generator
const BONUS_EVERY_MS: f32 = 7000.0;

fn main() {
    env_logger::init();
    log::info!("Lane Dodge (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let mut platform = HeadlessPlatform::new();
    let mut bonus_rng = Pcg32::seed_from_u64(tuning.seed ^ 0xB0B0);
    let mut session = Session::start(tuning, &mut platform);
    let mut since_bonus = 0.0;

    for frame in 0..MAX_FRAMES {
        let input = autopilot(session.state());
        session.update(FRAME_MS, &input, &mut platform);

        since_bonus += FRAME_MS;
        if since_bonus >= BONUS_EVERY_MS {
            since_bonus = 0.0;
            let t = &session.state().tuning;
            let x = bonus_rng.random_range(t.spawn_margin..=t.width - t.spawn_margin);
            let speed = bonus_rng.random_range(120.0..=220.0);
            session.spawn_bonus(x, speed, &mut platform);
        }

        for event in session.drain_events() {
            match event {
                GameEvent::LifeLost { remaining } => log::info!("Hit! {} lives left", remaining),
                GameEvent::LifeGained { current } => log::info!("Bonus! {} lives", current),
                GameEvent::SpawnIntervalChanged { interval_ms } => {
                    log::info!("Spawn interval now {} ms", interval_ms)
                }
                _ => {}
            }
        }

        if frame % 60 == 0 {
            match serde_json::to_string(&session.status()) {
                Ok(json) => log::debug!("{}", json),
                Err(e) => log::warn!("Status serialization failed: {}", e),
            }
        }

        if session.status().menu_requested {
            log::info!("Session over after {} frames", frame + 1);
            break;
        }
    }

    println!("{}", platform.messages.join("\n"));
}

fn load_tuning(path: &str) -> Result<Tuning, String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

/// Steer away from the nearest obstacle in the player's column, toward
/// the nearest bonus otherwise
fn autopilot(state: &GameState) -> FrameInput {
    let player = &state.player;
    let reach = player.size.x;

    let threat = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Obstacle && e.pos.y < player.pos.y)
        .filter(|e| (e.pos.x - player.pos.x).abs() < reach + e.size.x / 2.0)
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(obstacle) = threat {
        let dodge_left = obstacle.pos.x >= player.pos.x && player.pos.x > reach * 2.0;
        let dodge_left = dodge_left || player.pos.x > state.tuning.width - reach * 2.0;
        return FrameInput {
            left: dodge_left,
            right: !dodge_left,
            pointer_x: None,
        };
    }

    let bonus = state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Bonus)
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal));

    FrameInput {
        pointer_x: bonus.map(|b| b.pos.x),
        ..Default::default()
    }
}
