//! Sky Hopper headless runner
//!
//! Runs a seeded game with a simple autopilot and reports what happened.
//! Usage: `sky-hopper [seed] [ticks] [tuning.json]`

use std::process::ExitCode;

use serde::Serialize;

use sky_hopper::Tuning;
use sky_hopper::consts::SIM_DT;
use sky_hopper::sim::{GameEvent, GameState, Steer, TickInput, tick};

/// Dead zone so the autopilot doesn't jitter over its target
const STEER_DEAD_ZONE: f64 = 5.0;

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    final_score: i64,
    best_score: i64,
    landings: u32,
    platforms_broken: u32,
    bullets_fired: u32,
    deaths: u32,
    game_overs: u32,
}

/// Steer toward the highest bouncy platform below the player
fn autopilot(state: &GameState) -> TickInput {
    let Some(player) = state.player_body() else {
        return TickInput::default();
    };
    let feet = player.centroid().y;
    let target = state
        .query_bodies()
        .iter()
        .filter(|b| b.kind.platform().is_some_and(|k| k.bounces()))
        .filter(|b| b.centroid().y < feet)
        .max_by(|a, b| a.centroid().y.total_cmp(&b.centroid().y));

    let steer = match target {
        Some(platform) => {
            let dx = platform.centroid().x - player.centroid().x;
            if dx > STEER_DEAD_ZONE {
                Steer::Right { held: 0.0 }
            } else if dx < -STEER_DEAD_ZONE {
                Steer::Left { held: 0.0 }
            } else {
                Steer::Release
            }
        }
        None => Steer::Release,
    };
    TickInput { steer: Some(steer) }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(Tuning::from_json(&json)?)
        }
        None => Ok(Tuning::default()),
    }
}

fn run() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed: u64 = args.first().map(|s| s.parse()).transpose()?.unwrap_or(12345);
    let ticks: u64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(3600);
    let tuning = load_tuning(args.get(2).map(String::as_str))?;

    let mut state = GameState::with_tuning(seed, tuning);
    let mut summary = RunSummary {
        seed,
        ticks,
        ..Default::default()
    };

    for _ in 0..ticks {
        let input = autopilot(&state);
        tick(&mut state, &input, SIM_DT);
        summary.best_score = summary.best_score.max(state.score);

        let (events, _visuals) = state.drain_outbox();
        for event in events {
            log::debug!("{:?} ({})", event, event.sound_path());
            match event {
                GameEvent::Landed => summary.landings += 1,
                GameEvent::PlatformBroke => summary.platforms_broken += 1,
                GameEvent::BulletFired => summary.bullets_fired += 1,
                GameEvent::PlayerDied => summary.deaths += 1,
                GameEvent::GameOver => summary.game_overs += 1,
                GameEvent::VillainSpawned => log::info!("Villain arrived at score {}", state.score),
            }
        }
    }

    summary.final_score = state.score;
    state.shutdown();
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sky Hopper (headless) starting...");

    match run() {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("Failed to encode summary: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
