//! Per-frame simulation step
//!
//! Core game loop that advances simulation deterministically. The order of
//! the steps inside `tick` is fixed: gravity, integration, villain, landing,
//! platforms, scroll, wrap, game over, score.

use super::body::{Body, BodyId, BodyKind};
use super::collision::{check_villain_bullet_collision, find_collision_with_user_bottom, user_bounce};
use super::events::GameEvent;
use super::geometry::Vector2;
use super::platforms::bounce_off_walls;
use super::scene::Scene;
use super::state::{GamePhase, GameState};
use super::villain::{despawn, update_villain};
use crate::tuning::Tuning;

/// Horizontal steering requested by input handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    /// Left key held for `held` seconds
    Left { held: f64 },
    /// Right key held for `held` seconds
    Right { held: f64 },
    /// Direction key released
    Release,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// `None` leaves the player's horizontal velocity alone
    pub steer: Option<Steer>,
}

/// Translate a steering command into horizontal velocity
pub fn apply_steer(player: &mut Body, steer: Steer, tuning: &Tuning) {
    let vx = match steer {
        Steer::Left { held } => -(tuning.steer_base + tuning.steer_rate * held),
        Steer::Right { held } => tuning.steer_base + tuning.steer_rate * held,
        Steer::Release => 0.0,
    };
    player.set_horizontal_velocity(vx);
}

#[inline]
pub fn apply_gravity(player: &mut Body, gravity: f64, dt: f64) {
    player.velocity.y -= gravity * dt;
}

/// Keep the player at the scroll line by moving the world down instead
///
/// Every body except the villain shifts by the player's overshoot. Returns
/// the distance scrolled.
pub fn screen_move(scene: &mut Scene, player: BodyId, tuning: &Tuning) -> f64 {
    let Some(y) = scene.get(player).map(|p| p.centroid().y) else {
        return 0.0;
    };
    let threshold = tuning.scroll_threshold();
    if y <= threshold {
        return 0.0;
    }

    let shift = Vector2::new(0.0, -(y - threshold));
    for body in scene.bodies_mut() {
        if body.kind != BodyKind::Villain {
            body.translate(shift);
        }
    }
    y - threshold
}

/// Leaving one side of the screen re-enters from the other
pub fn wrap_edges(body: &mut Body, tuning: &Tuning) {
    let c = body.centroid();
    if c.x > tuning.screen_max.x {
        body.set_centroid(Vector2::new(tuning.screen_min.x, c.y));
    } else if c.x < tuning.screen_min.x {
        body.set_centroid(Vector2::new(tuning.screen_max.x, c.y));
    }
}

/// Score is how far the marker has been scrolled down
pub fn calculate_score(scene: &Scene, marker: BodyId) -> i64 {
    scene
        .get(marker)
        .map(|m| (-m.centroid().y) as i64)
        .unwrap_or(0)
}

/// Fell off the bottom or got shot
pub fn check_game_over(state: &mut GameState) -> bool {
    let Some(player) = state.scene.get(state.player) else {
        return true;
    };
    if player.centroid().y < state.tuning.screen_min.y {
        return true;
    }
    check_villain_bullet_collision(&state.scene, state.player, &mut state.outbox)
}

/// Start the run over with the same tuning, continuing the RNG stream
pub fn reset_game(state: &mut GameState) {
    if let Some(marker) = state.scene.get_mut(state.marker) {
        marker.set_centroid(Vector2::ZERO);
    }
    state.score = 0;

    let start = state.tuning.player_start;
    if let Some(player) = state.scene.get_mut(state.player) {
        player.set_centroid(start);
        player.velocity = Vector2::ZERO;
    }

    state.villain = despawn(state.villain, &mut state.scene, &mut state.outbox);
    state
        .platforms
        .clear(&mut state.scene, &mut state.outbox);
    state.platforms.init(
        &mut state.scene,
        &mut state.rng,
        &state.tuning,
        &mut state.outbox,
    );

    state.phase = GamePhase::Playing;
    log::info!("Game reset after {} ticks", state.time_ticks);
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) {
    if let GamePhase::GameOver { timer } = state.phase {
        let timer = timer + dt;
        if timer > state.tuning.game_over_delay {
            reset_game(state);
        } else {
            state.phase = GamePhase::GameOver { timer };
        }
        return;
    }

    state.time_ticks += 1;
    let tuning = &state.tuning;

    if let Some(player) = state.scene.get_mut(state.player) {
        if let Some(steer) = input.steer {
            apply_steer(player, steer, tuning);
        }
        apply_gravity(player, tuning.gravity, dt);
    }

    state.scene.advance(dt);

    state.villain = update_villain(
        state.villain,
        state.score,
        &mut state.scene,
        tuning,
        dt,
        &mut state.outbox,
    );

    if find_collision_with_user_bottom(&mut state.scene, state.player, tuning, &mut state.outbox) {
        if let Some(player) = state.scene.get_mut(state.player) {
            user_bounce(player, tuning.bounce_velocity);
        }
    }

    state
        .platforms
        .recycle(&mut state.scene, tuning, &mut state.outbox);
    state.platforms.top_up(
        &mut state.scene,
        &mut state.rng,
        tuning,
        state.score,
        &mut state.outbox,
    );
    bounce_off_walls(&mut state.scene, tuning);

    screen_move(&mut state.scene, state.player, tuning);

    if let Some(player) = state.scene.get_mut(state.player) {
        wrap_edges(player, tuning);
    }

    if check_game_over(state) {
        state.phase = GamePhase::GameOver { timer: 0.0 };
        state.outbox.emit(GameEvent::GameOver);
        log::info!("Game over at score {}", state.score);
        return;
    }

    state.score = calculate_score(&state.scene, state.marker);
    log::trace!("Tick {}: score {}", state.time_ticks, state.score);
}
