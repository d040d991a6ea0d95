//! Game state and core simulation types
//!
//! Everything a run needs to be replayed from its seed lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind};
use super::events::{Asset, GameEvent, Outbox, VisualCommand};
use super::geometry::{Polygon, Vector2};
use super::platforms::PlatformPool;
use super::scene::{ResetOnExit, Scene};
use super::villain::VillainState;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; `timer` counts toward the automatic reset
    GameOver { timer: f64 },
}

/// The player: an ellipse resting on its bottom point, moved to `start`
pub fn make_player(start: Vector2) -> Body {
    let center = Vector2::new(0.0, PLAYER_INNER_RADIUS);
    Body::new(
        Polygon::ellipse(
            center,
            PLAYER_INNER_RADIUS,
            PLAYER_OUTER_RADIUS,
            PLAYER_NUM_POINTS,
        ),
        BODY_MASS,
        BodyKind::Player,
    )
    .at(start)
}

/// Fixed marker whose scrolled displacement tracks progress
pub fn make_score_marker() -> Body {
    Body::new(
        Polygon::circle(Vector2::ZERO, MARKER_RADIUS, MARKER_NUM_POINTS),
        BODY_MASS,
        BodyKind::ScoreMarker,
    )
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Every live body; the player and marker occupy the first two slots
    pub scene: Scene,
    pub platforms: PlatformPool,
    pub villain: VillainState,
    pub player: BodyId,
    pub marker: BodyId,
    pub score: i64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Signals queued for collaborators since the last drain
    pub outbox: Outbox,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with custom tuning
    ///
    /// `tuning` must pass `Tuning::validate`; `Tuning::from_json` already
    /// guarantees that.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        debug_assert!(
            tuning.validate().is_ok(),
            "invalid tuning: {:?}",
            tuning.validate()
        );
        let mut scene = Scene::new();
        let mut outbox = Outbox::default();
        let mut rng = Pcg32::seed_from_u64(seed);

        let player = scene.add(make_player(tuning.player_start));
        outbox.bind_visual(player, Asset::Player);
        let marker = scene.add(make_score_marker());

        if tuning.reset_on_exit {
            scene.add_force(
                player,
                Box::new(ResetOnExit {
                    floor: tuning.screen_min.y,
                    reset_to: tuning.player_start,
                }),
            );
        }

        let mut platforms = PlatformPool::new();
        platforms.init(&mut scene, &mut rng, &tuning, &mut outbox);

        log::info!("New game (seed {}), {} bodies", seed, scene.len());

        Self {
            seed,
            tuning,
            scene,
            platforms,
            villain: VillainState::Absent,
            player,
            marker,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            outbox,
            rng,
        }
    }

    /// Bodies in scene order for rendering
    #[inline]
    pub fn query_bodies(&self) -> &[Body] {
        self.scene.bodies()
    }

    /// Owned copy of every body, safe to hand to another thread
    pub fn snapshot(&self) -> Vec<Body> {
        self.scene.bodies().to_vec()
    }

    pub fn player_body(&self) -> Option<&Body> {
        self.scene.get(self.player)
    }

    pub fn player_body_mut(&mut self) -> Option<&mut Body> {
        self.scene.get_mut(self.player)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Take every event and visual command queued so far
    pub fn drain_outbox(&mut self) -> (Vec<GameEvent>, Vec<VisualCommand>) {
        self.outbox.drain()
    }

    /// Release every body (shutdown)
    pub fn shutdown(&mut self) {
        for body in self.scene.bodies() {
            self.outbox.unbind_visual(body.id);
        }
        self.scene.clear();
        self.platforms = PlatformPool::new();
        self.villain = VillainState::Absent;
    }
}
