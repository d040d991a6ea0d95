//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (scene insertion order)
//! - No rendering or audio dependencies

pub mod body;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod platforms;
pub mod scene;
pub mod state;
pub mod tick;
pub mod villain;

pub use body::{Body, BodyId, BodyKind, PlatformKind};
pub use collision::{
    CollisionResult, check_villain_bullet_collision, find_body_collision, find_collision,
    find_collision_with_user_bottom, user_bounce,
};
pub use events::{Asset, GameEvent, Outbox, VisualCommand};
pub use geometry::{Polygon, Projection, Vector2};
pub use platforms::{PlatformPool, bounce_off_walls, select_type};
pub use scene::{ForceGenerator, ResetOnExit, Scene};
pub use state::{GamePhase, GameState};
pub use tick::{Steer, TickInput, reset_game, screen_move, tick};
pub use villain::{VillainState, bullet_multiplier, update_villain};
