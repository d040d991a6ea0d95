//! Sky Hopper - simulation core of a vertically scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, bodies, collisions, platforms, villain)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and construction errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep used by the headless runner
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Screen bounds (y-up, origin at bottom-left)
    pub const SCREEN_WIDTH: f64 = 500.0;
    pub const SCREEN_HEIGHT: f64 = 750.0;

    /// Player shape
    pub const PLAYER_OUTER_RADIUS: f64 = 20.0;
    pub const PLAYER_INNER_RADIUS: f64 = 20.0;
    pub const PLAYER_NUM_POINTS: usize = 20;

    /// Score marker is a tiny circle at the origin
    pub const MARKER_RADIUS: f64 = 1.0;
    pub const MARKER_NUM_POINTS: usize = 12;

    /// Villain and bullet shapes
    pub const VILLAIN_NUM_POINTS: usize = 20;
    pub const BULLET_NUM_POINTS: usize = 20;

    /// Nominal mass for every body (no rotational dynamics)
    pub const BODY_MASS: f64 = 1.0;
}
