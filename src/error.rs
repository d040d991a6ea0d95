//! Error types
//!
//! Gameplay conditions (falling off screen, getting shot) are state
//! transitions, not errors. Only configuration and construction fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("degenerate polygon: {0}")]
    DegeneratePolygon(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
