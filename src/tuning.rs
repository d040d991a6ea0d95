//! Data-driven game balance
//!
//! Every tuned constant of the simulation lives here so a run can be
//! reconfigured from JSON without recompiling.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Tolerance when checking that spawn probabilities sum to one
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    /// Bottom-left corner of the visible area
    pub screen_min: DVec2,
    /// Top-right corner of the visible area
    pub screen_max: DVec2,
    /// Fraction of screen height above which the world scrolls
    pub scroll_threshold_fraction: f64,

    // === Player ===
    pub player_start: DVec2,
    /// Downward acceleration applied to the player each tick
    pub gravity: f64,
    /// Fixed upward velocity after landing on a platform
    pub bounce_velocity: f64,
    /// Vertical and horizontal slack of the landing test
    pub landing_tolerance: f64,
    /// Horizontal speed the moment a direction key goes down
    pub steer_base: f64,
    /// Extra horizontal speed per second the key is held
    pub steer_rate: f64,
    /// Register a reset-on-exit force on the player instead of ending the run
    pub reset_on_exit: bool,

    // === Platforms ===
    pub platform_width: f64,
    pub platform_height: f64,
    /// Target number of live platforms
    pub total_platforms: usize,
    /// Number of horizontal bands the initial layout is split into
    pub platform_channels: usize,
    pub first_platform: DVec2,
    pub p_moving: f64,
    pub p_steady: f64,
    pub p_breaking: f64,
    /// Velocity of a moving platform at the start of a run
    pub moving_base_velocity: DVec2,
    /// Score per step of moving-platform speed for platforms spawned mid-run
    pub moving_speed_score_step: i64,

    // === Villain ===
    pub villain_spawn_score: i64,
    pub villain_spawn: DVec2,
    pub villain_radius: f64,
    pub villain_hover_speed: f64,
    /// Seconds between shots
    pub fire_interval: f64,
    pub bullet_radius: f64,
    pub bullet_base_velocity: DVec2,

    // === Flow ===
    /// How long the game-over display lasts before a reset
    pub game_over_delay: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        let screen_max = DVec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        Self {
            screen_min: DVec2::ZERO,
            screen_max,
            scroll_threshold_fraction: 0.55,

            player_start: DVec2::new(screen_max.x / 2.0, 0.40 * screen_max.y),
            gravity: 300.0,
            bounce_velocity: 400.0,
            landing_tolerance: 5.0,
            steer_base: 150.0,
            steer_rate: 250.0,
            reset_on_exit: false,

            platform_width: 60.0,
            platform_height: 20.0,
            total_platforms: 24,
            platform_channels: 4,
            first_platform: DVec2::new(
                screen_max.x / 2.0,
                0.3 * screen_max.y - PLAYER_OUTER_RADIUS,
            ),
            p_moving: 0.3,
            p_steady: 0.6,
            p_breaking: 0.1,
            moving_base_velocity: DVec2::new(50.0, 0.0),
            moving_speed_score_step: 2000,

            villain_spawn_score: 2000,
            villain_spawn: DVec2::new(screen_max.x / 2.0, screen_max.y - 50.0),
            villain_radius: 40.0,
            villain_hover_speed: 100.0,
            fire_interval: 3.0,
            bullet_radius: 15.0,
            bullet_base_velocity: DVec2::new(0.0, -50.0),

            game_over_delay: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject parameter sets the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(SimError::InvalidTuning(msg.to_string()));

        if self.screen_max.x <= self.screen_min.x || self.screen_max.y <= self.screen_min.y {
            return invalid("screen_max must be above and right of screen_min");
        }
        if !(self.scroll_threshold_fraction > 0.0 && self.scroll_threshold_fraction <= 1.0) {
            return invalid("scroll_threshold_fraction must be in (0, 1]");
        }
        if self.landing_tolerance < 0.0 {
            return invalid("landing_tolerance must not be negative");
        }
        if self.platform_width <= 0.0 || self.platform_height <= 0.0 {
            return invalid("platform dimensions must be positive");
        }
        if self.platform_width >= self.screen_width() {
            return invalid("platform_width must be narrower than the screen");
        }
        if self.platform_channels == 0 {
            return invalid("platform_channels must be positive");
        }
        if self.p_moving < 0.0 || self.p_steady < 0.0 || self.p_breaking < 0.0 {
            return invalid("spawn probabilities must not be negative");
        }
        let sum = self.p_moving + self.p_steady + self.p_breaking;
        if (sum - 1.0).abs() > PROBABILITY_EPSILON {
            return invalid("spawn probabilities must sum to 1");
        }
        if self.moving_speed_score_step <= 0 {
            return invalid("moving_speed_score_step must be positive");
        }
        if self.villain_radius <= 0.0 || self.bullet_radius <= 0.0 {
            return invalid("villain and bullet radii must be positive");
        }
        if self.fire_interval <= 0.0 {
            return invalid("fire_interval must be positive");
        }
        Ok(())
    }

    #[inline]
    pub fn screen_width(&self) -> f64 {
        self.screen_max.x - self.screen_min.x
    }

    #[inline]
    pub fn screen_height(&self) -> f64 {
        self.screen_max.y - self.screen_min.y
    }

    /// Height above which the world scrolls instead of the player rising
    #[inline]
    pub fn scroll_threshold(&self) -> f64 {
        self.screen_min.y + self.scroll_threshold_fraction * self.screen_height()
    }

    /// Height of one channel in the initial platform layout
    pub fn channel_height(&self) -> f64 {
        (self.screen_height() / self.platform_channels as f64).trunc()
    }

    /// Platforms placed in each channel at the start of a run
    pub fn platforms_per_channel(&self) -> usize {
        self.total_platforms / self.platform_channels
    }
}
