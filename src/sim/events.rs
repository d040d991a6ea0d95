//! Signals from the simulation to its collaborators
//!
//! Audio and the texture cache live outside the core. The simulation only
//! queues fire-and-forget events and visual bindings; the frame loop drains
//! them after every tick.

use serde::{Deserialize, Serialize};

use super::body::{BodyId, PlatformKind};

/// Gameplay events (the collaborator decides whether to play a sound)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player bounced off a steady or moving platform
    Landed,
    /// A breaking platform gave way
    PlatformBroke,
    VillainSpawned,
    BulletFired,
    /// A bullet hit the player
    PlayerDied,
    /// Run ended
    GameOver,
}

impl GameEvent {
    /// Sound asset conventionally tied to this event
    pub fn sound_path(&self) -> &'static str {
        match self {
            GameEvent::Landed => "assets/platform_bounce.wav",
            GameEvent::PlatformBroke => "assets/breaking_platform.wav",
            GameEvent::VillainSpawned => "assets/villain_spawn.wav",
            GameEvent::BulletFired => "assets/bullet.wav",
            GameEvent::PlayerDied => "assets/user_death.wav",
            GameEvent::GameOver => "assets/game_over.wav",
        }
    }
}

/// Images a body can be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Player,
    SteadyPlatform,
    MovingPlatform,
    BreakingPlatform,
    BrokenPlatform,
    Villain,
    Bullet,
}

impl Asset {
    pub fn for_platform(kind: PlatformKind) -> Self {
        match kind {
            PlatformKind::Steady => Asset::SteadyPlatform,
            PlatformKind::Moving => Asset::MovingPlatform,
            PlatformKind::Breaking => Asset::BreakingPlatform,
            PlatformKind::Broken => Asset::BrokenPlatform,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Asset::Player => "assets/doodle.png",
            Asset::SteadyPlatform => "assets/steady_platform.png",
            Asset::MovingPlatform => "assets/moving_platform.png",
            Asset::BreakingPlatform => "assets/breaking_platform.png",
            Asset::BrokenPlatform => "assets/plateform-broke.png",
            Asset::Villain => "assets/villain.png",
            Asset::Bullet => "assets/bullet.png",
        }
    }
}

/// Instructions for the texture cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualCommand {
    Bind { body: BodyId, asset: Asset },
    Unbind { body: BodyId },
}

/// Queued signals for the current frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outbox {
    pub events: Vec<GameEvent>,
    pub visuals: Vec<VisualCommand>,
}

impl Outbox {
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn bind_visual(&mut self, body: BodyId, asset: Asset) {
        self.visuals.push(VisualCommand::Bind { body, asset });
    }

    #[inline]
    pub fn unbind_visual(&mut self, body: BodyId) {
        self.visuals.push(VisualCommand::Unbind { body });
    }

    /// Hand everything queued so far to the caller
    pub fn drain(&mut self) -> (Vec<GameEvent>, Vec<VisualCommand>) {
        (
            std::mem::take(&mut self.events),
            std::mem::take(&mut self.visuals),
        )
    }

    pub fn has_event(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }
}
