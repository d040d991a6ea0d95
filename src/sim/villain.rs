//! Villain and bullet behaviour
//!
//! The villain appears once the score crosses a threshold, patrols the top
//! of the screen and fires bullets on a fixed cadence. Bullet speed steps
//! up with the score.

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind};
use super::events::{Asset, GameEvent, Outbox};
use super::geometry::{Polygon, Vector2};
use super::scene::Scene;
use crate::consts::*;
use crate::tuning::Tuning;

/// Villain lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum VillainState {
    /// Not spawned yet this run
    #[default]
    Absent,
    /// On screen; `cooldown` accumulates time since the last shot
    Active { body: BodyId, cooldown: f64 },
}

impl VillainState {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, VillainState::Active { .. })
    }

    #[inline]
    pub fn body(&self) -> Option<BodyId> {
        match self {
            VillainState::Active { body, .. } => Some(*body),
            VillainState::Absent => None,
        }
    }
}

/// Bullet speed multiplier for the score band
pub fn bullet_multiplier(score: i64) -> f64 {
    match score {
        s if s >= 10_000 => 5.0,
        s if s >= 8_000 => 4.0,
        s if s >= 6_000 => 3.0,
        s if s >= 4_000 => 2.0,
        _ => 1.0,
    }
}

pub fn make_villain(tuning: &Tuning, center: Vector2) -> Body {
    Body::new(
        Polygon::circle(center, tuning.villain_radius, VILLAIN_NUM_POINTS),
        BODY_MASS,
        BodyKind::Villain,
    )
}

pub fn make_bullet(tuning: &Tuning, center: Vector2) -> Body {
    Body::new(
        Polygon::circle(center, tuning.bullet_radius, BULLET_NUM_POINTS),
        BODY_MASS,
        BodyKind::Bullet,
    )
}

fn spawn_villain(scene: &mut Scene, tuning: &Tuning, out: &mut Outbox) -> BodyId {
    let body = make_villain(tuning, tuning.villain_spawn)
        .with_velocity(Vector2::new(tuning.villain_hover_speed, 0.0));
    let id = scene.add(body);
    out.bind_visual(id, Asset::Villain);
    out.emit(GameEvent::VillainSpawned);
    log::info!("Villain spawned at {:?}", tuning.villain_spawn);
    id
}

/// Ping-pong between the screen edges
fn hover(villain: &mut Body, tuning: &Tuning) {
    let x = villain.centroid().x;
    if x + tuning.villain_radius > tuning.screen_max.x {
        villain.velocity = Vector2::new(-tuning.villain_hover_speed, 0.0);
    } else if x - tuning.villain_radius < tuning.screen_min.x {
        villain.velocity = Vector2::new(tuning.villain_hover_speed, 0.0);
    }
}

/// Fire one bullet straight down from under the villain
pub fn shoot(
    scene: &mut Scene,
    villain: BodyId,
    score: i64,
    tuning: &Tuning,
    out: &mut Outbox,
) -> Option<BodyId> {
    let center = scene.get(villain)?.centroid();
    let at = Vector2::new(
        center.x,
        center.y - tuning.villain_radius - tuning.bullet_radius,
    );
    let velocity = tuning.bullet_base_velocity * bullet_multiplier(score);
    let id = scene.add(make_bullet(tuning, at).with_velocity(velocity));
    out.bind_visual(id, Asset::Bullet);
    out.emit(GameEvent::BulletFired);
    log::debug!("Bullet {:?} fired at {:?} with velocity {:?}", id, at, velocity);
    Some(id)
}

/// Remove bullets whose top edge has dropped below the screen
pub fn remove_offscreen_bullets(scene: &mut Scene, tuning: &Tuning, out: &mut Outbox) -> usize {
    let floor = tuning.screen_min.y;
    let radius = tuning.bullet_radius;
    let removed =
        scene.remove_where(|b| b.kind == BodyKind::Bullet && b.centroid().y + radius < floor);
    for bullet in &removed {
        out.unbind_visual(bullet.id);
    }
    removed.len()
}

/// Advance the villain by one tick and return its next state
///
/// Spawning and the first cooldown step happen in the same tick.
pub fn update_villain(
    state: VillainState,
    score: i64,
    scene: &mut Scene,
    tuning: &Tuning,
    dt: f64,
    out: &mut Outbox,
) -> VillainState {
    let (body, cooldown) = match state {
        VillainState::Absent if score >= tuning.villain_spawn_score => {
            (spawn_villain(scene, tuning, out), 0.0)
        }
        VillainState::Absent => return VillainState::Absent,
        VillainState::Active { body, cooldown } => (body, cooldown),
    };

    remove_offscreen_bullets(scene, tuning, out);

    let Some(villain) = scene.get_mut(body) else {
        log::warn!("Villain {:?} missing from scene", body);
        return VillainState::Absent;
    };
    hover(villain, tuning);

    let mut cooldown = cooldown + dt;
    if cooldown >= tuning.fire_interval {
        shoot(scene, body, score, tuning, out);
        cooldown = 0.0;
    }

    VillainState::Active { body, cooldown }
}

/// Remove the villain and every bullet (game reset)
pub fn despawn(state: VillainState, scene: &mut Scene, out: &mut Outbox) -> VillainState {
    let bullets = scene.remove_where(|b| b.kind == BodyKind::Bullet);
    for bullet in &bullets {
        out.unbind_visual(bullet.id);
    }
    if let Some(body) = state.body() {
        if scene.remove(body).is_some() {
            out.unbind_visual(body);
        }
    }
    VillainState::Absent
}
