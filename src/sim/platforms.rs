//! Procedural platform spawning and recycling
//!
//! The pool is an index over the platform bodies of the scene. It never
//! owns bodies; every spawn and removal goes through both in one step so
//! the two stay in sync.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, PlatformKind};
use super::events::{Asset, Outbox};
use super::geometry::{Polygon, Vector2};
use super::scene::Scene;
use crate::consts::BODY_MASS;
use crate::tuning::Tuning;

/// Map a uniform draw in [0, 1) to a platform type
///
/// Comparison order matters: breaking takes whatever is left above
/// `p_moving + p_steady`.
pub fn select_type_from(r: f64, tuning: &Tuning) -> PlatformKind {
    if r < tuning.p_moving {
        PlatformKind::Moving
    } else if r < tuning.p_moving + tuning.p_steady {
        PlatformKind::Steady
    } else {
        PlatformKind::Breaking
    }
}

pub fn select_type<R: Rng>(rng: &mut R, tuning: &Tuning) -> PlatformKind {
    select_type_from(rng.random::<f64>(), tuning)
}

/// Rectangle platform body centred on `center`
pub fn make_platform(tuning: &Tuning, center: Vector2, kind: PlatformKind) -> Body {
    Body::new(
        Polygon::rectangle(tuning.platform_width, tuning.platform_height),
        BODY_MASS,
        BodyKind::Platform(kind),
    )
    .at(center)
}

/// Random x keeping the whole platform on screen, truncated to whole units
fn random_x<R: Rng>(rng: &mut R, tuning: &Tuning) -> f64 {
    let span = tuning.screen_width() - tuning.platform_width;
    (tuning.screen_min.x + rng.random::<f64>() * span + 0.5 * tuning.platform_width).trunc()
}

fn random_y<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    (lo + rng.random::<f64>() * (hi - lo)).trunc()
}

/// Live platform handles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPool {
    ids: Vec<BodyId>,
}

impl PlatformPool {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.ids.contains(&id)
    }

    /// Add a platform to scene and pool, bind its image
    fn spawn(
        &mut self,
        scene: &mut Scene,
        tuning: &Tuning,
        kind: PlatformKind,
        center: Vector2,
        velocity: Vector2,
        out: &mut Outbox,
    ) -> BodyId {
        let body = make_platform(tuning, center, kind).with_velocity(velocity);
        let id = scene.add(body);
        out.bind_visual(id, Asset::for_platform(kind));
        self.ids.push(id);
        id
    }

    /// Lay out the platforms of a fresh run
    ///
    /// One steady platform sits right above the player start; the rest are
    /// spread evenly over the channels with random type and position.
    pub fn init<R: Rng>(
        &mut self,
        scene: &mut Scene,
        rng: &mut R,
        tuning: &Tuning,
        out: &mut Outbox,
    ) {
        self.spawn(
            scene,
            tuning,
            PlatformKind::Steady,
            tuning.first_platform,
            Vector2::ZERO,
            out,
        );

        let channel_height = tuning.channel_height();
        for channel in 0..tuning.platform_channels {
            let y_min = tuning.screen_min.y + channel_height * channel as f64;
            let y_max = y_min + channel_height;
            for _ in 0..tuning.platforms_per_channel() {
                let x = random_x(rng, tuning);
                let y = random_y(rng, y_min, y_max);
                let kind = select_type(rng, tuning);
                let velocity = match kind {
                    PlatformKind::Moving => tuning.moving_base_velocity,
                    _ => Vector2::ZERO,
                };
                self.spawn(scene, tuning, kind, Vector2::new(x, y), velocity, out);
            }
        }

        log::debug!("Initial layout: {} platforms", self.ids.len());
        debug_assert!(self.is_synced(scene));
    }

    /// Spawn platforms above the highest live one until the target count is met
    ///
    /// Moving platforms get faster in steps of `moving_speed_score_step`.
    /// Returns how many were spawned.
    pub fn top_up<R: Rng>(
        &mut self,
        scene: &mut Scene,
        rng: &mut R,
        tuning: &Tuning,
        score: i64,
        out: &mut Outbox,
    ) -> usize {
        if self.ids.len() >= tuning.total_platforms {
            return 0;
        }

        let max_y = self
            .ids
            .iter()
            .filter_map(|id| scene.get(*id))
            .map(|b| b.centroid().y)
            .fold(tuning.screen_min.y, f64::max);

        let speed_step = (score.max(0) / tuning.moving_speed_score_step) as f64;
        let missing = tuning.total_platforms - self.ids.len();
        for _ in 0..missing {
            let kind = select_type(rng, tuning);
            let x = random_x(rng, tuning);
            let y = random_y(rng, max_y, tuning.screen_max.y);
            let velocity = match kind {
                PlatformKind::Moving => tuning.moving_base_velocity * speed_step,
                _ => Vector2::ZERO,
            };
            self.spawn(scene, tuning, kind, Vector2::new(x, y), velocity, out);
        }

        log::debug!("Spawned {} platforms above y={:.1}", missing, max_y);
        debug_assert!(self.is_synced(scene));
        missing
    }

    /// Remove every platform whose centre has reached the bottom of the screen
    ///
    /// Returns how many were removed.
    pub fn recycle(&mut self, scene: &mut Scene, tuning: &Tuning, out: &mut Outbox) -> usize {
        let floor = tuning.screen_min.y;
        let ids = &self.ids;
        let removed = scene.remove_where(|b| ids.contains(&b.id) && b.centroid().y <= floor);
        if removed.is_empty() {
            return 0;
        }

        self.ids.retain(|id| !removed.iter().any(|b| b.id == *id));
        for body in &removed {
            out.unbind_visual(body.id);
        }

        log::debug!("Recycled {} platforms", removed.len());
        debug_assert!(self.is_synced(scene));
        removed.len()
    }

    /// Remove every platform (game reset)
    pub fn clear(&mut self, scene: &mut Scene, out: &mut Outbox) {
        for id in self.ids.drain(..) {
            if scene.remove(id).is_some() {
                out.unbind_visual(id);
            }
        }
    }

    /// Every pooled id is in the scene once, and every platform in the scene is pooled
    pub fn is_synced(&self, scene: &Scene) -> bool {
        let pooled_present = self
            .ids
            .iter()
            .all(|id| scene.bodies().iter().filter(|b| b.id == *id).count() == 1);
        let platforms: Vec<_> = scene
            .bodies()
            .iter()
            .filter(|b| b.kind.is_platform())
            .map(|b| b.id)
            .collect();
        pooled_present
            && platforms.len() == self.ids.len()
            && platforms.iter().all(|id| self.ids.contains(id))
    }
}

/// Reflect moving platforms that reach either side of the screen
pub fn bounce_off_walls(scene: &mut Scene, tuning: &Tuning) {
    let half_width = tuning.platform_width / 2.0;
    for body in scene.bodies_mut() {
        if body.kind != BodyKind::Platform(PlatformKind::Moving) {
            continue;
        }
        let x = body.centroid().x;
        if x + half_width >= tuning.screen_max.x || x - half_width <= tuning.screen_min.x {
            body.velocity.x = -body.velocity.x;
        }
    }
}
