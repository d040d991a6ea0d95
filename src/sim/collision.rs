//! Collision detection for convex polygons
//!
//! Full separating-axis tests for bullets, plus the cheap strip test the
//! player uses to land on platforms.

use super::body::{Body, BodyId, BodyKind, PlatformKind};
use super::events::{Asset, GameEvent, Outbox};
use super::geometry::{Polygon, Vector2};
use super::scene::Scene;
use crate::consts::PLAYER_OUTER_RADIUS;
use crate::tuning::Tuning;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Unit axis of minimum overlap, normal to an edge of the shape that owns it
    pub axis: Vector2,
    /// Overlap depth along `axis`
    pub overlap: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            axis: Vector2::ZERO,
            overlap: 0.0,
        }
    }
}

/// Test every edge normal of `owner` as a separating axis
///
/// Returns `None` as soon as one axis separates the shapes, otherwise the
/// smallest overlap and its axis.
fn min_overlap_axis(owner: &Polygon, other: &Polygon) -> Option<(f64, Vector2)> {
    let mut min_overlap = f64::MAX;
    let mut min_axis = Vector2::ZERO;

    for edge in owner.edges() {
        let axis = Vector2::new(-edge.y, edge.x);
        let unit_axis = axis / axis.length();

        let overlap = owner.project(unit_axis).overlap(&other.project(unit_axis));
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = unit_axis;
        }
    }

    Some((min_overlap, min_axis))
}

/// Separating axis test between two convex polygons
///
/// Both polygons contribute candidate axes. On a tie the first polygon's
/// axis wins. The returned axis points from the polygon that owns it toward
/// the other one.
pub fn find_collision(a: &Polygon, b: &Polygon) -> CollisionResult {
    let Some((overlap_a, axis_a)) = min_overlap_axis(a, b) else {
        return CollisionResult::miss();
    };
    let Some((overlap_b, axis_b)) = min_overlap_axis(b, a) else {
        return CollisionResult::miss();
    };

    let (overlap, mut axis, toward_other) = if overlap_a <= overlap_b {
        (overlap_a, axis_a, b.centroid() - a.centroid())
    } else {
        (overlap_b, axis_b, a.centroid() - b.centroid())
    };
    if toward_other.dot(axis) < 0.0 {
        axis = -axis;
    }
    CollisionResult {
        hit: true,
        axis,
        overlap,
    }
}

#[inline]
pub fn find_body_collision(a: &Body, b: &Body) -> CollisionResult {
    find_collision(a.shape(), b.shape())
}

/// Check whether the falling player's feet rest on top of a platform
///
/// Platforms are scanned in scene order and the first one under the feet
/// decides the outcome: steady and moving platforms return `true` (the
/// caller bounces the player); a breaking platform turns into a broken one
/// in place and returns `false`. Broken platforms are ignored.
pub fn find_collision_with_user_bottom(
    scene: &mut Scene,
    player: BodyId,
    tuning: &Tuning,
    out: &mut Outbox,
) -> bool {
    let Some(user) = scene.get(player) else {
        return false;
    };
    if user.velocity.y >= 0.0 {
        return false;
    }

    let center = user.centroid();
    let user_bottom = center.y - PLAYER_OUTER_RADIUS;
    let user_left = center.x - PLAYER_OUTER_RADIUS / 2.0;
    let user_right = center.x + PLAYER_OUTER_RADIUS / 2.0;
    let tolerance = tuning.landing_tolerance;
    let half_width = tuning.platform_width / 2.0;
    let half_height = tuning.platform_height / 2.0;

    for platform in scene.bodies_mut() {
        let Some(kind) = platform.kind.platform() else {
            continue;
        };
        let c = platform.centroid();
        let top = c.y + half_height;
        let under_feet = user_left > c.x - half_width - tolerance
            && user_right < c.x + half_width + tolerance
            && (top - user_bottom).abs() <= tolerance;
        if !under_feet {
            continue;
        }

        match kind {
            PlatformKind::Steady | PlatformKind::Moving => {
                out.emit(GameEvent::Landed);
                return true;
            }
            PlatformKind::Breaking => {
                platform.kind = BodyKind::Platform(PlatformKind::Broken);
                out.unbind_visual(platform.id);
                out.bind_visual(platform.id, Asset::BrokenPlatform);
                out.emit(GameEvent::PlatformBroke);
                log::debug!("Platform {:?} broke at {:?}", platform.id, c);
                return false;
            }
            PlatformKind::Broken => {}
        }
    }
    false
}

/// Check whether any bullet overlaps the player
pub fn check_villain_bullet_collision(scene: &Scene, player: BodyId, out: &mut Outbox) -> bool {
    let Some(user) = scene.get(player) else {
        return false;
    };
    let hit = scene
        .bodies()
        .iter()
        .filter(|b| b.kind == BodyKind::Bullet)
        .any(|bullet| find_body_collision(user, bullet).hit);
    if hit {
        out.emit(GameEvent::PlayerDied);
    }
    hit
}

/// Fixed upward impulse after a landing; horizontal velocity is kept
#[inline]
pub fn user_bounce(user: &mut Body, bounce_velocity: f64) {
    user.velocity = Vector2::new(user.velocity.x, bounce_velocity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BODY_MASS;

    fn square_at(x: f64, y: f64) -> Polygon {
        let mut p = Polygon::rectangle(1.0, 1.0);
        p.translate(Vector2::new(x, y));
        p
    }

    fn platform(kind: PlatformKind, at: Vector2) -> Body {
        Body::new(Polygon::rectangle(60.0, 20.0), BODY_MASS, BodyKind::Platform(kind)).at(at)
    }

    /// Player whose feet sit `gap` above the top of a platform centred at (250, 200)
    fn landing_scene(kind: PlatformKind, gap: f64, vy: f64) -> (Scene, BodyId, BodyId) {
        let mut scene = Scene::new();
        let feet = 200.0 + 10.0 + gap;
        let player = scene.add(
            Body::new(
                Polygon::ellipse(Vector2::ZERO, 20.0, 20.0, 20),
                BODY_MASS,
                BodyKind::Player,
            )
            .at(Vector2::new(250.0, feet + PLAYER_OUTER_RADIUS))
            .with_velocity(Vector2::new(0.0, vy)),
        );
        scene.add(Body::new(
            Polygon::circle(Vector2::ZERO, 1.0, 12),
            BODY_MASS,
            BodyKind::ScoreMarker,
        ));
        let plat = scene.add(platform(kind, Vector2::new(250.0, 200.0)));
        (scene, player, plat)
    }

    #[test]
    fn test_separated_squares_do_not_collide() {
        let result = find_collision(&square_at(0.0, 0.0), &square_at(1.5, 0.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_touching_squares_do_not_collide() {
        let result = find_collision(&square_at(0.0, 0.0), &square_at(1.0, 0.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_half_offset_squares_collide_along_offset() {
        let result = find_collision(&square_at(0.0, 0.0), &square_at(0.5, 0.0));
        assert!(result.hit);
        assert!(result.axis.distance(Vector2::X) < 1e-12, "{:?}", result.axis);
        assert!((result.overlap - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_axis_points_toward_other_shape() {
        let a = square_at(0.0, 0.0);
        for (b, expected) in [
            (square_at(0.5, 0.0), Vector2::X),
            (square_at(-0.5, 0.0), -Vector2::X),
            (square_at(0.0, 0.5), Vector2::Y),
            (square_at(0.0, -0.5), -Vector2::Y),
        ] {
            let result = find_collision(&a, &b);
            assert!(result.hit);
            assert!(
                result.axis.distance(expected) < 1e-12,
                "expected {expected:?}, got {:?}",
                result.axis
            );
        }
    }

    #[test]
    fn test_axis_from_second_polygon_points_toward_first() {
        // Diamond overlapping the square's right edge: the square's own
        // edges give the shallower overlap, so the second polygon owns the axis
        let diamond = Polygon::new(vec![
            Vector2::new(1.8, 0.5),
            Vector2::new(1.3, 1.0),
            Vector2::new(0.8, 0.5),
            Vector2::new(1.3, 0.0),
        ]);
        let result = find_collision(&diamond, &square_at(0.0, 0.0));
        assert!(result.hit);
        assert!((result.overlap - 0.2).abs() < 1e-9);
        assert!(result.axis.distance(Vector2::X) < 1e-12, "{:?}", result.axis);
    }

    #[test]
    fn test_tie_prefers_first_polygon_axis() {
        // Identical shapes overlap equally along every axis
        let a = square_at(0.0, 0.0);
        let b = square_at(0.0, 0.0);
        let result = find_collision(&a, &b);
        let (_, first_axis) = min_overlap_axis(&a, &b).unwrap();
        assert!(result.hit);
        assert_eq!(result.axis, first_axis);
    }

    #[test]
    fn test_vertical_offset_picks_vertical_axis() {
        let result = find_collision(&square_at(0.0, 0.0), &square_at(0.1, 0.8));
        assert!(result.hit);
        assert!(result.axis.x.abs() < 1e-12);
        assert!((result.overlap - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_landing_on_steady_platform() {
        let (mut scene, player, _) = landing_scene(PlatformKind::Steady, 3.0, -100.0);
        let mut out = Outbox::default();
        assert!(find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
        assert_eq!(out.events, vec![GameEvent::Landed]);
    }

    #[test]
    fn test_rising_through_platform_does_not_land() {
        let (mut scene, player, _) = landing_scene(PlatformKind::Steady, 3.0, 100.0);
        let mut out = Outbox::default();
        assert!(!find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_landing_outside_tolerance_misses() {
        let (mut scene, player, _) = landing_scene(PlatformKind::Moving, 6.0, -100.0);
        let mut out = Outbox::default();
        assert!(!find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
    }

    #[test]
    fn test_landing_tolerance_is_configurable() {
        let (mut scene, player, _) = landing_scene(PlatformKind::Moving, 6.0, -100.0);
        let tuning = Tuning {
            landing_tolerance: 7.0,
            ..Default::default()
        };
        let mut out = Outbox::default();
        assert!(find_collision_with_user_bottom(&mut scene, player, &tuning, &mut out));
    }

    #[test]
    fn test_landing_horizontal_edge() {
        let tuning = Tuning::default();
        // Feet span x ± 10 and must stay inside 220..280 widened by 5
        for (x, expected) in [(274.0, true), (276.0, false), (226.0, true), (224.0, false)] {
            let (mut scene, player, _) = landing_scene(PlatformKind::Steady, 0.0, -10.0);
            let y = scene.get(player).unwrap().centroid().y;
            scene.get_mut(player).unwrap().set_centroid(Vector2::new(x, y));
            let mut out = Outbox::default();
            assert_eq!(
                find_collision_with_user_bottom(&mut scene, player, &tuning, &mut out),
                expected,
                "x = {x}"
            );
        }
    }

    #[test]
    fn test_breaking_platform_breaks_in_place() {
        let (mut scene, player, plat) = landing_scene(PlatformKind::Breaking, 1.0, -100.0);
        let before = scene.get(plat).unwrap().centroid();
        let count = scene.len();
        let mut out = Outbox::default();

        assert!(!find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
        let broken = scene.get(plat).unwrap();
        assert_eq!(broken.kind, BodyKind::Platform(PlatformKind::Broken));
        assert_eq!(broken.centroid(), before);
        assert_eq!(scene.len(), count);
        assert_eq!(out.events, vec![GameEvent::PlatformBroke]);
        assert!(out.visuals.contains(&crate::sim::VisualCommand::Bind {
            body: plat,
            asset: Asset::BrokenPlatform
        }));

        // Broken platforms never bounce or break again
        let mut out = Outbox::default();
        assert!(!find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_first_platform_in_scene_order_decides() {
        let (mut scene, player, breaking) = landing_scene(PlatformKind::Breaking, 1.0, -100.0);
        let steady = scene.add(platform(PlatformKind::Steady, Vector2::new(250.0, 200.0)));
        let mut out = Outbox::default();
        assert!(!find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
        assert_eq!(
            scene.get(breaking).unwrap().kind,
            BodyKind::Platform(PlatformKind::Broken)
        );
        assert_eq!(
            scene.get(steady).unwrap().kind,
            BodyKind::Platform(PlatformKind::Steady)
        );

        // Next tick the broken one is skipped and the steady one catches the player
        let mut out = Outbox::default();
        assert!(find_collision_with_user_bottom(&mut scene, player, &Tuning::default(), &mut out));
    }

    #[test]
    fn test_bullet_hit() {
        let (mut scene, player, _) = landing_scene(PlatformKind::Steady, 50.0, -10.0);
        let mut out = Outbox::default();
        assert!(!check_villain_bullet_collision(&scene, player, &mut out));

        let at = scene.get(player).unwrap().centroid() + Vector2::new(10.0, 10.0);
        scene.add(Body::new(Polygon::circle(at, 15.0, 20), BODY_MASS, BodyKind::Bullet));
        assert!(check_villain_bullet_collision(&scene, player, &mut out));
        assert_eq!(out.events, vec![GameEvent::PlayerDied]);
    }

    #[test]
    fn test_user_bounce_keeps_horizontal_velocity() {
        let mut user = Body::new(Polygon::rectangle(1.0, 1.0), BODY_MASS, BodyKind::Player)
            .with_velocity(Vector2::new(-42.0, -900.0));
        user_bounce(&mut user, 400.0);
        assert_eq!(user.velocity, Vector2::new(-42.0, 400.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_collision_is_symmetric(
                ax in -5.0f64..5.0, ay in -5.0f64..5.0,
                bx in -5.0f64..5.0, by in -5.0f64..5.0,
            ) {
                let a = square_at(ax, ay);
                let b = square_at(bx, by);
                let ab = find_collision(&a, &b);
                let ba = find_collision(&b, &a);
                prop_assert_eq!(ab.hit, ba.hit);
                if ab.hit {
                    prop_assert!((ab.overlap - ba.overlap).abs() < 1e-9);
                    prop_assert!((ab.axis.length() - 1.0).abs() < 1e-9);
                }
            }

            #[test]
            fn prop_squares_collide_iff_boxes_overlap(
                bx in -3.0f64..3.0, by in -3.0f64..3.0,
            ) {
                let result = find_collision(&square_at(0.0, 0.0), &square_at(bx, by));
                let boxes_overlap = bx.abs() < 1.0 && by.abs() < 1.0;
                prop_assert_eq!(result.hit, boxes_overlap);
            }
        }
    }
}
