//! Scene: the ordered owner of every body
//!
//! Insertion order is stable. Other components hold `BodyId`s, never
//! references, and a body removed from the scene is gone for good.

use std::fmt::Debug;

use super::body::{Body, BodyId};
use super::geometry::Vector2;

/// A per-body effect invoked once per tick before integration
pub trait ForceGenerator: Debug {
    fn apply(&mut self, body: &mut Body, dt: f64);
}

/// Teleport a body back to `reset_to` whenever it drops below `floor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetOnExit {
    pub floor: f64,
    pub reset_to: Vector2,
}

impl ForceGenerator for ResetOnExit {
    fn apply(&mut self, body: &mut Body, _dt: f64) {
        if body.centroid().y < self.floor {
            body.set_centroid(self.reset_to);
        }
    }
}

#[derive(Debug)]
struct RegisteredForce {
    target: BodyId,
    generator: Box<dyn ForceGenerator>,
}

#[derive(Debug, Default)]
pub struct Scene {
    bodies: Vec<Body>,
    forces: Vec<RegisteredForce>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a body and hand back its handle
    pub fn add(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body, keeping the relative order of the rest
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        Some(self.bodies.remove(index))
    }

    /// Remove every body matching `predicate` in a single compacting pass
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Body) -> bool) -> Vec<Body> {
        self.bodies.extract_if(.., |body| predicate(&*body)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All bodies in insertion order (render snapshot)
    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn add_force(&mut self, target: BodyId, generator: Box<dyn ForceGenerator>) {
        self.forces.push(RegisteredForce { target, generator });
    }

    /// Run registered forces, then move every body by its velocity
    pub fn advance(&mut self, dt: f64) {
        let bodies = &mut self.bodies;
        self.forces
            .retain(|force| bodies.iter().any(|b| b.id == force.target));
        for force in &mut self.forces {
            if let Some(body) = bodies.iter_mut().find(|b| b.id == force.target) {
                force.generator.apply(body, dt);
            }
        }

        for body in bodies.iter_mut() {
            body.integrate(dt);
        }
    }

    /// Drop every body and force (shutdown)
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.forces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, PlatformKind};
    use crate::sim::geometry::Polygon;

    fn square(kind: BodyKind, at: Vector2) -> Body {
        Body::new(Polygon::rectangle(10.0, 10.0), 1.0, kind).at(at)
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut scene = Scene::new();
        let a = scene.add(square(BodyKind::Player, Vector2::ZERO));
        let b = scene.add(square(BodyKind::ScoreMarker, Vector2::ZERO));
        scene.remove(b);
        let c = scene.add(square(BodyKind::Bullet, Vector2::ZERO));
        assert_ne!(b, c);
        assert_eq!(scene.index_of(a), Some(0));
        assert_eq!(scene.index_of(c), Some(1));
        assert!(!scene.contains(b));
    }

    #[test]
    fn test_remove_where_keeps_order_and_skips_nothing() {
        let mut scene = Scene::new();
        let steady = BodyKind::Platform(PlatformKind::Steady);
        let ids: Vec<_> = (0..6)
            .map(|i| scene.add(square(steady, Vector2::new(0.0, i as f64))))
            .collect();

        // Adjacent matches must all go
        let removed = scene.remove_where(|b| b.centroid().y >= 1.0 && b.centroid().y < 4.0);
        let gone: Vec<_> = removed.iter().map(|b| b.id).collect();
        assert_eq!(gone, vec![ids[1], ids[2], ids[3]]);
        let left: Vec<_> = scene.bodies().iter().map(|b| b.id).collect();
        assert_eq!(left, vec![ids[0], ids[4], ids[5]]);
    }

    #[test]
    fn test_advance_integrates_all_bodies() {
        let mut scene = Scene::new();
        let a = scene.add(square(BodyKind::Player, Vector2::ZERO).with_velocity(Vector2::X));
        let b = scene.add(square(BodyKind::Bullet, Vector2::ZERO).with_velocity(-Vector2::Y));
        scene.advance(2.0);
        assert!(scene.get(a).unwrap().centroid().distance(Vector2::new(2.0, 0.0)) < 1e-9);
        assert!(scene.get(b).unwrap().centroid().distance(Vector2::new(0.0, -2.0)) < 1e-9);
    }

    #[test]
    fn test_reset_on_exit_force() {
        let mut scene = Scene::new();
        let start = Vector2::new(250.0, 300.0);
        let player = scene.add(
            square(BodyKind::Player, Vector2::new(250.0, -1.0)).with_velocity(Vector2::ZERO),
        );
        scene.add_force(
            player,
            Box::new(ResetOnExit {
                floor: 0.0,
                reset_to: start,
            }),
        );
        scene.advance(1.0 / 60.0);
        assert!(scene.get(player).unwrap().centroid().distance(start) < 1e-9);
    }

    #[test]
    fn test_forces_dropped_with_their_body() {
        let mut scene = Scene::new();
        let id = scene.add(square(BodyKind::Player, Vector2::ZERO));
        scene.add_force(
            id,
            Box::new(ResetOnExit {
                floor: 0.0,
                reset_to: Vector2::ZERO,
            }),
        );
        scene.remove(id);
        scene.advance(1.0);
        assert!(scene.forces.is_empty());
    }
}
