//! Simulated bodies and their classification

use serde::{Deserialize, Serialize};

use super::geometry::{Polygon, Vector2};

/// Stable handle to a body in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Platform state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Stays put, always bounces
    Steady,
    /// Slides horizontally and reflects off the screen edges
    Moving,
    /// Breaks instead of bouncing
    Breaking,
    /// Remains of a breaking platform; inert
    Broken,
}

impl PlatformKind {
    /// Whether landing on this platform bounces the player
    #[inline]
    pub fn bounces(&self) -> bool {
        matches!(self, PlatformKind::Steady | PlatformKind::Moving)
    }
}

/// What a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    /// Fixed point whose scrolled displacement is the score
    ScoreMarker,
    Platform(PlatformKind),
    Villain,
    Bullet,
}

impl BodyKind {
    /// Classification string handed to collaborators
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            BodyKind::Player | BodyKind::ScoreMarker => None,
            BodyKind::Platform(PlatformKind::Steady) => Some("steady"),
            BodyKind::Platform(PlatformKind::Moving) => Some("moving"),
            BodyKind::Platform(PlatformKind::Breaking) => Some("breaking"),
            BodyKind::Platform(PlatformKind::Broken) => Some("broken"),
            BodyKind::Villain => Some("villain"),
            BodyKind::Bullet => Some("bullet"),
        }
    }

    #[inline]
    pub fn platform(&self) -> Option<PlatformKind> {
        match self {
            BodyKind::Platform(kind) => Some(*kind),
            _ => None,
        }
    }

    #[inline]
    pub fn is_platform(&self) -> bool {
        matches!(self, BodyKind::Platform(_))
    }
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    shape: Polygon,
    centroid: Vector2,
    pub velocity: Vector2,
    pub mass: f64,
}

impl Body {
    /// Create a body; the id is assigned when it is added to a scene
    pub fn new(shape: Polygon, mass: f64, kind: BodyKind) -> Self {
        let centroid = shape.centroid();
        Self {
            id: BodyId(0),
            kind,
            shape,
            centroid,
            velocity: Vector2::ZERO,
            mass,
        }
    }

    /// Builder-style centroid placement
    pub fn at(mut self, centroid: Vector2) -> Self {
        self.set_centroid(centroid);
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    #[inline]
    pub fn centroid(&self) -> Vector2 {
        self.centroid
    }

    /// Move the body so its centroid lands on `centroid`
    pub fn set_centroid(&mut self, centroid: Vector2) {
        self.translate(centroid - self.centroid);
    }

    pub fn translate(&mut self, delta: Vector2) {
        self.shape.translate(delta);
        self.centroid += delta;
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f64) {
        let delta = self.velocity * dt;
        self.translate(delta);
    }

    /// Replace horizontal velocity, keeping the vertical component
    #[inline]
    pub fn set_horizontal_velocity(&mut self, vx: f64) {
        self.velocity.x = vx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(BodyKind::Player.tag(), None);
        assert_eq!(BodyKind::ScoreMarker.tag(), None);
        assert_eq!(BodyKind::Platform(PlatformKind::Breaking).tag(), Some("breaking"));
        assert_eq!(BodyKind::Platform(PlatformKind::Broken).tag(), Some("broken"));
        assert_eq!(BodyKind::Bullet.tag(), Some("bullet"));
    }

    #[test]
    fn test_only_steady_and_moving_bounce() {
        assert!(PlatformKind::Steady.bounces());
        assert!(PlatformKind::Moving.bounces());
        assert!(!PlatformKind::Breaking.bounces());
        assert!(!PlatformKind::Broken.bounces());
    }

    #[test]
    fn test_set_centroid_moves_vertices() {
        let body = Body::new(Polygon::rectangle(60.0, 20.0), 1.0, BodyKind::Player)
            .at(Vector2::new(100.0, 50.0));
        assert!(body.centroid().distance(Vector2::new(100.0, 50.0)) < 1e-9);
        let (lo, hi) = body.shape().bounds();
        assert!(lo.distance(Vector2::new(70.0, 40.0)) < 1e-9);
        assert!(hi.distance(Vector2::new(130.0, 60.0)) < 1e-9);
    }

    #[test]
    fn test_integrate() {
        let mut body = Body::new(Polygon::rectangle(2.0, 2.0), 1.0, BodyKind::Bullet)
            .at(Vector2::ZERO)
            .with_velocity(Vector2::new(0.0, -50.0));
        body.integrate(0.5);
        assert!(body.centroid().distance(Vector2::new(0.0, -25.0)) < 1e-9);
        assert!((body.shape().bounds().1.y - (-24.0)).abs() < 1e-9);
    }
}
