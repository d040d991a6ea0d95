//! Polygon geometry primitives
//!
//! Shapes are stored directly in world space; moving a body translates
//! its vertices in lockstep with its centroid.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// 2D vector used throughout the simulation
pub type Vector2 = DVec2;

/// Areas below this are treated as collapsed shapes
const MIN_POLYGON_AREA: f64 = 1e-12;

/// Extent of a polygon along an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub max: f64,
    pub min: f64,
}

impl Projection {
    /// Length of the shared interval (zero or negative when disjoint)
    #[inline]
    pub fn overlap(&self, other: &Projection) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

/// A convex polygon with counter-clockwise winding
///
/// Serialized as its vertex list; deserializing runs the `try_new` checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector2>", into = "Vec<Vector2>")]
pub struct Polygon {
    vertices: Vec<Vector2>,
}

impl TryFrom<Vec<Vector2>> for Polygon {
    type Error = SimError;

    fn try_from(vertices: Vec<Vector2>) -> Result<Self> {
        Self::try_new(vertices)
    }
}

impl From<Polygon> for Vec<Vector2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl Polygon {
    /// Build a polygon, rejecting shapes with fewer than three vertices,
    /// non-finite coordinates or no area
    pub fn try_new(vertices: Vec<Vector2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(SimError::DegeneratePolygon(format!(
                "need at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(SimError::DegeneratePolygon("non-finite vertex".into()));
        }
        let polygon = Self { vertices };
        if polygon.signed_area().abs() < MIN_POLYGON_AREA {
            return Err(SimError::DegeneratePolygon("zero area".into()));
        }
        Ok(polygon)
    }

    /// Build a polygon from vertices known to be valid
    ///
    /// # Panics
    /// If the vertices form a degenerate polygon.
    pub fn new(vertices: Vec<Vector2>) -> Self {
        match Self::try_new(vertices) {
            Ok(polygon) => polygon,
            Err(err) => panic!("{err}"),
        }
    }

    /// Regular sampling of an ellipse, starting at angle 0
    pub fn ellipse(center: Vector2, radius_x: f64, radius_y: f64, num_points: usize) -> Self {
        let vertices = (0..num_points)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / num_points as f64;
                Vector2::new(
                    center.x + radius_x * angle.cos(),
                    center.y + radius_y * angle.sin(),
                )
            })
            .collect();
        Self::new(vertices)
    }

    pub fn circle(center: Vector2, radius: f64, num_points: usize) -> Self {
        Self::ellipse(center, radius, radius, num_points)
    }

    /// Axis-aligned rectangle with its bottom-left corner at the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(width, 0.0),
            Vector2::new(width, height),
            Vector2::new(0.0, height),
        ])
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge vectors `v[i] - v[i + 1]`, wrapping from the last vertex to the first
    ///
    /// For a counter-clockwise polygon the perpendicular `(-e.y, e.x)` of
    /// each edge is its outward normal.
    pub fn edges(&self) -> impl Iterator<Item = Vector2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| self.vertices[i] - self.vertices[(i + 1) % n])
    }

    /// Max and min dot product of every vertex against `unit_axis`
    pub fn project(&self, unit_axis: Vector2) -> Projection {
        let mut projection = Projection {
            max: f64::MIN,
            min: f64::MAX,
        };
        for v in &self.vertices {
            let p = v.dot(unit_axis);
            if p < projection.min {
                projection.min = p;
            }
            if p > projection.max {
                projection.max = p;
            }
        }
        projection
    }

    /// Shoelace area, positive for counter-clockwise winding
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> Vector2 {
        let n = self.vertices.len();
        let mut sum = Vector2::ZERO;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            sum += (a + b) * cross;
        }
        sum / (6.0 * self.signed_area())
    }

    pub fn translate(&mut self, delta: Vector2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    /// Axis-aligned bounding box as (min corner, max corner)
    pub fn bounds(&self) -> (Vector2, Vector2) {
        self.vertices.iter().fold(
            (Vector2::splat(f64::MAX), Vector2::splat(f64::MIN)),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        )
    }
}
