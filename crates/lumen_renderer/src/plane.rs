//! Infinite plane primitive.

use crate::{shape::SceneObject, Color, Ray};
use lumen_math::{safe_normalize, Vec3};

/// Rays closer to parallel than this are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

/// An infinite plane through `point` with a fixed normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    colour: Color,
}

impl Plane {
    /// Create a new plane. The normal is normalised; a zero normal becomes +Y.
    pub fn new(point: Vec3, normal: Vec3, colour: Color) -> Self {
        Self {
            point,
            normal: safe_normalize(normal, Vec3::Y),
            colour,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl SceneObject for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        (t > 0.0).then_some(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn colour(&self) -> Color {
        self.colour
    }
}
