//! Sphere primitive.

use crate::{shape::SceneObject, Color, Ray};
use lumen_math::{safe_normalize, Vec3};

/// A sphere with a constant diffuse colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    colour: Color,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, colour: Color) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            colour,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl SceneObject for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root in front of the origin; the far root covers rays starting inside
        let near = (h - sqrtd) / a;
        if near > 0.0 {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        (far > 0.0).then_some(far)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        safe_normalize(point - self.center, Vec3::Y)
    }

    fn colour(&self) -> Color {
        self.colour
    }
}
