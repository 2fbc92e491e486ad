//! The scene-object capability and the closed set of shapes implementing it.

use crate::{Color, Plane, Ray, Sphere};
use lumen_math::Vec3;

/// Trait for objects that rays can be traced against.
///
/// Objects are read concurrently by every render thread, so they must be
/// `Send + Sync` and must not mutate on query.
pub trait SceneObject: Send + Sync {
    /// Distance along `ray` to the nearest surface in front of its origin,
    /// or `None` if the ray misses.
    ///
    /// The scene applies its own epsilon, so shapes may return hits
    /// arbitrarily close to zero.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Unit surface normal at `point`, which is assumed to lie on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Diffuse albedo. Not clamped to [0, 1].
    fn colour(&self) -> Color;
}

/// A shape that can be placed in a [`crate::Scene`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
}

impl SceneObject for Shape {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            Shape::Sphere(s) => s.intersect(ray),
            Shape::Plane(p) => p.intersect(ray),
        }
    }

    #[inline]
    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => p.normal_at(point),
        }
    }

    #[inline]
    fn colour(&self) -> Color {
        match self {
            Shape::Sphere(s) => s.colour(),
            Shape::Plane(p) => p.colour(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}
