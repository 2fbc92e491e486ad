//! Scene container and nearest-hit query.

use crate::{shape::SceneObject, Color, Plane, Ray, Shape, Sphere};
use lumen_math::Vec3;

/// Default minimum hit distance. Excludes self-intersection at the ray origin.
pub const DEFAULT_RAY_EPSILON: f32 = 1e-4;

/// Result of a successful nearest-hit query.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Object that was hit
    pub object: &'a Shape,
    /// Distance along the ray
    pub t: f32,
}

/// An ordered list of borrowed shapes.
///
/// The scene does not own its objects; they must outlive it and stay
/// unmodified for the duration of rendering. An empty scene is valid and
/// treats every ray as a miss.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    objects: Vec<&'a Shape>,
    epsilon: f32,
}

impl<'a> Scene<'a> {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            epsilon: DEFAULT_RAY_EPSILON,
        }
    }

    /// Create a scene referencing every shape in `shapes`, in order.
    pub fn from_shapes(shapes: &'a [Shape]) -> Self {
        Self {
            objects: shapes.iter().collect(),
            epsilon: DEFAULT_RAY_EPSILON,
        }
    }

    /// Set the minimum accepted hit distance.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: &'a Shape) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Find the closest object along `ray`.
    ///
    /// Accepts hits with `epsilon < t < best`, where best starts at infinity.
    /// The first object wins exact ties. `None` means the ray escapes, i.e.
    /// the nearest hit is at infinity.
    pub fn nearest_intersection(&self, ray: &Ray) -> Option<Hit<'a>> {
        let mut nearest: Option<Hit<'a>> = None;
        let mut nearest_t = f32::INFINITY;

        for &object in &self.objects {
            if let Some(t) = object.intersect(ray) {
                if t > self.epsilon && t < nearest_t {
                    nearest = Some(Hit { object, t });
                    nearest_t = t;
                }
            }
        }

        nearest
    }
}

impl Default for Scene<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the shapes of the reference scene.
///
/// A grey ground plane with three diffuse spheres around the origin, which is
/// where the default camera orbit looks.
pub fn reference_shapes() -> Vec<Shape> {
    let shapes: Vec<Shape> = vec![
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Color::splat(0.6)).into(),
        Sphere::new(Vec3::ZERO, 1.0, Color::new(0.8, 0.3, 0.2)).into(),
        Sphere::new(Vec3::new(-2.2, -0.3, 0.6), 0.7, Color::new(0.3, 0.6, 0.8)).into(),
        Sphere::new(Vec3::new(1.8, -0.5, 1.2), 0.5, Color::splat(0.9)).into(),
    ];
    log::debug!("Built reference scene with {} shapes", shapes.len());
    shapes
}
