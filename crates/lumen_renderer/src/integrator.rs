//! Path integrator.
//!
//! One call to [`generate_colour`] traces one light path for one
//! (pixel, frame, pass) and returns its radiance estimate. Passes are
//! averaged by the caller (see [`crate::Accumulator`]).
//!
//! A path is a sequence of pure transitions over [`PathState`]. Each
//! transition traces one ray segment and yields a [`BounceEvent`];
//! [`PathTracer::bounces`] exposes them as a lazy iterator of at most
//! `max_bounces + 1` events and [`PathTracer::trace`] folds it.

use std::f32::consts::TAU;

use crate::sampler::{bounce_dimension, DIM_PIXEL_X, DIM_TIME};
use crate::{
    shape::SceneObject, CameraSample, Color, ImageInfo, PixelSampler, Ray, RenderConfig,
    SampleCoord, Scene, Shape,
};
use lumen_math::{safe_normalize, Vec3};

/// Where a path stands between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathState {
    /// Next segment to trace
    pub ray: Ray,
    /// Product of albedos along the path so far
    pub throughput: Color,
    /// Radiance gathered so far
    pub contribution: Color,
    /// Surface interactions so far
    pub bounce: u32,
}

impl PathState {
    /// Fresh path starting with the camera ray.
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            throughput: Color::ONE,
            contribution: Color::ZERO,
            bounce: 0,
        }
    }
}

/// Path status after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// Another segment follows
    Tracing,
    /// The segment escaped to the sky
    Miss,
    /// A surface was hit but the bounce budget is spent
    BounceLimit,
}

/// Direct light arriving at a surface point from the point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectLight {
    /// Reflected radiance, zero when occluded
    pub radiance: Color,
    /// Whether the shadow ray hit something before the light
    pub occluded: bool,
}

/// Surface interaction recorded by a [`BounceEvent`].
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit<'a> {
    pub object: &'a Shape,
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub direct: DirectLight,
}

/// Outcome of tracing one segment.
#[derive(Debug, Clone, Copy)]
pub struct BounceEvent<'a> {
    /// Segment that was traced
    pub ray: Ray,
    /// Surface hit, `None` for a miss
    pub hit: Option<SurfaceHit<'a>>,
    /// Path state after the event; `state.ray` is the next segment when tracing
    pub state: PathState,
    pub status: PathStatus,
}

/// Traces paths for one (pixel, frame, pass).
#[derive(Debug, Clone, Copy)]
pub struct PathTracer<'s, 'c> {
    scene: &'s Scene<'s>,
    config: &'c RenderConfig,
    sampler: PixelSampler<'c>,
}

impl<'s, 'c> PathTracer<'s, 'c> {
    pub fn new(scene: &'s Scene<'s>, config: &'c RenderConfig, sampler: PixelSampler<'c>) -> Self {
        Self {
            scene,
            config,
            sampler,
        }
    }

    /// Trace the segment in `state` and return the resulting event.
    pub fn step(&self, state: PathState) -> BounceEvent<'s> {
        let ray = state.ray;

        let Some(nearest) = self.scene.nearest_intersection(&ray) else {
            let sky = self.config.sky_colour(ray.direction);
            return BounceEvent {
                ray,
                hit: None,
                state: PathState {
                    contribution: state.contribution + state.throughput * sky,
                    ..state
                },
                status: PathStatus::Miss,
            };
        };

        let object = nearest.object;
        let point = ray.at(nearest.t);
        let normal = object.normal_at(point);
        let colour = object.colour();

        let direct = self.direct_light(point, normal, colour);
        let contribution = state.contribution + state.throughput * direct.radiance;

        let hit = Some(SurfaceHit {
            object,
            t: nearest.t,
            point,
            normal,
            direct,
        });

        let bounce = state.bounce + 1;
        if bounce > self.config.max_bounces {
            return BounceEvent {
                ray,
                hit,
                state: PathState {
                    contribution,
                    bounce,
                    ..state
                },
                status: PathStatus::BounceLimit,
            };
        }

        let (u, v) = self.sampler.get_2d(bounce_dimension(bounce));
        let direction = cosine_direction(normal, u, v);

        BounceEvent {
            ray,
            hit,
            state: PathState {
                ray: Ray::new(point, direction),
                throughput: state.throughput * colour,
                contribution,
                bounce,
            },
            status: PathStatus::Tracing,
        }
    }

    /// Lambertian reflection of the point light at `point`, with a shadow ray.
    pub fn direct_light(&self, point: Vec3, normal: Vec3, colour: Color) -> DirectLight {
        let light_vec = self.config.light_position - point;
        let light_len2 = light_vec.dot(light_vec);
        if light_len2 <= 0.0 {
            // Light sits on the surface point, no defined direction
            return DirectLight {
                radiance: Color::ZERO,
                occluded: false,
            };
        }
        let light_len = light_len2.sqrt();
        let light_dir = light_vec * (1.0 / light_len);

        let n_dot_l = normal.dot(light_dir).max(0.0);
        let reflected = colour * n_dot_l / light_len2 * self.config.light_intensity;

        let shadow_ray = Ray::new(point, light_dir);
        let occluded = self
            .scene
            .nearest_intersection(&shadow_ray)
            .is_some_and(|hit| hit.t < light_len);

        DirectLight {
            radiance: if occluded { Color::ZERO } else { reflected },
            occluded,
        }
    }

    /// Lazy sequence of events for a path starting with `ray`.
    pub fn bounces(&self, ray: Ray) -> Bounces<'_, 's, 'c> {
        Bounces {
            tracer: self,
            next: Some(PathState::new(ray)),
        }
    }

    /// Radiance estimate for a path starting with `ray`.
    pub fn trace(&self, ray: Ray) -> Color {
        self.bounces(ray)
            .last()
            .map_or(Color::ZERO, |event| event.state.contribution)
    }
}

/// Iterator over the events of one path. See [`PathTracer::bounces`].
pub struct Bounces<'t, 's, 'c> {
    tracer: &'t PathTracer<'s, 'c>,
    next: Option<PathState>,
}

impl<'s> Iterator for Bounces<'_, 's, '_> {
    type Item = BounceEvent<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.next.take()?;
        let event = self.tracer.step(state);
        if event.status == PathStatus::Tracing {
            self.next = Some(event.state);
        }
        Some(event)
    }
}

/// Cosine-weighted direction about `normal` from two samples in [0, 1).
///
/// A uniform point on the unit sphere offset by the unit normal and
/// renormalised is cosine distributed over the hemisphere. Falls back to
/// `normal` when the two cancel.
pub fn cosine_direction(normal: Vec3, u: f32, v: f32) -> Vec3 {
    let a = u * TAU;
    let s = 2.0 * (v * (1.0 - v)).max(0.0).sqrt();
    let (sin_a, cos_a) = a.sin_cos();
    let sphere = Vec3::new(cos_a * s, sin_a * s, 1.0 - 2.0 * v);

    safe_normalize(normal + sphere, normal)
}

/// Radiance estimate for one (pixel, frame, pass).
///
/// Deterministic: identical arguments give bit-identical results.
pub fn generate_colour(
    coord: SampleCoord,
    image: ImageInfo,
    scene: &Scene<'_>,
    config: &RenderConfig,
) -> Color {
    let sampler = PixelSampler::new(coord, image, &config.primes);

    let (sx, sy) = sampler.get_2d(DIM_PIXEL_X);
    let st = sampler.get(DIM_TIME);
    let ray = config
        .camera
        .primary_ray(coord, image, CameraSample::new(sx, sy, st));

    PathTracer::new(scene, config, sampler).trace(ray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere};

    fn unit_sphere() -> Vec<Shape> {
        vec![Sphere::new(Vec3::ZERO, 1.0, Color::ONE).into()]
    }

    fn make_tracer<'s, 'c>(scene: &'s Scene<'s>, config: &'c RenderConfig) -> PathTracer<'s, 'c> {
        let sampler = PixelSampler::new(SampleCoord::new(4, 4, 0, 3), ImageInfo::new(8, 8, 0), &config.primes);
        PathTracer::new(scene, config, sampler)
    }

    #[test]
    fn test_miss_returns_sky() {
        let config = RenderConfig::default();
        let scene = Scene::new();
        let tracer = make_tracer(&scene, &config);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.6, 0.8));

        let events: Vec<_> = tracer.bounces(ray).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, PathStatus::Miss);
        assert_eq!(tracer.trace(ray), config.sky_colour(ray.direction));
    }

    #[test]
    fn test_direct_light_unoccluded() {
        let config = RenderConfig::default();
        let shapes = unit_sphere();
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);

        let point = Vec3::Y;
        let direct = tracer.direct_light(point, Vec3::Y, Color::ONE);
        assert!(!direct.occluded);

        let to_light = config.light_position - point;
        let expected = Vec3::Y.dot(to_light.normalize()) / to_light.length_squared() * config.light_intensity;
        assert!((direct.radiance.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_direct_light_facing_away() {
        let config = RenderConfig::default();
        let scene = Scene::new();
        let tracer = make_tracer(&scene, &config);
        let direct = tracer.direct_light(Vec3::ZERO, -Vec3::Y, Color::ONE);
        assert_eq!(direct.radiance, Color::ZERO);
    }

    #[test]
    fn test_direct_light_occluded_by_plane() {
        let config = RenderConfig::default();
        let shapes: Vec<Shape> = vec![
            Sphere::new(Vec3::ZERO, 1.0, Color::ONE).into(),
            Plane::new(Vec3::new(0.0, 3.0, 0.0), -Vec3::Y, Color::ONE).into(),
        ];
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);

        let direct = tracer.direct_light(Vec3::Y, Vec3::Y, Color::ONE);
        assert!(direct.occluded);
        assert_eq!(direct.radiance, Color::ZERO);
    }

    #[test]
    fn test_occluder_beyond_light_does_not_shadow() {
        let config = RenderConfig::default();
        let shapes: Vec<Shape> = vec![Plane::new(Vec3::new(0.0, 50.0, 0.0), -Vec3::Y, Color::ONE).into()];
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);

        let direct = tracer.direct_light(Vec3::ZERO, Vec3::Y, Color::ONE);
        assert!(!direct.occluded);
        assert!(direct.radiance.x > 0.0);
    }

    #[test]
    fn test_enclosed_path_hits_bounce_limit() {
        // Floor and ceiling: every segment hits, the light never reaches
        let config = RenderConfig::default();
        let shapes: Vec<Shape> = vec![
            Plane::new(Vec3::ZERO, Vec3::Y, Color::splat(0.5)).into(),
            Plane::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, Color::splat(0.5)).into(),
        ];
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.1).normalize());

        let events: Vec<_> = tracer.bounces(ray).collect();
        assert_eq!(events.len() as u32, config.max_bounces + 1);
        assert!(events.iter().all(|e| e.hit.is_some()));
        assert_eq!(events.last().unwrap().status, PathStatus::BounceLimit);
        assert_eq!(tracer.trace(ray), Color::ZERO);
    }

    #[test]
    fn test_throughput_multiplies_albedo() {
        let config = RenderConfig::default();
        let shapes: Vec<Shape> = vec![Plane::new(Vec3::ZERO, Vec3::Y, Color::new(0.5, 0.25, 1.0)).into()];
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);

        let event = tracer.step(PathState::new(Ray::new(Vec3::Y, -Vec3::Y)));
        assert_eq!(event.status, PathStatus::Tracing);
        assert_eq!(event.state.throughput, Color::new(0.5, 0.25, 1.0));
        assert_eq!(event.state.bounce, 1);
        assert_eq!(event.state.ray.origin, Vec3::ZERO);
        assert!(event.state.ray.direction.dot(Vec3::Y) >= 0.0);
    }

    #[test]
    fn test_zero_max_bounces_stops_after_primary_hit() {
        let config = RenderConfig {
            max_bounces: 0,
            ..RenderConfig::default()
        };
        let shapes = unit_sphere();
        let scene = Scene::from_shapes(&shapes);
        let tracer = make_tracer(&scene, &config);

        let events: Vec<_> = tracer.bounces(Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z)).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, PathStatus::BounceLimit);
    }

    #[test]
    fn test_cosine_direction_in_hemisphere() {
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();
        for i in 0..64 {
            for j in 0..64 {
                let d = cosine_direction(normal, i as f32 / 64.0, j as f32 / 64.0);
                assert!((d.length() - 1.0).abs() < 1e-5);
                assert!(d.dot(normal) >= -1e-6);
            }
        }
    }

    #[test]
    fn test_cosine_direction_degenerate_falls_back_to_normal() {
        // v = 1 gives the sphere point (0, 0, -1), cancelling a +Z normal
        assert_eq!(cosine_direction(Vec3::Z, 0.0, 1.0), Vec3::Z);
    }

    #[test]
    fn test_cosine_direction_mean_cosine() {
        // Cosine-weighted hemisphere has E[cos] = 2/3
        let n = 64;
        let mut sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                let u = (i as f32 + 0.5) / n as f32;
                let v = (j as f32 + 0.5) / n as f32;
                sum += cosine_direction(Vec3::Z, u, v).z;
            }
        }
        let mean = sum / (n * n) as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean cosine {mean}");
    }

    #[test]
    fn test_generate_colour_is_deterministic() {
        let config = RenderConfig::default();
        let shapes = crate::reference_shapes();
        let scene = Scene::from_shapes(&shapes);
        let image = ImageInfo::new(32, 24, 12);

        for (x, y) in [(0, 0), (16, 12), (31, 23), (7, 19)] {
            let coord = SampleCoord::new(x, y, 5, 9);
            let a = generate_colour(coord, image, &scene, &config);
            let b = generate_colour(coord, image, &scene, &config);
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
    }
}
