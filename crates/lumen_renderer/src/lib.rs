//! Lumen - deterministic quasi-Monte Carlo path tracing.
//!
//! A diffuse-only path tracer for a small fixed scene lit by one point light.
//! Every radiance estimate is a pure function of (pixel, frame, pass): the
//! sampler is a Cranley-Patterson rotated Halton sequence keyed on the pixel,
//! so renders are reproducible and passes can be computed in any order or on
//! any thread.
//!
//! # Example
//!
//! ```no_run
//! use lumen_renderer::{generate_colour, reference_shapes, ImageInfo, RenderConfig, SampleCoord, Scene};
//!
//! let shapes = reference_shapes();
//! let scene = Scene::from_shapes(&shapes);
//! let config = RenderConfig::default();
//! let colour = generate_colour(SampleCoord::new(320, 240, 0, 0), ImageInfo::new(640, 480, 0), &scene, &config);
//! ```

mod bucket;
mod camera;
mod config;
mod error;
mod framebuffer;
mod integrator;
mod plane;
mod renderer;
pub mod sampler;
mod scene;
mod shape;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraSample, Orbit};
pub use config::{RenderConfig, NUM_PRIMES};
pub use error::{RenderError, RenderResult};
pub use framebuffer::Accumulator;
pub use integrator::{
    cosine_direction, generate_colour, BounceEvent, Bounces, DirectLight, PathState, PathStatus,
    PathTracer, SurfaceHit,
};
pub use plane::Plane;
pub use renderer::{color_to_rgba, linear_to_gamma, render_frame, render_pass};
pub use sampler::{ImageInfo, PixelSampler, SampleCoord};
pub use scene::{reference_shapes, Hit, Scene, DEFAULT_RAY_EPSILON};
pub use shape::{SceneObject, Shape};
pub use sphere::Sphere;

/// Re-export Vec3 and the ray type from lumen_math
pub use lumen_math::{Ray, Vec3};

/// Color type alias (linear RGB radiance or albedo)
pub type Color = Vec3;
