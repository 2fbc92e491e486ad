//! Animated pinhole camera.
//!
//! The camera follows a closed elliptical orbit around its look-at point.
//! One animation loop spans `frames` frames; with `frames <= 0` the camera
//! stays at the start of the orbit.

use std::f32::consts::TAU;

use crate::{ImageInfo, Ray, SampleCoord};
use lumen_math::{safe_normalize, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Closed orbit evaluated as `(cos_axis * cos t + sin_axis * sin t + center) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub cos_axis: Vec3,
    pub sin_axis: Vec3,
    pub center: Vec3,
    pub scale: f32,
}

impl Orbit {
    /// Position on the orbit at angle `t` (radians).
    #[inline]
    pub fn position(&self, t: f32) -> Vec3 {
        let (sin_t, cos_t) = t.sin_cos();
        (self.cos_axis * cos_t + self.sin_axis * sin_t + self.center) * self.scale
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            cos_axis: Vec3::new(4.0, 0.0, -10.0),
            sin_axis: Vec3::new(10.0, 0.0, 4.0),
            center: Vec3::new(0.0, 5.0, 0.0),
            scale: 0.25,
        }
    }
}

/// Sub-pixel and sub-frame jitter for one camera ray, each in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraSample {
    pub pixel: Vec2,
    pub time: f32,
}

impl CameraSample {
    pub fn new(sx: f32, sy: f32, st: f32) -> Self {
        Self {
            pixel: Vec2::new(sx, sy),
            time: st,
        }
    }
}

/// Camera for generating primary rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub look_at: Vec3,
    pub world_up: Vec3,
    /// Field of view across the sensor width, in degrees
    pub fov: f32,
    pub orbit: Orbit,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            look_at: Vec3::ZERO,
            world_up: Vec3::Y,
            fov: 80.0,
            orbit: Orbit::default(),
        }
    }
}

impl Camera {
    /// Set the look-at point and up vector.
    pub fn with_target(mut self, look_at: Vec3, world_up: Vec3) -> Self {
        self.look_at = look_at;
        self.world_up = world_up;
        self
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set the camera path.
    pub fn with_orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = orbit;
        self
    }

    /// Orbit angle for a point in the animation, `frame + st` in frame units.
    pub fn orbit_angle(frame: u32, st: f32, frames: i32) -> f32 {
        if frames <= 0 {
            0.0
        } else {
            TAU * (frame as f32 + st) / frames as f32
        }
    }

    /// Camera position at orbit angle `t`.
    pub fn position(&self, t: f32) -> Vec3 {
        self.orbit.position(t)
    }

    /// Orthonormal `(forward, right, up)` basis for a camera at `position`.
    ///
    /// Degenerate setups fall back to fixed axes: +Z when the camera sits on
    /// its look-at point, +X when looking straight along `world_up`.
    pub fn basis(&self, position: Vec3) -> (Vec3, Vec3, Vec3) {
        let forward = safe_normalize(self.look_at - position, Vec3::Z);
        let right = safe_normalize(self.world_up.cross(forward), Vec3::X);
        let up = forward.cross(right);
        (forward, right, up)
    }

    /// Generate the primary ray through `coord`'s pixel.
    ///
    /// Always returns a unit-length direction.
    pub fn primary_ray(&self, coord: SampleCoord, image: ImageInfo, sample: CameraSample) -> Ray {
        let width = image.width.max(1) as f32;
        let height = image.height.max(1) as f32;

        let aspect_ratio = width / height;
        let sensor_width = 2.0 * (self.fov.to_radians() / 2.0).tan();
        let sensor_height = sensor_width / aspect_ratio;

        let position = self.position(Self::orbit_angle(coord.frame, sample.time, image.frames));
        let (forward, right, up) = self.basis(position);

        let pixel_x = right * (sensor_width / width);
        let pixel_y = up * -(sensor_height / height);
        let pixel_v = forward
            + pixel_x * (coord.x as f32 - width * 0.5 + sample.pixel.x)
            + pixel_y * (coord.y as f32 - height * 0.5 + sample.pixel.y);

        Ray::new(position, safe_normalize(pixel_v, forward))
    }
}
