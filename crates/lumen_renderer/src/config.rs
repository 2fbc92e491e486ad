//! Render configuration.
//!
//! Every constant the integrator and camera read lives in [`RenderConfig`],
//! so a scene can swap its sky, light or camera path without recompiling.
//! `RenderConfig::default()` is the reference scene.

use std::path::Path;

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Camera, Color, RenderError, RenderResult};

/// Number of prime bases the sampler cycles through.
pub const NUM_PRIMES: usize = 6;

/// Immutable configuration passed into the integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of indirect bounces after the primary hit
    pub max_bounces: u32,
    /// Sky colour straight up
    pub sky_zenith: Color,
    /// Sky colour at (and below) the horizon
    pub sky_horizon: Color,
    /// Position of the single point light
    pub light_position: Vec3,
    /// Scale applied to the inverse-square falloff
    pub light_intensity: f32,
    /// Radical inverse bases, indexed by sample dimension modulo `NUM_PRIMES`
    pub primes: [u32; NUM_PRIMES],
    pub camera: Camera,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_bounces: 3,
            sky_zenith: Color::new(0.02, 0.05, 0.1) * 2.0,
            sky_horizon: Color::new(0.05, 0.07, 0.1) * 2.0,
            light_position: Vec3::new(8.0, 12.0, -6.0),
            light_intensity: 420.0,
            primes: [2, 3, 5, 7, 11, 13],
            camera: Camera::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would hang or poison the sampler and integrator.
    pub fn validate(&self) -> RenderResult<()> {
        if let Some(base) = self.primes.iter().find(|&&p| p < 2) {
            return Err(RenderError::InvalidConfig(format!(
                "radical inverse base must be at least 2, got {base}"
            )));
        }
        if !(self.light_intensity >= 0.0 && self.light_intensity.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "light_intensity must be finite and non-negative, got {}",
                self.light_intensity
            )));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.camera.fov
            )));
        }
        Ok(())
    }

    /// Sky colour for a ray leaving the scene in `direction`.
    ///
    /// Blends horizon to zenith by `max(0, direction.y)`.
    #[inline]
    pub fn sky_colour(&self, direction: Vec3) -> Color {
        self.sky_horizon + (self.sky_zenith - self.sky_horizon) * direction.y.max(0.0)
    }
}
