//! Pass accumulation.
//!
//! Each pass is one radiance estimate per pixel. The accumulator keeps a
//! running sum and divides by the pass count on read, so the image converges
//! to the Monte Carlo mean as passes are added.

use std::path::Path;

use crate::renderer::color_to_rgba;
use crate::{BucketResult, Color, RenderError, RenderResult};

/// Running sum of rendered passes.
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    sum: Vec<Color>,
    passes: u32,
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sum: vec![Color::ZERO; width as usize * height as usize],
            passes: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Add a full-image pass in row-major order.
    pub fn add_pass(&mut self, pixels: &[Color]) -> RenderResult<()> {
        if pixels.len() != self.sum.len() {
            return Err(RenderError::DimensionMismatch {
                expected: self.sum.len(),
                actual: pixels.len(),
            });
        }
        for (acc, &c) in self.sum.iter_mut().zip(pixels) {
            *acc += c;
        }
        self.passes += 1;
        Ok(())
    }

    /// Add one bucket of the pass in progress. Call [`Self::finish_pass`]
    /// once every bucket of the pass is in.
    pub fn add_bucket(&mut self, result: &BucketResult) -> RenderResult<()> {
        let bucket = &result.bucket;
        if bucket.x + bucket.width > self.width
            || bucket.y + bucket.height > self.height
            || result.pixels.len() != bucket.pixel_count() as usize
        {
            return Err(RenderError::DimensionMismatch {
                expected: bucket.pixel_count() as usize,
                actual: result.pixels.len(),
            });
        }

        let rows = result.pixels.chunks_exact(bucket.width.max(1) as usize);
        for (local_y, row) in rows.enumerate() {
            let start = (bucket.y as usize + local_y) * self.width as usize + bucket.x as usize;
            for (acc, &c) in self.sum[start..start + row.len()].iter_mut().zip(row) {
                *acc += c;
            }
        }
        Ok(())
    }

    /// Mark the current pass complete.
    pub fn finish_pass(&mut self) {
        self.passes += 1;
    }

    /// Mean radiance at (x, y). Black before the first pass.
    pub fn mean(&self, x: u32, y: u32) -> Color {
        self.sum[(y * self.width + x) as usize] / self.passes.max(1) as f32
    }

    /// Mean radiance of every pixel, row-major.
    pub fn resolve(&self) -> Vec<Color> {
        let scale = 1.0 / self.passes.max(1) as f32;
        self.sum.iter().map(|&c| c * scale).collect()
    }

    /// Convert the mean image to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.sum.len() * 4);
        for color in self.resolve() {
            bytes.extend_from_slice(&color_to_rgba(color));
        }
        bytes
    }

    /// Write the mean image as a PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let expected = self.sum.len() * 4;
        let bytes = self.to_rgba();
        let actual = bytes.len();
        let rgba = image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or(RenderError::DimensionMismatch { expected, actual })?;
        rgba.save_with_format(path, image::ImageFormat::Png)?;
        log::info!(
            "Saved {}x{} image ({} passes) to {}",
            self.width,
            self.height,
            self.passes,
            path.display()
        );
        Ok(())
    }
}
