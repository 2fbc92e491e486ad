//! Parallel pass rendering and display conversion.
//!
//! Every (pixel, frame, pass) estimate is independent, so a pass is rendered
//! as a rayon parallel iterator over buckets and merged into the
//! [`Accumulator`] afterwards. The scene is only read.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
use crate::{Accumulator, Color, ImageInfo, RenderConfig, RenderError, RenderResult, Scene};

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Render one pass of every bucket in parallel.
pub fn render_pass(
    buckets: &[Bucket],
    frame: u32,
    pass: u32,
    image: ImageInfo,
    scene: &Scene<'_>,
    config: &RenderConfig,
) -> Vec<BucketResult> {
    buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, frame, pass, image, scene, config))
        .collect()
}

/// Render `passes` passes of `frame` and return the accumulated image.
///
/// `cancel` is checked before each pass; once set the render stops with
/// [`RenderError::Cancelled`].
pub fn render_frame(
    frame: u32,
    passes: u32,
    image: ImageInfo,
    scene: &Scene<'_>,
    config: &RenderConfig,
    bucket_size: u32,
    cancel: &AtomicBool,
) -> RenderResult<Accumulator> {
    let buckets = generate_buckets(image.width, image.height, bucket_size);
    let mut accumulator = Accumulator::new(image.width, image.height);

    log::debug!(
        "Frame {}: {} buckets of {}px, {} passes",
        frame,
        buckets.len(),
        bucket_size,
        passes
    );

    for pass in 0..passes {
        if cancel.load(Ordering::Relaxed) {
            log::warn!("Frame {} cancelled after {} passes", frame, pass);
            return Err(RenderError::Cancelled);
        }

        for result in render_pass(&buckets, frame, pass, image, scene, config) {
            accumulator.add_bucket(&result)?;
        }
        accumulator.finish_pass();

        log::trace!("Frame {}: pass {}/{} done", frame, pass + 1, passes);
    }

    Ok(accumulator)
}
