//! Low-discrepancy sampling.
//!
//! Each pixel draws its samples from a Halton-style radical inverse of the
//! pass index, Cranley-Patterson rotated by a per-pixel hash so neighbouring
//! pixels do not share the same pattern. Nothing here holds mutable state:
//! the same (pixel, frame, pass, dimension) always gives the same value.

use crate::config::NUM_PRIMES;

/// Largest f64 below 1.0.
pub const DOUBLE_ONE_MINUS_EPSILON: f64 = 1.0 - f64::EPSILON / 2.0;

/// Largest f32 below 1.0.
pub const FLOAT_ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Sample dimension for the horizontal pixel offset.
pub const DIM_PIXEL_X: u32 = 0;
/// Sample dimension for the vertical pixel offset.
pub const DIM_PIXEL_Y: u32 = 1;
/// Sample dimension for the time offset within a frame.
pub const DIM_TIME: u32 = 2;

/// First of the two sample dimensions used to pick the direction of `bounce`.
///
/// Bounces are counted from 1 (the first reflection off the primary hit).
#[inline]
pub fn bounce_dimension(bounce: u32) -> u32 {
    3 + bounce * 2
}

/// Integer hash by Thomas Wang.
///
/// See <https://burtleburtle.net/bob/hash/integer.html>.
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x = (x ^ 12_345_391).wrapping_mul(2_654_435_769);
    x ^= (x << 6) ^ (x >> 26);
    x = x.wrapping_mul(2_654_435_769);
    x = x.wrapping_add((x << 5) ^ (x >> 12));
    x
}

/// Map 32 random bits to a float in [0, 1).
///
/// Builds a float in [1, 2) from the top 23 bits as mantissa and subtracts 1.
#[inline]
pub fn uint_to_unit_float(v: u32) -> f32 {
    f32::from_bits((v >> 9) | 0x3f80_0000) - 1.0
}

/// Digit reversal of `a` in `base`, as a fraction in [0, 1).
///
/// `base` must be at least 2.
pub fn radical_inverse(mut a: u32, base: u32) -> f64 {
    debug_assert!(base >= 2);
    let inv_base = 1.0 / base as f64;

    let mut reversed_digits: u64 = 0;
    let mut inv_base_n = 1.0;
    while a != 0 {
        let next = a / base;
        let digit = a - base * next;
        reversed_digits = reversed_digits * base as u64 + digit as u64;
        inv_base_n *= inv_base;
        a = next;
    }

    (reversed_digits as f64 * inv_base_n).min(DOUBLE_ONE_MINUS_EPSILON)
}

/// Add two values in [0, 1) modulo 1.
#[inline]
pub fn wrap01(u: f32, v: f32) -> f32 {
    let sum = u + v;
    if sum < 1.0 {
        sum
    } else {
        sum - 1.0
    }
}

/// Per-pixel random offset, stable across passes.
#[inline]
pub fn pixel_hash(x: u32, y: u32, frame: u32, width: u32, height: u32) -> f32 {
    let index = frame
        .wrapping_mul(width)
        .wrapping_mul(height)
        .wrapping_add(y.wrapping_mul(width))
        .wrapping_add(x);
    uint_to_unit_float(hash_u32(index))
}

/// Sample `dimension` of pass `pass`, rotated by `pixel_hash`.
///
/// The result lies in [0, 1).
#[inline]
pub fn sample(pass: u32, dimension: u32, pixel_hash: f32, primes: &[u32; NUM_PRIMES]) -> f32 {
    let base = primes[dimension as usize % NUM_PRIMES];
    let u = (radical_inverse(pass, base) as f32).min(FLOAT_ONE_MINUS_EPSILON);
    wrap01(u, pixel_hash)
}

/// Which estimate is being computed: pixel, animation frame and pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleCoord {
    pub x: u32,
    pub y: u32,
    pub frame: u32,
    pub pass: u32,
}

impl SampleCoord {
    pub fn new(x: u32, y: u32, frame: u32, pass: u32) -> Self {
        Self { x, y, frame, pass }
    }
}

/// Image and animation extents shared by every estimate of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Frames in the animation loop. Zero or negative means a static camera.
    pub frames: i32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32, frames: i32) -> Self {
        Self {
            width,
            height,
            frames,
        }
    }

    /// Number of pixels in one pass.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Sampler bound to one (pixel, frame, pass).
#[derive(Debug, Clone, Copy)]
pub struct PixelSampler<'c> {
    pass: u32,
    hash: f32,
    primes: &'c [u32; NUM_PRIMES],
}

impl<'c> PixelSampler<'c> {
    /// Create a sampler for the estimate at `coord`.
    pub fn new(coord: SampleCoord, image: ImageInfo, primes: &'c [u32; NUM_PRIMES]) -> Self {
        Self {
            pass: coord.pass,
            hash: pixel_hash(coord.x, coord.y, coord.frame, image.width, image.height),
            primes,
        }
    }

    /// The Cranley-Patterson offset shared by every dimension of this pixel.
    pub fn hash(&self) -> f32 {
        self.hash
    }

    /// Sample value for `dimension`, in [0, 1).
    #[inline]
    pub fn get(&self, dimension: u32) -> f32 {
        sample(self.pass, dimension, self.hash, self.primes)
    }

    /// Two consecutive dimensions starting at `dimension`.
    #[inline]
    pub fn get_2d(&self, dimension: u32) -> (f32, f32) {
        (self.get(dimension), self.get(dimension + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const PRIMES: [u32; NUM_PRIMES] = [2, 3, 5, 7, 11, 13];

    #[test]
    fn test_radical_inverse_base2() {
        assert_eq!(radical_inverse(0, 2), 0.0);
        assert_eq!(radical_inverse(1, 2), 0.5);
        assert_eq!(radical_inverse(2, 2), 0.25);
        assert_eq!(radical_inverse(3, 2), 0.75);
        assert_eq!(radical_inverse(4, 2), 0.125);
    }

    #[test]
    fn test_radical_inverse_base3() {
        assert!((radical_inverse(1, 3) - 1.0 / 3.0).abs() < 1e-12);
        assert!((radical_inverse(2, 3) - 2.0 / 3.0).abs() < 1e-12);
        assert!((radical_inverse(3, 3) - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_radical_inverse_below_one_for_large_index() {
        for base in PRIMES {
            assert!(radical_inverse(u32::MAX, base) < 1.0);
        }
    }

    #[test]
    fn test_hash_is_stable_and_mixing() {
        assert_eq!(hash_u32(7), hash_u32(7));
        assert_ne!(hash_u32(0), hash_u32(1));
        // Adjacent inputs should differ in many bits
        let diff = (hash_u32(1000) ^ hash_u32(1001)).count_ones();
        assert!(diff > 4, "only {diff} bits differ");
    }

    #[test]
    fn test_uint_to_unit_float_range() {
        assert_eq!(uint_to_unit_float(0), 0.0);
        assert!(uint_to_unit_float(u32::MAX) < 1.0);
        assert!((uint_to_unit_float(1 << 31) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_wrap01_matches_fractional_sum() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let u: f32 = rng.gen();
            let v: f32 = rng.gen();
            let w = wrap01(u, v);
            assert!((0.0..1.0).contains(&w), "wrap01({u}, {v}) = {w}");
            let expected = (u as f64 + v as f64).fract();
            assert!((w as f64 - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wrap01_near_one() {
        let w = wrap01(FLOAT_ONE_MINUS_EPSILON, FLOAT_ONE_MINUS_EPSILON);
        assert!(w < 1.0);
    }

    #[test]
    fn test_sample_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let pass = rng.gen::<u32>();
            let hash = uint_to_unit_float(rng.gen());
            for dimension in 0..12 {
                let s = sample(pass, dimension, hash, &PRIMES);
                assert!((0.0..1.0).contains(&s), "sample {s} out of range");
            }
        }
        // Worst case offset
        let hash = uint_to_unit_float(u32::MAX);
        for pass in 0..4096 {
            for dimension in 0..6 {
                assert!(sample(pass, dimension, hash, &PRIMES) < 1.0);
            }
        }
    }

    #[test]
    fn test_dimensions_cycle_through_primes() {
        assert_eq!(sample(5, 1, 0.0, &PRIMES), sample(5, 7, 0.0, &PRIMES));
        assert_eq!(bounce_dimension(1), 5);
        assert_eq!(bounce_dimension(3) as usize % NUM_PRIMES, 3);
    }

    #[test]
    fn test_pixel_sampler_is_deterministic() {
        let image = ImageInfo::new(64, 48, 10);
        let a = PixelSampler::new(SampleCoord::new(12, 34, 2, 17), image, &PRIMES);
        let b = PixelSampler::new(SampleCoord::new(12, 34, 2, 17), image, &PRIMES);
        for d in 0..10 {
            assert_eq!(a.get(d).to_bits(), b.get(d).to_bits());
        }
    }

    #[test]
    fn test_neighbouring_pixels_decorrelated() {
        let image = ImageInfo::new(64, 64, 0);
        let a = PixelSampler::new(SampleCoord::new(10, 10, 0, 3), image, &PRIMES);
        let b = PixelSampler::new(SampleCoord::new(11, 10, 0, 3), image, &PRIMES);
        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.get(DIM_PIXEL_X), b.get(DIM_PIXEL_X));
    }

    #[test]
    fn test_pixel_hash_constant_across_passes() {
        let image = ImageInfo::new(16, 16, 0);
        let a = PixelSampler::new(SampleCoord::new(3, 4, 0, 0), image, &PRIMES);
        let b = PixelSampler::new(SampleCoord::new(3, 4, 0, 99), image, &PRIMES);
        assert_eq!(a.hash(), b.hash());
        // Pass 0 has a zero radical inverse, so every dimension is the hash
        assert_eq!(a.get(0), a.hash());
    }

    #[test]
    fn test_passes_stratify_within_pixel() {
        // Without rotation the first 2^k passes of base 2 land one per stratum
        let mut strata = [false; 16];
        for pass in 0..16 {
            let s = sample(pass, DIM_PIXEL_X, 0.0, &PRIMES);
            strata[(s * 16.0) as usize] = true;
        }
        assert!(strata.iter().all(|&hit| hit));
    }
}
