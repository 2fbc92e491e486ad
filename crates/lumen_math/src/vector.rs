//! Vector helpers that glam does not provide directly.

use crate::Vec3;

/// Normalise `v`, or return `fallback` when `v` has zero (or non-finite) length.
///
/// `fallback` is returned as given, so callers pass a unit axis.
#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}
