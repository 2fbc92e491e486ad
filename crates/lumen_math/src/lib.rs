// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod ray;
mod vector;
pub use ray::Ray;
pub use vector::safe_normalize;
