// Re-export glam for convenience
pub use glam::*;

// Helios math types
mod interval;
mod ray;
pub mod vectors;

pub use interval::Interval;
pub use ray::Ray;
pub use vectors::{normalize, random_point_on_sphere, reflect, sphere_uv};

/// Minimum ray parameter accepted as a hit. Keeps secondary rays from
/// re-hitting the surface they start on.
pub const HIT_EPSILON: f32 = 1e-4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_is_three_f32() {
        assert_eq!(std::mem::size_of::<Vec3>(), 3 * std::mem::size_of::<f32>());
    }
}
