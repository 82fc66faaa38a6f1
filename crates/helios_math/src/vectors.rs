//! Free-standing vector helpers shared by the intersection and shading code.

use std::f32::consts::PI;

use glam::Vec3;
use rand::{Rng, RngCore};

/// Return `v / |v|`, or `v` unchanged when it has zero length.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length > 0.0 {
        v / length
    } else {
        v
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Uniformly distributed point on the surface of a sphere.
///
/// `theta` is drawn from U(0, 2π) and `phi = acos(1 - 2·U(0, 1))`, which
/// gives equal area density over the whole surface.
pub fn random_point_on_sphere(center: Vec3, radius: f32, rng: &mut dyn RngCore) -> Vec3 {
    let theta = rng.gen::<f32>() * 2.0 * PI;
    let phi = (1.0 - 2.0 * rng.gen::<f32>()).clamp(-1.0, 1.0).acos();

    center
        + radius
            * Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            )
}

/// Equirectangular texture coordinates for a unit normal.
///
/// `u = 0.5 + atan2(z, x) / 2π`, `v = 0.5 - asin(y) / π`. Texture
/// orientation for every planet depends on this exact convention.
#[inline]
pub fn sphere_uv(normal: Vec3) -> (f32, f32) {
    let u = 0.5 + normal.z.atan2(normal.x) / (2.0 * PI);
    let v = 0.5 - normal.y.clamp(-1.0, 1.0).asin() / PI;
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(Vec3::new(3.0, -4.0, 12.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n - Vec3::new(3.0, -4.0, 12.0) / 13.0).length() < 1e-6);
    }

    #[test]
    fn test_reflect_preserves_magnitude() {
        let v = Vec3::new(1.5, -2.0, 0.25);
        let normals = [
            Vec3::X,
            Vec3::NEG_Y,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.8, 0.52).normalize(),
        ];

        for n in normals {
            let r = reflect(v, n);
            assert!((r.length() - v.length()).abs() < 1e-5, "normal {n:?}");
        }
    }

    #[test]
    fn test_reflect_off_floor() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_random_point_lies_on_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let center = Vec3::new(1.0, 20.0, -5.0);

        for _ in 0..1000 {
            let p = random_point_on_sphere(center, 20.0, &mut rng);
            assert!(((p - center).length() - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_random_points_cover_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 4000;
        let above = (0..n)
            .filter(|_| random_point_on_sphere(Vec3::ZERO, 1.0, &mut rng).z > 0.0)
            .count();

        // Uniform on the sphere: roughly half above the equator
        let fraction = above as f32 / n as f32;
        assert!((fraction - 0.5).abs() < 0.05, "fraction = {fraction}");
    }

    #[test]
    fn test_sphere_uv_poles_and_equator() {
        let (_, v_top) = sphere_uv(Vec3::Y);
        let (_, v_bottom) = sphere_uv(Vec3::NEG_Y);
        assert!(v_top.abs() < 1e-6);
        assert!((v_bottom - 1.0).abs() < 1e-6);

        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);

        let (u, _) = sphere_uv(Vec3::Z);
        assert!((u - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_uv_periodic_under_full_turn() {
        let normals = [
            Vec3::new(0.3, 0.4, -0.866).normalize(),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.1, -0.9, 0.2).normalize(),
        ];
        let full_turn = Quat::from_rotation_y(2.0 * PI);

        for n in normals {
            let (u0, v0) = sphere_uv(n);
            let (u1, v1) = sphere_uv(full_turn * n);

            // Compare u modulo wraparound at the seam
            let du = (u0 - u1).abs();
            assert!(du.min(1.0 - du) < 1e-4, "u {u0} vs {u1}");
            assert!((v0 - v1).abs() < 1e-4);
        }
    }
}
