//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, PrimitiveRef},
    Material,
};
use helios_math::{normalize, sphere_uv, Interval, Ray, Vec3};

/// A celestial body.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// `radius` must be positive; `Scene::new` rejects anything else.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-b - sqrtd) / (2.0 * a);
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / (2.0 * a);
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let normal = normalize(point - self.center);
        let (u, v) = sphere_uv(normal);

        Some(HitRecord {
            t: root,
            point,
            normal,
            primitive: PrimitiveRef::Sphere(self),
            u,
            v,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_core::Texture;
    use helios_math::HIT_EPSILON;

    fn sphere(center: Vec3, radius: f32) -> Sphere {
        let material = Material::new(Arc::new(Texture::solid(128.0, 128.0, 128.0)));
        Sphere::new(center, radius, Arc::new(material))
    }

    #[test]
    fn test_sphere_hit_front() {
        for r in [0.5, 1.0, 2.5] {
            let sphere = sphere(Vec3::ZERO, r);
            let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

            let rec = sphere.hit(&ray, Interval::forward(HIT_EPSILON)).unwrap();
            assert!((rec.t - (5.0 - r)).abs() < 1e-5);
            assert!((rec.normal - Vec3::Z).length() < 1e-5);
            assert!((rec.point - Vec3::new(0.0, 0.0, r)).length() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(sphere.hit(&ray, Interval::forward(HIT_EPSILON)).is_none());
    }

    #[test]
    fn test_sphere_behind_origin_is_a_miss() {
        let sphere = sphere(Vec3::new(0.0, 0.0, 10.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(sphere.hit(&ray, Interval::forward(HIT_EPSILON)).is_none());
    }

    #[test]
    fn test_inside_sphere_hits_far_wall() {
        let sphere = sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::forward(HIT_EPSILON)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        // Normal stays outward
        assert!((rec.normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_surface_origin_does_not_self_intersect() {
        let sphere = sphere(Vec3::ZERO, 1.0);
        // Leaving the surface outward: the t = 0 root must be rejected
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(sphere.hit(&ray, Interval::forward(HIT_EPSILON)).is_none());
    }

    #[test]
    fn test_hit_uv_matches_mapping() {
        let sphere = sphere(Vec3::new(3.0, 0.0, 0.0), 1.0);
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X);

        let rec = sphere.hit(&ray, Interval::forward(HIT_EPSILON)).unwrap();
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }
}
