//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ring, Sphere};
use helios_math::{Interval, Ray, Vec3};

/// Borrowed handle to the primitive that produced a hit.
///
/// The primitive set is closed: celestial bodies and the ring.
#[derive(Debug, Clone, Copy)]
pub enum PrimitiveRef<'a> {
    Sphere(&'a Sphere),
    Ring(&'a Ring),
}

impl<'a> PrimitiveRef<'a> {
    /// Material of the underlying primitive.
    pub fn material(&self) -> &'a Material {
        match self {
            PrimitiveRef::Sphere(sphere) => sphere.material(),
            PrimitiveRef::Ring(ring) => ring.material(),
        }
    }

    /// True when both handles point at the same primitive instance.
    pub fn is_same(&self, other: &PrimitiveRef<'_>) -> bool {
        match (self, other) {
            (PrimitiveRef::Sphere(a), PrimitiveRef::Sphere(b)) => std::ptr::eq(*a, *b),
            (PrimitiveRef::Ring(a), PrimitiveRef::Ring(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    /// Intersect the underlying primitive.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            PrimitiveRef::Sphere(sphere) => sphere.hit(ray, ray_t),
            PrimitiveRef::Ring(ring) => ring.hit(ray, ray_t),
        }
    }
}

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit outward surface normal
    pub normal: Vec3,
    /// Primitive that was hit
    pub primitive: PrimitiveRef<'a>,
    /// UV texture coordinates in [0, 1]
    pub u: f32,
    pub v: f32,
}

impl<'a> HitRecord<'a> {
    #[inline]
    pub fn material(&self) -> &'a Material {
        self.primitive.material()
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` strictly inside `ray_t`, if any.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;
}
