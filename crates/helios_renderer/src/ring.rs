//! Flat annulus primitive (a planetary ring).

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, PrimitiveRef},
    Material,
};
use helios_math::{Interval, Ray, Vec3};

/// Rays this close to parallel with the ring plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ring lying in the horizontal plane through `center`.
#[derive(Debug, Clone)]
pub struct Ring {
    center: Vec3,
    inner_radius: f32,
    outer_radius: f32,
    material: Arc<Material>,
}

impl Ring {
    /// The ring plane always faces +Y.
    pub const NORMAL: Vec3 = Vec3::Y;

    /// Create a new ring. The radii are reordered if given backwards.
    pub fn new(center: Vec3, inner_radius: f32, outer_radius: f32, material: Arc<Material>) -> Self {
        if inner_radius > outer_radius {
            log::warn!("Ring radii given backwards ({inner_radius} > {outer_radius}), swapping");
        }
        let inner = inner_radius.min(outer_radius).max(0.0);
        let outer = inner_radius.max(outer_radius).max(0.0);

        Self {
            center,
            inner_radius: inner,
            outer_radius: outer,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Hittable for Ring {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = ray.direction().dot(Self::NORMAL);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.center - ray.origin()).dot(Self::NORMAL) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let point = ray.at(t);
        let offset = point - self.center;
        let dist_sq = offset.length_squared();
        if dist_sq < self.inner_radius * self.inner_radius
            || dist_sq > self.outer_radius * self.outer_radius
        {
            return None;
        }

        let width = self.outer_radius - self.inner_radius;
        let u = offset.z.atan2(offset.x) / (2.0 * PI) + 0.5;
        let v = if width > 0.0 {
            (dist_sq.sqrt() - self.inner_radius) / width
        } else {
            0.0
        };

        Some(HitRecord {
            t,
            point,
            normal: Self::NORMAL,
            primitive: PrimitiveRef::Ring(self),
            u,
            v,
        })
    }
}
