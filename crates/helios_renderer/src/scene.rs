//! The renderable scene: bodies, rings, the light and the backdrop.

use std::sync::Arc;

use helios_core::Texture;
use helios_math::{Interval, Ray, HIT_EPSILON};
use thiserror::Error;

use crate::hittable::{HitRecord, Hittable, PrimitiveRef};
use crate::{Ring, Sphere};

/// Errors raised while assembling a scene.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Scene has no emissive sphere to act as the light")]
    NoLight,

    #[error("Scene has {0} emissive spheres, expected exactly one")]
    MultipleLights(usize),

    #[error("Sphere {index} has radius {radius}, expected a positive value")]
    InvalidRadius { index: usize, radius: f32 },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Immutable collection of primitives with exactly one emissive sphere.
///
/// Closest-hit queries scan every sphere, then every ring. Ties keep the
/// first primitive encountered.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    rings: Vec<Ring>,
    light: usize,
    background: Option<Arc<Texture>>,
}

impl Scene {
    /// Build a scene, locating the single emissive sphere.
    pub fn new(
        spheres: Vec<Sphere>,
        rings: Vec<Ring>,
        background: Option<Arc<Texture>>,
    ) -> SceneResult<Self> {
        // Written negated so NaN is rejected too
        if let Some((index, sphere)) = spheres
            .iter()
            .enumerate()
            .find(|(_, sphere)| !(sphere.radius() > 0.0))
        {
            return Err(SceneError::InvalidRadius {
                index,
                radius: sphere.radius(),
            });
        }

        let emissive: Vec<usize> = spheres
            .iter()
            .enumerate()
            .filter(|(_, sphere)| sphere.material().is_emissive())
            .map(|(index, _)| index)
            .collect();

        let light = match emissive.as_slice() {
            [] => return Err(SceneError::NoLight),
            [index] => *index,
            many => return Err(SceneError::MultipleLights(many.len())),
        };

        log::debug!(
            "Scene: {} spheres, {} rings, light at index {}, background {}",
            spheres.len(),
            rings.len(),
            light,
            if background.is_some() { "textured" } else { "procedural" }
        );

        Ok(Self {
            spheres,
            rings,
            light,
            background,
        })
    }

    /// The emissive sphere.
    pub fn light(&self) -> &Sphere {
        &self.spheres[self.light]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn background(&self) -> Option<&Texture> {
        self.background.as_deref()
    }

    /// Every primitive in scan order.
    pub fn primitives(&self) -> impl Iterator<Item = PrimitiveRef<'_>> {
        self.spheres
            .iter()
            .map(PrimitiveRef::Sphere)
            .chain(self.rings.iter().map(PrimitiveRef::Ring))
    }

    /// Nearest hit in front of the ray origin.
    pub fn closest_hit(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        self.hit(ray, Interval::forward(HIT_EPSILON))
    }

    /// True if a non-emissive primitive other than `exclude` blocks the ray
    /// strictly before `max_t`.
    pub fn occluded(&self, ray: &Ray, max_t: f32, exclude: PrimitiveRef<'_>) -> bool {
        let ray_t = Interval::new(HIT_EPSILON, max_t);
        self.primitives()
            .filter(|primitive| !primitive.material().is_emissive())
            .filter(|primitive| !primitive.is_same(&exclude))
            .any(|primitive| primitive.hit(ray, ray_t).is_some())
    }
}

impl Hittable for Scene {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for primitive in self.primitives() {
            // Strict upper bound: an equal t never replaces an earlier hit
            if let Some(rec) = primitive.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
