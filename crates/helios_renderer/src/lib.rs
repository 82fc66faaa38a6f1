//! Helios Renderer - CPU ray tracing of a small solar system.
//!
//! Direct lighting only: one shading pass per camera ray with hard or
//! soft shadows toward the single emissive body, a procedural nebula
//! and corona for rays that miss, and gamma correction at the end.

mod bucket;
mod camera;
pub mod color;
mod hittable;
mod material;
mod renderer;
mod ring;
mod scene;
pub mod shading;
mod solar;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraModel, DEFAULT_FOV_DEGREES};
pub use hittable::{HitRecord, Hittable, PrimitiveRef};
pub use material::{clamp_color, Color, Material};
pub use renderer::{
    gamma_correct, render, render_pixel, render_with_cancel, ImageBuffer, RenderConfig,
    RenderError, RenderResult,
};
pub use ring::Ring;
pub use scene::{Scene, SceneError, SceneResult};
pub use shading::{ray_color, ShadingContext, ShadowMode};
pub use solar::{build_solar_scene, BuildError};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from helios_math
pub use helios_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in `[0, 1)` from any random source.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
