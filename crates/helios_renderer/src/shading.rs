//! Per-ray shading.
//!
//! Turns a camera ray into a 0-255 color in a single pass:
//! - misses get a procedural nebula (optionally over a background texture)
//!   plus a corona around the light
//! - the ring gets rim, specular and edge-glow terms
//! - the light returns its own emission
//! - planets get vibrancy-enhanced texture with diffuse, specular and rim
//!   lighting, darkened by shadow visibility
//!
//! There is no indirect bounce. `depth` / `max_depth` are carried so a
//! multi-bounce integrator can slot in without changing callers.

use helios_math::{normalize, random_point_on_sphere, sphere_uv, Ray, Vec3, HIT_EPSILON};
use rand::RngCore;

use crate::color::enhance_vibrancy;
use crate::hittable::{HitRecord, PrimitiveRef};
use crate::material::clamp_color;
use crate::{Color, Scene};

/// Area-light samples used when soft shadows are requested without a count.
pub const DEFAULT_SOFT_SHADOW_SAMPLES: u32 = 50;

/// Default strength of the procedural nebula backdrop.
pub const DEFAULT_NEBULA_INTENSITY: f32 = 0.3;

/// Below this visibility a planet point is shaded as fully shadowed.
const FULL_SHADOW_THRESHOLD: f32 = 0.1;

const EMISSIVE_TINT: Color = Color::new(1.7, 1.4, 1.1);
const SHADOW_AMBIENT_TINT: Color = Color::new(0.6, 0.7, 1.1);
const SPECULAR_TINT: Color = Color::new(1.0, 0.9, 0.8);
const SUNLIGHT_TINT: Color = Color::new(1.1, 1.0, 0.9);
const EDGE_GLOW_TINT: Color = Color::new(1.0, 0.9, 0.8);
const RING_SPECULAR_EXPONENT: f32 = 64.0;

/// Visibility estimator for the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadowMode {
    /// One occlusion ray toward the light's center.
    Hard,
    /// Occlusion rays toward random points on the light's surface.
    Soft { samples: u32 },
}

impl ShadowMode {
    pub fn soft() -> Self {
        ShadowMode::Soft {
            samples: DEFAULT_SOFT_SHADOW_SAMPLES,
        }
    }
}

impl Default for ShadowMode {
    fn default() -> Self {
        ShadowMode::Hard
    }
}

/// Per-render shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingContext {
    /// Ambient light factor
    pub ambient: f32,
    /// Depth past which a ray contributes nothing
    pub max_depth: u32,
    pub shadow: ShadowMode,
    pub nebula_intensity: f32,
}

impl Default for ShadingContext {
    fn default() -> Self {
        Self {
            ambient: 0.1,
            max_depth: 5,
            shadow: ShadowMode::Hard,
            nebula_intensity: DEFAULT_NEBULA_INTENSITY,
        }
    }
}

/// Color seen along `ray`, each channel in [0, 255].
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    ctx: &ShadingContext,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    if depth > ctx.max_depth {
        return Color::ZERO;
    }

    let Some(rec) = scene.closest_hit(ray) else {
        return background_color(ray, scene, ctx.nebula_intensity);
    };

    match rec.primitive {
        PrimitiveRef::Ring(_) => shade_ring(ray, &rec, scene, ctx, rng),
        PrimitiveRef::Sphere(sphere) if sphere.material().is_emissive() => {
            clamp_color(sphere.material().emitted(rec.u, rec.v) * EMISSIVE_TINT)
        }
        PrimitiveRef::Sphere(_) => shade_planet(ray, &rec, scene, ctx, rng),
    }
}

/// Backdrop for rays that hit nothing: nebula, optional texture, corona.
pub fn background_color(ray: &Ray, scene: &Scene, nebula_intensity: f32) -> Color {
    let dir = normalize(ray.direction());
    let (u, v) = sphere_uv(dir);

    let nebula = nebula(u, v, nebula_intensity);
    let mut color = match scene.background() {
        Some(texture) => texture.value(u, v) * (1.0 - nebula_intensity * 0.5) + nebula * 255.0,
        None => nebula * 255.0,
    };

    color += corona(ray, scene);
    clamp_color(color)
}

/// Three interfering sine bands tinted blue, purple and red, in 0-1 units.
fn nebula(u: f32, v: f32, intensity: f32) -> Color {
    let band = |x: f32| x.sin() * 0.5 + 0.5;
    let noise1 = band(u * 30.0 + v * 40.0);
    let noise2 = band(u * 50.0 - v * 30.0);
    let noise3 = band(-u * 20.0 + v * 60.0);

    let blue = Color::new(0.2, 0.3, 0.5) * noise1.powi(3) * intensity * 0.7;
    let purple = Color::new(0.4, 0.2, 0.5) * noise2.powi(4) * intensity * 0.5;
    let red = Color::new(0.5, 0.15, 0.2) * noise3.powi(5) * intensity * 0.3;

    (blue + purple + red) * 0.7
}

/// Glow around the light for rays passing within three angular radii.
fn corona(ray: &Ray, scene: &Scene) -> Color {
    let sun = scene.light();
    let to_sun = sun.center() - ray.origin();
    let sun_dist = to_sun.length();
    if sun_dist <= 0.0 {
        return Color::ZERO;
    }

    let sun_dir = to_sun / sun_dist;
    let ray_dir = normalize(ray.direction());
    let angle = ray_dir.dot(sun_dir).clamp(-1.0, 1.0).acos();

    let corona_start = (sun.radius() / sun_dist).min(1.0).asin();
    let corona_end = corona_start * 3.0;
    if angle >= corona_end || corona_end <= corona_start {
        return Color::ZERO;
    }

    let d = (angle - corona_start) / (corona_end - corona_start);
    if d < 0.0 {
        return Color::ZERO;
    }

    let intensity = (-d * 4.0).exp() * (1.0 - d);
    let inner = Color::new(2.5, 1.8, 1.0);
    let outer = Color::new(0.5, 0.7, 1.2);
    let mut glow = inner * (1.0 - d) + outer * d;

    if d < 0.8 {
        // Three-fold burst around the sun's screen-space axis
        let sun_right = normalize(sun_dir.cross(Vec3::Y));
        let sun_up = normalize(sun_dir.cross(sun_right));
        let ray_angle = ray_dir.dot(sun_up).atan2(ray_dir.dot(sun_right));
        let burst = (ray_angle * 3.0).sin().powi(16) * (1.0 - d);
        glow += Color::new(1.5, 1.2, 0.8) * burst * 0.5;
    }

    glow * intensity * 150.0
}

fn shade_ring(
    ray: &Ray,
    rec: &HitRecord<'_>,
    scene: &Scene,
    ctx: &ShadingContext,
    rng: &mut dyn RngCore,
) -> Color {
    let material = rec.material();
    let tex = material.albedo(rec.u, rec.v);

    let light_dir = normalize(scene.light().center() - rec.point);
    let view_dir = normalize(ray.origin() - rec.point);
    let n_dot_v = rec.normal.dot(view_dir);

    let rim = (1.0 - n_dot_v).max(0.0).powi(3) * 0.8;

    let half = normalize(light_dir + view_dir);
    let spec_angle = rec.normal.dot(half).max(0.0);
    let specular = spec_angle.powf(RING_SPECULAR_EXPONENT) * 0.5 * material.specular_strength();

    let shadow = visibility(rec, scene, ctx.shadow, rng).powf(0.7);

    let mut color = tex * (ctx.ambient + rim + specular) * shadow * 1.2;

    let edge_glow = (1.0 - n_dot_v).max(0.0).powi(2) * 0.3;
    color += EDGE_GLOW_TINT * edge_glow;

    clamp_color(color)
}

fn shade_planet(
    ray: &Ray,
    rec: &HitRecord<'_>,
    scene: &Scene,
    ctx: &ShadingContext,
    rng: &mut dyn RngCore,
) -> Color {
    let material = rec.material();
    let tex = enhance_vibrancy(material.albedo(rec.u, rec.v));
    let view_dir = normalize(-ray.direction());

    let shadow = visibility(rec, scene, ctx.shadow, rng);

    let color = if shadow < FULL_SHADOW_THRESHOLD {
        let rim = 0.2 * rec.normal.dot(view_dir).max(0.0).powi(4);
        tex * (ctx.ambient * SHADOW_AMBIENT_TINT + rim)
    } else {
        let light_dir = normalize(scene.light().center() - rec.point);
        let half = normalize(light_dir + view_dir);

        let diffuse = rec.normal.dot(light_dir).max(0.0).powf(2.5);

        let spec_angle = rec.normal.dot(half).max(0.0);
        let specular = SPECULAR_TINT
            * (material.specular_strength() * 3.0 * spec_angle.powf(material.shininess()));

        let rim = 0.15 * (1.0 - rec.normal.dot(view_dir)).max(0.0).powi(4);

        tex * (specular + diffuse + rim) * SUNLIGHT_TINT * shadow
    };

    clamp_color(color)
}

fn visibility(
    rec: &HitRecord<'_>,
    scene: &Scene,
    mode: ShadowMode,
    rng: &mut dyn RngCore,
) -> f32 {
    match mode {
        ShadowMode::Hard => hard_shadow(rec.point, scene, rec.primitive),
        ShadowMode::Soft { samples } => soft_shadow(rec.point, scene, rec.primitive, samples, rng),
    }
}

/// True if something other than `current` and the light sits between
/// `point` and `target`. Points coinciding with the target count as lit.
fn blocked(point: Vec3, target: Vec3, scene: &Scene, current: PrimitiveRef<'_>) -> bool {
    let to_target = target - point;
    let dist = to_target.length();
    if dist < HIT_EPSILON {
        return false;
    }

    let dir = to_target / dist;
    let shadow_ray = Ray::new(point + HIT_EPSILON * dir, dir);
    scene.occluded(&shadow_ray, dist, current)
}

/// Binary visibility of the light's center from `point`: 1 lit, 0 shadowed.
pub fn hard_shadow(point: Vec3, scene: &Scene, current: PrimitiveRef<'_>) -> f32 {
    if blocked(point, scene.light().center(), scene, current) {
        0.0
    } else {
        1.0
    }
}

/// Fraction of the light's surface visible from `point`, cubed.
///
/// Each sample aims at a uniformly random point on the light sphere.
/// Cubing sharpens the penumbra falloff.
pub fn soft_shadow(
    point: Vec3,
    scene: &Scene,
    current: PrimitiveRef<'_>,
    samples: u32,
    rng: &mut dyn RngCore,
) -> f32 {
    if samples == 0 {
        return hard_shadow(point, scene, current);
    }

    let light = scene.light();
    let blocked_count = (0..samples)
        .filter(|_| {
            let target = random_point_on_sphere(light.center(), light.radius(), rng);
            blocked(point, target, scene, current)
        })
        .count();

    let visible = 1.0 - blocked_count as f32 / samples as f32;
    visible.powi(3)
}
