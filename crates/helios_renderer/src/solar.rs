//! Assemble a renderable scene from orbital descriptors at a point in time.

use std::sync::Arc;

use helios_core::{OrbitError, OrbitalSystem, RingDescriptor, Texture, TextureCache, TextureError};
use thiserror::Error;

use crate::{Material, Ring, Scene, SceneError, Sphere};

/// Name of the body that becomes the scene's light.
pub const SUN_NAME: &str = "Sun";

/// Errors raised while building a solar-system scene.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Orbit error: {0}")]
    Orbit(#[from] OrbitError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

fn planet_material(texture: Arc<Texture>, is_sun: bool) -> Material {
    if is_sun {
        Material::new(texture).with_emissive(true).with_halo(1.0, 1.0)
    } else {
        Material::new(texture).with_specular(0.3, 32.0)
    }
}

/// One sphere per body at its orbital position for `time`, plus rings
/// centered on their parents.
///
/// Textures are loaded through `cache`; a texture missing on disk is an
/// error rather than a silent fallback.
pub fn build_solar_scene(
    system: &OrbitalSystem,
    rings: &[RingDescriptor],
    time: f32,
    cache: &mut TextureCache,
    background: Option<Arc<Texture>>,
) -> Result<Scene, BuildError> {
    let mut spheres = Vec::with_capacity(system.len());
    for body in system.bodies() {
        let center = system.position(&body.name, time)?;
        let texture = cache.load(&body.texture_path)?;
        let material = planet_material(texture, body.name == SUN_NAME);
        spheres.push(Sphere::new(center, body.radius, Arc::new(material)));
    }

    let mut ring_prims = Vec::with_capacity(rings.len());
    for ring in rings {
        let center = system.position(&ring.parent, time)?;
        let texture = cache.load(&ring.texture_path)?;
        let material = Material::new(texture).with_specular(0.5, 64.0);
        ring_prims.push(Ring::new(
            center,
            ring.inner_radius,
            ring.outer_radius,
            Arc::new(material),
        ));
    }

    log::info!(
        "Built scene at t={:.3}: {} bodies, {} rings",
        time,
        spheres.len(),
        ring_prims.len()
    );

    Ok(Scene::new(spheres, ring_prims, background)?)
}
