//! Per-surface shading parameters.

use std::sync::Arc;

use helios_core::Texture;
use helios_math::{Interval, Vec3};

/// Color type alias (RGB components in 0-255)
pub type Color = Vec3;

/// Clamp every channel into the displayable 0-255 range.
#[inline]
pub fn clamp_color(color: Color) -> Color {
    Interval::COLOR.clamp_vec3(color)
}

/// Warm multiplier applied to an emissive body's texture.
const EMISSION_TINT: Color = Color::new(2.2, 1.6, 1.2);

/// Surface description shared by any number of primitives.
///
/// Built once through the `with_*` methods and then wrapped in an `Arc`;
/// nothing mutates a material after that.
#[derive(Clone, Debug)]
pub struct Material {
    texture: Arc<Texture>,
    emissive: bool,
    specular_strength: f32,
    shininess: f32,
    halo: bool,
    halo_size: f32,
    halo_strength: f32,
    // Reserved for atmosphere and reflection passes
    glow_radius: f32,
    reflectivity: f32,
    rim_power: f32,
}

impl Material {
    /// A non-emissive material with default highlight settings.
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            texture,
            emissive: false,
            specular_strength: 0.5,
            shininess: 32.0,
            halo: false,
            halo_size: 1.0,
            halo_strength: 1.0,
            glow_radius: 0.2,
            reflectivity: 0.1,
            rim_power: 4.0,
        }
    }

    /// Mark the material as a light source.
    pub fn with_emissive(mut self, emissive: bool) -> Self {
        self.emissive = emissive;
        self
    }

    /// Set specular strength and Blinn exponent.
    pub fn with_specular(mut self, strength: f32, shininess: f32) -> Self {
        self.specular_strength = strength.max(0.0);
        self.shininess = shininess.max(0.0);
        self
    }

    /// Enable the halo with the given size and strength.
    pub fn with_halo(mut self, size: f32, strength: f32) -> Self {
        self.halo = true;
        self.halo_size = size.max(0.0);
        self.halo_strength = strength.max(0.0);
        self
    }

    /// Set the reserved atmosphere parameters.
    pub fn with_atmosphere(mut self, glow_radius: f32, reflectivity: f32, rim_power: f32) -> Self {
        self.glow_radius = glow_radius;
        self.reflectivity = reflectivity;
        self.rim_power = rim_power;
        self
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive
    }

    pub fn specular_strength(&self) -> f32 {
        self.specular_strength
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn halo(&self) -> bool {
        self.halo
    }

    pub fn halo_size(&self) -> f32 {
        self.halo_size
    }

    pub fn halo_strength(&self) -> f32 {
        self.halo_strength
    }

    pub fn glow_radius(&self) -> f32 {
        self.glow_radius
    }

    pub fn reflectivity(&self) -> f32 {
        self.reflectivity
    }

    pub fn rim_power(&self) -> f32 {
        self.rim_power
    }

    /// Texture color at `(u, v)`.
    #[inline]
    pub fn albedo(&self, u: f32, v: f32) -> Color {
        self.texture.value(u, v)
    }

    /// Light emitted at `(u, v)`.
    ///
    /// Black for non-emissive materials. Emissive ones return the texture
    /// scaled by a warm tint and the halo strength, clamped to 0-255.
    pub fn emitted(&self, u: f32, v: f32) -> Color {
        if !self.emissive {
            return Color::ZERO;
        }

        let emission = self.albedo(u, v) * EMISSION_TINT * self.halo_strength;
        clamp_color(emission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Arc<Texture> {
        Arc::new(Texture::solid(100.0, 100.0, 100.0))
    }

    #[test]
    fn test_defaults() {
        let material = Material::new(grey());
        assert!(!material.is_emissive());
        assert!(!material.halo());
        assert_eq!(material.specular_strength(), 0.5);
        assert_eq!(material.shininess(), 32.0);
        assert_eq!(material.halo_strength(), 1.0);
    }

    #[test]
    fn test_non_emissive_emits_nothing() {
        let material = Material::new(grey()).with_specular(0.3, 32.0);
        assert_eq!(material.emitted(0.5, 0.5), Color::ZERO);
    }

    #[test]
    fn test_emission_is_warm_and_clamped() {
        let material = Material::new(grey()).with_emissive(true);
        let warm = material.emitted(0.1, 0.9);
        assert!((warm - Color::new(220.0, 160.0, 120.0)).abs().max_element() < 1e-3, "{warm:?}");

        let bright = Material::new(Arc::new(Texture::solid(200.0, 200.0, 200.0)))
            .with_emissive(true)
            .with_halo(1.5, 2.0);
        assert_eq!(bright.emitted(0.0, 0.0), Color::splat(255.0));
    }

    #[test]
    fn test_clamp_color_bounds_each_channel() {
        assert_eq!(clamp_color(Color::new(-1.0, 254.5, 1e6)), Color::new(0.0, 254.5, 255.0));
    }

    #[test]
    fn test_materials_share_textures() {
        let texture = grey();
        let a = Material::new(texture.clone());
        let b = Material::new(texture.clone()).with_emissive(true);

        assert_eq!(Arc::strong_count(&texture), 3);
        assert_eq!(a.albedo(0.2, 0.2), b.albedo(0.8, 0.8));
    }
}
