//! Whole-pipeline checks: scene assembly, parallel render, gamma output.

use std::sync::Arc;

use helios_core::{saturn_ring, solar_system, OrbitalSystem, SceneConfig, Texture, TextureCache};
use helios_renderer::{
    build_solar_scene, gamma_correct, render, Camera, Color, ImageBuffer, Material, RenderConfig,
    Scene, ShadowMode, Sphere, Vec3,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn material(color: f32, emissive: bool) -> Arc<Material> {
    let texture = Arc::new(Texture::solid(color, color, color));
    Arc::new(Material::new(texture).with_emissive(emissive).with_specular(0.3, 32.0))
}

/// A large light above and behind a white planet seen from +Z.
fn lit_planet_scene() -> Scene {
    let sun = Sphere::new(Vec3::new(1.0, 20.0, -5.0), 20.0, material(255.0, true));
    let planet = Sphere::new(Vec3::new(-7.0, -28.0, -5.0), 10.0, material(255.0, false));
    Scene::new(vec![sun, planet], vec![], None).unwrap()
}

fn mean(image: &ImageBuffer) -> Color {
    image.pixels.iter().copied().sum::<Color>() / image.pixels.len() as f32
}

#[test]
fn test_lit_planet_and_empty_sky() {
    init_logging();
    let scene = lit_planet_scene();
    let camera = Camera::simple(Vec3::new(0.0, 0.0, 50.0), 64, 64);
    let config = RenderConfig::default().with_samples(4).with_seed(42);

    let image = render(&camera, &scene, &config);
    assert_eq!(image.pixels.len(), 64 * 64);

    // Every pixel stays inside the 0-255 range
    assert!(image
        .pixels
        .iter()
        .all(|c| c.is_finite() && c.min_element() >= 0.0 && c.max_element() <= 255.0));

    // Planet center faces partly toward the light
    let planet = image.get(27, 47);
    assert!(planet.max_element() > 1.0, "planet pixel {planet:?}");

    // Bottom-left corner misses everything and sits outside the corona
    let corner = image.get(0, 63);
    assert!(corner.max_element() <= 36.0, "corner pixel {corner:?}");

    let dark_sky = RenderConfig {
        nebula_intensity: 0.0,
        ..config.clone()
    };
    let image = render(&camera, &scene, &dark_sky);
    assert_eq!(image.get(0, 63), Color::ZERO);

    let bytes = image.to_rgb8();
    assert_eq!(bytes.len(), 64 * 64 * 3);
    let corner_offset = (63 * 64) * 3;
    assert_eq!(&bytes[corner_offset..corner_offset + 3], &[0, 0, 0]);
}

#[test]
fn test_output_independent_of_thread_count() {
    let scene = lit_planet_scene();
    let camera = Camera::simple(Vec3::new(0.0, 0.0, 50.0), 48, 40);
    let config = RenderConfig::default()
        .with_samples(2)
        .with_shadow(ShadowMode::Soft { samples: 8 })
        .with_seed(7);

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| render(&camera, &scene, &config));
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| render(&camera, &scene, &config));

    assert_eq!(single.pixels, many.pixels);
}

#[test]
fn test_doubling_samples_keeps_expected_color() {
    // A blocker casting a penumbra across the planet
    let sun = Sphere::new(Vec3::new(1.0, 20.0, -5.0), 20.0, material(255.0, true));
    let planet = Sphere::new(Vec3::new(-7.0, -28.0, -5.0), 10.0, material(255.0, false));
    let blocker = Sphere::new(Vec3::new(-3.0, -4.0, -1.0), 3.0, material(120.0, false));
    let scene = Scene::new(vec![sun, planet, blocker], vec![], None).unwrap();
    let camera = Camera::simple(Vec3::new(0.0, 0.0, 50.0), 48, 48);

    let base = RenderConfig::default()
        .with_shadow(ShadowMode::Soft { samples: 16 })
        .with_seed(1);
    let low = mean(&render(&camera, &scene, &base.clone().with_samples(8)));
    let high = mean(&render(&camera, &scene, &base.with_samples(16)));

    let diff = (low - high).abs().max_element();
    let scale = low.max_element().max(high.max_element());
    assert!(diff <= scale * 0.03 + 0.5, "low {low:?} high {high:?}");
}

#[test]
fn test_solar_system_from_config() {
    init_logging();
    let json = r#"{
        "time": 0.0,
        "camera": { "position": [0.0, 6.0, 18.0], "look_at": [0.0, 0.0, 0.0], "up": [0.0, 1.0, 0.0] },
        "render": { "width": 49, "height": 33, "samples_per_pixel": 2 }
    }"#;
    let config = SceneConfig::from_json_str(json).unwrap();

    let system = OrbitalSystem::new(solar_system()).unwrap();
    let rings = [saturn_ring()];
    let mut cache = TextureCache::new();
    for body in system.bodies() {
        cache.insert(body.texture_path.clone(), Texture::solid(200.0, 150.0, 100.0));
    }
    cache.insert(rings[0].texture_path.clone(), Texture::solid(210.0, 190.0, 150.0));

    let scene = build_solar_scene(&system, &rings, config.time, &mut cache, None).unwrap();
    let camera = Camera::from_config(&config.camera, config.render.width, config.render.height);
    let image = render(&camera, &scene, &RenderConfig::from(&config.render));

    assert_eq!((image.width, image.height), (49, 33));

    // The sun sits at the look-at point: emissive, saturated red channel
    let center = image.get(24, 16);
    assert_eq!(gamma_correct(center.x), 255);
    assert!(center.z < center.x);
}
