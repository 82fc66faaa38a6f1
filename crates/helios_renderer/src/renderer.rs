//! Sampling, parallel render loop and image output.
//!
//! Colors stay in linear 0-255 units until `ImageBuffer::to_rgb8`, which is
//! the only place gamma correction happens.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use helios_core::RenderSettings;
use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::shading::{ray_color, ShadingContext, ShadowMode, DEFAULT_NEBULA_INTENSITY};
use crate::{gen_f32, Camera, Color, Interval, Scene};

/// Display gamma applied at output.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// Errors raised by the render loop.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render cancelled")]
    Cancelled,

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Jittered camera rays per pixel
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub ambient: f32,
    pub shadow: ShadowMode,
    pub nebula_intensity: f32,
    /// Seed for the per-bucket random streams
    pub seed: u64,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
            max_depth: 5,
            ambient: 0.1,
            shadow: ShadowMode::Hard,
            nebula_intensity: DEFAULT_NEBULA_INTENSITY,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_shadow(mut self, shadow: ShadowMode) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn shading_context(&self) -> ShadingContext {
        ShadingContext {
            ambient: self.ambient,
            max_depth: self.max_depth,
            shadow: self.shadow,
            nebula_intensity: self.nebula_intensity,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        let shadow = match settings.shadow_samples {
            Some(samples) => ShadowMode::Soft { samples },
            None => ShadowMode::Hard,
        };

        Self {
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            ambient: settings.ambient,
            shadow,
            seed: settings.seed,
            ..Default::default()
        }
    }
}

/// Average of `samples_per_pixel` jittered samples through pixel `(x, y)`.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let ctx = config.shading_context();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let dx = gen_f32(rng);
        let dy = gen_f32(rng);
        let ray = camera.get_ray(x, y, dx, dy);
        pixel_color += ray_color(&ray, scene, &ctx, 0, rng);
    }

    pixel_color / samples as f32
}

/// Map a linear 0-255 channel to an 8-bit display value.
#[inline]
pub fn gamma_correct(channel: f32) -> u8 {
    let normalized = Interval::COLOR.clamp(channel) / 255.0;
    (normalized.powf(1.0 / DISPLAY_GAMMA) * 255.0) as u8
}

/// Row-major offset of pixel `(x, y)`, computed in `usize`.
#[inline]
pub fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Row-major framebuffer of linear 0-255 colors.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[pixel_index(self.width, x, y)] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let rows = result.pixels.chunks_exact(bucket.width.max(1) as usize);
        for (local_y, row) in rows.enumerate() {
            for (local_x, color) in row.iter().enumerate() {
                self.set(bucket.x + local_x as u32, bucket.y + local_y as u32, *color);
            }
        }
    }

    /// Gamma-corrected 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [gamma_correct(c.x), gamma_correct(c.y), gamma_correct(c.z)])
            .collect()
    }

    /// Encode as PNG (or any format `image` infers from the extension).
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the whole image in parallel.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let (image, _) = render_buckets(camera, scene, config, None);
    image
}

/// Render the whole image, checking `cancel` before each bucket.
pub fn render_with_cancel(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    match render_buckets(camera, scene, config, Some(cancel)) {
        (image, true) => Ok(image),
        (_, false) => Err(RenderError::Cancelled),
    }
}

/// Shared render loop. Returns the image and whether every bucket was rendered.
fn render_buckets(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    cancel: Option<&AtomicBool>,
) -> (ImageBuffer, bool) {
    let start = Instant::now();
    let bucket_size = if config.bucket_size == 0 {
        log::warn!("Bucket size 0 requested, using {}", DEFAULT_BUCKET_SIZE);
        DEFAULT_BUCKET_SIZE
    } else {
        config.bucket_size
    };
    let buckets = generate_buckets(camera.width, camera.height, bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp ({} buckets, {:?} shadows)",
        camera.width,
        camera.height,
        config.samples_per_pixel,
        buckets.len(),
        config.shadow
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return None;
            }
            let result = render_bucket(bucket, camera, scene, config);
            log::debug!(
                "Bucket {} at ({}, {}) done",
                bucket.index,
                bucket.x,
                bucket.y
            );
            Some(result)
        })
        .collect();

    let complete = results.len() == buckets.len();
    let mut image = ImageBuffer::new(camera.width, camera.height);
    for result in &results {
        image.write_bucket(result);
    }

    if complete {
        log::info!("Render finished in {:.2?}", start.elapsed());
    } else {
        log::info!(
            "Render cancelled after {:.2?} ({}/{} buckets)",
            start.elapsed(),
            results.len(),
            buckets.len()
        );
    }
    (image, complete)
}
