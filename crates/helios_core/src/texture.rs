//! Texture loading and caching for materials.
//!
//! Colors are kept in the 0-255 range end to end; the shading pipeline
//! works directly in display units and only gamma corrects at the very end.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use helios_math::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error for {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid texture dimensions: {width}x{height} with {len} bytes")]
    InvalidDimensions { width: u32, height: u32, len: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A color lookup over surface coordinates.
#[derive(Clone, Debug)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Vec3),
    /// A decoded RGB image.
    Image(ImageTexture),
}

impl Texture {
    /// Solid color texture, components in 0-255.
    pub fn solid(r: f32, g: f32, b: f32) -> Self {
        Texture::Solid(Vec3::new(r, g, b))
    }

    /// Color at `(u, v)`, components in 0-255.
    pub fn value(&self, u: f32, v: f32) -> Vec3 {
        match self {
            Texture::Solid(color) => *color,
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<ImageTexture> for Texture {
    fn from(image: ImageTexture) -> Self {
        Texture::Image(image)
    }
}

/// An RGB image sampled with nearest-neighbour lookup.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Row-major RGB pixels, row 0 at the top
    pixels: Vec<[u8; 3]>,
}

impl ImageTexture {
    /// Wrap a tightly packed RGB byte buffer.
    pub fn from_rgb(width: u32, height: u32, data: &[u8]) -> TextureResult<Self> {
        let invalid = || TextureError::InvalidDimensions {
            width,
            height,
            len: data.len(),
        };

        if packed_len(width, height, 3) != Some(data.len()) {
            return Err(invalid());
        }

        let pixels: &[[u8; 3]] = bytemuck::try_cast_slice(data).map_err(|_| invalid())?;

        Ok(Self {
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    /// Wrap a tightly packed RGBA byte buffer, discarding alpha.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> TextureResult<Self> {
        if packed_len(width, height, 4) != Some(data.len()) {
            return Err(TextureError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }

        let pixels = data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file (PNG or JPEG) into an RGB texture.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(io) => TextureError::Io(io),
            source => TextureError::Image {
                path: path.display().to_string(),
                source,
            },
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_rgb(width, height, rgb.as_raw())
    }

    /// Nearest-neighbour lookup.
    ///
    /// `tx = floor(u * (W - 1))`, `ty = floor(v * (H - 1))`, both clamped
    /// into the image. `v = 0` is the top row.
    pub fn value(&self, u: f32, v: f32) -> Vec3 {
        let tx = texel_index(u, self.width);
        let ty = texel_index(v, self.height);
        let [r, g, b] = self.pixels[ty * self.width as usize + tx];
        Vec3::new(r as f32, g as f32, b as f32)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

/// Byte length of a packed `width x height` buffer, `None` when empty or overflowing.
fn packed_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
}

fn texel_index(coord: f32, extent: u32) -> usize {
    let max = extent.saturating_sub(1);
    let scaled = (coord * max as f32).floor();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, max as f32) as usize
}

/// Cache for loaded textures.
///
/// Planets that share an asset share one decoded texture.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let image = ImageTexture::open(&full_path)?;

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        let texture = Arc::new(Texture::Image(image));
        self.textures.insert(path.to_string(), texture.clone());
        Ok(texture)
    }

    /// Register an already built texture under `path`.
    pub fn insert(&mut self, path: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(path.into(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}
