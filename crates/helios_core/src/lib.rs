//! Helios Core - Inputs to the solar-system ray tracer.
//!
//! This crate provides:
//!
//! - **Textures**: solid colors and decoded images with nearest-neighbour lookup
//! - **Scene configuration**: the JSON record holding simulation time and camera placement
//! - **Orbits**: planet descriptors and parent-relative orbital positions
//!
//! # Example
//!
//! ```ignore
//! use helios_core::{config::SceneConfig, orbit::{solar_system, OrbitalSystem}};
//!
//! let config = SceneConfig::load("scenes/solar_system.json")?;
//! let system = OrbitalSystem::new(solar_system())?;
//! let earth = system.position("Earth", config.time)?;
//! ```

pub mod config;
pub mod orbit;
pub mod texture;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError, RenderSettings, SceneConfig};
pub use orbit::{saturn_ring, solar_system, OrbitError, OrbitalSystem, PlanetDescriptor, RingDescriptor};
pub use texture::{ImageTexture, Texture, TextureCache, TextureError};
