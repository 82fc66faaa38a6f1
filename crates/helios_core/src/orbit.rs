//! Planet descriptors and parent-relative circular orbits.
//!
//! Every body moves on a circle in the XZ plane around its parent (or
//! the origin when it has none). Positions are composed recursively, so
//! the Moon follows the Earth around the Sun.

use std::collections::HashMap;

use helios_math::{Mat4, Quat, Vec3};
use thiserror::Error;

/// Errors raised while building or querying an orbital system.
#[derive(Error, Debug, PartialEq)]
pub enum OrbitError {
    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Body {body} references unknown parent {parent}")]
    UnknownParent { body: String, parent: String },

    #[error("Parent chain of {0} forms a cycle")]
    Cycle(String),

    #[error("Duplicate body name: {0}")]
    Duplicate(String),
}

pub type OrbitResult<T> = Result<T, OrbitError>;

/// Static description of one celestial body.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetDescriptor {
    pub name: String,
    pub radius: f32,
    pub texture_path: String,
    pub orbit_radius: f32,
    /// Angular speed around the parent, radians per time unit
    pub orbit_speed: f32,
    /// Spin about the body's own axis (consumed by the raster path)
    pub rotation_speed: f32,
    pub parent: Option<String>,
}

impl PlanetDescriptor {
    pub fn new(
        name: &str,
        radius: f32,
        texture_path: &str,
        orbit_radius: f32,
        orbit_speed: f32,
        rotation_speed: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            radius,
            texture_path: texture_path.to_string(),
            orbit_radius,
            orbit_speed,
            rotation_speed,
            parent: None,
        }
    }

    /// Orbit around another named body instead of the origin.
    pub fn orbiting(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Offset from the parent at `time`.
    pub fn local_offset(&self, time: f32) -> Vec3 {
        let angle = self.orbit_speed * time;
        Vec3::new(
            self.orbit_radius * angle.cos(),
            0.0,
            self.orbit_radius * angle.sin(),
        )
    }
}

/// A flat annulus attached to a body.
#[derive(Debug, Clone, PartialEq)]
pub struct RingDescriptor {
    pub parent: String,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub texture_path: String,
}

/// The default solar system: the Sun, eight planets and Earth's Moon.
pub fn solar_system() -> Vec<PlanetDescriptor> {
    vec![
        PlanetDescriptor::new("Sun", 1.0, "assets/texture/sun.png", 0.0, 0.0, 0.04),
        PlanetDescriptor::new("Mercury", 0.35, "assets/texture/planets/mer_nasa.png", 2.0, 4.15, 0.3),
        PlanetDescriptor::new("Venus", 0.38, "assets/texture/planets/ven_nasa.jpg", 3.0, 1.62, 0.2),
        PlanetDescriptor::new("Earth", 0.40, "assets/texture/planets/earth_nasa.png", 4.0, 1.0, 0.5),
        PlanetDescriptor::new("Mars", 0.37, "assets/texture/planets/mars_nasa.jpg", 5.5, 0.53, 0.4),
        PlanetDescriptor::new("Jupiter", 0.60, "assets/texture/planets/jupiter.png", 7.5, 0.08, 0.6),
        PlanetDescriptor::new("Saturn", 0.55, "assets/texture/planets/saturn/saturn.png", 9.0, 0.03, 0.7),
        PlanetDescriptor::new("Uranus", 0.48, "assets/texture/planets/uranus.png", 11.0, 0.011, 0.8),
        PlanetDescriptor::new("Neptune", 0.47, "assets/texture/planets/nep_nasa.jpg", 13.0, 0.006, 0.9),
        PlanetDescriptor::new("Moon", 0.27, "assets/texture/moon.png", 0.5, 12.0, 1.0).orbiting("Earth"),
    ]
}

/// Saturn's ring, sized to clear the planet's surface.
pub fn saturn_ring() -> RingDescriptor {
    RingDescriptor {
        parent: "Saturn".to_string(),
        inner_radius: 0.7,
        outer_radius: 1.25,
        texture_path: "assets/texture/planets/saturn/saturn ring.png".to_string(),
    }
}

/// Named bodies with validated parent links.
#[derive(Debug, Clone)]
pub struct OrbitalSystem {
    bodies: Vec<PlanetDescriptor>,
    by_name: HashMap<String, usize>,
}

impl OrbitalSystem {
    /// Index the descriptors and check every parent chain terminates.
    pub fn new(bodies: Vec<PlanetDescriptor>) -> OrbitResult<Self> {
        let mut by_name = HashMap::with_capacity(bodies.len());
        for (index, body) in bodies.iter().enumerate() {
            if by_name.insert(body.name.clone(), index).is_some() {
                return Err(OrbitError::Duplicate(body.name.clone()));
            }
        }

        for body in &bodies {
            if let Some(parent) = &body.parent {
                if !by_name.contains_key(parent) {
                    return Err(OrbitError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let system = Self { bodies, by_name };
        for body in &system.bodies {
            system.check_chain(&body.name)?;
        }
        Ok(system)
    }

    fn check_chain(&self, name: &str) -> OrbitResult<()> {
        let mut current = self.get(name)?;
        // A chain longer than the body count must revisit some body
        for _ in 0..self.bodies.len() {
            match &current.parent {
                Some(parent) => current = self.get(parent)?,
                None => return Ok(()),
            }
        }
        Err(OrbitError::Cycle(name.to_string()))
    }

    /// Look up a body by name.
    pub fn get(&self, name: &str) -> OrbitResult<&PlanetDescriptor> {
        self.by_name
            .get(name)
            .map(|&index| &self.bodies[index])
            .ok_or_else(|| OrbitError::UnknownBody(name.to_string()))
    }

    /// World-space position of `name` at `time`.
    pub fn position(&self, name: &str, time: f32) -> OrbitResult<Vec3> {
        let body = self.get(name)?;
        let offset = body.local_offset(time);
        match &body.parent {
            Some(parent) => Ok(self.position(parent, time)? + offset),
            None => Ok(offset),
        }
    }

    /// Model transform for a unit sphere standing in for `name`: scaled
    /// to the body's radius, spun about +Y, placed at its orbital position.
    pub fn model_matrix(&self, name: &str, time: f32) -> OrbitResult<Mat4> {
        let body = self.get(name)?;
        Ok(Mat4::from_scale_rotation_translation(
            Vec3::splat(body.radius),
            Quat::from_rotation_y(body.rotation_speed * time),
            self.position(name, time)?,
        ))
    }

    /// Iterate the bodies in declaration order.
    pub fn bodies(&self) -> impl Iterator<Item = &PlanetDescriptor> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
