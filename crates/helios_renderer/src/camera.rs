//! Camera for ray generation.

use helios_core::CameraConfig;
use helios_math::{normalize, Mat4, Ray, Vec3};

/// Field of view used when a configuration does not specify one.
pub const DEFAULT_FOV_DEGREES: f32 = 60.0;

/// How pixel coordinates become ray directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraModel {
    /// Perspective camera looking from the origin toward a target.
    Pinhole {
        fov_degrees: f32,
        /// tan(fov / 2)
        scale: f32,
        forward: Vec3,
        right: Vec3,
        up: Vec3,
    },
    /// Axis-aligned view down -Z with a 90 degree vertical field.
    Simple,
}

/// Camera for generating rays into the scene.
///
/// Holds no per-ray state; `get_ray` is a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Vec3,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f32,
    pub model: CameraModel,
}

impl Camera {
    /// Perspective camera at `eye` looking at `target`.
    pub fn pinhole(eye: Vec3, target: Vec3, up: Vec3, fov_degrees: f32, width: u32, height: u32) -> Self {
        let forward = normalize(target - eye);
        let right = normalize(forward.cross(up));
        let true_up = right.cross(forward);

        Self {
            origin: eye,
            width,
            height,
            aspect_ratio: aspect(width, height),
            model: CameraModel::Pinhole {
                fov_degrees,
                scale: (fov_degrees.to_radians() / 2.0).tan(),
                forward,
                right,
                up: true_up,
            },
        }
    }

    /// Axis-aligned camera at `origin`, for quick test scenes.
    pub fn simple(origin: Vec3, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
            aspect_ratio: aspect(width, height),
            model: CameraModel::Simple,
        }
    }

    /// Pinhole camera from a scene configuration.
    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self::pinhole(
            config.eye(),
            config.target(),
            config.up(),
            config.fov.unwrap_or(DEFAULT_FOV_DEGREES),
            width,
            height,
        )
    }

    /// Ray through pixel `(x, y)` offset by the sub-pixel jitter `(dx, dy)`.
    ///
    /// Row 0 is the top of the image. `(0.5, 0.5)` gives the pixel center.
    pub fn get_ray(&self, x: u32, y: u32, dx: f32, dy: f32) -> Ray {
        let ndc_x = ((x as f32 + dx) / self.width as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((y as f32 + dy) / self.height as f32) * 2.0;

        let direction = match self.model {
            CameraModel::Pinhole {
                scale,
                forward,
                right,
                up,
                ..
            } => {
                let dir = normalize(Vec3::new(
                    ndc_x * self.aspect_ratio * scale,
                    ndc_y * scale,
                    -1.0,
                ));
                normalize(dir.x * right + dir.y * up + dir.z * -forward)
            }
            CameraModel::Simple => normalize(Vec3::new(ndc_x * self.aspect_ratio, ndc_y, -1.0)),
        };

        Ray::new(self.origin, direction)
    }

    /// World to camera transform for the raster path.
    pub fn view_matrix(&self) -> Mat4 {
        match self.model {
            CameraModel::Pinhole { forward, up, .. } => {
                Mat4::look_at_rh(self.origin, self.origin + forward, up)
            }
            CameraModel::Simple => Mat4::look_at_rh(self.origin, self.origin - Vec3::Z, Vec3::Y),
        }
    }

    /// Camera to clip transform matching the ray generation above.
    pub fn projection_matrix(&self, near: f32, far: f32) -> Mat4 {
        let fov = match self.model {
            CameraModel::Pinhole { fov_degrees, .. } => fov_degrees.to_radians(),
            CameraModel::Simple => 90.0_f32.to_radians(),
        };
        Mat4::perspective_rh(fov, self.aspect_ratio, near, far)
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}
