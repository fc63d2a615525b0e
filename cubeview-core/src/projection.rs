/// Orthogonal to perspective projection
use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{CubeError, CubeResult};
use crate::geometry::flatten;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Viewing setup around the cube center.
///
/// The screen plane sits `screen_distance` in front of the center and the
/// eye `eye_distance` in front of it, both along +z. Points are scaled about
/// the center so that the screen plane keeps the center's size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center: Vector3<f64>,
    pub screen_distance: f64,
    pub eye_distance: f64,
}

impl Projection {
    pub fn new(center: Vector3<f64>, screen_distance: f64, eye_distance: f64) -> Self {
        Self {
            center,
            screen_distance,
            eye_distance,
        }
    }

    /// Fails unless every point within `radius` of the center stays strictly
    /// in front of the eye.
    pub fn check_reach(&self, radius: f64) -> CubeResult<()> {
        let finite = self.screen_distance.is_finite() && self.eye_distance.is_finite();
        if !finite || self.eye_distance <= radius {
            return Err(CubeError::DegenerateProjection {
                eye_distance: self.eye_distance,
                radius,
            });
        }
        Ok(())
    }

    /// Eye position in model space
    pub fn eye(&self) -> Vector3<f64> {
        self.center + Vector3::new(0.0, 0.0, self.eye_distance)
    }

    /// Perspective scale for a point `depth` in front of the center.
    pub fn scale_at(&self, depth: f64) -> f64 {
        (self.eye_distance - self.screen_distance) / (self.eye_distance - depth)
    }

    /// Project a model space point onto the screen plane.
    ///
    /// The point must lie closer to the center than the eye does; `Cube`
    /// enforces this for every corner and every point on its surface.
    pub fn project(&self, point: &Vector3<f64>) -> Point2<f64> {
        let relative = point - self.center;
        debug_assert!(relative.z < self.eye_distance, "point behind the eye");

        let scale = self.scale_at(relative.z);
        Point2::new(
            relative.x * scale + self.center.x,
            relative.y * scale + self.center.y,
        )
    }

    /// Screen position of a point under the given mode.
    pub fn to_screen(&self, point: &Vector3<f64>, mode: ProjectionMode) -> Point2<f64> {
        match mode {
            ProjectionMode::Orthographic => flatten(point),
            ProjectionMode::Perspective => self.project(point),
        }
    }
}
