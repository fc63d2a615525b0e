/// Subdivided shading overlay
///
/// Each visible face is cut into an N×N grid of sub-quads. Every sub-quad
/// gets a darkening alpha from the angle between the light and the sub-quad's
/// offset from the cube center, which approximates directional lighting
/// without per-pixel work.
use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::cube::Cube;
use crate::error::{CubeError, CubeResult};
use crate::geometry::{angle_between, face_center, flatten, OrthogonalFace};
use crate::projection::{Projection, ProjectionMode};
use crate::topology::FaceId;

/// Shading configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingSettings {
    /// Grid resolution along each face edge
    pub subdivisions: usize,
    /// Direction the light comes from, in model space
    pub light_direction: [f64; 3],
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            subdivisions: 10,
            light_direction: [0.0, 0.0, 1.0],
        }
    }
}

/// One grid cell of a face, in model space and on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubQuad {
    pub face: FaceId,
    pub orthogonal: [Vector3<f64>; 4],
    pub perspective: [Point2<f64>; 4],
}

impl SubQuad {
    pub fn center(&self) -> Vector3<f64> {
        face_center(&self.orthogonal)
    }

    pub fn polygon(&self, mode: ProjectionMode) -> [Point2<f64>; 4] {
        match mode {
            ProjectionMode::Orthographic => self.orthogonal.map(|corner| flatten(&corner)),
            ProjectionMode::Perspective => self.perspective,
        }
    }
}

/// A translucent black quad to draw over the colored faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadePatch {
    pub face: FaceId,
    pub polygon: [Point2<f64>; 4],
    /// 0 is fully lit, 255 fully dark
    pub alpha: u8,
}

/// Steps along the face for one grid cell: each corner's offset from the
/// first corner divided by `n`.
pub fn patch_steps(face: &OrthogonalFace, n: usize) -> [Vector3<f64>; 4] {
    let first = face.corners[0];
    face.corners.map(|corner| (corner - first) / n as f64)
}

/// Split a face into `n × n` sub-quads, walking from its first corner.
///
/// Rows advance along the last edge and columns along the first, so cell
/// corners keep the face's winding.
pub fn subdivide(
    id: FaceId,
    face: &OrthogonalFace,
    n: usize,
    projection: &Projection,
) -> CubeResult<Vec<SubQuad>> {
    if n == 0 {
        return Err(CubeError::InvalidSubdivision);
    }

    let steps = patch_steps(face, n);
    let mut quads = Vec::with_capacity(n * n);
    for i in 0..n {
        let row = face.corners[0] + steps[3] * i as f64;
        for j in 0..n {
            let origin = row + steps[1] * j as f64;
            let orthogonal = steps.map(|step| origin + step);
            quads.push(SubQuad {
                face: id,
                orthogonal,
                perspective: orthogonal.map(|corner| projection.project(&corner)),
            });
        }
    }
    Ok(quads)
}

/// Map an angle in `[0, π]` to an alpha in `[0, 255]`.
pub fn angle_to_alpha(angle: f64) -> u8 {
    (angle / PI * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Produces the shading overlay for a cube
#[derive(Debug, Clone)]
pub struct Shader {
    subdivisions: usize,
    light: Vector3<f64>,
}

impl Shader {
    pub fn new(settings: &ShadingSettings) -> CubeResult<Self> {
        if settings.subdivisions == 0 {
            return Err(CubeError::InvalidSubdivision);
        }
        let light = Vector3::from(settings.light_direction);
        if light.norm() <= f64::EPSILON || !light.iter().all(|c| c.is_finite()) {
            return Err(CubeError::InvalidArgument(
                "light direction must be a finite non-zero vector".to_string(),
            ));
        }

        Ok(Self {
            subdivisions: settings.subdivisions,
            light,
        })
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Darkening for a point on the cube, or `None` at the cube center.
    pub fn alpha_at(&self, cube: &Cube, point: &Vector3<f64>) -> Option<u8> {
        angle_between(&(point - cube.center()), &self.light).map(angle_to_alpha)
    }

    /// Whether a face is turned towards the viewer.
    ///
    /// Orthographic views look straight down -z, so only the normal's depth
    /// matters. Perspective views compare the normal with the ray from the
    /// eye to the face center.
    pub fn is_visible(&self, cube: &Cube, face: &OrthogonalFace, mode: ProjectionMode) -> bool {
        match mode {
            ProjectionMode::Orthographic => face.depth() > 0.0,
            ProjectionMode::Perspective => {
                let eye_to_face = face.center - cube.projection().eye();
                angle_between(&face.normal, &eye_to_face)
                    .map(|angle| angle >= FRAC_PI_2)
                    .unwrap_or(false)
            }
        }
    }

    /// Shade patches for every visible face, in the cube's draw order.
    pub fn shade(&self, cube: &Cube, mode: ProjectionMode) -> CubeResult<Vec<ShadePatch>> {
        let projection = cube.projection();
        let mut patches = Vec::new();

        for id in cube.draw_order() {
            let face = cube.orthogonal_face(id);
            if !self.is_visible(cube, face, mode) {
                continue;
            }

            for quad in subdivide(id, face, self.subdivisions, &projection)? {
                let Some(alpha) = self.alpha_at(cube, &quad.center()) else {
                    continue;
                };
                patches.push(ShadePatch {
                    face: id,
                    polygon: quad.polygon(mode),
                    alpha,
                });
            }
        }

        log::trace!("Shaded {} patches in {:?} mode", patches.len(), mode);
        Ok(patches)
    }
}
