/// Geometry primitives for cube rendering
use nalgebra::{Point2, Vector3};

/// Center of a planar quad, measured from its second corner along the two
/// adjacent half edges.
pub fn face_center(corners: &[Vector3<f64>; 4]) -> Vector3<f64> {
    let d1 = (corners[0] - corners[1]) * 0.5;
    let d2 = (corners[2] - corners[1]) * 0.5;
    corners[1] + d1 + d2
}

/// Unit normal of a quad with the winding of its first three corners.
///
/// Every cube face is listed so that this points away from the cube. A
/// degenerate quad yields the zero vector.
pub fn face_normal(corners: &[Vector3<f64>; 4]) -> Vector3<f64> {
    let edge1 = corners[0] - corners[1];
    let edge2 = corners[2] - corners[1];

    edge1
        .cross(&edge2)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Angle between two vectors in `[0, π]`.
///
/// Returns `None` when either vector has zero length, where the angle is
/// undefined.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let magnitude = a.norm() * b.norm();
    if magnitude <= f64::EPSILON {
        return None;
    }

    let cos = (a.dot(b) / magnitude).clamp(-1.0, 1.0);
    Some(cos.acos())
}

/// Drops the depth component, giving the orthogonal view of a point.
pub fn flatten(point: &Vector3<f64>) -> Point2<f64> {
    Point2::new(point.x, point.y)
}

/// A quad in model space with its derived center and outward normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthogonalFace {
    pub corners: [Vector3<f64>; 4],
    pub center: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl OrthogonalFace {
    pub fn new(corners: [Vector3<f64>; 4]) -> Self {
        Self {
            center: face_center(&corners),
            normal: face_normal(&corners),
            corners,
        }
    }

    /// Depth-axis component of the normal; positive faces the viewer.
    pub fn depth(&self) -> f64 {
        self.normal.z
    }

    /// Corners seen straight on, without perspective.
    pub fn flattened(&self) -> [Point2<f64>; 4] {
        self.corners.map(|corner| flatten(&corner))
    }
}

/// A quad projected onto the view plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveFace {
    pub corners: [Point2<f64>; 4],
}

impl PerspectiveFace {
    pub fn new(corners: [Point2<f64>; 4]) -> Self {
        Self { corners }
    }
}
