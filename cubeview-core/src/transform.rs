/// Rigid rotations of points about the cube center
use bitflags::bitflags;
use nalgebra::{Point2, Vector2, Vector3};
use std::f64::consts::{PI, SQRT_2};

use crate::error::{CubeError, CubeResult};

bitflags! {
    /// Planes a single rotate call turns the cube in
    ///
    /// Planes are applied in the order XZ, YZ, XY.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RotationPlanes: u8 {
        /// Turn left and right, driven by the horizontal delta
        const XZ = 1 << 0;
        /// Tilt up and down, driven by the vertical delta
        const YZ = 1 << 1;
        /// Roll in the screen plane, driven by both deltas
        const XY = 1 << 2;
    }
}

/// Radians per unit of pointer travel for a cube of the given edge length.
///
/// Dragging `length / √2` turns the cube a quarter turn.
pub fn rotation_scale(length: f64) -> f64 {
    SQRT_2 * PI / (2.0 * length)
}

/// Validate a pointer delta, which must be exactly two finite numbers.
pub fn parse_delta(delta: &[f64]) -> CubeResult<Vector2<f64>> {
    match delta {
        [dx, dy] if dx.is_finite() && dy.is_finite() => Ok(Vector2::new(*dx, *dy)),
        [_, _] => Err(CubeError::InvalidArgument(
            "rotation delta must be a pair of finite numbers".to_string(),
        )),
        _ => Err(CubeError::InvalidArgument(format!(
            "rotation delta must be a pair (dx, dy), got {} components",
            delta.len()
        ))),
    }
}

/// Turn an offset from the center by `angle` in the XZ plane.
pub fn rotate_xz(offset: Vector3<f64>, angle: f64) -> Vector3<f64> {
    let radius = offset.x.hypot(offset.z);
    let theta = offset.z.atan2(offset.x) + angle;
    Vector3::new(theta.cos() * radius, offset.y, theta.sin() * radius)
}

/// Turn an offset from the center by `angle` in the YZ plane.
///
/// The angle is measured from +z towards +y.
pub fn rotate_yz(offset: Vector3<f64>, angle: f64) -> Vector3<f64> {
    let radius = offset.y.hypot(offset.z);
    let theta = offset.y.atan2(offset.z) + angle;
    Vector3::new(offset.x, theta.sin() * radius, theta.cos() * radius)
}

/// Turn an offset from the center by `angle` in the XY plane.
pub fn rotate_xy(offset: Vector3<f64>, angle: f64) -> Vector3<f64> {
    let radius = offset.x.hypot(offset.y);
    let theta = offset.y.atan2(offset.x) + angle;
    Vector3::new(theta.cos() * radius, theta.sin() * radius, offset.z)
}

/// Roll angle for a pointer delta, weighted by where the pointer sits around
/// the cube on screen so the roll follows a grab-and-twist motion.
pub fn roll_angle(delta: Vector2<f64>, center: Point2<f64>, reference: Point2<f64>, scale: f64) -> f64 {
    let toward = reference - center;
    let phi = toward.y.atan2(toward.x);
    (delta.x * phi.sin() + delta.y * phi.cos()) * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> Vector3<f64> {
        Vector3::new(30.0, -40.0, 50.0)
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(parse_delta(&[1.0, -2.0]).unwrap(), Vector2::new(1.0, -2.0));
        assert!(matches!(parse_delta(&[1.0]), Err(CubeError::InvalidArgument(_))));
        assert!(matches!(parse_delta(&[1.0, 2.0, 3.0]), Err(CubeError::InvalidArgument(_))));
        assert!(matches!(parse_delta(&[f64::NAN, 2.0]), Err(CubeError::InvalidArgument(_))));
        assert!(matches!(parse_delta(&[]), Err(CubeError::InvalidArgument(_))));
    }

    #[test]
    fn test_rotations_preserve_length() {
        for rotated in [
            rotate_xz(offset(), 0.7),
            rotate_yz(offset(), -1.3),
            rotate_xy(offset(), 2.9),
        ] {
            assert!((rotated.norm() - offset().norm()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotations_keep_off_plane_axis() {
        assert_eq!(rotate_xz(offset(), 0.4).y, offset().y);
        assert_eq!(rotate_yz(offset(), 0.4).x, offset().x);
        assert_eq!(rotate_xy(offset(), 0.4).z, offset().z);
    }

    #[test]
    fn test_quarter_turns() {
        let turned = rotate_xz(Vector3::x(), PI / 2.0);
        assert!((turned - Vector3::z()).norm() < 1e-12);

        let tilted = rotate_yz(Vector3::z(), PI / 2.0);
        assert!((tilted - Vector3::y()).norm() < 1e-12);

        let rolled = rotate_xy(Vector3::x(), PI / 2.0);
        assert!((rolled - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_undone_by_opposite_angle() {
        let back = rotate_xy(rotate_xy(offset(), 0.25), -0.25);
        assert!((back - offset()).norm() < 1e-9);
    }

    #[test]
    fn test_rotation_scale_quarter_turn() {
        let length = 200.0;
        let angle = length / SQRT_2 * rotation_scale(length);
        assert!((angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_roll_angle_follows_pointer_side() {
        let center = Point2::new(0.0, 0.0);
        let delta = Vector2::new(1.0, 1.0);
        // Pointer straight right: only the vertical delta rolls.
        let right = roll_angle(delta, center, Point2::new(10.0, 0.0), 1.0);
        assert!((right - 1.0).abs() < 1e-12);
        // Pointer straight below (+y): only the horizontal delta rolls.
        let below = roll_angle(Vector2::new(1.0, 0.0), center, Point2::new(0.0, 10.0), 1.0);
        assert!((below - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_plane_flags() {
        let planes = RotationPlanes::XZ | RotationPlanes::YZ;
        assert!(planes.contains(RotationPlanes::XZ));
        assert!(!planes.contains(RotationPlanes::XY));
        assert!(RotationPlanes::default().is_empty());
    }
}
