/// The cube aggregate: corners, faces and their projections
use nalgebra::{Point2, Vector3};

use crate::depth;
use crate::error::{CubeError, CubeResult};
use crate::geometry::{OrthogonalFace, PerspectiveFace};
use crate::projection::{Projection, ProjectionMode};
use crate::topology::{Corner, FaceId};
use crate::transform::{self, RotationPlanes};

/// An interactive cube in model space.
///
/// The orthogonal corners are the only state mutated directly. Projected
/// corners, faces and the draw order are rebuilt from them at the end of
/// every mutator, so they never go stale.
#[derive(Debug, Clone)]
pub struct Cube {
    center: Vector3<f64>,
    length: f64,
    screen_distance: f64,
    eye_distance: f64,

    orthogonal_points: [Vector3<f64>; 8],
    perspective_points: [Point2<f64>; 8],
    orthogonal_faces: [OrthogonalFace; 6],
    perspective_faces: [PerspectiveFace; 6],
    draw_order: [FaceId; 6],
}

impl Cube {
    /// Build an axis-aligned cube of edge `length` around `center`.
    ///
    /// Fails when the eye would not stay outside the cube's circumsphere.
    pub fn new(
        center: Vector3<f64>,
        length: f64,
        screen_distance: f64,
        eye_distance: f64,
    ) -> CubeResult<Self> {
        if !(length.is_finite() && length > 0.0) || !center.iter().all(|c| c.is_finite()) {
            return Err(CubeError::InvalidArgument(
                "cube needs a finite center and a positive edge length".to_string(),
            ));
        }
        Projection::new(center, screen_distance, eye_distance).check_reach(radius_of(length))?;

        let half = length / 2.0;
        let orthogonal_points = Corner::ALL.map(|corner| {
            let [sx, sy, sz] = corner.signs();
            center + Vector3::new(sx * half, sy * half, sz * half)
        });

        let blank_face = OrthogonalFace::new([center; 4]);
        let mut cube = Self {
            center,
            length,
            screen_distance,
            eye_distance,
            orthogonal_points,
            perspective_points: [Point2::origin(); 8],
            orthogonal_faces: [blank_face; 6],
            perspective_faces: [PerspectiveFace::new([Point2::origin(); 4]); 6],
            draw_order: FaceId::ALL,
        };
        cube.recompute();
        log::debug!(
            "Created cube: center={:?} length={} screen={} eye={}",
            center.as_slice(),
            length,
            screen_distance,
            eye_distance
        );
        Ok(cube)
    }

    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn screen_distance(&self) -> f64 {
        self.screen_distance
    }

    pub fn eye_distance(&self) -> f64 {
        self.eye_distance
    }

    /// Distance from the center to any corner
    pub fn radius(&self) -> f64 {
        radius_of(self.length)
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.center, self.screen_distance, self.eye_distance)
    }

    /// Project a point on or inside the cube onto the screen.
    pub fn project(&self, point: &Vector3<f64>) -> Point2<f64> {
        self.projection().project(point)
    }

    pub fn orthogonal_point(&self, corner: Corner) -> Vector3<f64> {
        self.orthogonal_points[corner.index()]
    }

    pub fn perspective_point(&self, corner: Corner) -> Point2<f64> {
        self.perspective_points[corner.index()]
    }

    pub fn orthogonal_face(&self, face: FaceId) -> &OrthogonalFace {
        &self.orthogonal_faces[face.index()]
    }

    pub fn perspective_face(&self, face: FaceId) -> &PerspectiveFace {
        &self.perspective_faces[face.index()]
    }

    pub fn orthogonal_faces(&self) -> &[OrthogonalFace; 6] {
        &self.orthogonal_faces
    }

    /// Face labels sorted back to front
    pub fn draw_order(&self) -> [FaceId; 6] {
        self.draw_order
    }

    /// Screen polygon of a face under the given mode.
    pub fn face_polygon(&self, face: FaceId, mode: ProjectionMode) -> [Point2<f64>; 4] {
        match mode {
            ProjectionMode::Orthographic => self.orthogonal_face(face).flattened(),
            ProjectionMode::Perspective => self.perspective_face(face).corners,
        }
    }

    /// Faces with their screen polygons in painter's order.
    pub fn faces_back_to_front(
        &self,
        mode: ProjectionMode,
    ) -> impl Iterator<Item = (FaceId, [Point2<f64>; 4])> + '_ {
        self.draw_order
            .into_iter()
            .map(move |face| (face, self.face_polygon(face, mode)))
    }

    /// Rotate the cube by a pointer delta `(dx, dy)` in the selected planes.
    ///
    /// `reference` is the pointer position on screen and only steers the XY
    /// roll; it defaults to the screen origin. The delta must hold exactly two
    /// finite numbers, otherwise nothing changes.
    pub fn rotate(
        &mut self,
        delta: &[f64],
        planes: RotationPlanes,
        reference: Option<Point2<f64>>,
    ) -> CubeResult<()> {
        let delta = transform::parse_delta(delta)?;
        let scale = transform::rotation_scale(self.length);
        let center = self.center;

        if planes.contains(RotationPlanes::XZ) {
            let angle = delta.x * scale;
            self.map_offsets(|offset| transform::rotate_xz(offset, angle));
        }

        if planes.contains(RotationPlanes::YZ) {
            let angle = delta.y * scale;
            self.map_offsets(|offset| transform::rotate_yz(offset, angle));
        }

        if planes.contains(RotationPlanes::XY) {
            let reference = reference.unwrap_or_else(Point2::origin);
            let screen_center = Point2::new(center.x, center.y);
            let angle = transform::roll_angle(delta, screen_center, reference, scale);
            self.map_offsets(|offset| transform::rotate_xy(offset, angle));
        }

        log::debug!("Rotated cube by ({}, {}) in {:?}", delta.x, delta.y, planes);
        self.recompute();
        Ok(())
    }

    /// Move the cube so it is centered on `new_center`, without rotating it.
    pub fn change_center(&mut self, new_center: Vector3<f64>) {
        let shift = new_center - self.center;
        for point in &mut self.orthogonal_points {
            *point += shift;
        }
        self.center = new_center;

        log::debug!("Moved cube center to {:?}", new_center.as_slice());
        self.recompute();
    }

    /// Move the screen and the eye together by `distance`.
    ///
    /// Their difference, and so the perspective strength, is kept. Fails and
    /// leaves the cube unchanged if the eye would enter the cube's reach.
    pub fn add_distance(&mut self, distance: f64) -> CubeResult<()> {
        let moved = Projection::new(
            self.center,
            self.screen_distance + distance,
            self.eye_distance + distance,
        );
        moved.check_reach(self.radius())?;

        self.screen_distance = moved.screen_distance;
        self.eye_distance = moved.eye_distance;

        log::debug!(
            "Changed distances by {}: screen={} eye={}",
            distance,
            self.screen_distance,
            self.eye_distance
        );
        self.recompute();
        Ok(())
    }

    fn map_offsets(&mut self, rotate: impl Fn(Vector3<f64>) -> Vector3<f64>) {
        let center = self.center;
        for point in &mut self.orthogonal_points {
            *point = center + rotate(*point - center);
        }
    }

    /// Rebuild everything derived from the orthogonal corners.
    fn recompute(&mut self) {
        let projection = self.projection();
        self.perspective_points = self.orthogonal_points.map(|point| projection.project(&point));

        for face in FaceId::ALL {
            let corners = face.corners();
            self.orthogonal_faces[face.index()] =
                OrthogonalFace::new(corners.map(|corner| self.orthogonal_points[corner.index()]));
            self.perspective_faces[face.index()] =
                PerspectiveFace::new(corners.map(|corner| self.perspective_points[corner.index()]));
        }

        self.draw_order = depth::back_to_front(&self.orthogonal_faces);
    }
}

fn radius_of(length: f64) -> f64 {
    length * 3f64.sqrt() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    const SIDE: f64 = 200.0;

    fn cube() -> Cube {
        let screen = SIDE / SQRT_2 + 1.0;
        Cube::new(Vector3::new(300.0, 350.0, 0.0), SIDE, screen, screen + 2.0 * SIDE).unwrap()
    }

    fn corners(cube: &Cube) -> Vec<Vector3<f64>> {
        Corner::ALL.iter().map(|c| cube.orthogonal_point(*c)).collect()
    }

    fn assert_same_corners(a: &[Vector3<f64>], b: &[Vector3<f64>]) {
        for (p, q) in a.iter().zip(b) {
            assert!((p - q).norm() < 1e-9, "{p:?} != {q:?}");
        }
    }

    fn assert_draw_order_sorted(cube: &Cube) {
        let depths: Vec<f64> = cube
            .draw_order()
            .iter()
            .map(|face| cube.orthogonal_face(*face).depth())
            .collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]), "{depths:?}");
    }

    #[test]
    fn test_corner_layout() {
        let cube = cube();
        assert_eq!(cube.orthogonal_point(Corner::A), Vector3::new(200.0, 250.0, 100.0));
        assert_eq!(cube.orthogonal_point(Corner::F), Vector3::new(400.0, 450.0, -100.0));

        for corner in Corner::ALL {
            let offset = cube.orthogonal_point(corner) - cube.center();
            assert!(offset.iter().all(|c| (c.abs() - SIDE / 2.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_front_face_drawn_last() {
        let cube = cube();
        assert_eq!(cube.draw_order()[5], FaceId::Front);
        assert_eq!(cube.draw_order()[0], FaceId::Back);
        assert_eq!(cube.orthogonal_face(FaceId::Front).normal, Vector3::z());
        assert_draw_order_sorted(&cube);
    }

    #[test]
    fn test_normals_point_outward() {
        let cube = cube();
        for face in FaceId::ALL {
            let face = cube.orthogonal_face(face);
            let outward = face.center - cube.center();
            assert!(face.normal.dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_faces_reference_their_corners() {
        let cube = cube();
        for face in FaceId::ALL {
            let orthogonal = cube.orthogonal_face(face);
            let perspective = cube.perspective_face(face);
            for (i, corner) in face.corners().iter().enumerate() {
                assert_eq!(orthogonal.corners[i], cube.orthogonal_point(*corner));
                assert_eq!(perspective.corners[i], cube.perspective_point(*corner));
            }
        }
    }

    #[test]
    fn test_perspective_foreshortening() {
        let cube = cube();
        let center = Point2::new(cube.center().x, cube.center().y);
        let front = cube.perspective_face(FaceId::Front).corners;
        for corner in front {
            let back = match (corner.x > center.x, corner.y > center.y) {
                (true, true) => Corner::F,
                (true, false) => Corner::G,
                (false, true) => Corner::E,
                (false, false) => Corner::H,
            };
            let back = cube.perspective_point(back);
            assert!((corner - center).norm() > (back - center).norm());
        }
    }

    #[test]
    fn test_rotation_is_rigid() {
        let mut cube = cube();
        let all = RotationPlanes::XZ | RotationPlanes::YZ | RotationPlanes::XY;
        cube.rotate(&[13.0, -27.0], all, Some(Point2::new(10.0, 600.0))).unwrap();

        for corner in Corner::ALL {
            let offset = cube.orthogonal_point(corner) - cube.center();
            assert!((offset.norm() - cube.radius()).abs() < 1e-9);
        }
        for (a, b) in [(Corner::A, Corner::B), (Corner::B, Corner::C), (Corner::A, Corner::H)] {
            let edge = cube.orthogonal_point(a) - cube.orthogonal_point(b);
            assert!((edge.norm() - SIDE).abs() < 1e-9);
        }
        assert_draw_order_sorted(&cube);
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut cube = cube();
        let original = corners(&cube);
        let reference = Some(Point2::new(500.0, 100.0));

        for planes in [RotationPlanes::XZ, RotationPlanes::YZ, RotationPlanes::XY] {
            cube.rotate(&[31.0, 17.0], planes, reference).unwrap();
            cube.rotate(&[-31.0, -17.0], planes, reference).unwrap();
        }
        assert_same_corners(&corners(&cube), &original);
    }

    #[test]
    fn test_quarter_turn_brings_right_face_forward() {
        let mut cube = cube();
        cube.rotate(&[SIDE / SQRT_2, 0.0], RotationPlanes::XZ, None).unwrap();
        assert_eq!(cube.draw_order()[5], FaceId::Right);
        assert!((cube.orthogonal_face(FaceId::Right).normal - Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn test_invalid_rotation_leaves_cube_unchanged() {
        let mut cube = cube();
        let original = corners(&cube);
        let order = cube.draw_order();

        let deltas: [&[f64]; 4] = [&[5.0], &[1.0, 2.0, 3.0], &[f64::INFINITY, 1.0], &[]];
        for delta in deltas {
            let result = cube.rotate(delta, RotationPlanes::all(), None);
            assert!(matches!(result, Err(CubeError::InvalidArgument(_))));
        }
        assert_eq!(corners(&cube), original);
        assert_eq!(cube.draw_order(), order);
    }

    #[test]
    fn test_change_center_translates() {
        let mut cube = cube();
        cube.rotate(&[20.0, 10.0], RotationPlanes::XZ | RotationPlanes::YZ, None).unwrap();
        let before = corners(&cube);
        let order = cube.draw_order();

        let shift = Vector3::new(-50.0, 25.0, 5.0);
        cube.change_center(cube.center() + shift);

        let expected: Vec<Vector3<f64>> = before.iter().map(|p| p + shift).collect();
        assert_same_corners(&corners(&cube), &expected);
        assert_eq!(cube.draw_order(), order);
        assert_eq!(cube.project(&cube.center()), Point2::new(250.0, 375.0));
    }

    #[test]
    fn test_zoom_round_trip() {
        let mut cube = Cube::new(Vector3::new(300.0, 350.0, 0.0), 200.0, 142.0, 542.0).unwrap();
        let before = cube.perspective_face(FaceId::Front).corners;

        cube.add_distance(50.0).unwrap();
        assert_eq!(cube.screen_distance(), 192.0);
        assert_eq!(cube.eye_distance(), 592.0);
        assert_ne!(cube.perspective_face(FaceId::Front).corners, before);

        cube.add_distance(-50.0).unwrap();
        assert_eq!(cube.screen_distance(), 142.0);
        assert_eq!(cube.eye_distance(), 542.0);
    }

    #[test]
    fn test_zoom_rejected_inside_reach() {
        let mut cube = cube();
        let (screen, eye) = (cube.screen_distance(), cube.eye_distance());

        let err = cube.add_distance(-eye).unwrap_err();
        assert!(matches!(err, CubeError::DegenerateProjection { .. }));
        assert_eq!(cube.screen_distance(), screen);
        assert_eq!(cube.eye_distance(), eye);
    }

    #[test]
    fn test_new_rejects_degenerate_setup() {
        let center = Vector3::new(0.0, 0.0, 0.0);
        assert!(Cube::new(center, 200.0, 10.0, 150.0).is_err());
        for length in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                Cube::new(center, length, 10.0, 150.0),
                Err(CubeError::InvalidArgument(_))
            ));
        }
        assert!(Cube::new(center, 200.0, 10.0, 174.0).is_ok());
    }

    #[test]
    fn test_orthographic_polygons() {
        let cube = cube();
        let polygon = cube.face_polygon(FaceId::Front, ProjectionMode::Orthographic);
        assert_eq!(polygon[0], Point2::new(400.0, 450.0));

        let faces: Vec<FaceId> = cube
            .faces_back_to_front(ProjectionMode::Perspective)
            .map(|(face, _)| face)
            .collect();
        assert_eq!(faces, cube.draw_order());
    }
}
