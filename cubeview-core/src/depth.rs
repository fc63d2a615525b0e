/// Painter's ordering of cube faces
use crate::geometry::OrthogonalFace;
use crate::topology::FaceId;

/// Order faces back to front by the depth component of their normals.
///
/// Faces pointing away from the viewer come first so the ones facing it are
/// drawn last and cover them. Equal depths keep their `FaceId::ALL` order.
pub fn back_to_front(faces: &[OrthogonalFace; 6]) -> [FaceId; 6] {
    let mut keyed = FaceId::ALL.map(|id| (id, faces[id.index()].depth()));
    keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
    keyed.map(|(id, _)| id)
}
