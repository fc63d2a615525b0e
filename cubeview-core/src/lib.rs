/// cubeview core library - geometry engine for an interactive shaded cube
///
/// This library owns the cube's corners in model space and on screen, the
/// rotation, zoom and recentering transforms, painter's ordering of faces,
/// and the subdivided shading overlay. Drawing is left to the caller.

pub mod cube;
pub mod depth;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod shading;
pub mod topology;
pub mod transform;

// Re-export commonly used types
pub use cube::Cube;
pub use error::{CubeError, CubeResult};
pub use geometry::{OrthogonalFace, PerspectiveFace};
pub use projection::{Projection, ProjectionMode};
pub use shading::{ShadePatch, Shader, ShadingSettings};
pub use topology::{Corner, FaceId};
pub use transform::RotationPlanes;
