/// Fixed corner and face labelling of the cube
use std::fmt;

/// One of the eight cube corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner::A,
        Corner::B,
        Corner::C,
        Corner::D,
        Corner::E,
        Corner::F,
        Corner::G,
        Corner::H,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Sign of each axis offset from the cube center before rotation.
    pub fn signs(self) -> [f64; 3] {
        match self {
            Corner::A => [-1.0, -1.0, 1.0],
            Corner::B => [1.0, -1.0, 1.0],
            Corner::C => [1.0, 1.0, 1.0],
            Corner::D => [-1.0, 1.0, 1.0],
            Corner::E => [-1.0, 1.0, -1.0],
            Corner::F => [1.0, 1.0, -1.0],
            Corner::G => [1.0, -1.0, -1.0],
            Corner::H => [-1.0, -1.0, -1.0],
        }
    }
}

/// One of the six cube faces.
///
/// Names describe the unrotated cube in model space, where +z points at the
/// viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceId {
    /// `CBAD`, +z
    Front,
    /// `CDEF`, +y
    Top,
    /// `GFEH`, -z
    Back,
    /// `GHAB`, -y
    Bottom,
    /// `HEDA`, -x
    Left,
    /// `BCFG`, +x
    Right,
}

impl FaceId {
    pub const ALL: [FaceId; 6] = [
        FaceId::Front,
        FaceId::Top,
        FaceId::Back,
        FaceId::Bottom,
        FaceId::Left,
        FaceId::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Corners in winding order; the order fixes the outward normal.
    pub fn corners(self) -> [Corner; 4] {
        use Corner::*;
        match self {
            FaceId::Front => [C, B, A, D],
            FaceId::Top => [C, D, E, F],
            FaceId::Back => [G, F, E, H],
            FaceId::Bottom => [G, H, A, B],
            FaceId::Left => [H, E, D, A],
            FaceId::Right => [B, C, F, G],
        }
    }

    pub fn label(self) -> String {
        self.corners().iter().map(|corner| corner.label()).collect()
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
