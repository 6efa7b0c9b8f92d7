//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and their outward normals.
//! The voxel handler uses it to know which face a ray entered through, which in
//! turn decides where a newly placed voxel goes.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face in voxel coordinates.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }

    /// The face a ray enters through when it steps along `axis` (0 = x, 1 = y, 2 = z)
    /// in the direction given by the sign of `step`.
    ///
    /// A ray moving towards positive X enters a voxel through its LEFT face, and so on.
    ///
    /// # Returns
    /// `None` if `axis` is not 0, 1 or 2, or `step` is zero.
    pub fn entered_by_step(axis: usize, step: i32) -> Option<BlockSide> {
        match (axis, step.signum()) {
            (0, 1) => Some(BlockSide::LEFT),
            (0, -1) => Some(BlockSide::RIGHT),
            (1, 1) => Some(BlockSide::BOTTOM),
            (1, -1) => Some(BlockSide::TOP),
            (2, 1) => Some(BlockSide::BACK),
            (2, -1) => Some(BlockSide::FRONT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normals_are_unit_axis_vectors() {
        for side in BlockSide::all() {
            let n = side.normal();
            assert_eq!(n.x.abs() + n.y.abs() + n.z.abs(), 1, "{side:?}");
        }
    }

    #[test]
    fn entered_face_points_back_against_the_step() {
        for axis in 0..3 {
            for step in [-1, 1] {
                let side = BlockSide::entered_by_step(axis, step).unwrap();
                assert_eq!(side.normal()[axis], -step);
            }
        }
        assert_eq!(BlockSide::entered_by_step(1, 0), None);
        assert_eq!(BlockSide::entered_by_step(3, 1), None);
    }
}
