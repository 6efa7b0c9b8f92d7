//! # Block Module
//!
//! Voxel IDs, materials and block faces.

pub mod block_side;
pub mod block_type;

/// The raw voxel ID stored in chunk buffers.
///
/// `0` is air, every other value is a solid material. See
/// [`block_type::BlockType`] for the known materials.
pub type VoxelId = u8;

/// The ID of an empty voxel.
pub const AIR: VoxelId = 0;

/// Whether a voxel with this ID blocks movement and rays.
///
/// Every ID except [`AIR`] is solid, including IDs with no known material.
pub fn is_solid(id: VoxelId) -> bool {
    id != AIR
}
