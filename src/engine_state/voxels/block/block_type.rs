//! # Block Type Module
//!
//! This module defines the materials a voxel can be made of.
//! It provides conversion between the raw stored IDs and the rich enum type.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::VoxelId;

/// Enumerates all voxel materials known to the engine.
///
/// The discriminant of each variant is the raw ID stored in chunk buffers, so
/// `BlockType::GRASS as VoxelId == 2`. The `FromPrimitive` derive allows the
/// reverse conversion when reading IDs back out of the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never collides.
    AIR = 0,
    /// Beach and riverbed material below the grass line.
    SAND = 1,
    /// Top layer of low terrain.
    GRASS = 2,
    /// Top layer of mid-height terrain.
    DIRT = 3,
    /// Bulk material and the top layer of high terrain.
    STONE = 4,
    /// Top layer of mountain peaks.
    SNOW = 5,
    /// Tree crowns.
    LEAVES = 6,
    /// Tree trunks.
    WOOD = 7,
}

impl BlockType {
    /// Converts a raw voxel ID to a `BlockType`.
    ///
    /// # Returns
    /// `None` for IDs outside the known material range. Such IDs are still
    /// treated as solid by collision queries.
    pub fn from_id(id: VoxelId) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The raw ID stored in chunk buffers for this material.
    pub fn id(self) -> VoxelId {
        self as VoxelId
    }
}
