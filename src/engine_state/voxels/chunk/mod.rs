//! # Chunk Module
//!
//! This module provides the `Chunk` handle and the `ChunkShape` addressing rules for
//! the cubic blocks of voxel data the world is made of.
//!
//! ## Storage
//!
//! Chunks do not own their voxels. The `World` keeps one contiguous arena of voxel
//! IDs and every chunk occupies a fixed `volume`-sized slice of it, selected by the
//! chunk's `index`. A chunk is therefore just its grid position plus that index.
//!
//! ## Local addressing
//!
//! Inside a chunk of side `C` a voxel at local `(x, y, z)` lives at
//!
//! ```text
//! x + C * z + C² * y
//! ```
//!
//! X and Z are the horizontal axes and run fastest, so each horizontal layer of the
//! chunk is contiguous. Y is the vertical axis.

use cgmath::Point3;

pub mod chunk_creation;
pub mod chunk_iteration;

/// Side length used when no configuration overrides it.
pub const DEFAULT_CHUNK_DIMENSION: usize = 48;

/// Addressing rules for a cubic chunk of side `dimension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkShape {
    dimension: usize,
}

impl ChunkShape {
    /// Creates the shape of a chunk with side length `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Side length in voxels.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Voxels in one horizontal layer (`C²`).
    pub fn area(&self) -> usize {
        self.dimension * self.dimension
    }

    /// Voxels in the whole chunk (`C³`).
    pub fn volume(&self) -> usize {
        self.area() * self.dimension
    }

    /// Linear index of a local coordinate, or `None` when any component lies outside
    /// `0..dimension`.
    pub fn linearize(&self, local: Point3<i32>) -> Option<usize> {
        let c = self.dimension as i32;
        if !(0..c).contains(&local.x) || !(0..c).contains(&local.y) || !(0..c).contains(&local.z)
        {
            return None;
        }
        Some(local.x as usize + self.dimension * local.z as usize + self.area() * local.y as usize)
    }

    /// Local coordinate of a linear index. The inverse of [`ChunkShape::linearize`].
    pub fn delinearize(&self, index: usize) -> Point3<usize> {
        let y = index / self.area();
        let rest = index % self.area();
        Point3::new(rest % self.dimension, y, rest / self.dimension)
    }
}

/// A handle to one chunk of the world.
///
/// The voxel data itself lives in the world's arena; see [`crate::engine_state::voxels::world::World::chunk_voxels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    /// Index of this chunk in the world's chunk list and voxel arena.
    pub index: usize,
}

impl Chunk {
    /// World-space voxel coordinate of this chunk's local origin.
    pub fn origin(&self, shape: &ChunkShape) -> Point3<i32> {
        let c = shape.dimension() as i32;
        Point3::new(self.position.x * c, self.position.y * c, self.position.z * c)
    }
}
