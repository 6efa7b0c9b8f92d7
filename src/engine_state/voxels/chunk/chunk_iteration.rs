//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air voxels of a chunk, which is what
//! a mesh builder consumes. It never mutates the buffer it walks.

use cgmath::Point3;

use crate::engine_state::voxels::block::{is_solid, VoxelId};

use super::ChunkShape;

/// An iterator over all non-air voxels in a chunk buffer.
///
/// Yields `(local position, voxel id)` pairs in linear index order (X fastest, then
/// Z, then Y).
pub struct ChunkBlockIterator<'a> {
    /// The chunk's slice of the world arena
    voxels: &'a [VoxelId],
    /// Addressing rules for the buffer
    shape: ChunkShape,
    /// Linear index of the next voxel to inspect
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator positioned before the first voxel of `voxels`.
    pub fn new(voxels: &'a [VoxelId], shape: ChunkShape) -> Self {
        ChunkBlockIterator {
            voxels,
            shape,
            current_offset: 0,
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, VoxelId);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.voxels.get(self.current_offset) {
            let offset = self.current_offset;
            self.current_offset += 1;
            if is_solid(id) {
                return Some((self.shape.delinearize(offset), id));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.voxels.len().saturating_sub(self.current_offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    #[test]
    fn skips_air_and_reports_local_positions() {
        let shape = ChunkShape::new(2);
        let mut voxels = vec![AIR; shape.volume()];
        voxels[1] = 4; // (1, 0, 0)
        voxels[6] = 7; // (0, 1, 1)

        let blocks: Vec<_> = ChunkBlockIterator::new(&voxels, shape).collect();
        assert_eq!(
            blocks,
            vec![(Point3::new(1, 0, 0), 4), (Point3::new(0, 1, 1), 7)]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let shape = ChunkShape::new(3);
        let voxels = vec![AIR; shape.volume()];
        assert_eq!(ChunkBlockIterator::new(&voxels, shape).count(), 0);
    }
}
