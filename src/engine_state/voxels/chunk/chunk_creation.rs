//! # Chunk Creation Module
//!
//! This module provides the cursor terrain generators use to populate a chunk's
//! slice of the world's voxel arena.
//!
//! ## Fill order
//!
//! `push_block_type` writes voxels in linear order: X fastest, then Z, then Y, which
//! is the same order as the chunk's local index. A generator can therefore produce a
//! chunk layer by layer from the bottom up without computing indices.
//! Features that do not follow that order (trees, for example) use
//! `set_block_type_at` after the bulk fill.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, is_solid, VoxelId};

use super::{Chunk, ChunkShape};

/// A write cursor over one chunk's voxel buffer.
///
/// The buffer starts as air. The cursor tracks how many voxels have been pushed so
/// the world can tell whether a generator covered the whole chunk.
pub struct ChunkCreationIterator<'a> {
    /// The chunk being created
    chunk: Chunk,
    /// Addressing rules for the buffer
    shape: ChunkShape,
    /// The chunk's slice of the world arena
    voxels: &'a mut [VoxelId],
    /// Linear index of the next pushed voxel
    cursor: usize,
}

impl<'a> ChunkCreationIterator<'a> {
    /// Creates a cursor at the start of `voxels`, which must be exactly one chunk long.
    pub(crate) fn new(chunk: Chunk, shape: ChunkShape, voxels: &'a mut [VoxelId]) -> Self {
        debug_assert_eq!(voxels.len(), shape.volume());
        ChunkCreationIterator {
            chunk,
            shape,
            voxels,
            cursor: 0,
        }
    }

    /// The chunk being filled.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// The shape of the chunk being filled.
    pub fn shape(&self) -> &ChunkShape {
        &self.shape
    }

    /// Local coordinate the next `push_block_type` will write, or `None` once the
    /// chunk is full.
    pub fn next_local(&self) -> Option<Point3<usize>> {
        (self.cursor < self.voxels.len()).then(|| self.shape.delinearize(self.cursor))
    }

    /// World-space voxel coordinate the next `push_block_type` will write.
    pub fn next_world(&self) -> Option<Point3<i32>> {
        let origin = self.chunk.origin(&self.shape);
        self.next_local().map(|local| {
            Point3::new(
                origin.x + local.x as i32,
                origin.y + local.y as i32,
                origin.z + local.z as i32,
            )
        })
    }

    /// Writes `block_type` at the cursor and advances it.
    ///
    /// Pushing past the end of the chunk is ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if let Some(slot) = self.voxels.get_mut(self.cursor) {
            *slot = block_type.id();
            self.cursor += 1;
        }
    }

    /// Pushes `block_type` for every remaining voxel.
    pub fn fill_remaining(&mut self, block_type: BlockType) {
        let id = block_type.id();
        for slot in &mut self.voxels[self.cursor..] {
            *slot = id;
        }
        self.cursor = self.voxels.len();
    }

    /// Overwrites the voxel at a local coordinate without moving the cursor.
    ///
    /// # Returns
    /// `false` if the coordinate lies outside the chunk.
    pub fn set_block_type_at(&mut self, local: Point3<i32>, block_type: BlockType) -> bool {
        match self.shape.linearize(local) {
            Some(index) => {
                self.voxels[index] = block_type.id();
                true
            }
            None => false,
        }
    }

    /// Whether every voxel of the chunk has been pushed.
    pub fn is_complete(&self) -> bool {
        self.cursor == self.voxels.len()
    }

    /// Finishes creation.
    ///
    /// # Returns
    /// The number of solid voxels in the chunk.
    pub fn return_chunk(self) -> usize {
        self.voxels.iter().filter(|&&id| is_solid(id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    fn chunk() -> Chunk {
        Chunk {
            position: Point3::new(1, 0, 0),
            index: 0,
        }
    }

    #[test]
    fn pushes_follow_local_index_order() {
        let shape = ChunkShape::new(2);
        let mut buffer = vec![AIR; shape.volume()];
        let mut cci = ChunkCreationIterator::new(chunk(), shape, &mut buffer);

        assert_eq!(cci.next_local(), Some(Point3::new(0, 0, 0)));
        cci.push_block_type(BlockType::STONE);
        assert_eq!(cci.next_local(), Some(Point3::new(1, 0, 0)));
        cci.push_block_type(BlockType::AIR);
        assert_eq!(cci.next_local(), Some(Point3::new(0, 0, 1)));
        assert_eq!(cci.next_world(), Some(Point3::new(2, 0, 1)));
        cci.fill_remaining(BlockType::DIRT);
        assert!(cci.is_complete());
        assert_eq!(cci.next_local(), None);
        assert_eq!(cci.return_chunk(), 7);

        assert_eq!(buffer[0], BlockType::STONE.id());
        assert_eq!(buffer[1], AIR);
        assert_eq!(buffer[7], BlockType::DIRT.id());
    }

    #[test]
    fn random_access_writes_stay_inside_the_chunk() {
        let shape = ChunkShape::new(3);
        let mut buffer = vec![AIR; shape.volume()];
        let mut cci = ChunkCreationIterator::new(chunk(), shape, &mut buffer);

        assert!(cci.set_block_type_at(Point3::new(2, 1, 0), BlockType::WOOD));
        assert!(!cci.set_block_type_at(Point3::new(3, 1, 0), BlockType::WOOD));
        assert!(!cci.is_complete());
        assert_eq!(cci.return_chunk(), 1);
        assert_eq!(buffer[11], BlockType::WOOD.id());
    }
}
