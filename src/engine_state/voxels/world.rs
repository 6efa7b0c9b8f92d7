//! # World Module
//!
//! This module provides the `World` struct, a fixed-size grid of chunks built once at
//! startup and queried by collision, raycasting and rendering.
//!
//! ## Storage
//!
//! All voxels live in one contiguous arena. The world is `width x height x depth`
//! chunks and chunk `(cx, cy, cz)` has index
//!
//! ```text
//! cx + width * cz + width * depth * cy
//! ```
//!
//! Its voxels occupy `voxels[index * C³ .. (index + 1) * C³]`, laid out by the
//! chunk's local index (see [`ChunkShape`]). Chunks are never added or removed after
//! construction.
//!
//! ## Lookups
//!
//! Any voxel coordinate outside the grid, including negative ones, reads as air.
//!
//! ## Edits
//!
//! [`World::set_voxel`] writes straight into the arena and marks the owning chunk
//! dirty, along with the neighbouring chunk when the voxel sits on a chunk face. A
//! renderer drains the dirty set with [`World::take_dirty_chunks`].

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::config::{EngineConfig, WorldConfig};

use super::{
    block::{is_solid, VoxelId, AIR},
    chunk::{
        chunk_creation::ChunkCreationIterator, chunk_iteration::ChunkBlockIterator, Chunk,
        ChunkShape,
    },
    collision::CollisionBox,
    terrain::TerrainGenerator,
};

/// A voxel world composed of a fixed grid of chunks.
pub struct World {
    /// Chunk addressing rules
    shape: ChunkShape,
    /// Number of chunks along X, Y and Z
    dimensions: [usize; 3],
    /// Chunk handles, indexed by chunk index
    chunks: Vec<Chunk>,
    /// Voxel arena, one `volume`-sized slice per chunk
    voxels: Vec<VoxelId>,
    /// One bit per chunk, set when its voxels changed since the last drain
    dirty_chunks: BitVec,
    /// Box used by the player-sized collision queries
    collision_box: CollisionBox,
}

impl World {
    /// Builds and fills the world described by `config`.
    pub fn new(config: &EngineConfig) -> Self {
        let world = &config.world;
        let world_voxel_height = (world.world_height * world.chunk_size) as i32;
        let generator = world.terrain.generator(world.seed, world_voxel_height);
        Self::with_generator(world, config.player.collision_box(), generator.as_ref())
    }

    /// Builds a world with the layout of `config` and fills every chunk with `generator`.
    ///
    /// # Panics
    /// If `config.chunk_size` is zero. [`EngineConfig::validate`] rejects such configs.
    pub fn with_generator(
        config: &WorldConfig,
        collision_box: CollisionBox,
        generator: &dyn TerrainGenerator,
    ) -> Self {
        let shape = ChunkShape::new(config.chunk_size);
        let dimensions = [config.world_width, config.world_height, config.world_depth];
        let chunk_count = dimensions.iter().product::<usize>();

        log::info!(
            "building world of {}x{}x{} chunks ({} voxels per chunk)",
            dimensions[0],
            dimensions[1],
            dimensions[2],
            shape.volume()
        );

        let mut chunks = Vec::with_capacity(chunk_count);
        for cy in 0..dimensions[1] {
            for cz in 0..dimensions[2] {
                for cx in 0..dimensions[0] {
                    chunks.push(Chunk {
                        position: Point3::new(cx as i32, cy as i32, cz as i32),
                        index: chunks.len(),
                    });
                }
            }
        }

        let mut voxels = vec![AIR; chunk_count * shape.volume()];
        let mut solid_voxels = 0;
        for (chunk, buffer) in chunks.iter().zip(voxels.chunks_exact_mut(shape.volume())) {
            let mut cci = ChunkCreationIterator::new(*chunk, shape, buffer);
            generator.fill_chunk(&mut cci);
            if !cci.is_complete() {
                log::warn!(
                    "terrain generator left chunk {:?} partially filled, the rest stays air",
                    chunk.position
                );
            }
            solid_voxels += cci.return_chunk();
        }

        log::info!("world built: {chunk_count} chunks, {solid_voxels} solid voxels");

        let mut dirty_chunks = BitVec::repeat(false, chunk_count);
        dirty_chunks.fill(true);

        World {
            shape,
            dimensions,
            chunks,
            voxels,
            dirty_chunks,
            collision_box,
        }
    }

    /// Chunk addressing rules.
    pub fn shape(&self) -> &ChunkShape {
        &self.shape
    }

    /// Number of chunks along X, Y and Z.
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// World size in voxels along X, Y and Z.
    pub fn voxel_extent(&self) -> [i32; 3] {
        let c = self.shape.dimension();
        self.dimensions.map(|n| (n * c) as i32)
    }

    /// All chunks, in chunk index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The player-sized box used by [`World::check_collision`] and [`World::is_on_ground`].
    pub fn collision_box(&self) -> &CollisionBox {
        &self.collision_box
    }

    /// Height reported for columns with no solid voxel.
    pub(crate) fn default_surface_height(&self) -> i32 {
        (self.shape.dimension() / 2) as i32
    }

    /// Index of the chunk at chunk coordinates `position`, if it is inside the grid.
    pub fn chunk_index(&self, position: Point3<i32>) -> Option<usize> {
        let [w, h, d] = self.dimensions.map(|n| n as i32);
        if !(0..w).contains(&position.x)
            || !(0..h).contains(&position.y)
            || !(0..d).contains(&position.z)
        {
            return None;
        }
        let (w, d) = (w as usize, d as usize);
        Some(position.x as usize + w * position.z as usize + w * d * position.y as usize)
    }

    /// The voxel slice of chunk `index`, in local index order.
    pub fn chunk_voxels(&self, index: usize) -> Option<&[VoxelId]> {
        let volume = self.shape.volume();
        self.voxels.get(index * volume..(index + 1) * volume)
    }

    /// Iterates the non-air voxels of chunk `index`.
    pub fn chunk_blocks(&self, index: usize) -> Option<ChunkBlockIterator<'_>> {
        self.chunk_voxels(index)
            .map(|voxels| ChunkBlockIterator::new(voxels, self.shape))
    }

    /// Splits a voxel coordinate into its chunk index and local index.
    ///
    /// Returns `None` outside the grid.
    pub fn locate(&self, voxel: Point3<i32>) -> Option<(usize, usize)> {
        let c = self.shape.dimension() as i32;
        let chunk_position = Point3::new(
            voxel.x.div_euclid(c),
            voxel.y.div_euclid(c),
            voxel.z.div_euclid(c),
        );
        let chunk_index = self.chunk_index(chunk_position)?;
        let local = Point3::new(
            voxel.x.rem_euclid(c),
            voxel.y.rem_euclid(c),
            voxel.z.rem_euclid(c),
        );
        let local_index = self.shape.linearize(local)?;
        Some((chunk_index, local_index))
    }

    /// The voxel ID containing a world-space point.
    ///
    /// Outside the grid, and for positions with a NaN or infinite component, this is air.
    pub fn get_voxel_id(&self, position: Point3<f32>) -> VoxelId {
        if !(position.x.is_finite() && position.y.is_finite() && position.z.is_finite()) {
            return AIR;
        }
        self.get_voxel_id_at(Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        ))
    }

    /// The voxel ID at integer voxel coordinates. Outside the grid this is air.
    pub fn get_voxel_id_at(&self, voxel: Point3<i32>) -> VoxelId {
        match self.locate(voxel) {
            Some((chunk_index, local_index)) => {
                self.voxels[chunk_index * self.shape.volume() + local_index]
            }
            None => AIR,
        }
    }

    /// Whether the voxel containing a world-space point is solid.
    pub fn is_voxel_solid(&self, position: Point3<f32>) -> bool {
        is_solid(self.get_voxel_id(position))
    }

    /// Whether the voxel at integer voxel coordinates is solid.
    pub fn is_voxel_solid_at(&self, voxel: Point3<i32>) -> bool {
        is_solid(self.get_voxel_id_at(voxel))
    }

    /// Writes a voxel ID. Edits take effect for every following query.
    ///
    /// # Returns
    /// `false` when the coordinate lies outside the grid; nothing changes then.
    pub fn set_voxel(&mut self, voxel: Point3<i32>, id: VoxelId) -> bool {
        let Some((chunk_index, local_index)) = self.locate(voxel) else {
            log::debug!("ignoring edit outside the world at {voxel:?}");
            return false;
        };
        self.voxels[chunk_index * self.shape.volume() + local_index] = id;
        self.dirty_chunks.set(chunk_index, true);

        // A face voxel changes the visible faces of the chunk next to it as well.
        let c = self.shape.dimension() as i32;
        let chunk_position = self.chunks[chunk_index].position;
        let local = self.shape.delinearize(local_index);
        let local = [local.x as i32, local.y as i32, local.z as i32];
        for axis in 0..3 {
            let step = if local[axis] == 0 {
                -1
            } else if local[axis] == c - 1 {
                1
            } else {
                continue;
            };
            let mut neighbour = chunk_position;
            neighbour[axis] += step;
            if let Some(index) = self.chunk_index(neighbour) {
                self.dirty_chunks.set(index, true);
            }
        }
        true
    }

    /// Returns the indices of all dirty chunks in ascending order and clears the set.
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        let dirty: Vec<usize> = self.dirty_chunks.iter_ones().collect();
        self.dirty_chunks.fill(false);
        dirty
    }
}
