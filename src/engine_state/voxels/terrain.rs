//! # Terrain Module
//!
//! Terrain generators decide *what* the world looks like. The engine only requires
//! that a generator fills each chunk exactly once, through the
//! [`ChunkCreationIterator`] it is handed, before any collision query runs.
//!
//! Generation strategies:
//! - `noise`: Perlin height map with material bands and trees
//! - `flat`: every column solid up to a fixed height
//! - `empty`: all air

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::Deserialize;

use super::{
    block::{block_type::BlockType, VoxelId},
    chunk::chunk_creation::ChunkCreationIterator,
};

/// Fills chunk buffers for a freshly built world.
pub trait TerrainGenerator {
    /// Writes every voxel of the chunk behind `cci`.
    ///
    /// Voxels the generator does not write stay air.
    fn fill_chunk(&self, cci: &mut ChunkCreationIterator<'_>);
}

/// The terrain generator selected by configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainKind {
    /// Noise height map, see [`NoiseTerrain`]
    #[default]
    Noise,
    /// Flat ground, see [`FlatTerrain`]
    Flat {
        /// Number of solid layers, starting at `y = 0`
        #[serde(default = "default_flat_height")]
        height: i32,
        /// Voxel ID of the solid layers
        #[serde(default = "default_flat_material")]
        material: VoxelId,
    },
    /// No solid voxels at all
    Empty,
}

fn default_flat_height() -> i32 {
    10
}

fn default_flat_material() -> VoxelId {
    BlockType::STONE.id()
}

impl TerrainKind {
    /// Builds the generator for a world `world_voxel_height` voxels tall.
    pub fn generator(&self, seed: u32, world_voxel_height: i32) -> Box<dyn TerrainGenerator> {
        match *self {
            TerrainKind::Noise => Box::new(NoiseTerrain::new(seed, world_voxel_height)),
            TerrainKind::Flat { height, material } => {
                let material = BlockType::from_id(material).unwrap_or_else(|| {
                    log::warn!("unknown flat terrain material {material}, using stone");
                    BlockType::STONE
                });
                Box::new(FlatTerrain { height, material })
            }
            TerrainKind::Empty => Box::new(EmptyTerrain),
        }
    }
}

/// All air.
pub struct EmptyTerrain;

impl TerrainGenerator for EmptyTerrain {
    fn fill_chunk(&self, cci: &mut ChunkCreationIterator<'_>) {
        cci.fill_remaining(BlockType::AIR);
    }
}

/// Every column solid from `y = 0` up to `height - 1`.
pub struct FlatTerrain {
    /// Number of solid layers
    pub height: i32,
    /// Material of the solid layers
    pub material: BlockType,
}

impl TerrainGenerator for FlatTerrain {
    fn fill_chunk(&self, cci: &mut ChunkCreationIterator<'_>) {
        while let Some(world) = cci.next_world() {
            if world.y < self.height {
                cci.push_block_type(self.material);
            } else {
                cci.push_block_type(BlockType::AIR);
            }
        }
    }
}

/// Top-layer material bands, by height of the surface voxel.
const SNOW_LEVEL: i32 = 54;
const STONE_LEVEL: i32 = 49;
const DIRT_LEVEL: i32 = 40;
const GRASS_LEVEL: i32 = 8;

/// Chance of a tree on a grass column.
const TREE_PROBABILITY: f32 = 0.02;
const TREE_WIDTH: i32 = 4;
const TREE_HEIGHT: i32 = 8;
const TREE_HALF_WIDTH: i32 = TREE_WIDTH / 2;
const TREE_HALF_HEIGHT: i32 = TREE_HEIGHT / 2;

/// Perlin height-map terrain.
///
/// Column heights are a sum of four octaves centred on half the world height.
/// Each column is stone up to its surface voxel. Long columns are carved by
/// 3D noise caves. The surface voxel picks its material from the height bands above,
/// jittered by a few voxels so the bands do not form straight lines.
pub struct NoiseTerrain {
    seed: u32,
    perlin: Perlin,
    world_voxel_height: i32,
}

impl NoiseTerrain {
    /// Creates a generator for a world `world_voxel_height` voxels tall.
    pub fn new(seed: u32, world_voxel_height: i32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
            world_voxel_height,
        }
    }

    fn noise2(&self, x: f64, z: f64) -> f64 {
        self.perlin.get([x, z])
    }

    fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z])
    }

    /// Height of the terrain column at world `(x, z)`, in voxels.
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (x as f64, z as f64);
        let mut a1 = self.world_voxel_height as f64 / 2.0;
        let (a2, a4, a8) = (a1 * 0.5, a1 * 0.25, a1 * 0.125);
        let f1 = 0.005;
        let (f2, f4, f8) = (f1 * 2.0, f1 * 4.0, f1 * 8.0);

        if self.noise2(0.1 * x, 0.1 * z) < 0.0 {
            a1 /= 1.07;
        }

        let mut height = 0.0;
        height += self.noise2(x * f1, z * f1) * a1 + a1;
        height += self.noise2(x * f2, z * f2) * a2 - a2;
        height += self.noise2(x * f4, z * f4) * a4 + a4;
        height += self.noise2(x * f8, z * f8) * a8 - a8;
        height = height.max(self.noise2(x * f8, z * f8) * a8 + a8);

        (height as i32).clamp(1, self.world_voxel_height)
    }

    fn is_cave(&self, world: Point3<i32>, column_height: i32) -> bool {
        let (x, y, z) = (world.x as f64, world.y as f64, world.z as f64);
        let floor = self.noise2(x * 0.1, z * 0.1) * 3.0 + 3.0;
        self.noise3(x * 0.09, y * 0.09, z * 0.09) > 0.0
            && floor < y
            && world.y < column_height - 10
    }

    fn surface_material(height: i32) -> BlockType {
        if height >= SNOW_LEVEL {
            BlockType::SNOW
        } else if height >= STONE_LEVEL {
            BlockType::STONE
        } else if height >= DIRT_LEVEL {
            BlockType::DIRT
        } else if height >= GRASS_LEVEL {
            BlockType::GRASS
        } else {
            BlockType::SAND
        }
    }

    fn place_tree(cci: &mut ChunkCreationIterator<'_>, base: Point3<i32>, rng: &mut fastrand::Rng) {
        let c = cci.shape().dimension() as i32;
        if base.x < TREE_HALF_WIDTH
            || base.x >= c - TREE_HALF_WIDTH
            || base.z < TREE_HALF_WIDTH
            || base.z >= c - TREE_HALF_WIDTH
            || base.y + TREE_HEIGHT >= c
        {
            return;
        }

        // Crown: layers shrink towards the top, every fourth voxel left open.
        for (layer, iy) in (TREE_HALF_HEIGHT..TREE_HEIGHT - 1).enumerate() {
            let shrink = layer as i32;
            let ragged = rng.i32(0..2);
            for ix in (-TREE_HALF_WIDTH + shrink)..(TREE_HALF_WIDTH - shrink * ragged) {
                for iz in (-TREE_HALF_WIDTH + shrink * ragged)..(TREE_HALF_WIDTH - shrink) {
                    if (ix + iz).rem_euclid(4) != 0 {
                        let local = Point3::new(base.x + ix, base.y + iy, base.z + iz);
                        cci.set_block_type_at(local, BlockType::LEAVES);
                    }
                }
            }
        }

        for iy in 1..TREE_HEIGHT - 2 {
            cci.set_block_type_at(Point3::new(base.x, base.y + iy, base.z), BlockType::WOOD);
        }
        cci.set_block_type_at(
            Point3::new(base.x, base.y + TREE_HEIGHT - 2, base.z),
            BlockType::LEAVES,
        );
    }
}

impl TerrainGenerator for NoiseTerrain {
    fn fill_chunk(&self, cci: &mut ChunkCreationIterator<'_>) {
        let chunk = *cci.chunk();
        let c = cci.shape().dimension() as i32;
        let origin = chunk.origin(cci.shape());

        let mut heights = Vec::with_capacity((c * c) as usize);
        for z in 0..c {
            for x in 0..c {
                heights.push(self.column_height(origin.x + x, origin.z + z));
            }
        }

        let chunk_seed = (self.seed as u64) << 32
            ^ (chunk.position.x as u32 as u64).wrapping_mul(0x9E37_79B9)
            ^ (chunk.position.y as u32 as u64).wrapping_mul(0x85EB_CA6B)
            ^ (chunk.position.z as u32 as u64).wrapping_mul(0xC2B2_AE35);
        let mut rng = fastrand::Rng::with_seed(chunk_seed);
        let mut tree_sites = Vec::new();

        while let Some(world) = cci.next_world() {
            let local_x = world.x - origin.x;
            let local_z = world.z - origin.z;
            let column_height = heights[(local_x + c * local_z) as usize];

            let block_type = if world.y >= column_height {
                BlockType::AIR
            } else if world.y < column_height - 1 {
                if self.is_cave(world, column_height) {
                    BlockType::AIR
                } else {
                    BlockType::STONE
                }
            } else {
                let jittered = world.y - rng.i32(0..7);
                let material = Self::surface_material(jittered);
                if material == BlockType::GRASS && rng.f32() < TREE_PROBABILITY {
                    tree_sites.push(Point3::new(local_x, world.y - origin.y, local_z));
                }
                material
            };
            cci.push_block_type(block_type);
        }

        for site in tree_sites {
            Self::place_tree(cci, site, &mut rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{
        block::AIR,
        chunk::{Chunk, ChunkShape},
    };

    fn fill(generator: &dyn TerrainGenerator, position: Point3<i32>, shape: ChunkShape) -> Vec<VoxelId> {
        let mut buffer = vec![AIR; shape.volume()];
        let chunk = Chunk { position, index: 0 };
        let mut cci = ChunkCreationIterator::new(chunk, shape, &mut buffer);
        generator.fill_chunk(&mut cci);
        assert!(cci.is_complete());
        buffer
    }

    #[test]
    fn flat_terrain_fills_below_height_only() {
        let shape = ChunkShape::new(8);
        let flat = FlatTerrain {
            height: 3,
            material: BlockType::DIRT,
        };
        let buffer = fill(&flat, Point3::new(0, 0, 0), shape);
        for (i, &id) in buffer.iter().enumerate() {
            let local = shape.delinearize(i);
            let expected = if local.y < 3 { BlockType::DIRT.id() } else { AIR };
            assert_eq!(id, expected, "at {local:?}");
        }

        let above = fill(&flat, Point3::new(0, 1, 0), shape);
        assert!(above.iter().all(|&id| id == AIR));
    }

    #[test]
    fn empty_terrain_is_all_air() {
        let shape = ChunkShape::new(4);
        assert!(fill(&EmptyTerrain, Point3::new(0, 0, 0), shape)
            .iter()
            .all(|&id| id == AIR));
    }

    #[test]
    fn noise_terrain_is_deterministic_per_seed() {
        let shape = ChunkShape::new(16);
        let a = fill(&NoiseTerrain::new(7, 32), Point3::new(1, 0, 2), shape);
        let b = fill(&NoiseTerrain::new(7, 32), Point3::new(1, 0, 2), shape);
        assert_eq!(a, b);
    }

    #[test]
    fn noise_column_heights_stay_inside_the_world() {
        let terrain = NoiseTerrain::new(3, 96);
        for x in (0..200).step_by(13) {
            for z in (0..200).step_by(17) {
                let h = terrain.column_height(x, z);
                assert!((1..=96).contains(&h), "height {h} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn noise_terrain_has_solid_ground_at_the_bottom() {
        let shape = ChunkShape::new(16);
        let buffer = fill(&NoiseTerrain::new(11, 32), Point3::new(0, 0, 0), shape);
        // Column heights are at least 1, so the bottom layer is never air.
        assert!(buffer[..shape.area()].iter().all(|&id| id != AIR));
    }

    #[test]
    fn flat_kind_with_unknown_material_falls_back_to_stone() {
        let generator = TerrainKind::Flat {
            height: 1,
            material: 200,
        }
        .generator(0, 8);
        let shape = ChunkShape::new(2);
        let buffer = fill(generator.as_ref(), Point3::new(0, 0, 0), shape);
        assert_eq!(buffer[0], BlockType::STONE.id());
    }
}
