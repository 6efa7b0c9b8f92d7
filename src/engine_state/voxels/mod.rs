//! # Voxel Engine Core
//!
//! This module contains the voxel world: what is solid, where, and how a moving box
//! interacts with it.
//!
//! ## Architecture
//!
//! * **Block**: voxel IDs, materials and block faces
//! * **Chunk**: addressing rules for the cubic pieces of the world, plus the cursors
//!   that fill and walk a chunk's voxels
//! * **World**: the fixed chunk grid and its voxel arena, with point lookups and edits
//! * **Collision**: box queries, sliding and surface placement on top of the world
//! * **Terrain**: generators that fill chunks when the world is built
//! * **Voxel handler**: the crosshair raycast and add/remove edits
//!
//! ## Data Flow
//!
//! 1. The world is built once from configuration; a terrain generator fills every chunk
//! 2. Each frame the player asks the world for collisions and ground contact
//! 3. The voxel handler casts a ray from the eye and may edit a voxel
//! 4. Edits mark chunks dirty for whatever renders them
//!
//! Everything runs on one thread. The world is only written during construction and
//! through [`world::World::set_voxel`].

pub mod block;
pub mod chunk;
pub mod collision;
pub mod terrain;
pub mod voxel_handler;
pub mod world;
