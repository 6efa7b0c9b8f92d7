//! # Engine Configuration
//!
//! Every tunable constant of the simulation lives in [`EngineConfig`]. The config is
//! built once (from defaults or from a JSON file), validated, and then handed to the
//! world and the player by reference. Nothing reads it through a global.
//!
//! ## Units
//!
//! Lengths are in voxels (one voxel is one world unit). Speeds and accelerations are
//! per millisecond, because frame time is fed to the simulation in milliseconds:
//! a walk speed of `0.008` moves the player 8 voxels per second.
//!
//! ## Example
//!
//! ```json
//! {
//!     "world": { "world_width": 4, "terrain": { "kind": "flat", "height": 10 } },
//!     "player": { "gravity": 0.0005 }
//! }
//! ```
//!
//! Sections and fields that are left out keep their defaults.

use std::path::Path;

use anyhow::{ensure, Context};
use cgmath::{Deg, Point3, Rad};
use serde::Deserialize;

use super::voxels::{
    chunk::DEFAULT_CHUNK_DIMENSION, collision::CollisionBox, terrain::TerrainKind,
};

/// Complete configuration of one engine instance.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World layout and terrain
    pub world: WorldConfig,
    /// Player movement, collision and physics
    pub player: PlayerConfig,
    /// Voxel editing
    pub interaction: InteractionConfig,
}

/// World layout and terrain generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of a chunk in voxels
    pub chunk_size: usize,
    /// Number of chunks along X
    pub world_width: usize,
    /// Number of chunks along Y
    pub world_height: usize,
    /// Number of chunks along Z
    pub world_depth: usize,
    /// Seed handed to the terrain generator
    pub seed: u32,
    /// Which terrain generator fills the chunks
    pub terrain: TerrainKind,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_DIMENSION,
            world_width: 20,
            world_height: 2,
            world_depth: 20,
            seed: 16,
            terrain: TerrainKind::default(),
        }
    }
}

impl WorldConfig {
    /// World size in voxels along X, Y and Z.
    pub fn voxel_extent(&self) -> [usize; 3] {
        [
            self.world_width * self.chunk_size,
            self.world_height * self.chunk_size,
            self.world_depth * self.chunk_size,
        ]
    }
}

/// Player movement, collision and physics settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed while walking
    pub walk_speed: f32,
    /// Horizontal speed while sprinting
    pub sprint_speed: f32,
    /// Speed in creative mode, both horizontal and vertical
    pub creative_speed: f32,
    /// Factor applied to `creative_speed` while sprinting in creative mode
    pub creative_sprint_multiplier: f32,
    /// Radians of rotation per unit of mouse motion
    pub mouse_sensitivity: f32,
    /// Horizontal width of the collision box
    pub collision_size: f32,
    /// Vertical extent of the collision box, measured up from the feet
    pub height: f32,
    /// Distance from the feet to the eyes
    pub eye_height: f32,
    /// Subtracted from the top of the collision box before rounding to voxels
    pub collision_top_margin: f32,
    /// How far below the feet ground checks look.
    ///
    /// A grounded player stays grounded while its feet are less than this distance
    /// above a floor; it does not settle onto the floor from inside that band. Feet
    /// raised further than this start falling.
    pub ground_probe: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Vertical velocity set by a jump
    pub jump_strength: f32,
    /// Upward position nudge applied when a jump starts
    pub jump_nudge: f32,
    /// Largest downward speed gravity can reach
    pub terminal_velocity: f32,
    /// Largest absolute pitch, in degrees
    pub pitch_max_degrees: f32,
    /// Feet below this height are teleported back to the surface
    pub fall_floor: f32,
    /// Initial yaw in degrees. `-90` looks along negative Z.
    pub yaw_degrees: f32,
    /// Initial feet position. Defaults to the middle of the world at chunk height.
    pub spawn: Option<[f32; 3]>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 0.008,
            sprint_speed: 0.012,
            creative_speed: 0.015,
            creative_sprint_multiplier: 2.0,
            mouse_sensitivity: 0.002,
            collision_size: 0.8,
            height: 1.8,
            eye_height: 1.6,
            collision_top_margin: 0.1,
            ground_probe: 0.05,
            gravity: 0.0004,
            jump_strength: 0.038,
            jump_nudge: 0.03,
            terminal_velocity: 0.08,
            pitch_max_degrees: 89.0,
            fall_floor: -50.0,
            yaw_degrees: -90.0,
            spawn: None,
        }
    }
}

impl PlayerConfig {
    /// The pitch clamp as an angle.
    pub fn pitch_max(&self) -> Rad<f32> {
        Deg(self.pitch_max_degrees).into()
    }

    /// The player's collision box.
    pub fn collision_box(&self) -> CollisionBox {
        CollisionBox {
            size: self.collision_size,
            height: self.height,
            top_margin: self.collision_top_margin,
            ground_probe: self.ground_probe,
        }
    }
}

/// Voxel editing settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// How far the edit ray reaches from the eye, in voxels
    pub max_ray_distance: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_ray_distance: 6.0,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON document and validates the result.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).context("failed to parse engine config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Checks the invariants the simulation relies on.
    pub fn validate(&self) -> anyhow::Result<()> {
        let world = &self.world;
        ensure!(world.chunk_size > 0, "chunk_size must be positive");
        ensure!(
            world.world_width > 0 && world.world_height > 0 && world.world_depth > 0,
            "world dimensions must be positive, got {}x{}x{}",
            world.world_width,
            world.world_height,
            world.world_depth
        );
        ensure!(
            world.voxel_extent().iter().all(|&n| n <= i32::MAX as usize),
            "world is too large to address with 32-bit voxel coordinates"
        );

        let player = &self.player;
        ensure!(
            player.collision_size > 0.0 && player.height > 0.0,
            "collision box must have a positive size"
        );
        ensure!(
            player.collision_top_margin >= 0.0 && player.collision_top_margin < player.height,
            "collision_top_margin must lie in [0, height)"
        );
        ensure!(player.ground_probe > 0.0, "ground_probe must be positive");
        ensure!(player.gravity >= 0.0, "gravity must not be negative");
        ensure!(
            player.terminal_velocity > 0.0,
            "terminal_velocity must be positive"
        );
        ensure!(
            player.pitch_max_degrees > 0.0 && player.pitch_max_degrees < 90.0,
            "pitch_max_degrees must lie in (0, 90)"
        );
        ensure!(
            self.interaction.max_ray_distance >= 0.0,
            "max_ray_distance must not be negative"
        );
        Ok(())
    }

    /// The feet position the player starts at.
    pub fn spawn_position(&self) -> Point3<f32> {
        match self.player.spawn {
            Some([x, y, z]) => Point3::new(x, y, z),
            None => {
                let [width, _, depth] = self.world.voxel_extent();
                Point3::new(
                    width as f32 / 2.0,
                    self.world.chunk_size as f32,
                    depth as f32 / 2.0,
                )
            }
        }
    }
}
