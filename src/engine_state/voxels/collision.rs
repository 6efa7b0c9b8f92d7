//! # Collision Module
//!
//! Axis-aligned box queries against the solid voxels of a [`World`], plus the
//! per-axis sliding resolution shared by the free camera and the player.
//!
//! ## Box convention
//!
//! A body's box is anchored at its feet: it spans `size` horizontally, centred on the
//! position's X and Z, and `height` vertically, starting at the position's Y. The top
//! of the box is lowered by `top_margin` before rounding to voxels, so a body whose
//! head sits exactly on a voxel boundary does not touch the voxel above it.
//!
//! Every query sweeps the integer voxel coordinates covered by the box. The box is
//! small, so there is no spatial index.

use cgmath::{Point3, Vector3};

use crate::engine_state::player::Player;

use super::world::World;

/// The extent of a body used by collision queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    /// Horizontal width, centred on the anchor position
    pub size: f32,
    /// Vertical extent above the anchor position
    pub height: f32,
    /// Subtracted from the top before rounding to voxels
    pub top_margin: f32,
    /// Depth of the slab below the anchor probed by ground checks
    pub ground_probe: f32,
}

impl CollisionBox {
    /// The same box with a different size and height.
    pub fn resized(&self, size: f32, height: f32) -> Self {
        Self {
            size,
            height,
            ..*self
        }
    }
}

/// Result of a sliding move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOutcome {
    /// Where the body ends up
    pub position: Point3<f32>,
    /// Per axis (x, y, z): whether a requested displacement on that axis was refused
    pub blocked: [bool; 3],
}

impl SlideOutcome {
    /// Whether any axis was refused.
    pub fn is_blocked(&self) -> bool {
        self.blocked.iter().any(|&b| b)
    }
}

fn is_finite(position: Point3<f32>) -> bool {
    position.x.is_finite() && position.y.is_finite() && position.z.is_finite()
}

impl World {
    /// Whether the player-sized box at `position` overlaps a solid voxel.
    pub fn check_collision(&self, position: Point3<f32>) -> bool {
        self.check_collision_for(position, self.collision_box())
    }

    /// Whether a box of the given `size` and `height` at `position` overlaps a solid voxel.
    pub fn check_collision_with(&self, position: Point3<f32>, size: f32, height: f32) -> bool {
        self.check_collision_for(position, &self.collision_box().resized(size, height))
    }

    /// Whether `collision_box` anchored at `position` overlaps a solid voxel.
    ///
    /// Returns on the first solid voxel found. A non-finite position touches nothing.
    pub fn check_collision_for(&self, position: Point3<f32>, collision_box: &CollisionBox) -> bool {
        if !is_finite(position) {
            return false;
        }
        let half_size = collision_box.size / 2.0;

        let min_x = (position.x - half_size).floor() as i32;
        let max_x = (position.x + half_size).floor() as i32;
        let min_y = position.y.floor() as i32;
        let max_y = (position.y + collision_box.height - collision_box.top_margin).floor() as i32;
        let min_z = (position.z - half_size).floor() as i32;
        let max_z = (position.z + half_size).floor() as i32;

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                for z in min_z..=max_z {
                    if self.is_voxel_solid_at(Point3::new(x, y, z)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether there is solid ground just below a player-sized box at `position`.
    pub fn is_on_ground(&self, position: Point3<f32>) -> bool {
        self.is_on_ground_for(position, self.collision_box())
    }

    /// Whether there is solid ground just below a box of width `size` at `position`.
    pub fn is_on_ground_with(&self, position: Point3<f32>, size: f32) -> bool {
        let collision_box = self.collision_box();
        self.is_on_ground_for(position, &collision_box.resized(size, collision_box.height))
    }

    /// Whether any voxel in the one-voxel slab `ground_probe` below `position` is solid
    /// within the box's horizontal footprint.
    pub fn is_on_ground_for(&self, position: Point3<f32>, collision_box: &CollisionBox) -> bool {
        if !is_finite(position) {
            return false;
        }
        let half_size = collision_box.size / 2.0;
        let check_y = (position.y - collision_box.ground_probe).floor() as i32;

        let min_x = (position.x - half_size).floor() as i32;
        let max_x = (position.x + half_size).floor() as i32;
        let min_z = (position.z - half_size).floor() as i32;
        let max_z = (position.z + half_size).floor() as i32;

        for x in min_x..=max_x {
            for z in min_z..=max_z {
                if self.is_voxel_solid_at(Point3::new(x, check_y, z)) {
                    return true;
                }
            }
        }
        false
    }

    /// Moves a box from `origin` by `displacement`, sliding along obstacles.
    ///
    /// If the full displacement is free it is taken as is. Otherwise every axis with a
    /// non-zero component is tested on its own from `origin` and kept if free, so a
    /// body pushed diagonally into a wall still moves along it. Each axis is tested
    /// from the original coordinates. If the free axes together still end in a solid
    /// voxel (an outer corner), only the free axis with the largest displacement is
    /// kept.
    pub fn slide(
        &self,
        origin: Point3<f32>,
        displacement: Vector3<f32>,
        collision_box: &CollisionBox,
    ) -> SlideOutcome {
        let target = origin + displacement;
        if !self.check_collision_for(target, collision_box) {
            return SlideOutcome {
                position: target,
                blocked: [false; 3],
            };
        }

        let mut blocked = [false; 3];
        let mut free_axes = Vec::with_capacity(3);
        for axis in 0..3 {
            if displacement[axis] == 0.0 {
                continue;
            }
            let mut candidate = origin;
            candidate[axis] += displacement[axis];
            if self.check_collision_for(candidate, collision_box) {
                blocked[axis] = true;
            } else {
                free_axes.push(axis);
            }
        }

        let mut position = origin;
        for &axis in &free_axes {
            position[axis] += displacement[axis];
        }

        if free_axes.len() > 1 && self.check_collision_for(position, collision_box) {
            let keep = free_axes
                .iter()
                .copied()
                .max_by(|&a, &b| displacement[a].abs().total_cmp(&displacement[b].abs()))
                .unwrap_or(0);
            position = origin;
            position[keep] += displacement[keep];
            for &axis in &free_axes {
                if axis != keep {
                    blocked[axis] = true;
                }
            }
        }

        SlideOutcome { position, blocked }
    }

    /// Height of the walkable surface of column `(x, z)`.
    ///
    /// Scans down from the top of the world and returns one above the first solid
    /// voxel. An all-air column (including one outside the world) yields half a chunk.
    pub fn find_surface_height(&self, x: i32, z: i32) -> i32 {
        let top = self.voxel_extent()[1];
        for y in (0..top).rev() {
            if self.is_voxel_solid_at(Point3::new(x, y, z)) {
                log::debug!("found surface at y={} for column ({x}, {z})", y + 1);
                return y + 1;
            }
        }
        let default_height = self.default_surface_height();
        log::debug!("column ({x}, {z}) is empty, using default height {default_height}");
        default_height
    }

    /// Places `player` on the surface of the column under its feet.
    ///
    /// Zeroes vertical velocity and leaves the player grounded with a jump available.
    /// If the player's box still overlaps solid voxels there (its footprint can reach
    /// into a taller neighbouring column), it is raised one voxel at a time until
    /// it is free or reaches the top of the world. Calling this again from the result
    /// does not move the player.
    pub fn spawn_player_on_surface(&self, player: &mut Player) {
        let feet = player.feet_position();
        let x = feet.x.floor() as i32;
        let z = feet.z.floor() as i32;
        let surface_y = self.find_surface_height(x, z);

        let mut target = Point3::new(feet.x, surface_y as f32, feet.z);
        let top = self.voxel_extent()[1] as f32;
        while target.y < top && self.check_collision_for(target, player.collision_box()) {
            log::debug!("player stuck at y={}, moving up", target.y);
            target.y += 1.0;
        }

        log::info!(
            "spawning player at ({:.2}, {}, {:.2})",
            target.x,
            target.y,
            target.z
        );
        player.settle_at(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::WorldConfig;
    use crate::engine_state::voxels::{block::block_type::BlockType, terrain::FlatTerrain};

    fn player_box() -> CollisionBox {
        CollisionBox {
            size: 0.8,
            height: 1.8,
            top_margin: 0.1,
            ground_probe: 0.1,
        }
    }

    fn flat_world(height: i32) -> World {
        let config = WorldConfig {
            chunk_size: 8,
            world_width: 2,
            world_height: 2,
            world_depth: 2,
            ..WorldConfig::default()
        };
        World::with_generator(
            &config,
            player_box(),
            &FlatTerrain {
                height,
                material: BlockType::STONE,
            },
        )
    }

    #[test]
    fn box_resting_on_floor_does_not_collide() {
        let world = flat_world(4);
        assert!(!world.check_collision(Point3::new(3.5, 4.0, 3.5)));
        assert!(world.check_collision(Point3::new(3.5, 3.99, 3.5)));
    }

    #[test]
    fn top_margin_ignores_a_ceiling_touching_the_head() {
        let mut world = flat_world(0);
        world.set_voxel(Point3::new(3, 2, 3), BlockType::STONE.id());
        // Head top at exactly y = 2.0 (0.2 + 1.8): the margin keeps voxel y = 2 out.
        assert!(!world.check_collision(Point3::new(3.5, 0.2, 3.5)));
        assert!(world.check_collision(Point3::new(3.5, 0.35, 3.5)));
    }

    #[test]
    fn box_footprint_reaches_neighbouring_columns() {
        let mut world = flat_world(0);
        world.set_voxel(Point3::new(4, 0, 3), BlockType::STONE.id());
        assert!(world.check_collision(Point3::new(3.7, 0.0, 3.5)));
        assert!(!world.check_collision(Point3::new(3.5, 0.0, 3.5)));
        assert!(world.check_collision_with(Point3::new(3.5, 0.0, 3.5), 1.2, 1.0));
    }

    #[test]
    fn non_finite_boxes_touch_nothing() {
        let world = flat_world(4);
        let nan = Point3::new(f32::NAN, 1.0, f32::NAN);
        assert!(world.is_voxel_solid(Point3::new(0.5, 1.0, 0.5)));
        assert!(!world.check_collision(nan));
        assert!(!world.is_on_ground(nan));
        assert!(!world.check_collision(Point3::new(0.5, f32::INFINITY, 0.5)));
    }

    #[test]
    fn ground_probe_looks_just_below_the_feet() {
        let world = flat_world(4);
        assert!(world.is_on_ground(Point3::new(3.5, 4.0, 3.5)));
        assert!(world.is_on_ground(Point3::new(3.5, 4.05, 3.5)));
        assert!(!world.is_on_ground(Point3::new(3.5, 4.2, 3.5)));
        assert!(!world.is_on_ground_with(Point3::new(-5.0, 4.0, -5.0), 0.8));
    }

    #[test]
    fn slide_takes_free_moves_whole() {
        let world = flat_world(1);
        let outcome = world.slide(
            Point3::new(2.0, 1.0, 2.0),
            Vector3::new(0.5, 0.0, 0.25),
            &player_box(),
        );
        assert!(!outcome.is_blocked());
        assert_eq!(outcome.position, Point3::new(2.5, 1.0, 2.25));
    }

    #[test]
    fn slide_keeps_the_free_axis_against_a_wall() {
        let mut world = flat_world(0);
        for y in 0..4 {
            for z in 0..16 {
                world.set_voxel(Point3::new(5, y, z), BlockType::STONE.id());
            }
        }
        let origin = Point3::new(4.5, 0.0, 3.0);
        let outcome = world.slide(origin, Vector3::new(0.3, 0.0, 0.3), &player_box());
        assert_eq!(outcome.blocked, [true, false, false]);
        assert_eq!(outcome.position, Point3::new(4.5, 0.0, 3.3));
    }

    #[test]
    fn slide_never_ends_inside_an_outer_corner() {
        let mut world = flat_world(0);
        world.set_voxel(Point3::new(5, 0, 5), BlockType::STONE.id());
        world.set_voxel(Point3::new(5, 1, 5), BlockType::STONE.id());
        let origin = Point3::new(4.55, 0.0, 4.5);
        let outcome = world.slide(origin, Vector3::new(0.1, 0.0, 0.2), &player_box());
        assert!(!world.check_collision(outcome.position));
        assert_eq!(outcome.position, Point3::new(4.55, 0.0, 4.7));
        assert_eq!(outcome.blocked, [true, false, false]);
    }

    #[test]
    fn surface_height_is_one_above_the_top_voxel() {
        let mut world = flat_world(5);
        assert_eq!(world.find_surface_height(3, 3), 5);
        world.set_voxel(Point3::new(3, 11, 3), BlockType::WOOD.id());
        assert_eq!(world.find_surface_height(3, 3), 12);
    }

    #[test]
    fn empty_column_uses_half_a_chunk() {
        let world = flat_world(0);
        assert_eq!(world.find_surface_height(3, 3), 4);
        assert_eq!(world.find_surface_height(-40, 900), 4);
    }
}
