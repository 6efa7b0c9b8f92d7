//! # Voxel Handler Module
//!
//! Tracks the voxel under the crosshair and applies add/remove edits to the world.
//!
//! The target is found with a DDA walk: starting in the voxel that contains the eye,
//! the ray steps to whichever neighbouring voxel boundary it crosses first, one voxel
//! at a time, until it enters a solid voxel or has travelled `max_ray_distance`.
//! The axis of the last step tells which face the ray entered through.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::config::InteractionConfig;

use super::{
    block::{block_side::BlockSide, block_type::BlockType, is_solid, VoxelId, AIR},
    world::World,
};

/// What a voxel edit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Place `new_voxel_id` against the face the ray hit
    Add,
    /// Clear the voxel the ray hit
    Remove,
}

/// The first solid voxel along a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    /// Integer coordinates of the hit voxel
    pub voxel: Point3<i32>,
    /// Its voxel ID
    pub voxel_id: VoxelId,
    /// The face the ray entered through. `None` when the ray started inside the voxel.
    pub side: Option<BlockSide>,
}

impl RayHit {
    /// The empty voxel in front of the hit face, where an added voxel goes.
    pub fn adjacent(&self) -> Option<Point3<i32>> {
        self.side.map(|side| self.voxel + side.normal())
    }
}

/// Walks the voxels along a ray and returns the first solid one within `max_distance`.
pub fn cast_ray(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RayHit> {
    let finite = direction.x.is_finite() && direction.y.is_finite() && direction.z.is_finite();
    if !finite || direction.magnitude2() == 0.0 || !max_distance.is_finite() {
        return None;
    }
    let direction = direction.normalize();

    let mut voxel = Point3::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );
    let start_id = world.get_voxel_id_at(voxel);
    if is_solid(start_id) {
        return Some(RayHit {
            voxel,
            voxel_id: start_id,
            side: None,
        });
    }

    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];
    for axis in 0..3 {
        let d = direction[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_max[axis] = (voxel[axis] as f32 + 1.0 - origin[axis]) / d;
            t_delta[axis] = 1.0 / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_max[axis] = (voxel[axis] as f32 - origin[axis]) / d;
            t_delta[axis] = -1.0 / d;
        }
    }

    loop {
        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] {
                0
            } else {
                2
            }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };

        if t_max[axis] > max_distance {
            return None;
        }

        voxel[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        let voxel_id = world.get_voxel_id_at(voxel);
        if is_solid(voxel_id) {
            return Some(RayHit {
                voxel,
                voxel_id,
                side: BlockSide::entered_by_step(axis, step[axis]),
            });
        }
    }
}

/// The crosshair target and edit state of the player.
#[derive(Debug, Clone)]
pub struct VoxelHandler {
    max_ray_distance: f32,
    mode: EditMode,
    new_voxel_id: VoxelId,
    hit: Option<RayHit>,
}

impl VoxelHandler {
    /// Creates a handler in remove mode that places dirt in add mode.
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            max_ray_distance: config.max_ray_distance,
            mode: EditMode::Remove,
            new_voxel_id: BlockType::DIRT.id(),
            hit: None,
        }
    }

    /// Recasts the target ray from the eye.
    pub fn update(&mut self, world: &World, origin: Point3<f32>, direction: Vector3<f32>) {
        self.hit = cast_ray(world, origin, direction, self.max_ray_distance);
    }

    /// The voxel under the crosshair, if any is in reach.
    pub fn hit(&self) -> Option<&RayHit> {
        self.hit.as_ref()
    }

    /// The current edit mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The voxel ID placed in add mode.
    pub fn new_voxel_id(&self) -> VoxelId {
        self.new_voxel_id
    }

    /// Flips between add and remove.
    pub fn switch_mode(&mut self) {
        self.mode = match self.mode {
            EditMode::Add => EditMode::Remove,
            EditMode::Remove => EditMode::Add,
        };
        log::debug!("voxel edit mode: {:?}", self.mode);
    }

    /// Sets the voxel ID placed in add mode.
    pub fn set_new_voxel_id(&mut self, id: VoxelId) {
        self.new_voxel_id = id;
    }

    /// Applies the current mode to the current target.
    ///
    /// Remove clears the hit voxel. Add fills the voxel in front of the hit face if
    /// it is empty. The target is consumed either way; call [`VoxelHandler::update`]
    /// before the next edit.
    ///
    /// # Returns
    /// The coordinates of the voxel that changed, if any.
    pub fn set_voxel(&mut self, world: &mut World) -> Option<Point3<i32>> {
        let hit = self.hit.take()?;
        let (target, id) = match self.mode {
            EditMode::Remove => (hit.voxel, AIR),
            EditMode::Add => {
                let target = hit.adjacent()?;
                if world.is_voxel_solid_at(target) {
                    return None;
                }
                (target, self.new_voxel_id)
            }
        };
        if world.set_voxel(target, id) {
            log::debug!("{:?} voxel at {target:?}", self.mode);
            Some(target)
        } else {
            None
        }
    }
}
