//! # Player Physics
//!
//! Vertical integration for a non-creative player.
//!
//! Only vertical velocity is integrated. While airborne, gravity is scaled by how the
//! player is moving so a jump eases into its apex and then accelerates downward:
//!
//! | vertical velocity   | gravity multiplier |
//! |---------------------|--------------------|
//! | `> 0.015` (rising)  | 0.7                |
//! | `> 0` (near apex)   | 0.85               |
//! | `<= 0` (falling)    | 1.0                |
//!
//! Falling speed is capped at the terminal velocity.
//!
//! A vertical move that would end inside a solid voxel is refused. If the player was
//! moving down it lands: the feet snap onto the top of the voxel below and the jump
//! is re-armed. Either way vertical velocity drops to zero.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{collision::SlideOutcome, world::World};

use super::{MotionState, Player};

const RISING_FAST_VELOCITY: f32 = 0.015;
const RISING_FAST_MULTIPLIER: f32 = 0.7;
const RISING_SLOW_MULTIPLIER: f32 = 0.85;

/// Vertical velocity below which a failed ground check makes the player airborne.
const GROUND_CHECK_TOLERANCE: f32 = 0.001;

impl Player {
    /// Applies one frame of gravity and vertical movement.
    ///
    /// Does nothing in creative mode. Feet below the configured fall floor are
    /// teleported back to the surface of their column first.
    pub fn apply_physics(&mut self, world: &World, dt_ms: f32) {
        if self.creative_mode {
            return;
        }

        if self.feet_position.y < self.settings.fall_floor {
            log::info!(
                "player fell below y={} at {:?}, returning to the surface",
                self.settings.fall_floor,
                self.feet_position
            );
            world.spawn_player_on_surface(self);
            return;
        }

        if self.motion_state == MotionState::Airborne {
            let multiplier = if self.velocity.y > RISING_FAST_VELOCITY {
                RISING_FAST_MULTIPLIER
            } else if self.velocity.y > 0.0 {
                RISING_SLOW_MULTIPLIER
            } else {
                1.0
            };
            self.velocity.y -= self.settings.gravity * multiplier * dt_ms;
            self.velocity.y = self.velocity.y.max(-self.settings.terminal_velocity);
        }

        if self.velocity.y != 0.0 {
            self.move_vertically(world, self.velocity.y * dt_ms);
        }

        if !world.is_on_ground_for(self.feet_position, &self.collision_box)
            && self.velocity.y <= GROUND_CHECK_TOLERANCE
        {
            self.motion_state = MotionState::Airborne;
        }
    }

    /// Starts a jump if the player is standing and a jump is available.
    ///
    /// # Returns
    /// Whether the jump started.
    pub fn jump(&mut self) -> bool {
        if self.motion_state != MotionState::Grounded || !self.can_jump {
            return false;
        }
        self.velocity.y = self.settings.jump_strength;
        self.motion_state = MotionState::Airborne;
        self.can_jump = false;

        self.jump_start_y = Some(self.feet_position.y);
        self.max_jump_height = 0.0;
        // Nudge off the floor voxel.
        self.feet_position.y += self.settings.jump_nudge;
        self.sync_eye();
        true
    }

    /// Moves the feet horizontally by `displacement`, sliding along walls.
    ///
    /// The vertical component of `displacement` is ignored.
    pub fn move_horizontally(&mut self, world: &World, displacement: Vector3<f32>) -> SlideOutcome {
        let displacement = Vector3::new(displacement.x, 0.0, displacement.z);
        let outcome = world.slide(self.feet_position, displacement, &self.collision_box);
        self.feet_position = outcome.position;
        self.sync_eye();
        outcome
    }

    fn move_vertically(&mut self, world: &World, dy: f32) {
        let target = Point3::new(self.feet_position.x, self.feet_position.y + dy, self.feet_position.z);

        if !world.check_collision_for(target, &self.collision_box) {
            self.feet_position = target;
            self.sync_eye();
            self.motion_state = MotionState::Airborne;
            if let Some(start_y) = self.jump_start_y {
                self.max_jump_height = self.max_jump_height.max(self.feet_position.y - start_y);
            }
            return;
        }

        if dy < 0.0 {
            self.land(world, target.y);
        } else {
            log::trace!("player bumped a ceiling at {:?}", self.feet_position);
        }
        self.velocity.y = 0.0;
    }

    /// Stands the player on the floor a downward move into `blocked_y` ran into.
    fn land(&mut self, world: &World, blocked_y: f32) {
        let mut snapped = Point3::new(self.feet_position.x, blocked_y.floor() + 1.0, self.feet_position.z);
        while snapped.y <= self.feet_position.y {
            if !world.check_collision_for(snapped, &self.collision_box) {
                self.feet_position = snapped;
                self.sync_eye();
                break;
            }
            snapped.y += 1.0;
        }

        if self.jump_start_y.take().is_some() {
            log::debug!("landed, jump peaked {:.3} above its start", self.max_jump_height);
        }
        self.motion_state = MotionState::Grounded;
        self.can_jump = true;
    }
}
