//! # Player Module
//!
//! The player is a physics body that carries a [`Camera`] as its view. The camera
//! position is the eye; the player additionally tracks its feet, which is what
//! collision boxes are anchored at. The two stay in lock-step:
//!
//! ```text
//! eye.y = feet.y + eye_height    (eye.x = feet.x, eye.z = feet.z)
//! ```
//!
//! ## Frame update
//!
//! [`Player::update`] runs once per frame in a fixed order:
//! 1. Discrete actions (creative toggle, respawn)
//! 2. Physics: gravity, vertical movement, ground check (see [`physics`])
//! 3. Keyboard movement
//! 4. Mouse look
//! 5. Camera basis recompute
//!
//! Speeds are per millisecond; the frame duration is converted once at the top of
//! the update.

use cgmath::{Deg, InnerSpace, Point3, Rad, Vector3, Zero};
use web_time::Duration;

use super::{
    camera_state::Camera,
    config::PlayerConfig,
    voxels::{collision::CollisionBox, world::World},
    PlayerAction,
};

pub mod physics;

/// Whether the player is standing on something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Standing on solid ground; jumps are possible
    Grounded,
    /// Rising or falling under gravity
    Airborne,
}

/// A first-person player with gravity, jumping and collision.
#[derive(Debug, Clone)]
pub struct Player {
    /// The view; its position is the eye
    camera: Camera,
    feet_position: Point3<f32>,
    /// Only `y` is integrated by physics; horizontal motion is applied directly
    velocity: Vector3<f32>,
    motion_state: MotionState,
    /// Re-armed only by landing
    can_jump: bool,
    creative_mode: bool,
    /// Set while the jump key stays down so holding it does not queue jumps
    jump_key_held: bool,
    /// Feet height the current jump started from
    jump_start_y: Option<f32>,
    /// Highest rise above `jump_start_y` during the current jump
    max_jump_height: f32,
    settings: PlayerConfig,
    collision_box: CollisionBox,
}

impl Player {
    /// Creates a grounded player standing at `feet_position`.
    pub fn new(feet_position: Point3<f32>, settings: &PlayerConfig) -> Self {
        let eye = feet_position + Vector3::unit_y() * settings.eye_height;
        let camera = Camera::new(eye, Deg(settings.yaw_degrees), Deg(0.0), settings.pitch_max());
        log::debug!("player created at feet {feet_position:?}, eye {eye:?}");

        Self {
            camera,
            feet_position,
            velocity: Vector3::zero(),
            motion_state: MotionState::Grounded,
            can_jump: true,
            creative_mode: false,
            jump_key_held: false,
            jump_start_y: None,
            max_jump_height: 0.0,
            settings: settings.clone(),
            collision_box: settings.collision_box(),
        }
    }

    /// The view, positioned at the eye.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Position of the eye, `eye_height` above the feet.
    pub fn eye_position(&self) -> Point3<f32> {
        self.camera.position
    }

    /// Position of the feet, where the collision box is anchored.
    pub fn feet_position(&self) -> Point3<f32> {
        self.feet_position
    }

    /// Current velocity in voxels per millisecond. Only `y` is ever non-zero.
    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    /// Whether the player is grounded or airborne.
    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    /// Shorthand for `motion_state() == MotionState::Grounded`.
    pub fn is_grounded(&self) -> bool {
        self.motion_state == MotionState::Grounded
    }

    /// Whether a jump is armed. Landing re-arms it.
    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// Whether creative flight is on.
    pub fn is_creative(&self) -> bool {
        self.creative_mode
    }

    /// Highest rise of the current or most recent jump.
    pub fn max_jump_height(&self) -> f32 {
        self.max_jump_height
    }

    /// The box used for collision queries.
    pub fn collision_box(&self) -> &CollisionBox {
        &self.collision_box
    }

    /// Movement and physics settings.
    pub fn settings(&self) -> &PlayerConfig {
        &self.settings
    }

    /// The view direction.
    pub fn forward(&self) -> Vector3<f32> {
        self.camera.forward()
    }

    /// The right vector of the view.
    pub fn right(&self) -> Vector3<f32> {
        self.camera.right()
    }

    /// Current yaw.
    pub fn yaw(&self) -> Rad<f32> {
        self.camera.yaw
    }

    /// Current pitch.
    pub fn pitch(&self) -> Rad<f32> {
        self.camera.pitch
    }

    /// Moves the feet (and the eye with them) without touching any other state.
    pub fn set_feet_position(&mut self, feet_position: Point3<f32>) {
        self.feet_position = feet_position;
        self.sync_eye();
    }

    /// Enables or disables creative mode. Entering it stops any fall.
    pub fn set_creative_mode(&mut self, creative_mode: bool) {
        self.creative_mode = creative_mode;
        if creative_mode {
            self.velocity.y = 0.0;
        }
        log::info!(
            "creative mode {}",
            if creative_mode { "enabled" } else { "disabled" }
        );
    }

    /// Flips creative mode. See [`Player::set_creative_mode`].
    pub fn toggle_creative_mode(&mut self) {
        self.set_creative_mode(!self.creative_mode);
    }

    /// Places the feet at `feet_position` and stands the player there.
    pub(crate) fn settle_at(&mut self, feet_position: Point3<f32>) {
        self.set_feet_position(feet_position);
        self.velocity.y = 0.0;
        self.motion_state = MotionState::Grounded;
        self.can_jump = true;
    }

    /// Moves the eye to eye height above the feet.
    fn sync_eye(&mut self) {
        self.camera.position = self.feet_position + Vector3::unit_y() * self.settings.eye_height;
    }

    /// Runs one frame of player simulation.
    pub fn update(&mut self, world: &World, actions: &PlayerAction, dt: Duration) {
        let dt_ms = dt.as_secs_f32() * 1000.0;

        if actions.toggle_creative {
            self.toggle_creative_mode();
        }
        if actions.respawn {
            world.spawn_player_on_surface(self);
        }

        self.apply_physics(world, dt_ms);
        self.keyboard_control(world, actions, dt_ms);
        self.mouse_control(actions);
        self.camera.update_vectors();
    }

    /// Applies held movement keys for a frame of `dt_ms` milliseconds.
    ///
    /// Horizontal movement follows the horizontal projection of the view, so looking
    /// up or down does not slow walking. Diagonals are normalized.
    pub fn keyboard_control(&mut self, world: &World, actions: &PlayerAction, dt_ms: f32) {
        let settings = &self.settings;
        let speed = if self.creative_mode {
            let mut speed = settings.creative_speed * dt_ms;
            if actions.sprint {
                speed *= settings.creative_sprint_multiplier;
            }
            speed
        } else if actions.sprint {
            settings.sprint_speed * dt_ms
        } else {
            settings.walk_speed * dt_ms
        };
        let debug_speed = settings.walk_speed * dt_ms;

        let forward = self.camera.forward();
        let right = self.camera.right();
        let forward = Vector3::new(forward.x, 0.0, forward.z);
        let right = Vector3::new(right.x, 0.0, right.z);

        let mut direction = Vector3::zero();
        if actions.move_forward {
            direction += forward;
        }
        if actions.move_backward {
            direction -= forward;
        }
        if actions.move_right {
            direction += right;
        }
        if actions.move_left {
            direction -= right;
        }

        if direction.magnitude2() > 0.0 {
            let displacement = direction.normalize() * speed;
            if self.creative_mode {
                self.feet_position += displacement;
                self.sync_eye();
            } else {
                self.move_horizontally(world, displacement);
            }
        }

        if actions.jump {
            if self.creative_mode {
                self.feet_position.y += speed;
                self.sync_eye();
            } else if !self.jump_key_held && self.is_grounded() {
                self.jump();
            }
            self.jump_key_held = true;
        } else {
            self.jump_key_held = false;
        }

        if actions.descend && self.creative_mode {
            self.feet_position.y -= speed;
            self.sync_eye();
        }

        if actions.debug_descend {
            self.feet_position.y -= debug_speed;
            self.sync_eye();
        }
        if actions.debug_ascend {
            self.feet_position.y += debug_speed;
            self.sync_eye();
        }
    }

    /// Turns the view by this frame's mouse motion. Moving the mouse down looks down.
    pub fn mouse_control(&mut self, actions: &PlayerAction) {
        let Some((delta_x, delta_y)) = actions.rotate_view else {
            return;
        };
        let sensitivity = self.settings.mouse_sensitivity;
        if delta_x != 0.0 {
            self.camera.rotate_yaw(Rad(delta_x as f32 * sensitivity));
        }
        if delta_y != 0.0 {
            self.camera.rotate_pitch(Rad(-(delta_y as f32) * sensitivity));
        }
    }
}
