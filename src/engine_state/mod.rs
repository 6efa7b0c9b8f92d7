//! # Engine State Module
//!
//! The core engine module that owns the simulation: the world, the player and the
//! voxel handler, driven one frame at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `config` - Tunable constants, loaded from JSON or defaulted
//! * `camera_state` - The first-person camera and its basis
//! * `player` - Gravity, jumping and collision-aware movement
//! * `voxels` - Voxel data, chunks, collision and world generation
//!
//! ## Frame
//!
//! Each call to [`EngineState::process_input`]:
//! 1. Applies pending voxel edits against last frame's crosshair target
//! 2. Updates the player (physics, keyboard, mouse, camera basis)
//! 3. Recasts the crosshair ray from the new eye position

use web_time::Duration;
use winit::{event::MouseButton, keyboard::KeyCode};

use camera_state::Camera;
use config::EngineConfig;
use player::Player;
use voxels::{voxel_handler::VoxelHandler, world::World};

use crate::application_state::input_state::ProcessedInputState;

pub mod camera_state;
pub mod config;
pub mod player;
pub mod voxels;

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```
/// use voxel_explorer::engine_state::{config::EngineConfig, EngineState};
///
/// let mut config = EngineConfig::default();
/// config.world.chunk_size = 8;
/// config.world.world_width = 2;
/// config.world.world_depth = 2;
///
/// let mut engine = EngineState::new(config).unwrap();
/// engine.process_input(web_time::Duration::from_millis(16));
/// assert!(engine.player.is_grounded());
/// ```
pub struct EngineState {
    /// Configuration the engine was built from
    config: EngineConfig,
    /// The voxel world containing all chunk data
    pub world: World,
    /// The player and its camera
    pub player: Player,
    /// Crosshair target and voxel editing
    pub voxel_handler: VoxelHandler,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    /// Duration of the last processed frame
    last_frame: Duration,
}

impl EngineState {
    /// Validates `config`, builds the world it describes and places the player on it.
    ///
    /// # Errors
    /// Returns the validation error if `config` is rejected by [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let world = World::new(&config);
        Ok(Self::with_world(config, world))
    }

    /// Places a new player on an existing world.
    ///
    /// The player starts at the configured spawn column, standing on its surface.
    /// `config` is expected to have passed [`EngineConfig::validate`].
    pub fn with_world(config: EngineConfig, world: World) -> Self {
        let mut player = Player::new(config.spawn_position(), &config.player);
        world.spawn_player_on_surface(&mut player);

        let mut voxel_handler = VoxelHandler::new(&config.interaction);
        voxel_handler.update(&world, player.eye_position(), player.forward());

        Self {
            config,
            world,
            player,
            voxel_handler,
            player_actions: PlayerAction::default(),
            last_frame: Duration::ZERO,
        }
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The player's camera, for rendering.
    pub fn camera(&self) -> &Camera {
        self.player.camera()
    }

    /// Runs one frame of simulation with the current player actions.
    ///
    /// # Arguments
    ///
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: Duration) {
        if self.player_actions.switch_voxel_mode {
            self.voxel_handler.switch_mode();
        }
        if self.player_actions.set_voxel {
            self.voxel_handler.set_voxel(&mut self.world);
        }

        self.player
            .update(&self.world, &self.player_actions, wait_duration);
        self.voxel_handler.update(
            &self.world,
            self.player.eye_position(),
            self.player.forward(),
        );

        self.last_frame = wait_duration;
        log::trace!("{}", self.status_line());

        // Discrete actions fire once per input snapshot.
        self.player_actions.clear_triggers();
    }

    /// Sets the input commands for the engine state.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_actions = Self::translate_processed_input(&input);
    }

    /// Translates the processed input state into player actions.
    ///
    /// Movement keys count while held; mode toggles, respawn and mouse clicks fire
    /// only on the frame they are pressed.
    pub fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
        PlayerAction {
            move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
            move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
            move_left: input.get_key_state(KeyCode::KeyA).is_active(),
            move_right: input.get_key_state(KeyCode::KeyD).is_active(),
            jump: input.get_key_state(KeyCode::Space).is_active(),
            descend: input.get_key_state(KeyCode::ShiftLeft).is_active(),
            sprint: input.get_key_state(KeyCode::ControlLeft).is_active(),
            debug_descend: input.get_key_state(KeyCode::KeyQ).is_active(),
            debug_ascend: input.get_key_state(KeyCode::KeyE).is_active(),
            rotate_view: input.get_mouse_delta(),
            toggle_creative: input.get_key_state(KeyCode::KeyF).is_just_pressed(),
            respawn: input.get_key_state(KeyCode::KeyR).is_just_pressed(),
            set_voxel: input
                .get_mouse_button_state(MouseButton::Left)
                .is_just_pressed(),
            switch_voxel_mode: input
                .get_mouse_button_state(MouseButton::Right)
                .is_just_pressed(),
        }
    }

    /// One-line summary of the player state, in the style of a window caption.
    pub fn status_line(&self) -> String {
        let fps = if self.last_frame.is_zero() {
            0.0
        } else {
            1.0 / self.last_frame.as_secs_f32()
        };
        let mode = if self.player.is_creative() {
            "Creative"
        } else {
            "Survival"
        };
        let sprint = if self.player_actions.sprint {
            " [Sprint]"
        } else {
            ""
        };
        let contact = if self.player.is_grounded() {
            "Ground"
        } else {
            "Air"
        };
        format!(
            "FPS: {fps:.0} | {mode}{sprint} | {contact} | Y: {:.1} | Vel Y: {:.3} | Max Jump: {:.2}",
            self.player.feet_position().y,
            self.player.velocity().y,
            self.player.max_jump_height()
        )
    }
}

/// Represents player actions derived from input.
///
/// Movement fields stay set while their key is held. `toggle_creative`, `respawn`,
/// `set_voxel` and `switch_voxel_mode` are triggers, cleared after each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAction {
    /// Walk along the view direction
    pub move_forward: bool,
    /// Walk against the view direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Jump, or fly up in creative mode
    pub jump: bool,
    /// Fly down in creative mode
    pub descend: bool,
    /// Use sprint speed, or the creative sprint multiplier
    pub sprint: bool,
    /// Move the feet up at walk speed, ignoring collision
    pub debug_ascend: bool,
    /// Move the feet down at walk speed, ignoring collision
    pub debug_descend: bool,

    /// Mouse motion this frame
    pub rotate_view: Option<(f64, f64)>,

    /// Switch between creative and survival
    pub toggle_creative: bool,
    /// Return to the surface of the current column
    pub respawn: bool,
    /// Apply the voxel edit mode to the crosshair target
    pub set_voxel: bool,
    /// Flip between adding and removing voxels
    pub switch_voxel_mode: bool,
}

impl PlayerAction {
    /// Clears the one-shot actions and the mouse motion.
    pub fn clear_triggers(&mut self) {
        self.rotate_view = None;
        self.toggle_creative = false;
        self.respawn = false;
        self.set_voxel = false;
        self.switch_voxel_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_state::input_manager::InputManager;
    use crate::engine_state::voxels::{
        block::block_type::BlockType, terrain::TerrainKind, voxel_handler::EditMode,
    };
    use cgmath::Point3;

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.world.chunk_size = 8;
        config.world.world_width = 2;
        config.world.world_height = 2;
        config.world.world_depth = 2;
        config.world.terrain = TerrainKind::Flat {
            height: 4,
            material: BlockType::GRASS.id(),
        };
        config.player.spawn = Some([8.5, 8.0, 8.5]);
        config
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut config = small_config();
        config.world.chunk_size = 0;
        let err = EngineState::new(config).err().unwrap();
        assert!(err.to_string().contains("chunk_size"));

        let mut config = small_config();
        config.player.collision_size = -1.0;
        assert!(EngineState::new(config).is_err());
    }

    #[test]
    fn player_starts_on_the_surface() {
        let engine = EngineState::new(small_config()).unwrap();
        assert_eq!(engine.player.feet_position(), Point3::new(8.5, 4.0, 8.5));
        assert!(engine.player.is_grounded());
    }

    #[test]
    fn key_presses_become_actions() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyW, true);
        input.set_key(KeyCode::KeyF, true);
        input.set_mouse_button(MouseButton::Right, true);
        input.intake_mouse_motion((3.0, -2.0));

        let first = EngineState::translate_processed_input(&input.get_and_reset_processed_input());
        assert!(first.move_forward);
        assert!(first.toggle_creative);
        assert!(first.switch_voxel_mode);
        assert_eq!(first.rotate_view, Some((3.0, -2.0)));

        let second = EngineState::translate_processed_input(&input.get_and_reset_processed_input());
        assert!(second.move_forward);
        assert!(!second.toggle_creative);
        assert!(!second.switch_voxel_mode);
        assert_eq!(second.rotate_view, None);
    }

    #[test]
    fn triggers_fire_once() {
        let mut engine = EngineState::new(small_config()).unwrap();
        engine.player_actions.toggle_creative = true;
        engine.process_input(Duration::from_millis(16));
        assert!(engine.player.is_creative());
        engine.process_input(Duration::from_millis(16));
        assert!(engine.player.is_creative());
    }

    #[test]
    fn looking_down_and_clicking_removes_the_ground() {
        let mut engine = EngineState::new(small_config()).unwrap();
        engine.player_actions.rotate_view = Some((0.0, 10_000.0));
        engine.process_input(Duration::from_millis(16));
        let target = engine.voxel_handler.hit().map(|hit| hit.voxel);
        assert_eq!(target, Some(Point3::new(8, 3, 8)));

        engine.player_actions.set_voxel = true;
        engine.process_input(Duration::from_millis(16));
        assert_eq!(engine.voxel_handler.mode(), EditMode::Remove);
        assert!(!engine.world.is_voxel_solid_at(Point3::new(8, 3, 8)));
    }

    #[test]
    fn status_line_reports_the_player() {
        let mut engine = EngineState::new(small_config()).unwrap();
        engine.process_input(Duration::from_millis(20));
        assert_eq!(
            engine.status_line(),
            "FPS: 50 | Survival | Ground | Y: 4.0 | Vel Y: 0.000 | Max Jump: 0.00"
        );
    }
}
