//! # Application State Management
//!
//! This module sits between the windowing layer and the engine:
//! - Window and device events are fed into the input manager
//! - Each frame the input snapshot is handed to the engine with the measured frame time
//! - Close requests and Escape end the session
//!
//! Creating the window and presenting frames belong to the embedding application; it
//! forwards its `winit` events here and calls [`ApplicationState::frame`] once per frame.

pub mod input_manager;
pub mod input_state;

use input_manager::InputManager;
use web_time::{Duration, Instant};
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::engine_state::EngineState;

/// The running application: the engine plus the input plumbing that drives it.
pub struct ApplicationState {
    /// The core game engine state and logic
    pub engine_state: EngineState,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: Instant,

    /// Set once a close has been requested
    exit_requested: bool,
}

impl ApplicationState {
    /// Wraps `engine_state` with fresh input state. Frame timing starts now.
    pub fn new(engine_state: EngineState) -> Self {
        Self {
            engine_state,
            input_manager: InputManager::new(),
            last_wait_time: Instant::now(),
            exit_requested: false,
        }
    }

    /// Whether a close request or Escape has been seen.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Handles window-related events such as focus changes and input events.
    pub fn window_event(&mut self, event: &WindowEvent) {
        self.input_manager.intake_input(event);

        match event {
            WindowEvent::Focused(false) => {
                self.input_manager.release_all();
            }
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                log::info!("exit requested");
                self.exit_requested = true;
            }
            _ => (),
        }
    }

    /// Handles device-level input events such as mouse motion.
    pub fn device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input_manager.intake_mouse_motion(*delta);
        }
    }

    /// Steps the engine by the wall-clock time since the previous frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let wait_dt = now - self.last_wait_time;
        self.last_wait_time = now;
        self.step(wait_dt);
    }

    /// Steps the engine by a fixed `dt` with this frame's input.
    pub fn step(&mut self, dt: Duration) {
        let processed_input = self.input_manager.get_and_reset_processed_input();
        self.engine_state.set_input_commands(processed_input);
        self.engine_state.process_input(dt);
    }
}
