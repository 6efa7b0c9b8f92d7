#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Explorer
//!
//! The simulation core of a first-person voxel game: a chunked block world, box
//! collision against it, and a player that walks, jumps, falls and edits voxels.
//!
//! ## Key Modules
//!
//! * `application_state` - Feeds window and device input to the engine, frame by frame
//! * `engine_state` - The world, the player, configuration and voxel editing
//!
//! ## Architecture
//!
//! The world is a fixed grid of chunks stored in a single voxel arena. Collision
//! queries sweep the voxels a body's box covers. The player integrates gravity on
//! the vertical axis only and slides along walls axis by axis. Rendering, windows and
//! textures are left to the embedding application, which reads chunk contents and
//! the camera from the engine.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_explorer::run();
//! }
//! ```
//!
//! Embedding the engine directly:
//!
//! ```no_run
//! use voxel_explorer::engine_state::{config::EngineConfig, EngineState};
//!
//! let mut engine = EngineState::new(EngineConfig::default())?;
//! engine.player_actions.move_forward = true;
//! engine.process_input(web_time::Duration::from_millis(16));
//! println!("{}", engine.status_line());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Context;
use log::info;
use web_time::Duration;
use winit::{event::MouseButton, keyboard::KeyCode};

use application_state::ApplicationState;
use engine_state::{config::EngineConfig, EngineState};

pub mod application_state;
pub mod engine_state;

/// Simulated frame time of the scripted session.
const SCRIPT_FRAME: Duration = Duration::from_millis(16);

/// Initializes logging, builds the engine and runs a short scripted session.
///
/// The first command-line argument, if present, is a JSON config file. Errors are
/// logged and end the process with a non-zero exit code.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = try_run(std::env::args().nth(1)) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn try_run(config_path: Option<String>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };

    let engine_state = EngineState::new(config).context("failed to build the engine")?;
    let mut app = ApplicationState::new(engine_state);
    info!("{}", app.engine_state.status_line());

    run_script(&mut app);
    Ok(())
}

/// One step of the scripted session: which inputs are down, and for how many frames.
struct ScriptStep {
    name: &'static str,
    keys: &'static [KeyCode],
    buttons: &'static [MouseButton],
    mouse: Option<(f64, f64)>,
    frames: usize,
}

#[rustfmt::skip]
const SCRIPT: &[ScriptStep] = &[
    ScriptStep { name: "settle", keys: &[], buttons: &[], mouse: None, frames: 30 },
    ScriptStep { name: "walk", keys: &[KeyCode::KeyW], buttons: &[], mouse: None, frames: 60 },
    ScriptStep { name: "sprint jump", keys: &[KeyCode::KeyW, KeyCode::ControlLeft, KeyCode::Space], buttons: &[], mouse: None, frames: 40 },
    ScriptStep { name: "land", keys: &[], buttons: &[], mouse: None, frames: 60 },
    ScriptStep { name: "look down", keys: &[], buttons: &[], mouse: Some((0.0, 400.0)), frames: 1 },
    ScriptStep { name: "dig", keys: &[], buttons: &[MouseButton::Left], mouse: None, frames: 1 },
    ScriptStep { name: "fall in", keys: &[], buttons: &[], mouse: None, frames: 60 },
    ScriptStep { name: "creative", keys: &[KeyCode::KeyF], buttons: &[], mouse: None, frames: 1 },
    ScriptStep { name: "fly up", keys: &[KeyCode::Space], buttons: &[], mouse: None, frames: 30 },
    ScriptStep { name: "survival", keys: &[KeyCode::KeyF], buttons: &[], mouse: None, frames: 1 },
    ScriptStep { name: "drop", keys: &[], buttons: &[], mouse: None, frames: 120 },
    ScriptStep { name: "respawn", keys: &[KeyCode::KeyR], buttons: &[], mouse: None, frames: 1 },
];

fn run_script(app: &mut ApplicationState) {
    for step in SCRIPT {
        for frame in 0..step.frames {
            for &key in step.keys {
                app.input_manager.set_key(key, true);
            }
            for &button in step.buttons {
                app.input_manager.set_mouse_button(button, true);
            }
            if let Some(delta) = step.mouse {
                app.input_manager.intake_mouse_motion(delta);
            }
            app.step(SCRIPT_FRAME);
            if frame % 30 == 29 {
                log::debug!("{}: {}", step.name, app.engine_state.status_line());
            }
        }

        for &key in step.keys {
            app.input_manager.set_key(key, false);
        }
        for &button in step.buttons {
            app.input_manager.set_mouse_button(button, false);
        }
        app.step(SCRIPT_FRAME);
        info!("{}: {}", step.name, app.engine_state.status_line());
    }

    let dirty = app.engine_state.world.take_dirty_chunks();
    info!("session finished, {} chunks need remeshing", dirty.len());
}
