//! # Voxel Explorer Entry Point
//!
//! Runs a headless scripted session against the engine and logs the player state.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_explorer::run();
}
