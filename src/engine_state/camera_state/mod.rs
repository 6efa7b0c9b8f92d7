//! # Camera State Management
//!
//! This module holds the first-person [`Camera`]: the viewpoint position, its
//! yaw/pitch orientation and the derived forward/right/up basis. The player owns one
//! camera and keeps its position at eye height above the feet.
//!
//! A renderer reads the camera through [`Camera::calc_matrix`]; projection and GPU
//! uniforms are outside this crate.

pub mod camera;

pub use camera::Camera;
