//! # Camera Implementation
//!
//! A first-person camera: a position plus a right-handed orthonormal basis derived
//! from yaw and pitch.
//!
//! ## Basis
//!
//! ```text
//! forward = normalize(cos(yaw) cos(pitch), sin(pitch), sin(yaw) cos(pitch))
//! right   = normalize(forward x world_up)
//! up      = normalize(right x forward)
//! ```
//!
//! `up` is re-derived from `right` and `forward` rather than fixed to the world's Y axis,
//! so the basis stays orthonormal at any pitch. Pitch is clamped strictly below 90
//! degrees, which keeps `forward` away from `world_up` and `right` well defined.
//!
//! The basis is cached. Call [`Camera::update_vectors`] after changing `yaw` or `pitch`
//! and before any movement that depends on the basis.

use cgmath::{Angle, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::engine_state::voxels::{collision::SlideOutcome, world::World};

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around the camera's right axis) in radians
    pub pitch: Rad<f32>,
    /// Largest absolute pitch
    pitch_max: Rad<f32>,
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl Camera {
    /// Creates a camera with its basis already computed.
    ///
    /// # Arguments
    /// * `position` - Initial position in world space
    /// * `yaw` - Initial yaw. `-90` degrees looks along negative Z.
    /// * `pitch` - Initial pitch, clamped to `pitch_max`
    /// * `pitch_max` - Largest absolute pitch
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>, M: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
        pitch_max: M,
    ) -> Self {
        let pitch_max = pitch_max.into();
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: Rad(0.0),
            pitch_max,
            forward: -Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
        };
        camera.rotate_pitch(pitch.into());
        camera.update_vectors();
        camera
    }

    /// Recomputes `forward`, `right` and `up` from `yaw` and `pitch`.
    pub fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();

        self.forward = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.forward.cross(Vector3::unit_y()).normalize();
        self.up = self.right.cross(self.forward).normalize();
    }

    /// Adds `delta` to the yaw.
    pub fn rotate_yaw(&mut self, delta: Rad<f32>) {
        self.yaw += delta;
    }

    /// Adds `delta` to the pitch, clamped to `±pitch_max`.
    pub fn rotate_pitch(&mut self, delta: Rad<f32>) {
        let pitch = self.pitch + delta;
        self.pitch = Rad(pitch.0.clamp(-self.pitch_max.0, self.pitch_max.0));
    }

    /// The largest absolute pitch.
    pub fn pitch_max(&self) -> Rad<f32> {
        self.pitch_max
    }

    /// The normalized viewing direction.
    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    /// The normalized right vector, always horizontal.
    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    /// The normalized up vector of the view. Tilts with pitch.
    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward, self.up)
    }

    /// Moves `velocity` units along `forward`.
    pub fn move_forward(&mut self, velocity: f32) {
        self.position += self.forward * velocity;
    }

    /// Moves `velocity` units against `forward`.
    pub fn move_back(&mut self, velocity: f32) {
        self.position -= self.forward * velocity;
    }

    /// Moves `velocity` units against `right`.
    pub fn move_left(&mut self, velocity: f32) {
        self.position -= self.right * velocity;
    }

    /// Moves `velocity` units along `right`.
    pub fn move_right(&mut self, velocity: f32) {
        self.position += self.right * velocity;
    }

    /// Moves `velocity` units along `up`.
    pub fn move_up(&mut self, velocity: f32) {
        self.position += self.up * velocity;
    }

    /// Moves `velocity` units against `up`.
    pub fn move_down(&mut self, velocity: f32) {
        self.position -= self.up * velocity;
    }

    /// Moves `velocity` along `direction`, sliding along solid voxels.
    ///
    /// The camera position is tested with the world's player-sized box.
    pub fn move_with_collision(
        &mut self,
        direction: Vector3<f32>,
        velocity: f32,
        world: &World,
    ) -> SlideOutcome {
        let outcome = world.slide(self.position, direction * velocity, world.collision_box());
        self.position = outcome.position;
        outcome
    }

    /// [`Camera::move_forward`] with sliding collision.
    pub fn move_forward_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(self.forward, velocity, world)
    }

    /// [`Camera::move_back`] with sliding collision.
    pub fn move_back_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(-self.forward, velocity, world)
    }

    /// [`Camera::move_left`] with sliding collision.
    pub fn move_left_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(-self.right, velocity, world)
    }

    /// [`Camera::move_right`] with sliding collision.
    pub fn move_right_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(self.right, velocity, world)
    }

    /// [`Camera::move_up`] with sliding collision.
    pub fn move_up_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(self.up, velocity, world)
    }

    /// [`Camera::move_down`] with sliding collision.
    pub fn move_down_with_collision(&mut self, velocity: f32, world: &World) -> SlideOutcome {
        self.move_with_collision(-self.up, velocity, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::{EngineConfig, WorldConfig};
    use crate::engine_state::voxels::{block::block_type::BlockType, terrain::FlatTerrain};
    use cgmath::Deg;

    const EPS: f32 = 1e-5;

    fn camera(yaw: f32, pitch: f32) -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(yaw), Deg(pitch), Deg(89.0))
    }

    fn assert_orthonormal_right_handed(camera: &Camera) {
        let (f, r, u) = (camera.forward(), camera.right(), camera.up());
        for v in [f, r, u] {
            assert!((v.magnitude() - 1.0).abs() < EPS, "{v:?} is not unit length");
        }
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
        // right x up = -forward for a right-handed (right, up, back) frame
        assert!((r.cross(u) + f).magnitude() < EPS);
    }

    #[test]
    fn default_yaw_looks_down_negative_z() {
        let camera = camera(-90.0, 0.0);
        assert!((camera.forward() - Vector3::new(0.0, 0.0, -1.0)).magnitude() < EPS);
        assert!((camera.right() - Vector3::new(1.0, 0.0, 0.0)).magnitude() < EPS);
        assert!((camera.up() - Vector3::new(0.0, 1.0, 0.0)).magnitude() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal_under_rotation() {
        let mut camera = camera(-90.0, 0.0);
        for _ in 0..40 {
            camera.rotate_yaw(Rad(0.37));
            camera.rotate_pitch(Rad(0.21));
            camera.update_vectors();
            assert_orthonormal_right_handed(&camera);
        }
        for _ in 0..40 {
            camera.rotate_pitch(Rad(-0.3));
            camera.update_vectors();
            assert_orthonormal_right_handed(&camera);
        }
    }

    #[test]
    fn up_tilts_with_pitch() {
        let camera = camera(-90.0, 45.0);
        assert!(camera.up().y < 1.0 - 0.1);
        assert!(camera.up().z > 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera(0.0, 0.0);
        camera.rotate_pitch(Rad(10.0));
        assert_eq!(camera.pitch, camera.pitch_max());
        camera.rotate_pitch(Rad(-30.0));
        assert_eq!(camera.pitch, -camera.pitch_max());

        let steep = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(120.0), Deg(89.0));
        assert_eq!(steep.pitch, Rad::from(Deg(89.0)));
    }

    #[test]
    fn movement_follows_the_basis() {
        let mut camera = camera(-90.0, 0.0);
        camera.move_forward(2.0);
        camera.move_right(1.0);
        camera.move_up(0.5);
        assert!((camera.position - Point3::new(1.0, 0.5, -2.0)).magnitude() < EPS);
        camera.move_back(2.0);
        camera.move_left(1.0);
        camera.move_down(0.5);
        assert!((camera.position - Point3::new(0.0, 0.0, 0.0)).magnitude() < EPS);
    }

    #[test]
    fn collision_movement_slides_along_the_floor() {
        let config = WorldConfig {
            chunk_size: 8,
            world_width: 1,
            world_height: 1,
            world_depth: 1,
            ..WorldConfig::default()
        };
        let world = World::with_generator(
            &config,
            EngineConfig::default().player.collision_box(),
            &FlatTerrain {
                height: 2,
                material: BlockType::STONE,
            },
        );
        let mut camera = Camera::new(Point3::new(4.0, 2.0, 4.0), Deg(-90.0), Deg(-45.0), Deg(89.0));
        let outcome = camera.move_forward_with_collision(1.0, &world);
        assert_eq!(outcome.blocked, [false, true, false]);
        assert_eq!(camera.position.y, 2.0);
        assert!(camera.position.z < 4.0);
    }
}
