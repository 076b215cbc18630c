/// First-person camera driver
use std::f32::consts::FRAC_PI_2;

use nalgebra::Vector3;
use sr3d_core::math::{clamp, length_dir_x, length_dir_y, length_dir_z};
use sr3d_core::{Camera, Positioned, Scene, Transform};

pub const DEFAULT_MOVE_SPEED: f32 = 0.05;
/// Radians turned per frame while a turn key is held.
pub const TURN_SPEED: f32 = 0.015;
pub const PITCH_LIMIT: f32 = 1.5;

/// Movement requested for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub rise: bool,
    pub sink: bool,
}

/// The viewer. Owns the active camera and drags it along every update.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vector3<f32>,
    pub move_speed: f32,
    pub camera: Camera,
}

impl Player {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            move_speed: DEFAULT_MOVE_SPEED,
            camera: Camera::new(position),
        }
    }

    pub fn apply_input(&mut self, input: &PlayerInput) {
        let speed = self.move_speed;
        let yaw = self.camera.rotation.x;
        let pitch = self.camera.rotation.y;

        // Each axis step is clamped into [0, speed], so walking only ever
        // moves toward +x, +y and +z.
        let step = Vector3::new(
            clamp(length_dir_x(speed, yaw), 0.0, speed),
            clamp(length_dir_y(speed, pitch), 0.0, speed),
            clamp(length_dir_z(speed, yaw), 0.0, speed),
        );
        if input.forward {
            Transform::offset_by(self, step.x, step.y, step.z);
        }
        if input.back {
            Transform::offset_by(self, -step.x, -step.y, -step.z);
        }

        if input.strafe_left {
            let dx = length_dir_x(speed, yaw + FRAC_PI_2);
            let dz = length_dir_z(speed, yaw + FRAC_PI_2);
            Transform::offset_by(self, dx, 0.0, dz);
        }
        if input.strafe_right {
            let dx = length_dir_x(speed, yaw - FRAC_PI_2);
            let dz = length_dir_z(speed, yaw - FRAC_PI_2);
            Transform::offset_by(self, dx, 0.0, dz);
        }

        if input.turn_left {
            self.camera.rotate(TURN_SPEED, 0.0, 0.0);
        }
        if input.turn_right {
            self.camera.rotate(-TURN_SPEED, 0.0, 0.0);
        }
        if input.look_up {
            self.camera.rotate(0.0, TURN_SPEED, 0.0);
        }
        if input.look_down {
            self.camera.rotate(0.0, -TURN_SPEED, 0.0);
        }

        // Screen y grows downward, so rising is -y.
        if input.rise {
            Transform::offset_by(self, 0.0, -speed, 0.0);
        }
        if input.sink {
            Transform::offset_by(self, 0.0, speed, 0.0);
        }
    }

    /// Move the camera to the player, limit pitch, then follow any target.
    pub fn update(&mut self, scene: &Scene) {
        let p = self.position;
        Transform::translate_to(&mut self.camera, p.x, p.y, p.z);
        self.camera.rotation.y = clamp(self.camera.rotation.y, -PITCH_LIMIT, PITCH_LIMIT);
        self.camera.update(scene);
    }
}

impl Positioned for Player {
    fn position_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.position
    }
}
