/// Camera and projection utilities
use nalgebra::Vector3;
use tracing::debug;

use crate::geometry::{Model, ModelId};
use crate::math::{point_at, rotate2};
use crate::scene::Scene;
use crate::transform::{Positioned, RotationState};

/// Models at or beyond this distance from the viewer are not drawn.
pub const DEFAULT_RENDER_DISTANCE: f32 = 50.0;

/// A projected vertex, before centring on the screen.
///
/// `inv_depth > 0` means the vertex is in front of the view plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub inv_depth: f32,
}

impl ScreenPoint {
    /// Stand-in for vertices on or behind a degenerate view plane.
    pub const BEHIND: ScreenPoint = ScreenPoint {
        x: 0.0,
        y: 0.0,
        inv_depth: 0.0,
    };

    pub fn is_visible(&self) -> bool {
        self.inv_depth > 0.0
    }
}

/// Viewpoint for the render pass.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    pub render_distance: f32,
    target: Option<ModelId>,
}

impl Camera {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: RotationState::zero(),
            render_distance: DEFAULT_RENDER_DISTANCE,
            target: None,
        }
    }

    pub fn target(&self) -> Option<ModelId> {
        self.target
    }

    /// Point the camera at a model on every [`Camera::update`].
    pub fn set_target(&mut self, target: Option<ModelId>) {
        debug!(?target, "camera target changed");
        self.target = target;
    }

    /// Turn the camera. Pitch only changes while it is inside (-90, 90).
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.x += dx;
        self.rotation.z += dz;

        if -90.0 < self.rotation.y && self.rotation.y < 90.0 {
            self.rotation.y += dy;
        }
    }

    /// Re-aim at the current target, if any.
    ///
    /// A target that is no longer in `scene` is dropped. When the target
    /// sits level with the camera on z the rotation is left as is.
    pub fn update(&mut self, scene: &Scene) {
        let Some(id) = self.target else {
            return;
        };
        let Some(target) = scene.get(id) else {
            debug!(?id, "camera target left the scene");
            self.target = None;
            return;
        };

        let offset = point_at(&self.position, &target.position);
        if offset.z == 0.0 {
            return;
        }
        self.rotation.x = offset.x / -offset.z;
        self.rotation.y = offset.y / -offset.z;
    }

    /// Project every vertex of `model`, in vertex-buffer order.
    pub fn project_vertices(&self, model: &Model, screen_width: f32) -> Vec<ScreenPoint> {
        let half_width = screen_width / 2.0;
        let offset = self.position - model.position;

        model
            .vertices()
            .iter()
            .map(|vertex| {
                let v = vertex - offset;
                let (x, y) = rotate2(v.x, v.y, self.rotation.z);
                let (x, z) = rotate2(x, v.z, self.rotation.x);
                let (y, z) = rotate2(y, z, self.rotation.y);

                let inv_depth = half_width / z;
                let point = ScreenPoint {
                    x: x * inv_depth,
                    y: y * inv_depth,
                    inv_depth,
                };
                // Depths just past the view plane keep inv_depth finite but
                // can still overflow the scaled coordinates.
                if point.x.is_finite() && point.y.is_finite() && inv_depth.is_finite() {
                    point
                } else {
                    ScreenPoint::BEHIND
                }
            })
            .collect()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zeros())
    }
}

impl Positioned for Camera {
    fn position_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use crate::transform::Transform;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn model_at(z: f32, vertices: Vec<Vector3<f32>>) -> Model {
        let mut model = Model::new("points", vertices, vec![Face::new(0, 0, 0, 0, 0, 0)]).unwrap();
        Transform::translate_to(&mut model, 0.0, 0.0, z);
        model
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.render_distance, DEFAULT_RENDER_DISTANCE);
        assert_eq!(camera.target(), None);
        assert_eq!(camera.rotation, RotationState::zero());
    }

    #[test]
    fn test_project_straight_ahead() {
        let camera = Camera::default();
        let model = model_at(10.0, vec![Vector3::zeros(), Vector3::new(1.0, 2.0, 0.0)]);
        let points = camera.project_vertices(&model, 800.0);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], ScreenPoint { x: 0.0, y: 0.0, inv_depth: 40.0 });
        assert_eq!(points[1], ScreenPoint { x: 40.0, y: 80.0, inv_depth: 40.0 });
    }

    #[test]
    fn test_inv_depth_positive_in_front() {
        let camera = Camera::default();
        for z in [0.5, 1.0, 7.0, 49.0] {
            let model = model_at(z, vec![Vector3::zeros()]);
            let point = camera.project_vertices(&model, 640.0)[0];
            assert!(point.is_visible());
            assert!((point.inv_depth - 320.0 / z).abs() < EPS);
        }
    }

    #[test]
    fn test_behind_camera_is_invisible() {
        let camera = Camera::default();
        let model = model_at(-5.0, vec![Vector3::new(1.0, 1.0, 0.0)]);
        let point = camera.project_vertices(&model, 800.0)[0];
        assert!(point.inv_depth < 0.0);
        assert!(!point.is_visible());
    }

    #[test]
    fn test_zero_depth_is_guarded() {
        let camera = Camera::default();
        let model = model_at(0.0, vec![Vector3::new(3.0, 0.0, 0.0)]);
        let point = camera.project_vertices(&model, 800.0)[0];
        assert_eq!(point, ScreenPoint::BEHIND);

        // Zero-width screens produce NaN without the guard.
        let point = camera.project_vertices(&model, 0.0)[0];
        assert_eq!(point, ScreenPoint::BEHIND);
    }

    #[test]
    fn test_overflowing_coordinates_are_guarded() {
        let camera = Camera::default();
        let vertices = vec![
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(2.0, 1.0, 0.0),
        ];
        let model = model_at(2e-36, vertices);
        let points = camera.project_vertices(&model, 800.0);

        assert!(points
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.inv_depth.is_finite()));
        assert!(points.iter().all(|p| *p == ScreenPoint::BEHIND));
    }

    #[test]
    fn test_camera_position_is_relative() {
        let camera = Camera::new(Vector3::new(0.0, 0.0, 5.0));
        let model = model_at(10.0, vec![Vector3::zeros()]);
        let point = camera.project_vertices(&model, 800.0)[0];
        assert!((point.inv_depth - 80.0).abs() < EPS);
    }

    #[test]
    fn test_camera_roll_rotates_screen_xy() {
        let mut camera = Camera::default();
        camera.rotation.z = FRAC_PI_2;
        let model = model_at(10.0, vec![Vector3::new(1.0, 0.0, 0.0)]);
        let point = camera.project_vertices(&model, 800.0)[0];
        assert!(point.x.abs() < EPS);
        assert!((point.y + 40.0).abs() < EPS);
    }

    #[test]
    fn test_camera_pitch_can_push_point_onto_view_plane() {
        let mut camera = Camera::default();
        camera.rotation.y = FRAC_PI_2;
        let model = model_at(10.0, vec![Vector3::zeros()]);
        let point = camera.project_vertices(&model, 800.0)[0];
        assert!(!point.is_visible());
    }

    #[test]
    fn test_projection_preserves_vertex_order() {
        let camera = Camera::default();
        let vertices: Vec<_> = (1..=5).map(|i| Vector3::new(i as f32, 0.0, 0.0)).collect();
        let model = model_at(4.0, vertices);
        let points = camera.project_vertices(&model, 8.0);
        for (i, p) in points.iter().enumerate() {
            assert!((p.x - (i + 1) as f32).abs() < EPS);
        }
    }

    #[test]
    fn test_rotate_pitch_lock() {
        let mut camera = Camera::default();
        camera.rotate(0.1, 0.2, 0.3);
        assert_eq!(camera.rotation, RotationState::new(0.1, 0.2, 0.3));

        camera.rotation.y = 95.0;
        camera.rotate(0.0, 1.0, 0.0);
        assert_eq!(camera.rotation.y, 95.0);
    }

    #[test]
    fn test_update_aims_at_target() {
        let mut scene = Scene::new();
        let mut cube = Model::cube(1.0);
        Transform::translate_to(&mut cube, 2.0, 1.0, -4.0);
        let id = scene.insert(cube);

        let mut camera = Camera::default();
        camera.set_target(Some(id));
        camera.update(&scene);
        assert!((camera.rotation.x - 0.5).abs() < EPS);
        assert!((camera.rotation.y - 0.25).abs() < EPS);
    }

    #[test]
    fn test_update_level_target_keeps_rotation() {
        let mut scene = Scene::new();
        let mut cube = Model::cube(1.0);
        Transform::translate_to(&mut cube, 3.0, 0.0, 0.0);
        let id = scene.insert(cube);

        let mut camera = Camera::default();
        camera.rotation = RotationState::new(0.2, 0.1, 0.0);
        camera.set_target(Some(id));
        camera.update(&scene);
        assert_eq!(camera.rotation, RotationState::new(0.2, 0.1, 0.0));
    }

    #[test]
    fn test_update_drops_missing_target() {
        let mut scene = Scene::new();
        let id = scene.insert(Model::cube(1.0));
        scene.remove(id);

        let mut camera = Camera::default();
        camera.set_target(Some(id));
        camera.update(&scene);
        assert_eq!(camera.target(), None);
    }
}
