/// In-place position, rotation and scale mutations
use nalgebra::{Matrix3, Vector3};

use crate::geometry::Model;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Anything with a world-space position that can be moved.
pub trait Positioned {
    fn position_mut(&mut self) -> &mut Vector3<f32>;
}

impl Positioned for Model {
    fn position_mut(&mut self) -> &mut Vector3<f32> {
        &mut self.position
    }
}

/// Mutating transform operations. Nothing here copies its target.
pub struct Transform;

impl Transform {
    /// Overwrite the entity's position.
    pub fn translate_to<E: Positioned + ?Sized>(entity: &mut E, x: f32, y: f32, z: f32) {
        *entity.position_mut() = Vector3::new(x, y, z);
    }

    /// Add to the entity's position.
    pub fn offset_by<E: Positioned + ?Sized>(entity: &mut E, dx: f32, dy: f32, dz: f32) {
        *entity.position_mut() += Vector3::new(dx, dy, dz);
    }

    /// Multiply every vertex component by `factor`.
    pub fn scale_vertices(model: &mut Model, factor: f32) {
        for vertex in model.vertices_mut() {
            *vertex *= factor;
        }
    }

    /// Record the angles on the model and rotate every vertex by them.
    ///
    /// Vertices are rotated from their current state, so successive calls
    /// compound.
    pub fn rotate_model(model: &mut Model, xrot: f32, yrot: f32, zrot: f32) {
        model.rotation = RotationState::new(xrot, yrot, zrot);
        let matrix = Self::rotation_matrix(&model.rotation);
        for vertex in model.vertices_mut() {
            *vertex = matrix * *vertex;
        }
    }

    /// Composed Z-X-Y rotation matrix.
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix3<f32> {
        let (sin_a, cos_a) = rotation.z.sin_cos();
        let (sin_b, cos_b) = rotation.x.sin_cos();
        let (sin_c, cos_c) = rotation.y.sin_cos();

        Matrix3::new(
            cos_a * cos_b,
            cos_a * sin_b * sin_c - sin_a * cos_c,
            cos_a * sin_b * cos_c + sin_a * sin_c,
            sin_a * cos_b,
            sin_a * sin_b * sin_c + cos_a * cos_c,
            sin_a * sin_b * cos_c - cos_a * sin_c,
            -sin_b,
            cos_b * sin_c,
            cos_b * cos_c,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn unit_x_model() -> Model {
        Model::new(
            "axis",
            vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
            vec![Face::new(0, 1, 2, 0, 0, 0)],
        )
        .unwrap()
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Matrix3::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let matrix = Transform::rotation_matrix(&RotationState::new(0.4, -1.1, 2.3));
        assert!((matrix.determinant() - 1.0).abs() < 1e-5);
        assert!((matrix * matrix.transpose() - Matrix3::identity()).norm() < 1e-5);
    }

    #[test]
    fn test_rotate_model_zero_leaves_vertices() {
        let mut cube = Model::cube(3.0);
        let before = cube.vertices().to_vec();
        Transform::rotate_model(&mut cube, 0.0, 0.0, 0.0);
        for (a, b) in before.iter().zip(cube.vertices()) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn test_rotate_model_about_z() {
        let mut model = unit_x_model();
        Transform::rotate_model(&mut model, 0.0, 0.0, FRAC_PI_2);
        let v = model.vertices()[0];
        assert!((v - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert_eq!(model.rotation, RotationState::new(0.0, 0.0, FRAC_PI_2));
    }

    #[test]
    fn test_rotate_model_compounds() {
        let mut once = unit_x_model();
        let mut twice = unit_x_model();
        Transform::rotate_model(&mut once, FRAC_PI_2, 0.0, 0.0);
        Transform::rotate_model(&mut twice, FRAC_PI_4, 0.0, 0.0);
        Transform::rotate_model(&mut twice, FRAC_PI_4, 0.0, 0.0);

        for (a, b) in once.vertices().iter().zip(twice.vertices()) {
            assert!((a - b).norm() < 1e-5);
        }
        // Only the latest angles are recorded.
        assert_eq!(twice.rotation.x, FRAC_PI_4);
    }

    #[test]
    fn test_translate_and_offset() {
        let mut model = Model::cube(1.0);
        Transform::translate_to(&mut model, 1.0, 2.0, 3.0);
        assert_eq!(model.position, Vector3::new(1.0, 2.0, 3.0));

        Transform::offset_by(&mut model, 0.5, -2.0, 1.0);
        assert_eq!(model.position, Vector3::new(1.5, 0.0, 4.0));

        Transform::translate_to(&mut model, 0.0, 0.0, 0.0);
        assert_eq!(model.position, Vector3::zeros());
    }

    #[test]
    fn test_scale_vertices() {
        let mut cube = Model::cube(2.0);
        Transform::scale_vertices(&mut cube, 2.5);
        assert_eq!(cube.vertices()[0], Vector3::new(-2.5, -2.5, -2.5));
        assert_eq!(cube.vertices()[6], Vector3::new(2.5, 2.5, 2.5));
        // Position is untouched.
        assert_eq!(cube.position, Vector3::zeros());
    }
}
