/// Geometry primitives for the software pipeline
use nalgebra::Vector3;

use crate::error::GeometryError;
use crate::math::clamp;
use crate::transform::RotationState;

/// A vertex is a bare position; faces refer to it by index.
pub type Vertex = Vector3<f32>;

/// Face color as loaded. Channels are not range-checked until draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Channels saturated into `[0, 255]`.
    pub fn clamped(&self) -> [u8; 3] {
        let channel = |c: i32| clamp(c as f32, 0.0, 255.0) as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// A triangle referencing three vertices of its model plus a color.
///
/// Winding is significant: the rasterizer culls faces whose projected
/// winding is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub indices: [usize; 3],
    pub color: Color,
}

impl Face {
    pub fn new(i1: usize, i2: usize, i3: usize, r: i32, g: i32, b: i32) -> Self {
        Self {
            indices: [i1, i2, i3],
            color: Color::new(r, g, b),
        }
    }
}

/// Handle a [`Scene`](crate::scene::Scene) gives each model it owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u32);

/// A polygonal model: vertex buffer, face list and world-space state.
///
/// Vertices are stored relative to `position` and are rotated and scaled in
/// place. There is no rest pose to return to.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub position: Vector3<f32>,
    pub rotation: RotationState,
    pub velocity: Vector3<f32>,
    /// Radians per frame around x, y and z.
    pub angular_velocity: Vector3<f32>,
    /// Reserved for collision; the pipeline ignores it.
    pub solid: bool,
    /// Distance to the viewer, refreshed once per frame for sorting.
    pub distance: f32,
    pub(crate) id: ModelId,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Model {
    /// Build a model, rejecting faces that index past the vertex buffer.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        faces: Vec<Face>,
    ) -> Result<Self, GeometryError> {
        let vertex_count = vertices.len();
        for (face, f) in faces.iter().enumerate() {
            if let Some(&index) = f.indices.iter().find(|&&i| i >= vertex_count) {
                return Err(GeometryError::MalformedModel {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            position: Vector3::zeros(),
            rotation: RotationState::zero(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            solid: false,
            distance: 0.0,
            id: ModelId::default(),
            vertices,
            faces,
        })
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Cube of edge `size` centred on the model origin, one color per side.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
        ];

        let faces = vec![
            // -z
            Face::new(0, 1, 2, 220, 60, 60),
            Face::new(0, 2, 3, 220, 60, 60),
            // +z
            Face::new(4, 6, 5, 60, 220, 60),
            Face::new(4, 7, 6, 60, 220, 60),
            // -y
            Face::new(0, 4, 5, 60, 60, 220),
            Face::new(0, 5, 1, 60, 60, 220),
            // +y
            Face::new(3, 6, 7, 220, 220, 60),
            Face::new(3, 2, 6, 220, 220, 60),
            // -x
            Face::new(0, 3, 7, 60, 220, 220),
            Face::new(0, 7, 4, 60, 220, 220),
            // +x
            Face::new(1, 6, 2, 220, 60, 220),
            Face::new(1, 5, 6, 220, 60, 220),
        ];

        Self {
            name: "cube".to_string(),
            position: Vector3::zeros(),
            rotation: RotationState::zero(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            solid: false,
            distance: 0.0,
            id: ModelId::default(),
            vertices,
            faces,
        }
    }
}
