/// Owned model collection and per-frame ordering
use nalgebra::Vector3;
use tracing::{debug, trace};

use crate::geometry::{Model, ModelId};
use crate::math::distance3;
use crate::projection::Camera;
use crate::raster::{triangles, DrawTriangle};
use crate::transform::Transform;

/// Velocity lost per frame, per axis.
pub const DEFAULT_DRAG: f32 = 0.0002;

/// The set of loaded models.
///
/// The frame loop owns the scene and mutates it between frames only. Model
/// order is the draw order once [`Scene::sort_back_to_front`] has run.
#[derive(Debug, Default)]
pub struct Scene {
    models: Vec<Model>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `model` and return its handle.
    pub fn insert(&mut self, mut model: Model) -> ModelId {
        self.next_id += 1;
        let id = ModelId(self.next_id);
        model.id = id;
        debug!(?id, name = %model.name, "model loaded");
        self.models.push(model);
        id
    }

    /// Unload one model.
    pub fn remove(&mut self, id: ModelId) -> Option<Model> {
        let index = self.models.iter().position(|m| m.id == id)?;
        debug!(?id, "model unloaded");
        Some(self.models.remove(index))
    }

    /// Unload every model. Handles are not reused.
    pub fn clear(&mut self) {
        debug!(count = self.models.len(), "scene cleared");
        self.models.clear();
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.iter_mut().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.models.iter_mut()
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Refresh every model's cached distance to `viewer`.
    pub fn update_distances(&mut self, viewer: &Vector3<f32>) {
        for model in &mut self.models {
            model.distance = distance3(viewer, &model.position);
        }
    }

    /// Stable sort, farthest model first.
    pub fn sort_back_to_front(&mut self) {
        self.models.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    }

    /// Distance refresh followed by the back-to-front sort.
    pub fn prepare_frame(&mut self, viewer: &Vector3<f32>) {
        self.update_distances(viewer);
        self.sort_back_to_front();
    }

    /// Apply each model's velocities, then bleed them off by `drag`.
    pub fn physics_step(&mut self, drag: f32) {
        for model in &mut self.models {
            let v = model.velocity;
            Transform::offset_by(model, v.x, v.y, v.z);
            let w = model.angular_velocity;
            Transform::rotate_model(model, w.x, w.y, w.z);

            for axis in model.velocity.iter_mut() {
                if *axis > 0.0 {
                    *axis -= drag;
                } else if *axis < 0.0 {
                    *axis += drag;
                }
            }
        }
    }

    /// Drawable triangles for every model, in current model order.
    pub fn render(
        &self,
        camera: &Camera,
        screen_width: f32,
        screen_height: f32,
    ) -> Vec<DrawTriangle> {
        let frame: Vec<_> = self
            .models
            .iter()
            .flat_map(|model| triangles(camera, model, screen_width, screen_height))
            .collect();
        trace!(models = self.models.len(), triangles = frame.len(), "frame rendered");
        frame
    }
}
