/// SR3D Core Library - geometry pipeline for a painter's-algorithm renderer
///
/// Models are transformed in place, projected through a camera, culled by
/// depth and winding, and handed out as draw triangles in back-to-front
/// model order. Nothing here touches pixels.

pub mod error;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use error::{GeometryError, LoadError};
pub use geometry::{Color, Face, Model, ModelId, Vertex};
pub use loader::{parse_model, parse_scene, ModelPlacement, SceneDescription, SceneLoader};
pub use projection::{Camera, ScreenPoint, DEFAULT_RENDER_DISTANCE};
pub use raster::{
    render_model, triangles, winding_values, DrawTriangle, Point2, RenderMode, Rendered,
};
pub use scene::{Scene, DEFAULT_DRAG};
pub use transform::{Positioned, RotationState, Transform};
