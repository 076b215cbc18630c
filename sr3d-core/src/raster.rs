/// Per-model render pass: depth test, back-face cull, drawable output
use std::slice;

use crate::geometry::{Color, Face, Model};
use crate::math::cross_sign;
use crate::projection::{Camera, ScreenPoint};

/// A screen-space point after centring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

/// A front-facing triangle ready for the draw surface.
///
/// `color` is passed through unclamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTriangle {
    pub color: Color,
    pub points: [Point2; 3],
}

/// What a [`RenderPass`] yields per surviving face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Front-facing triangles only.
    Triangles,
    /// The signed winding value of every face in front of the camera.
    Winding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rendered {
    Triangle(DrawTriangle),
    Winding(f32),
}

/// Lazy walk over a model's faces.
///
/// Faces with any vertex on or behind the view plane are skipped. In
/// [`RenderMode::Triangles`] faces with non-positive winding are skipped as
/// well.
pub struct RenderPass<'a> {
    points: Vec<ScreenPoint>,
    faces: slice::Iter<'a, Face>,
    half_width: f32,
    half_height: f32,
    mode: RenderMode,
}

impl<'a> RenderPass<'a> {
    fn centred(&self, index: usize) -> Option<Point2> {
        // Model::new guarantees face indices are in bounds.
        let point = self.points[index];
        point.is_visible().then(|| Point2 {
            x: point.x + self.half_width,
            y: point.y + self.half_height,
        })
    }
}

impl<'a> Iterator for RenderPass<'a> {
    type Item = Rendered;

    fn next(&mut self) -> Option<Rendered> {
        while let Some(face) = self.faces.next() {
            let [i1, i2, i3] = face.indices;
            let (Some(p1), Some(p2), Some(p3)) =
                (self.centred(i1), self.centred(i2), self.centred(i3))
            else {
                continue;
            };

            let cross = cross_sign(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
            match self.mode {
                RenderMode::Winding => return Some(Rendered::Winding(cross)),
                RenderMode::Triangles if cross > 0.0 => {
                    return Some(Rendered::Triangle(DrawTriangle {
                        color: face.color,
                        points: [p1, p2, p3],
                    }))
                }
                RenderMode::Triangles => {}
            }
        }
        None
    }
}

/// Start a render pass for `model` as seen from `camera`.
///
/// A model whose cached distance has reached the camera's render distance
/// yields nothing and is not projected.
pub fn render_model<'a>(
    camera: &Camera,
    model: &'a Model,
    screen_width: f32,
    screen_height: f32,
    mode: RenderMode,
) -> RenderPass<'a> {
    let (points, faces) = if model.distance < camera.render_distance {
        (camera.project_vertices(model, screen_width), model.faces())
    } else {
        (Vec::new(), &[][..])
    };

    RenderPass {
        points,
        faces: faces.iter(),
        half_width: screen_width / 2.0,
        half_height: screen_height / 2.0,
        mode,
    }
}

/// Front-facing triangles of `model`.
pub fn triangles<'a>(
    camera: &Camera,
    model: &'a Model,
    screen_width: f32,
    screen_height: f32,
) -> impl Iterator<Item = DrawTriangle> + 'a {
    render_model(camera, model, screen_width, screen_height, RenderMode::Triangles).filter_map(
        |rendered| match rendered {
            Rendered::Triangle(triangle) => Some(triangle),
            Rendered::Winding(_) => None,
        },
    )
}

/// Winding values of every face of `model` in front of the camera.
pub fn winding_values<'a>(
    camera: &Camera,
    model: &'a Model,
    screen_width: f32,
    screen_height: f32,
) -> impl Iterator<Item = f32> + 'a {
    render_model(camera, model, screen_width, screen_height, RenderMode::Winding).filter_map(
        |rendered| match rendered {
            Rendered::Winding(cross) => Some(cross),
            Rendered::Triangle(_) => None,
        },
    )
}
