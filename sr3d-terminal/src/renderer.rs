/// Half-block color rasterizer for terminal output
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sr3d_core::DrawTriangle;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';
const BACKGROUND: [u8; 3] = [0, 0, 0];
const CROSSHAIR: [u8; 3] = [255, 255, 255];

/// Pixel buffer with two pixels per terminal cell.
///
/// There is no depth buffer; triangles overwrite whatever was drawn before
/// them, so callers submit them far to near.
pub struct CellRenderer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
    labels: Vec<(u16, u16, String)>,
}

impl CellRenderer {
    /// Renderer for a terminal of `columns` x `rows` cells.
    pub fn new(columns: usize, rows: usize) -> Self {
        let width = columns;
        let height = rows * 2;
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
            labels: Vec::new(),
        }
    }

    /// Pixel dimensions handed to the projector.
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BACKGROUND);
        self.labels.clear();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Fill triangles in submission order.
    pub fn draw_frame(&mut self, frame: &[DrawTriangle]) {
        for triangle in frame {
            self.fill_triangle(triangle);
        }
    }

    pub fn fill_triangle(&mut self, triangle: &DrawTriangle) {
        let color = triangle.color.clamped();
        let [v0, v1, v2] = triangle.points.map(|p| (p.x, p.y));

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.pixels[y as usize * self.width + x as usize] = color;
                    }
                }
            }
        }
    }

    /// Mark the screen centre.
    pub fn crosshair(&mut self) {
        let (x, y) = (self.width / 2, self.height / 2);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = CROSSHAIR;
        }
    }

    /// Queue text at pixel position `(x, y)`; drawn over the pixels.
    pub fn label(&mut self, x: f32, y: f32, text: impl Into<String>) {
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return;
        }
        self.labels.push((x as u16, (y / 2.0) as u16, text.into()));
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<([u8; 3], [u8; 3])> = None;
        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            let top = &self.pixels[row * 2 * self.width..(row * 2 + 1) * self.width];
            let bottom = &self.pixels[(row * 2 + 1) * self.width..(row * 2 + 2) * self.width];
            for (&fg, &bg) in top.iter().zip(bottom) {
                if current != Some((fg, bg)) {
                    writer.queue(SetForegroundColor(rgb(fg)))?;
                    writer.queue(SetBackgroundColor(rgb(bg)))?;
                    current = Some((fg, bg));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;

        for (x, y, text) in &self.labels {
            writer.queue(cursor::MoveTo(*x, *y))?;
            writer.queue(Print(text))?;
        }
        Ok(())
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr3d_core::{Color as FaceColor, Point2};

    fn triangle(color: FaceColor, points: [(f32, f32); 3]) -> DrawTriangle {
        DrawTriangle {
            color,
            points: points.map(|(x, y)| Point2 { x, y }),
        }
    }

    #[test]
    fn test_pixel_size_doubles_rows() {
        let renderer = CellRenderer::new(80, 24);
        assert_eq!(renderer.pixel_size(), (80.0, 48.0));
    }

    #[test]
    fn test_fill_clamps_color() {
        let mut renderer = CellRenderer::new(20, 10);
        renderer.fill_triangle(&triangle(
            FaceColor::new(400, -3, 90),
            [(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)],
        ));
        assert_eq!(renderer.pixel(1, 1), Some([255, 0, 90]));
        assert_eq!(renderer.pixel(19, 19), Some(BACKGROUND));
    }

    #[test]
    fn test_later_triangles_overdraw() {
        let mut renderer = CellRenderer::new(10, 5);
        let quad = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        renderer.draw_frame(&[
            triangle(FaceColor::new(0, 0, 255), quad),
            triangle(FaceColor::new(255, 0, 0), quad),
        ]);
        assert_eq!(renderer.pixel(2, 2), Some([255, 0, 0]));
    }

    #[test]
    fn test_offscreen_triangle_is_clipped() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.fill_triangle(&triangle(
            FaceColor::new(9, 9, 9),
            [(-50.0, -50.0), (-40.0, -50.0), (-50.0, -40.0)],
        ));
        renderer.fill_triangle(&triangle(
            FaceColor::new(9, 9, 9),
            [(f32::INFINITY, 0.0), (5.0, 5.0), (0.0, 5.0)],
        ));
        assert!((0..10).all(|x| (0..10).all(|y| renderer.pixel(x, y) == Some(BACKGROUND))));
    }

    #[test]
    fn test_clear_and_crosshair() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.fill_triangle(&triangle(
            FaceColor::new(1, 2, 3),
            [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
        ));
        renderer.clear();
        renderer.crosshair();
        assert_eq!(renderer.pixel(5, 5), Some(CROSSHAIR));
        assert_eq!(renderer.pixel(1, 1), Some(BACKGROUND));
    }

    #[test]
    fn test_draw_writes_cells_and_labels() {
        let mut renderer = CellRenderer::new(4, 2);
        renderer.label(1.0, 2.0, "7");
        renderer.label(-1.0, 0.0, "hidden");
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8);
        assert!(text.contains('7'));
        assert!(!text.contains("hidden"));
    }
}
