/// Colored cell rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;

/// World units covered by one terminal row. Cells are about twice as tall
/// as they are wide, so this keeps the cube square on screen.
pub const ROW_ASPECT: f64 = 2.0;

/// Frame buffer of RGB cells, painted back to front
pub struct CellRenderer {
    width: usize,
    height: usize,
    cells: Vec<[u8; 3]>,
}

impl CellRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![[0, 0, 0]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![[0, 0, 0]; width * height];
    }

    /// Center of the viewport in world units
    pub fn world_center(&self) -> Point2<f64> {
        Point2::new(
            self.width as f64 / 2.0,
            self.height as f64 * ROW_ASPECT / 2.0,
        )
    }

    /// World position sampled by a cell
    pub fn cell_to_world(&self, column: usize, row: usize) -> Point2<f64> {
        Point2::new(column as f64 + 0.5, (row as f64 + 0.5) * ROW_ASPECT)
    }

    pub fn clear(&mut self, background: [u8; 3]) {
        self.cells.fill(background);
    }

    pub fn cell(&self, column: usize, row: usize) -> [u8; 3] {
        self.cells[row * self.width + column]
    }

    /// Paint every cell whose sample point lies inside the quad.
    pub fn fill_quad(&mut self, polygon: &[Point2<f64>; 4], color: [u8; 3]) {
        for idx in self.covered_cells(polygon) {
            self.cells[idx] = color;
        }
    }

    /// Darken covered cells as if a black quad of the given alpha were laid
    /// over them.
    pub fn blend_quad(&mut self, polygon: &[Point2<f64>; 4], alpha: u8) {
        let keep = 1.0 - alpha as f64 / 255.0;
        for idx in self.covered_cells(polygon) {
            self.cells[idx] = self.cells[idx].map(|c| (c as f64 * keep).round() as u8);
        }
    }

    /// Draw the closed outline of a quad.
    pub fn outline_quad(&mut self, polygon: &[Point2<f64>; 4], color: [u8; 3]) {
        for i in 0..polygon.len() {
            self.line(polygon[i], polygon[(i + 1) % polygon.len()], color);
        }
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, color: [u8; 3]) {
        let (x0, y0) = (from.x, from.y / ROW_ASPECT);
        let (x1, y1) = (to.x, to.y / ROW_ASPECT);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let column = (x0 + (x1 - x0) * t).floor();
            let row = (y0 + (y1 - y0) * t).floor();
            if column >= 0.0 && row >= 0.0 {
                let (column, row) = (column as usize, row as usize);
                if column < self.width && row < self.height {
                    self.cells[row * self.width + column] = color;
                }
            }
        }
    }

    fn covered_cells(&self, polygon: &[Point2<f64>; 4]) -> Vec<usize> {
        let min_x = polygon.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = polygon.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = polygon.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return Vec::new();
        }

        // Clip to screen bounds
        let min_col = (min_x.floor().max(0.0)) as usize;
        let max_col = (max_x.ceil().max(0.0) as usize).min(self.width);
        let min_row = ((min_y / ROW_ASPECT).floor().max(0.0)) as usize;
        let max_row = ((max_y / ROW_ASPECT).ceil().max(0.0) as usize).min(self.height);

        let mut covered = Vec::new();
        for row in min_row..max_row {
            for column in min_col..max_col {
                let p = self.cell_to_world(column, row);
                if inside_triangle([polygon[0], polygon[1], polygon[2]], p)
                    || inside_triangle([polygon[0], polygon[2], polygon[3]], p)
                {
                    covered.push(row * self.width + column);
                }
            }
        }
        covered
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            let mut current = None;
            for x in 0..self.width {
                let [r, g, b] = self.cell(x, y);
                if current != Some([r, g, b]) {
                    writer.queue(SetBackgroundColor(Color::Rgb { r, g, b }))?;
                    current = Some([r, g, b]);
                }
                writer.queue(Print(' '))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn inside_triangle(triangle: [Point2<f64>; 3], p: Point2<f64>) -> bool {
    let [v0, v1, v2] = triangle;
    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (p.x, p.y))
        .map(|(w0, w1, w2)| w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
        .unwrap_or(false)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
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

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> [Point2<f64>; 4] {
        [
            Point2::new(x1, y1),
            Point2::new(x1, y0),
            Point2::new(x0, y0),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_fill_quad_covers_inside_cells_only() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.clear([0, 0, 0]);
        renderer.fill_quad(&square(2.0, 2.0, 6.0, 6.0), [255, 0, 0]);

        assert_eq!(renderer.cell(3, 1), [255, 0, 0]);
        assert_eq!(renderer.cell(5, 2), [255, 0, 0]);
        assert_eq!(renderer.cell(1, 1), [0, 0, 0]);
        assert_eq!(renderer.cell(3, 4), [0, 0, 0]);
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut renderer = CellRenderer::new(10, 5);
        let mut reversed = square(2.0, 2.0, 6.0, 6.0);
        reversed.reverse();
        renderer.fill_quad(&reversed, [0, 255, 0]);
        assert_eq!(renderer.cell(4, 2), [0, 255, 0]);
    }

    #[test]
    fn test_blend_darkens_covered_cells() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.clear([200, 100, 50]);
        renderer.blend_quad(&square(0.0, 0.0, 10.0, 10.0), 128);
        assert_eq!(renderer.cell(2, 2), [100, 50, 25]);
        assert_eq!(renderer.cell(7, 0), [100, 50, 25]);
    }

    #[test]
    fn test_quads_off_screen_are_clipped() {
        let mut renderer = CellRenderer::new(4, 4);
        renderer.clear([1, 2, 3]);
        renderer.fill_quad(&square(-50.0, -50.0, -10.0, -10.0), [9, 9, 9]);
        renderer.outline_quad(&square(-5.0, -5.0, 100.0, 100.0), [9, 9, 9]);
        assert_eq!(renderer.cell(1, 1), [1, 2, 3]);
    }

    #[test]
    fn test_outline_marks_edges() {
        let mut renderer = CellRenderer::new(10, 5);
        renderer.clear([0, 0, 0]);
        renderer.outline_quad(&square(1.0, 2.0, 8.0, 8.0), [255, 255, 255]);
        assert_eq!(renderer.cell(1, 2), [255, 255, 255]);
        assert_eq!(renderer.cell(4, 2), [0, 0, 0]);
    }

    #[test]
    fn test_world_center() {
        let renderer = CellRenderer::new(80, 24);
        assert_eq!(renderer.world_center(), Point2::new(40.0, 24.0));
    }

    #[test]
    fn test_draw_emits_every_cell() {
        let renderer = CellRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(' ').count(), 6);
    }
}
