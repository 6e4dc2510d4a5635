use crate::occupancy::Layer;
use crate::{Cell, Color, GridDimensions, Resize};

/// Pixel rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Drawing state a surface holds between calls. A surface loses it on
/// resize, so it has to be applied again before the next draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub font_px: f32,
    pub bold: bool,
    pub line_width: f32,
    pub outline_width: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            font_px: 11.0,
            bold: true,
            line_width: 2.0,
            outline_width: 2.0,
        }
    }
}

/// Something the renderer can draw on: a canvas, an egui painter, a text grid.
pub trait Surface {
    fn resize(&mut self, width_px: u32, height_px: u32);
    fn apply_style(&mut self, style: &DrawStyle);
    fn clear(&mut self, width_px: u32, height_px: u32);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color);
    fn fill_rect(&mut self, rect: PxRect, color: Color);
    /// Stroked with the style's outline width.
    fn stroke_rect(&mut self, rect: PxRect, color: Color);
    fn text(&mut self, text: &str, baseline: (f32, f32), max_width: f32, color: Color);
}

pub const GRID_COLOR: Color = Color::BLACK;
pub const HOVER_COLOR: Color = Color::RED;

/// Full redraw from model state. Holds nothing but the style handle.
#[derive(Debug, Default)]
pub struct Renderer {
    style: Option<DrawStyle>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes the surface and hands back the freshly applied style.
    pub fn resize<S: Surface + ?Sized>(&mut self, surface: &mut S, r: Resize) -> DrawStyle {
        surface.resize(r.width_px, r.height_px);
        let style = DrawStyle::default();
        surface.apply_style(&style);
        self.style = Some(style);
        style
    }

    pub fn redraw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        dims: &GridDimensions,
        layers: &[Layer<'_>],
        hover: Option<Cell>,
    ) {
        if self.style.is_none() {
            let style = DrawStyle::default();
            surface.apply_style(&style);
            self.style = Some(style);
        }

        let (w, h) = (dims.width_px(), dims.height_px());
        surface.clear(w, h);
        draw_grid(surface, dims);

        let cs = dims.cell_size as f32;
        for layer in layers {
            for cell in layer.seats {
                let rect = PxRect {
                    x: cell.x as f32 * cs + 1.0,
                    y: cell.y as f32 * cs + 1.0,
                    w: cs - 2.0,
                    h: cs - 2.0,
                };
                surface.fill_rect(rect, layer.color);
            }
        }

        if let Some(c) = hover {
            let rect = PxRect {
                x: c.x as f32 * cs,
                y: c.y as f32 * cs,
                w: cs,
                h: cs,
            };
            surface.stroke_rect(rect, HOVER_COLOR);
        }
    }
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, dims: &GridDimensions) {
    let cs = dims.cell_size as f32;
    let (w, h) = (dims.width_px() as f32, dims.height_px() as f32);
    let count = dims.grid_cell_count();

    for i in 0..=count {
        let p = i as f32 * cs;
        surface.line((p, 0.0), (p, h), GRID_COLOR);
        surface.line((0.0, p), (w, p), GRID_COLOR);
    }

    // 1-based labels along the top row and left column
    for i in 1..=count {
        let label = i.to_string();
        surface.text(&label, label_origin(cs, i, 0), label_width(cs), GRID_COLOR);
        surface.text(&label, label_origin(cs, 0, i), label_width(cs), GRID_COLOR);
    }
}

fn label_origin(cs: f32, x: u32, y: u32) -> (f32, f32) {
    (
        x as f32 * cs + 1.0 + cs / 8.0,
        y as f32 * cs + 1.0 + cs / 1.5,
    )
}

fn label_width(cs: f32) -> f32 {
    cs - cs / 8.0 - 2.0
}
