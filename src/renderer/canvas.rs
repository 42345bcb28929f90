//! Canvas 2D backend
//!
//! Replays draw commands. A failed image draw falls back to the tile's
//! placeholder fill; nothing here reports back into the simulation.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{BORDER_WIDTH, DrawCmd, colors};
use crate::assets::AssetCache;
use crate::consts::CELL_SIZE;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    pub fn draw(&self, cmds: &[DrawCmd], images: &AssetCache<HtmlImageElement>) {
        let ctx = &self.ctx;
        let cell = CELL_SIZE as f64;

        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { size } => {
                    ctx.clear_rect(0.0, 0.0, *size as f64, *size as f64);
                }
                DrawCmd::GridLine { from, to } => {
                    ctx.set_stroke_style_str(colors::GRID_LINE);
                    ctx.set_line_width(1.0);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCmd::Head { points } => {
                    ctx.set_fill_style_str(colors::HEAD);
                    ctx.begin_path();
                    ctx.move_to(points[0].x as f64, points[0].y as f64);
                    for p in &points[1..] {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCmd::Image {
                    origin,
                    url,
                    fallback,
                } => {
                    let (x, y) = (origin.x as f64, origin.y as f64);
                    let drawn = images.get(url).is_some_and(|img| {
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, cell, cell)
                            .is_ok()
                    });
                    if !drawn {
                        ctx.set_fill_style_str(fallback);
                        ctx.fill_rect(x, y, cell, cell);
                    }
                    self.border(x, y, cell);
                }
                DrawCmd::Placeholder { origin, fill } => {
                    let (x, y) = (origin.x as f64, origin.y as f64);
                    ctx.set_fill_style_str(fill);
                    ctx.fill_rect(x, y, cell, cell);
                    self.border(x, y, cell);
                }
            }
        }
    }

    fn border(&self, x: f64, y: f64, cell: f64) {
        self.ctx.set_stroke_style_str(colors::BORDER);
        self.ctx.set_line_width(BORDER_WIDTH as f64);
        self.ctx.stroke_rect(x, y, cell, cell);
    }
}
