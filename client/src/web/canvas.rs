use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use drawsync_shared::Point;

use crate::surface::{CompositeOperation, RenderSurface, RenderedStroke};

/// Paints the render list onto a 2d canvas. Every repaint clears the canvas
/// and draws the whole list, so eraser strokes only cut what lies below them.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    strokes: Vec<RenderedStroke>,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            strokes: Vec::new(),
            width: 0.0,
            height: 0.0,
        })
    }

    pub fn resize(&mut self, window: &Window) {
        let rect = self.canvas.get_bounding_client_rect();
        let dpr = window.device_pixel_ratio();
        self.canvas.set_width((rect.width() * dpr) as u32);
        self.canvas.set_height((rect.height() * dpr) as u32);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.width = rect.width();
        self.height = rect.height();
        log::debug!("canvas resized to {}x{} (dpr {dpr})", self.width, self.height);
        self.request_repaint();
    }

    fn paint(&self, stroke: &RenderedStroke) {
        let ctx = &self.ctx;
        let _ = ctx.set_global_composite_operation(stroke.composite.as_str());
        ctx.set_stroke_style_str(&stroke.color);
        ctx.set_fill_style_str(&stroke.color);
        ctx.set_line_width(stroke.line_width);

        let mut points = stroke.points.chunks_exact(2);
        let Some(first) = points.next() else {
            return;
        };
        ctx.begin_path();
        if stroke.points.len() == 2 {
            let _ = ctx.arc(
                first[0],
                first[1],
                stroke.line_width / 2.0,
                0.0,
                std::f64::consts::PI * 2.0,
            );
            ctx.fill();
            return;
        }
        ctx.move_to(first[0], first[1]);
        for point in points {
            ctx.line_to(point[0], point[1]);
        }
        ctx.stroke();
    }
}

impl RenderSurface for CanvasSurface {
    fn set_visible_strokes(&mut self, strokes: &[RenderedStroke]) {
        self.strokes = strokes.to_vec();
    }

    fn append_stroke_to_last(&mut self, point: Point) {
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    fn request_repaint(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        for stroke in &self.strokes {
            self.paint(stroke);
        }
        let _ = self
            .ctx
            .set_global_composite_operation(CompositeOperation::SourceOver.as_str());
    }
}
