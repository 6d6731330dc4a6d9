use drawsync_shared::{Point, Stroke, ERASER_COLOR};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOperation {
    SourceOver,
    DestinationOut,
}

impl CompositeOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::DestinationOut => "destination-out",
        }
    }
}

/// A stroke resolved into paint parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedStroke {
    pub points: Vec<f64>,
    pub color: String,
    pub line_width: f64,
    pub composite: CompositeOperation,
}

impl From<&Stroke> for RenderedStroke {
    fn from(stroke: &Stroke) -> Self {
        let style = stroke.style();
        let (color, composite) = if style.erasing {
            (ERASER_COLOR.to_string(), CompositeOperation::DestinationOut)
        } else {
            (style.color.clone(), CompositeOperation::SourceOver)
        };
        Self {
            points: stroke.points.clone(),
            color,
            line_width: style.effective_width(),
            composite,
        }
    }
}

impl RenderedStroke {
    pub fn push(&mut self, point: Point) {
        self.points.push(point.x);
        self.points.push(point.y);
    }
}

/// Whatever paints the board. The engine only ever replaces the whole
/// list, grows the last stroke, or asks for a repaint.
pub trait RenderSurface {
    fn set_visible_strokes(&mut self, strokes: &[RenderedStroke]);
    fn append_stroke_to_last(&mut self, point: Point);
    fn request_repaint(&mut self);
}
