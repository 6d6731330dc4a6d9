use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

mod codec;

pub use codec::{decode_binary, decode_text, encode_binary, encode_text, DecodeError, EncodeError};

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_WIDTH: f64 = 5.0;
pub const ERASER_COLOR: &str = "white";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Brush settings a stroke is begun with. Copied into every `draw` event.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushStyle {
    pub color: String,
    pub width: f64,
    pub erasing: bool,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            width: DEFAULT_WIDTH,
            erasing: false,
        }
    }
}

impl BrushStyle {
    /// Line width actually painted; erasers cover twice the brush size.
    pub fn effective_width(&self) -> f64 {
        if self.erasing {
            self.width * 2.0
        } else {
            self.width
        }
    }
}

/// A polyline stored as flat `x, y` pairs.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<f64>,
    pub color: String,
    pub width: f64,
    pub erasing: bool,
}

impl Stroke {
    pub fn new(origin: Point, style: &BrushStyle) -> Self {
        Self {
            points: vec![origin.x, origin.y],
            color: style.color.clone(),
            width: style.width,
            erasing: style.erasing,
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point.x);
        self.points.push(point.y);
    }

    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points().last()
    }

    pub fn style(&self) -> BrushStyle {
        BrushStyle {
            color: self.color.clone(),
            width: self.width,
            erasing: self.erasing,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidStroke> {
        if self.points.is_empty() {
            return Err(InvalidStroke::Empty);
        }
        if self.points.len() % 2 != 0 {
            return Err(InvalidStroke::OddCoordinates(self.points.len()));
        }
        if self.points.iter().any(|value| !value.is_finite()) {
            return Err(InvalidStroke::NonFinite);
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(InvalidStroke::Width(self.width));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidStroke {
    #[error("stroke has no points")]
    Empty,
    #[error("stroke has an odd number of coordinates ({0})")]
    OddCoordinates(usize),
    #[error("stroke contains a non-finite coordinate")]
    NonFinite,
    #[error("stroke width {0} is not a positive number")]
    Width(f64),
}

/// Events exchanged over the sync channel. Both directions share one shape.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ChannelMessage {
    #[serde(rename = "draw")]
    Draw(Stroke),
}

impl ChannelMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ChannelMessage::Draw(_) => "draw",
        }
    }

    pub fn validate(&self) -> Result<(), InvalidStroke> {
        match self {
            ChannelMessage::Draw(stroke) => stroke.validate(),
        }
    }
}
