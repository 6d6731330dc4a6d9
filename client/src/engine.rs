use drawsync_shared::{decode_binary, decode_text, BrushStyle, ChannelMessage, Point, Stroke};
use log::{debug, warn};

use crate::channel::SyncChannel;
use crate::input::{InputCapture, PointerId, StrokeCommand};
use crate::store::StrokeStore;
use crate::surface::{RenderSurface, RenderedStroke};

#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Brush the session starts with.
    pub brush: BrushStyle,
    /// Drop the redo history whenever a new stroke begins. Off by default:
    /// strokes taken back with undo stay redoable after drawing more.
    pub clear_redo_on_draw: bool,
}

/// One entry of the render list. Local entries resolve, in order, to the
/// active strokes of the store.
#[derive(Debug)]
enum Layer {
    Local,
    Remote(Stroke),
}

/// Coordinates one client session: pointer input in, `draw` events out,
/// remote `draw` events in, repaints out.
///
/// All handlers take `&mut self` and run to completion, so events are
/// applied strictly in the order they are delivered.
pub struct SyncEngine<R, C> {
    config: EngineConfig,
    brush: BrushStyle,
    store: StrokeStore,
    input: InputCapture,
    layers: Vec<Layer>,
    surface: R,
    channel: C,
}

impl<R: RenderSurface, C: SyncChannel> SyncEngine<R, C> {
    pub fn new(surface: R, channel: C) -> Self {
        Self::with_config(surface, channel, EngineConfig::default())
    }

    pub fn with_config(surface: R, channel: C, config: EngineConfig) -> Self {
        Self {
            brush: config.brush.clone(),
            config,
            store: StrokeStore::new(),
            input: InputCapture::new(),
            layers: Vec::new(),
            surface,
            channel,
        }
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn brush(&self) -> &BrushStyle {
        &self.brush
    }

    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn remote_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Remote(stroke) => Some(stroke),
            Layer::Local => None,
        })
    }

    /// Everything on screen in paint order: local active strokes and
    /// received strokes, interleaved by when they appeared.
    pub fn visible_strokes(&self) -> Vec<RenderedStroke> {
        let mut local = self.store.snapshot().iter();
        self.layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Local => local.next(),
                Layer::Remote(stroke) => Some(stroke),
            })
            .map(RenderedStroke::from)
            .collect()
    }

    pub fn on_pointer_down(&mut self, pointer: PointerId, position: Point) {
        let Some(StrokeCommand::Begin(origin)) = self.input.pointer_down(pointer, position) else {
            debug!("ignoring pointer-down from pointer {pointer} at {position:?}");
            return;
        };
        if self.config.clear_redo_on_draw {
            self.store.clear_undone();
        }
        let stroke = self.store.begin_stroke(origin, &self.brush);
        self.layers.push(Layer::Local);
        let message = self.store.get(stroke).cloned().map(ChannelMessage::Draw);
        self.present();
        if let Some(message) = message {
            self.publish(&message);
        }
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, position: Point) {
        let Some(StrokeCommand::Extend(point)) = self.input.pointer_move(pointer, position) else {
            return;
        };
        let Some(stroke) = self.store.extend_last_stroke(point) else {
            return;
        };
        // Full polyline every time, so peers can rebuild it from one message.
        let message = ChannelMessage::Draw(stroke.clone());
        if matches!(self.layers.last(), Some(Layer::Local)) {
            self.surface.append_stroke_to_last(point);
            self.surface.request_repaint();
        } else {
            self.present();
        }
        self.publish(&message);
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId) {
        self.input.pointer_up(pointer);
    }

    pub fn on_pointer_leave(&mut self, pointer: PointerId) {
        self.input.pointer_leave(pointer);
    }

    pub fn on_brush_size_changed(&mut self, width: f64) {
        if !width.is_finite() || width <= 0.0 {
            debug!("ignoring brush size {width}");
            return;
        }
        self.brush.width = width;
    }

    pub fn on_brush_color_changed(&mut self, color: impl Into<String>) {
        self.brush.color = color.into();
    }

    pub fn on_eraser_toggled(&mut self) {
        self.brush.erasing = !self.brush.erasing;
    }

    /// Takes back this session's most recent stroke. Never published.
    pub fn undo(&mut self) -> bool {
        if self.store.undo_last().is_none() {
            return false;
        }
        if let Some(index) = self
            .layers
            .iter()
            .rposition(|layer| matches!(layer, Layer::Local))
        {
            self.layers.remove(index);
        }
        self.input.end_gesture();
        self.present();
        true
    }

    /// Puts the most recently undone stroke back on top. Never published.
    pub fn redo(&mut self) -> bool {
        if self.store.redo_last().is_none() {
            return false;
        }
        self.layers.push(Layer::Local);
        self.input.end_gesture();
        self.present();
        true
    }

    pub fn handle_text_frame(&mut self, text: &str) {
        match decode_text(text) {
            Ok(message) => self.apply_remote(message),
            Err(error) => warn!("discarding inbound text message: {error}"),
        }
    }

    pub fn handle_binary_frame(&mut self, payload: &[u8]) {
        match decode_binary(payload) {
            Ok(message) => self.apply_remote(message),
            Err(error) => warn!("discarding inbound binary message: {error}"),
        }
    }

    /// Each received `draw` event becomes a new stroke of its own, even when
    /// it continues a stroke received earlier.
    pub fn apply_remote(&mut self, message: ChannelMessage) {
        if let Err(error) = message.validate() {
            warn!("discarding inbound {} event: {error}", message.kind());
            return;
        }
        match message {
            ChannelMessage::Draw(stroke) => {
                self.layers.push(Layer::Remote(stroke));
                self.present();
            }
        }
    }

    fn present(&mut self) {
        let strokes = self.visible_strokes();
        self.surface.set_visible_strokes(&strokes);
        self.surface.request_repaint();
    }

    fn publish(&mut self, message: &ChannelMessage) {
        if !self.channel.is_open() {
            debug!("sync channel closed, dropping {} event", message.kind());
            return;
        }
        if let Err(error) = self.channel.publish(message) {
            debug!("dropping {} event: {error}", message.kind());
        }
    }
}
