use drawsync_shared::Point;

/// Identifies one pointer (mouse, pen or a single touch) across its events.
pub type PointerId = i32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeCommand {
    Begin(Point),
    Extend(Point),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    #[default]
    Idle,
    Drawing,
}

/// Client-space rectangle of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    /// Maps client coordinates to surface coordinates. `None` when the
    /// position falls outside the surface.
    pub fn locate(&self, client_x: f64, client_y: f64) -> Option<Point> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let point = Point::new(client_x - self.left, client_y - self.top);
        if !point.is_finite() {
            return None;
        }
        let inside = (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y);
        inside.then_some(point)
    }
}

/// Turns raw pointer events into stroke commands. Only the pointer that
/// started a stroke can extend or end it.
#[derive(Debug, Default)]
pub struct InputCapture {
    mode: DrawMode,
    pointer: Option<PointerId>,
}

impl InputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == DrawMode::Drawing
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.pointer
    }

    pub fn pointer_down(&mut self, pointer: PointerId, position: Point) -> Option<StrokeCommand> {
        if !position.is_finite() || self.is_drawing() {
            return None;
        }
        self.mode = DrawMode::Drawing;
        self.pointer = Some(pointer);
        Some(StrokeCommand::Begin(position))
    }

    pub fn pointer_move(&mut self, pointer: PointerId, position: Point) -> Option<StrokeCommand> {
        if !self.owns(pointer) || !position.is_finite() {
            return None;
        }
        Some(StrokeCommand::Extend(position))
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        if self.owns(pointer) {
            self.end_gesture();
        }
    }

    pub fn pointer_leave(&mut self, pointer: PointerId) {
        if self.owns(pointer) {
            self.end_gesture();
        }
    }

    /// Stops the current stroke whichever pointer is drawing it.
    pub fn end_gesture(&mut self) {
        self.mode = DrawMode::Idle;
        self.pointer = None;
    }

    fn owns(&self, pointer: PointerId) -> bool {
        self.is_drawing() && self.pointer == Some(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUSE: PointerId = 1;
    const FINGER: PointerId = 7;

    #[test]
    fn move_without_down_is_ignored() {
        let mut input = InputCapture::new();
        assert_eq!(input.pointer_move(MOUSE, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn down_then_move_begins_and_extends() {
        let mut input = InputCapture::new();
        assert_eq!(
            input.pointer_down(MOUSE, Point::new(1.0, 2.0)),
            Some(StrokeCommand::Begin(Point::new(1.0, 2.0)))
        );
        assert!(input.is_drawing());
        assert_eq!(input.active_pointer(), Some(MOUSE));
        assert_eq!(
            input.pointer_move(MOUSE, Point::new(3.0, 4.0)),
            Some(StrokeCommand::Extend(Point::new(3.0, 4.0)))
        );
    }

    #[test]
    fn up_and_leave_stop_drawing() {
        let mut input = InputCapture::new();
        input.pointer_down(MOUSE, Point::new(0.0, 0.0));
        input.pointer_up(MOUSE);
        assert_eq!(input.mode(), DrawMode::Idle);
        assert_eq!(input.pointer_move(MOUSE, Point::new(1.0, 1.0)), None);

        input.pointer_down(MOUSE, Point::new(0.0, 0.0));
        input.pointer_leave(MOUSE);
        assert_eq!(input.pointer_move(MOUSE, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn non_finite_positions_are_dropped() {
        let mut input = InputCapture::new();
        assert_eq!(input.pointer_down(MOUSE, Point::new(f64::NAN, 0.0)), None);
        assert!(!input.is_drawing());

        input.pointer_down(MOUSE, Point::new(0.0, 0.0));
        assert_eq!(input.pointer_move(MOUSE, Point::new(0.0, f64::INFINITY)), None);
        assert!(input.is_drawing());
    }

    #[test]
    fn second_pointer_cannot_hijack_the_stroke() {
        let mut input = InputCapture::new();
        input.pointer_down(FINGER, Point::new(0.0, 0.0));

        assert_eq!(input.pointer_down(MOUSE, Point::new(50.0, 50.0)), None);
        assert_eq!(input.pointer_move(MOUSE, Point::new(51.0, 51.0)), None);
        assert_eq!(
            input.pointer_move(FINGER, Point::new(1.0, 1.0)),
            Some(StrokeCommand::Extend(Point::new(1.0, 1.0)))
        );

        input.pointer_up(MOUSE);
        input.pointer_leave(MOUSE);
        assert!(input.is_drawing());

        input.pointer_up(FINGER);
        assert!(!input.is_drawing());
        assert_eq!(input.active_pointer(), None);
    }

    #[test]
    fn end_gesture_releases_any_pointer() {
        let mut input = InputCapture::new();
        input.pointer_down(FINGER, Point::new(0.0, 0.0));
        input.end_gesture();
        assert_eq!(input.pointer_move(FINGER, Point::new(1.0, 1.0)), None);
        assert!(input.pointer_down(MOUSE, Point::new(2.0, 2.0)).is_some());
    }

    #[test]
    fn bounds_locate_points_relative_to_the_surface() {
        let bounds = SurfaceBounds {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(bounds.locate(15.0, 25.0), Some(Point::new(5.0, 5.0)));
        assert_eq!(bounds.locate(110.0, 70.0), Some(Point::new(100.0, 50.0)));
        assert_eq!(bounds.locate(111.0, 25.0), None);
        assert_eq!(bounds.locate(15.0, 19.0), None);
        assert_eq!(bounds.locate(f64::NAN, 25.0), None);

        let collapsed = SurfaceBounds { width: 0.0, ..bounds };
        assert_eq!(collapsed.locate(10.0, 20.0), None);
    }
}
