use drawsync_shared::{BrushStyle, Point, Stroke};

/// Position of a stroke in the active list at the time it was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeRef(pub usize);

/// Strokes drawn by this session plus the strokes taken back by undo.
///
/// Only the last active stroke is ever mutated; everything before it is
/// frozen. A stroke lives in at most one of the two lists.
#[derive(Default, Debug)]
pub struct StrokeStore {
    active: Vec<Stroke>,
    undone: Vec<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_stroke(&mut self, origin: Point, style: &BrushStyle) -> StrokeRef {
        self.active.push(Stroke::new(origin, style));
        StrokeRef(self.active.len() - 1)
    }

    /// Appends to the last active stroke. Does nothing when there is none,
    /// which happens when a move races a pointer-up.
    pub fn extend_last_stroke(&mut self, point: Point) -> Option<&Stroke> {
        let stroke = self.active.last_mut()?;
        stroke.push(point);
        Some(&*stroke)
    }

    pub fn undo_last(&mut self) -> Option<&Stroke> {
        let stroke = self.active.pop()?;
        self.undone.push(stroke);
        self.undone.last()
    }

    pub fn redo_last(&mut self) -> Option<&Stroke> {
        let stroke = self.undone.pop()?;
        self.active.push(stroke);
        self.active.last()
    }

    pub fn snapshot(&self) -> &[Stroke] {
        &self.active
    }

    pub fn undone(&self) -> &[Stroke] {
        &self.undone
    }

    pub fn get(&self, stroke: StrokeRef) -> Option<&Stroke> {
        self.active.get(stroke.0)
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.active.last()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear_undone(&mut self) {
        self.undone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> BrushStyle {
        BrushStyle::default()
    }

    #[test]
    fn begin_stroke_returns_index_of_new_last_stroke() {
        let mut store = StrokeStore::new();
        let first = store.begin_stroke(Point::new(0.0, 0.0), &style());
        let second = store.begin_stroke(Point::new(5.0, 5.0), &style());
        assert_eq!(first, StrokeRef(0));
        assert_eq!(second, StrokeRef(1));
        assert_eq!(store.get(second), store.last());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn extend_touches_only_last_stroke() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(0.0, 0.0), &style());
        store.begin_stroke(Point::new(5.0, 5.0), &style());
        store.extend_last_stroke(Point::new(6.0, 6.0));

        assert_eq!(store.snapshot()[0].points, vec![0.0, 0.0]);
        assert_eq!(store.snapshot()[1].points, vec![5.0, 5.0, 6.0, 6.0]);
    }

    #[test]
    fn extend_on_empty_store_is_noop() {
        let mut store = StrokeStore::new();
        assert!(store.extend_last_stroke(Point::new(1.0, 1.0)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn undo_then_redo_restores_both_lists() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(1.0, 1.0), &style());
        store.extend_last_stroke(Point::new(2.0, 2.0));
        store.begin_stroke(Point::new(3.0, 3.0), &style());
        let active = store.snapshot().to_vec();
        let undone = store.undone().to_vec();

        let popped = store.undo_last().cloned();
        assert_eq!(popped.as_ref(), active.last());
        assert_eq!(store.len(), 1);
        assert_eq!(store.undone().len(), 1);

        store.redo_last();
        assert_eq!(store.snapshot(), active.as_slice());
        assert_eq!(store.undone(), undone.as_slice());
    }

    #[test]
    fn undo_and_redo_on_empty_lists_are_noops() {
        let mut store = StrokeStore::new();
        assert!(store.undo_last().is_none());
        assert!(store.redo_last().is_none());
        assert!(store.is_empty());
        assert!(store.undone().is_empty());
    }

    #[test]
    fn redo_list_survives_new_stroke() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(1.0, 1.0), &style());
        store.undo_last();
        store.begin_stroke(Point::new(2.0, 2.0), &style());
        assert_eq!(store.undone().len(), 1);

        store.redo_last();
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot()[1].points, vec![1.0, 1.0]);
    }
}
