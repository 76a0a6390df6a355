use crate::geometry::{BoundingBox, BoxList, Point};
use tracing::debug;

/// Margin added around every gesture, split evenly between opposite sides.
pub const DEFAULT_PADDING: f32 = 40.0;

/// Running min/max bounds of the points seen in the current gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsAccumulator {
    surface_width: f32,
    surface_height: f32,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl BoundsAccumulator {
    pub fn new(surface_width: f32, surface_height: f32) -> Self {
        let mut acc = Self {
            surface_width,
            surface_height,
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        };
        acc.reset();
        acc
    }

    /// Back to the extremes: min at the surface size, max at zero.
    pub fn reset(&mut self) {
        self.min_x = self.surface_width;
        self.min_y = self.surface_height;
        self.max_x = 0.0;
        self.max_y = 0.0;
    }

    pub fn include(&mut self, point: Point) {
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
    }

    pub fn to_box(&self, padding: f32) -> BoundingBox {
        let half = padding / 2.0;
        BoundingBox::new(
            self.min_y - half,
            self.min_x - half,
            self.max_y + half,
            self.max_x + half,
        )
    }
}

/// Turns pointer-drag gestures into padded bounding boxes.
///
/// Every `on_stroke_end` appends exactly one box, whatever the gesture looked
/// like. A click with a single point gives a padding-sized box; a gesture with
/// no points at all gives an inverted (degenerate) box.
#[derive(Debug, Clone)]
pub struct StrokeTracker {
    accumulator: BoundsAccumulator,
    padding: f32,
    active: bool,
    boxes: BoxList,
}

impl StrokeTracker {
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self::with_padding(surface_width, surface_height, DEFAULT_PADDING)
    }

    pub fn with_padding(surface_width: u32, surface_height: u32, padding: f32) -> Self {
        Self {
            accumulator: BoundsAccumulator::new(surface_width as f32, surface_height as f32),
            padding,
            active: false,
            boxes: BoxList::new(),
        }
    }

    pub fn on_stroke_start(&mut self) {
        self.accumulator.reset();
        self.active = true;
    }

    /// Widen the running bounds. Ignored when no gesture is in progress.
    pub fn on_stroke_point(&mut self, x: f32, y: f32) {
        if !self.active {
            return;
        }
        self.accumulator.include(Point::new(x, y));
    }

    pub fn on_stroke_end(&mut self) -> BoundingBox {
        let bbox = self.accumulator.to_box(self.padding);
        self.boxes.push(bbox);
        self.accumulator.reset();
        self.active = false;

        debug!(
            index = self.boxes.len() - 1,
            top = bbox.top,
            left = bbox.left,
            bottom = bbox.bottom,
            right = bbox.right,
            "recorded gesture box"
        );
        bbox
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn boxes(&self) -> &BoxList {
        &self.boxes
    }

    /// Full session reset: drops every recorded box.
    pub fn reset(&mut self) {
        self.boxes.clear();
        self.accumulator.reset();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_is_padded_min_max_of_points() {
        let mut tracker = StrokeTracker::with_padding(600, 200, 40.0);
        tracker.on_stroke_start();
        tracker.on_stroke_point(10.0, 10.0);
        tracker.on_stroke_point(20.0, 10.0);
        tracker.on_stroke_point(20.0, 20.0);
        let bbox = tracker.on_stroke_end();

        assert_eq!(bbox, BoundingBox::new(-10.0, -10.0, 40.0, 40.0));
    }

    #[test]
    fn repeated_point_does_not_change_bounds() {
        let mut once = StrokeTracker::new(600, 200);
        once.on_stroke_start();
        once.on_stroke_point(42.0, 17.0);
        once.on_stroke_point(80.0, 90.0);

        let mut many = StrokeTracker::new(600, 200);
        many.on_stroke_start();
        for _ in 0..5 {
            many.on_stroke_point(42.0, 17.0);
        }
        many.on_stroke_point(80.0, 90.0);
        many.on_stroke_point(80.0, 90.0);

        assert_eq!(once.on_stroke_end(), many.on_stroke_end());
    }

    #[test]
    fn single_click_gives_padding_sized_box() {
        let mut tracker = StrokeTracker::new(600, 200);
        tracker.on_stroke_start();
        tracker.on_stroke_point(100.0, 50.0);
        let bbox = tracker.on_stroke_end();

        assert!(!bbox.is_degenerate());
        assert_eq!(bbox.width(), DEFAULT_PADDING);
        assert_eq!(bbox.height(), DEFAULT_PADDING);
    }

    #[test]
    fn empty_gesture_still_appends_a_degenerate_box() {
        let mut tracker = StrokeTracker::new(600, 200);
        tracker.on_stroke_start();
        let bbox = tracker.on_stroke_end();

        assert_eq!(tracker.boxes().len(), 1);
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn points_outside_a_gesture_are_ignored() {
        let mut tracker = StrokeTracker::with_padding(600, 200, 0.0);
        tracker.on_stroke_point(500.0, 150.0);
        tracker.on_stroke_start();
        tracker.on_stroke_point(30.0, 40.0);
        let bbox = tracker.on_stroke_end();
        tracker.on_stroke_point(1.0, 1.0);

        assert_eq!(bbox, BoundingBox::new(40.0, 30.0, 40.0, 30.0));
        assert!(!tracker.is_active());
    }

    #[test]
    fn accumulator_resets_between_gestures() {
        let mut tracker = StrokeTracker::with_padding(600, 200, 0.0);
        tracker.on_stroke_start();
        tracker.on_stroke_point(10.0, 10.0);
        tracker.on_stroke_end();

        tracker.on_stroke_start();
        tracker.on_stroke_point(300.0, 100.0);
        let second = tracker.on_stroke_end();

        assert_eq!(second, BoundingBox::new(100.0, 300.0, 100.0, 300.0));
        assert_eq!(tracker.boxes().len(), 2);
    }

    #[test]
    fn reset_clears_boxes() {
        let mut tracker = StrokeTracker::new(600, 200);
        tracker.on_stroke_start();
        tracker.on_stroke_point(10.0, 10.0);
        tracker.on_stroke_end();
        tracker.reset();

        assert!(tracker.boxes().is_empty());
    }
}
