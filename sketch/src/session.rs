use crate::geometry::{BoundingBox, BoxList, Point};
use crate::surface::{Surface, SurfaceStyle};
use crate::tracker::StrokeTracker;
use image::RgbImage;

/// Pointer-event front end: paints on the surface and feeds the tracker.
#[derive(Debug, Clone)]
pub struct Sketchpad {
    surface: Surface,
    tracker: StrokeTracker,
}

impl Sketchpad {
    pub fn new(style: SurfaceStyle, padding: f32) -> Self {
        let tracker = StrokeTracker::with_padding(style.width, style.height, padding);
        Self {
            surface: Surface::new(style),
            tracker,
        }
    }

    /// Start a gesture; the press position is its first point.
    pub fn pointer_down(&mut self, point: Point) {
        self.tracker.on_stroke_start();
        self.surface.begin_path();
        self.draw(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.draw(point);
    }

    pub fn pointer_up(&mut self) -> BoundingBox {
        self.tracker.on_stroke_end()
    }

    /// Play back one recorded gesture. An empty gesture still ends a stroke
    /// and so still records a (degenerate) box.
    pub fn replay(&mut self, gesture: &[Point]) -> BoundingBox {
        match gesture.split_first() {
            Some((first, rest)) => {
                self.pointer_down(*first);
                for point in rest {
                    self.pointer_move(*point);
                }
            }
            None => self.tracker.on_stroke_start(),
        }
        self.pointer_up()
    }

    pub fn boxes(&self) -> &BoxList {
        self.tracker.boxes()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn tracker(&self) -> &StrokeTracker {
        &self.tracker
    }

    pub fn snapshot(&self) -> RgbImage {
        self.surface.snapshot()
    }

    pub fn annotated(&self) -> RgbImage {
        self.surface.annotated(self.tracker.boxes())
    }

    pub fn reset(&mut self) {
        self.surface.clear();
        self.tracker.reset();
    }

    fn draw(&mut self, point: Point) {
        if !self.tracker.is_active() {
            return;
        }
        self.surface.line_to(point);
        self.tracker.on_stroke_point(point.x, point.y);
    }
}
