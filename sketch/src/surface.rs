use crate::geometry::{BoxList, Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

/// Size and colours of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceStyle {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Unpainted pixels. A cleared canvas reads back as black.
    pub background: [u8; 3],
    /// Stroke colour.
    pub ink: [u8; 3],
    /// Stroke thickness in pixels.
    pub line_width: f32,
    /// Outline colour used by [`Surface::annotated`].
    pub box_color: [u8; 3],
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            width: 600,
            height: 200,
            background: [0, 0, 0],
            ink: [0, 128, 0],
            line_width: 5.0,
            box_color: [255, 0, 0],
        }
    }
}

/// RGB raster that gesture points are painted onto.
#[derive(Debug, Clone)]
pub struct Surface {
    style: SurfaceStyle,
    pixels: RgbImage,
    pen: Option<Point>,
}

impl Surface {
    pub fn new(style: SurfaceStyle) -> Self {
        let pixels = RgbImage::from_pixel(style.width, style.height, Rgb(style.background));
        Self {
            style,
            pixels,
            pen: None,
        }
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Lift the pen so the next `line_to` starts a fresh path.
    pub fn begin_path(&mut self) {
        self.pen = None;
    }

    /// Stroke from the previous pen position to `point`. The first point of a
    /// path paints a single dot.
    pub fn line_to(&mut self, point: Point) {
        let from = self.pen.unwrap_or(point);
        self.stroke_segment(from, point);
        self.pen = Some(point);
    }

    /// Current pixels, as handed to the classifier.
    pub fn snapshot(&self) -> RgbImage {
        self.pixels.clone()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Copy of the snapshot with every non-degenerate box outlined.
    pub fn annotated(&self, boxes: &BoxList) -> RgbImage {
        let mut canvas = self.pixels.clone();
        let color = Rgb(self.style.box_color);
        for bbox in boxes.iter().filter(|b| !b.is_degenerate()) {
            let rect = Rect::at(bbox.left.round() as i32, bbox.top.round() as i32).of_size(
                bbox.width().round().max(1.0) as u32,
                bbox.height().round().max(1.0) as u32,
            );
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
        canvas
    }

    pub fn clear(&mut self) {
        self.pixels = RgbImage::from_pixel(
            self.style.width,
            self.style.height,
            Rgb(self.style.background),
        );
        self.pen = None;
    }

    // Stamps a round brush every pixel along the segment, which also gives
    // round joins between consecutive segments. Only the part of the segment
    // within brush reach of the raster is stamped.
    fn stroke_segment(&mut self, from: Point, to: Point) {
        let color = Rgb(self.style.ink);
        let radius = (self.style.line_width / 2.0).floor().max(0.0) as i32;
        let reach = radius as f64 + 1.0;
        let Some((from, to)) = clip_segment(
            from,
            to,
            (-reach, -reach),
            (
                self.width() as f64 - 1.0 + reach,
                self.height() as f64 - 1.0 + reach,
            ),
        ) else {
            return;
        };

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let steps = dx.hypot(dy).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let cx = (from.x + dx * t).round() as i32;
            let cy = (from.y + dy * t).round() as i32;
            if radius == 0 {
                if cx >= 0 && cy >= 0 && (cx as u32) < self.width() && (cy as u32) < self.height()
                {
                    self.pixels.put_pixel(cx as u32, cy as u32, color);
                }
            } else {
                draw_filled_circle_mut(&mut self.pixels, (cx, cy), radius, color);
            }
        }
    }
}

/// Liang-Barsky clip of `from..to` against the `min..=max` rectangle.
/// Non-finite endpoints clip to nothing.
fn clip_segment(from: Point, to: Point, min: (f64, f64), max: (f64, f64)) -> Option<(Point, Point)> {
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (dx, dy) = (to.x as f64 - x0, to.y as f64 - y0);
    if !(x0.is_finite() && y0.is_finite() && dx.is_finite() && dy.is_finite()) {
        return None;
    }

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, x0 - min.0),
        (dx, max.0 - x0),
        (-dy, y0 - min.1),
        (dy, max.1 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| Point::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    Some((at(t0), at(t1)))
}
