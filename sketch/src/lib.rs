//! Drawing side of the digit recognizer: a raster surface that pointer
//! gestures are painted onto, and a tracker that turns each gesture into a
//! padded bounding box.

mod geometry;
mod session;
mod surface;
mod tracker;

pub use geometry::{BoundingBox, BoxList, Point};
pub use session::Sketchpad;
pub use surface::{Surface, SurfaceStyle};
pub use tracker::{BoundsAccumulator, DEFAULT_PADDING, StrokeTracker};
