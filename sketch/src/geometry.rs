use serde::{Deserialize, Serialize};

/// A pointer position in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Padded, axis-aligned box around one gesture, in surface pixels.
///
/// The coordinates are not clamped to the surface, so a stroke near the edge
/// yields negative values or values past the width/height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// An inverted box, produced by a gesture that never recorded a point.
    pub fn is_degenerate(&self) -> bool {
        self.top > self.bottom || self.left > self.right
    }

    /// `[top, left, bottom, right]`, the order crop regions are expressed in.
    pub fn to_array(&self) -> [f32; 4] {
        [self.top, self.left, self.bottom, self.right]
    }
}

/// Boxes in the order their gestures ended.
///
/// Only appended to while drawing; cleared on a full session reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxList {
    boxes: Vec<BoundingBox>,
}

impl BoxList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bbox: BoundingBox) {
        self.boxes.push(bbox);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoundingBox> {
        self.boxes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundingBox> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }
}

impl<'a> IntoIterator for &'a BoxList {
    type Item = &'a BoundingBox;
    type IntoIter = std::slice::Iter<'a, BoundingBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

impl FromIterator<BoundingBox> for BoxList {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}
