//! Turns a bounding box on the surface snapshot into classifier input.

use crate::inference::IntensityImage;
use image::RgbImage;
use sketch::BoundingBox;

/// Value written for samples that fall outside the snapshot.
const EXTRAPOLATION_VALUE: f32 = 0.0;

/// `[y1, x1, y2, x2]` as fractions of the surface.
pub type CropRegion = [f32; 4];

/// Express `bbox` as surface fractions.
///
/// All four coordinates are divided by the surface width unless
/// `y_by_height` is set. With a non-square surface the width-only variant
/// shifts and squashes the crop vertically.
pub fn normalize_box(bbox: &BoundingBox, width: u32, height: u32, y_by_height: bool) -> CropRegion {
    let x_scale = width as f32;
    let y_scale = if y_by_height { height as f32 } else { x_scale };
    [
        bbox.top / y_scale,
        bbox.left / x_scale,
        bbox.bottom / y_scale,
        bbox.right / x_scale,
    ]
}

/// Bilinear crop of `region` resized to `size x size`, channels scaled to `[0, 1]`.
///
/// Sample `i` of `n` lands on `y1 * (H - 1) + i * (y2 - y1) * (H - 1) / (n - 1)`;
/// samples outside the image get [`EXTRAPOLATION_VALUE`]. Inverted regions
/// produce a mirrored crop rather than an error.
pub fn crop_and_resize(image: &RgbImage, region: CropRegion, size: usize) -> Vec<[f32; 3]> {
    let mut out = vec![[EXTRAPOLATION_VALUE; 3]; size * size];
    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 || size == 0 {
        return out;
    }

    let [y1, x1, y2, x2] = region;
    let max_y = (img_h - 1) as f32;
    let max_x = (img_w - 1) as f32;

    for (row, in_y) in sample_positions(y1, y2, max_y, size).enumerate() {
        if !(0.0..=max_y).contains(&in_y) {
            continue;
        }
        let top = in_y.floor();
        let bottom = in_y.ceil();
        let y_lerp = in_y - top;

        for (col, in_x) in sample_positions(x1, x2, max_x, size).enumerate() {
            if !(0.0..=max_x).contains(&in_x) {
                continue;
            }
            let left = in_x.floor();
            let right = in_x.ceil();
            let x_lerp = in_x - left;

            let tl = channels(image, left, top);
            let tr = channels(image, right, top);
            let bl = channels(image, left, bottom);
            let br = channels(image, right, bottom);

            let cell = &mut out[row * size + col];
            for c in 0..3 {
                let upper = tl[c] + (tr[c] - tl[c]) * x_lerp;
                let lower = bl[c] + (br[c] - bl[c]) * x_lerp;
                cell[c] = upper + (lower - upper) * y_lerp;
            }
        }
    }

    out
}

/// Collapse RGB to one channel by the per-pixel channel maximum.
pub fn max_channel(pixels: &[[f32; 3]], size: usize) -> IntensityImage {
    IntensityImage::from_fn(size, |x, y| {
        pixels
            .get(y * size + x)
            .map(|&[r, g, b]| r.max(g).max(b))
            .unwrap_or(EXTRAPOLATION_VALUE)
    })
}

/// Crop `bbox` out of `image` and reduce it to the classifier's input.
pub fn box_to_input(
    image: &RgbImage,
    bbox: &BoundingBox,
    size: usize,
    y_by_height: bool,
) -> IntensityImage {
    let region = normalize_box(bbox, image.width(), image.height(), y_by_height);
    max_channel(&crop_and_resize(image, region, size), size)
}

fn sample_positions(start: f32, end: f32, max: f32, size: usize) -> impl Iterator<Item = f32> {
    let step = if size > 1 {
        (end - start) * max / (size - 1) as f32
    } else {
        0.0
    };
    (0..size).map(move |i| {
        if size > 1 {
            start * max + i as f32 * step
        } else {
            0.5 * (start + end) * max
        }
    })
}

fn channels(image: &RgbImage, x: f32, y: f32) -> [f32; 3] {
    let pixel = image.get_pixel(x as u32, y as u32);
    [
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn box_is_divided_by_width_on_both_axes() {
        let bbox = BoundingBox::new(50.0, 100.0, 150.0, 300.0);
        let region = normalize_box(&bbox, 400, 200, false);
        assert_eq!(region, [0.125, 0.25, 0.375, 0.75]);
    }

    #[test]
    fn y_can_be_divided_by_height() {
        let bbox = BoundingBox::new(50.0, 100.0, 150.0, 300.0);
        let region = normalize_box(&bbox, 400, 200, true);
        assert_eq!(region, [0.25, 0.25, 0.75, 0.75]);
    }

    #[test]
    fn full_region_of_same_size_image_is_identity() {
        let mut image = RgbImage::new(4, 4);
        image.put_pixel(1, 2, Rgb([255, 0, 0]));
        image.put_pixel(3, 0, Rgb([0, 51, 0]));

        let crop = crop_and_resize(&image, [0.0, 0.0, 1.0, 1.0], 4);

        assert_eq!(crop[2 * 4 + 1], [1.0, 0.0, 0.0]);
        assert_eq!(crop[3], [0.0, 0.2, 0.0]);
        assert_eq!(crop[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn samples_outside_the_image_are_zero() {
        let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let crop = crop_and_resize(&image, [-1.0, -1.0, -0.5, -0.5], 8);
        assert!(crop.iter().all(|px| *px == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn partially_outside_region_keeps_inside_samples() {
        let image = RgbImage::from_pixel(11, 11, Rgb([0, 255, 0]));
        let crop = crop_and_resize(&image, [-1.0, 0.0, 1.0, 1.0], 3);

        // rows sample y = -10, 0, 10
        assert!(crop[0..3].iter().all(|px| *px == [0.0, 0.0, 0.0]));
        assert!(crop[3..9].iter().all(|px| *px == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn bilinear_midpoint_blends_neighbours() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([0, 0, 255]));

        let crop = crop_and_resize(&image, [0.0, 0.25, 0.0, 0.75], 1);
        assert!((crop[0][2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn max_channel_picks_brightest_component() {
        let pixels = vec![[0.1, 0.5, 0.2], [0.9, 0.0, 0.3], [0.0, 0.0, 0.0], [0.2, 0.2, 0.7]];
        let gray = max_channel(&pixels, 2);
        assert_eq!(gray.as_slice(), &[0.5, 0.9, 0.0, 0.7]);
    }

    #[test]
    fn ink_inside_box_reaches_the_input() {
        let mut image = RgbImage::new(100, 100);
        for y in 40..60 {
            for x in 40..60 {
                image.put_pixel(x, y, Rgb([0, 128, 0]));
            }
        }
        let bbox = BoundingBox::new(41.0, 41.0, 58.0, 58.0);

        let input = box_to_input(&image, &bbox, 28, false);
        let expected = 128.0 / 255.0;
        assert!(input.as_slice().iter().all(|v| (v - expected).abs() < 1e-3));
    }
}
