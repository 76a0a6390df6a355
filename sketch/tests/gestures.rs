use sketch::{BoundingBox, Point, Sketchpad, SurfaceStyle};

fn gesture(points: &[(f32, f32)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn two_gestures_are_recorded_in_drawing_order() {
    let mut pad = Sketchpad::new(SurfaceStyle::default(), 40.0);

    pad.replay(&gesture(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]));
    pad.replay(&gesture(&[(200.0, 50.0), (240.0, 120.0)]));

    let boxes = pad.boxes();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes.get(0), Some(&BoundingBox::new(-10.0, -10.0, 40.0, 40.0)));
    assert_eq!(boxes.get(1), Some(&BoundingBox::new(30.0, 180.0, 140.0, 260.0)));
}

#[test]
fn replayed_strokes_are_painted_on_the_snapshot() {
    let mut pad = Sketchpad::new(SurfaceStyle::default(), 40.0);
    pad.replay(&gesture(&[(100.0, 100.0), (140.0, 100.0)]));

    let snapshot = pad.snapshot();
    assert_eq!(snapshot.get_pixel(120, 100).0, [0, 128, 0]);
    assert_eq!(snapshot.get_pixel(120, 150).0, [0, 0, 0]);
}

#[test]
fn empty_gesture_records_a_degenerate_box() {
    let mut pad = Sketchpad::new(SurfaceStyle::default(), 40.0);
    let bbox = pad.replay(&[]);

    assert!(bbox.is_degenerate());
    assert_eq!(pad.boxes().len(), 1);
}

#[test]
fn reset_clears_surface_and_boxes() {
    let mut pad = Sketchpad::new(SurfaceStyle::default(), 40.0);
    pad.replay(&gesture(&[(100.0, 100.0), (140.0, 100.0)]));
    pad.reset();

    assert!(pad.boxes().is_empty());
    assert!(pad.snapshot().pixels().all(|p| p.0 == [0, 0, 0]));
}
