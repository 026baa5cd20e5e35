use super::*;

#[test]
fn rgba8_serializes_as_array() {
    let c = Rgba8::new(0, 0, 0, 150);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "[0,0,0,150]");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn premultiply_black_keeps_alpha() {
    let p = Rgba8::new(0, 0, 0, 150).premultiplied();
    assert_eq!(p.to_array(), [0, 0, 0, 150]);
}

#[test]
fn premultiply_rounds_to_nearest() {
    let p = Rgba8Premul::from_straight_rgba(100, 50, 200, 128);
    assert_eq!(p.to_array(), [50, 25, 100, 128]);
}

#[test]
fn rect_within_uses_inclusive_bounds() {
    assert!(PixelRect::new(0, 0, 10, 10).within(10, 10));
    assert!(!PixelRect::new(-1, 0, 10, 10).within(10, 10));
    assert!(!PixelRect::new(0, 0, 11, 10).within(10, 10));
}

#[test]
fn rect_clip_to_canvas() {
    let r = PixelRect::new(-5, 2, 3, 20);
    assert_eq!(r.clip_to(10, 10), Some((0, 2, 4, 10)));
}

#[test]
fn rect_fully_outside_clips_to_none() {
    assert_eq!(PixelRect::new(20, 20, 30, 30).clip_to(10, 10), None);
    assert_eq!(PixelRect::new(-30, 0, -1, 5).clip_to(10, 10), None);
}

#[test]
fn empty_extent() {
    assert!(TextExtent::default().is_empty());
    assert!(!TextExtent::new(3, 4).is_empty());
}

#[test]
fn rect_translate_union_inflate() {
    let a = PixelRect::new(0, 0, 4, 4);
    assert_eq!(a.translate(-2, 3), PixelRect::new(-2, 3, 2, 7));
    assert_eq!(
        a.union(PixelRect::new(-1, 2, 3, 9)),
        PixelRect::new(-1, 0, 4, 9)
    );
    assert_eq!(a.inflate(2), PixelRect::new(-2, -2, 6, 6));
}
