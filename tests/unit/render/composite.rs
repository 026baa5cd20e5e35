use super::*;

fn repeat_px(px: [u8; 4], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * 4);
    for _ in 0..n {
        out.extend_from_slice(&px);
    }
    out
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [0, 0, 0, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_translucent_black_darkens_opaque_white() {
    let out = over([255, 255, 255, 255], [0, 0, 0, 150]);
    assert_eq!(out, [105, 105, 105, 255]);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_pixels() {
    let mut buf = vec![12, 34, 56, 255, 200, 100, 50, 255];
    let orig = buf.clone();
    premultiply_rgba8_in_place(&mut buf);
    unpremultiply_rgba8_in_place(&mut buf);
    assert_eq!(buf, orig);
}

#[test]
fn unpremultiply_half_alpha() {
    let mut buf = vec![64, 0, 128, 128];
    unpremultiply_rgba8_in_place(&mut buf);
    assert_eq!(buf, vec![128, 0, 255, 128]);
}

#[test]
fn fill_rect_is_inclusive_and_clipped() {
    let mut buf = repeat_px([255, 255, 255, 255], 4 * 4);
    fill_rect_over(
        &mut buf,
        4,
        4,
        PixelRect::new(-3, 1, 1, 2),
        Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
    )
    .unwrap();

    let px = |x: usize, y: usize| &buf[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(0, 1), &[0, 0, 0, 255]);
    assert_eq!(px(1, 2), &[0, 0, 0, 255]);
    assert_eq!(px(2, 1), &[255, 255, 255, 255]);
    assert_eq!(px(0, 0), &[255, 255, 255, 255]);
    assert_eq!(px(0, 3), &[255, 255, 255, 255]);
}

#[test]
fn fill_rect_rejects_wrong_buffer_len() {
    let mut buf = vec![0u8; 7];
    let err = fill_rect_over(
        &mut buf,
        2,
        1,
        PixelRect::new(0, 0, 1, 0),
        Rgba8Premul::from_straight_rgba(0, 0, 0, 255),
    )
    .unwrap_err();
    assert!(err.to_string().contains("render error:"));
}

#[test]
fn blit_over_clips_negative_offset() {
    let mut dst = repeat_px([0, 0, 0, 255], 3 * 3);
    let layer = repeat_px([255, 255, 255, 255], 2 * 2);
    blit_over(&mut dst, 3, 3, &layer, 2, 2, -1, 2).unwrap();

    let px = |x: usize, y: usize| &dst[(y * 3 + x) * 4..(y * 3 + x) * 4 + 4];
    assert_eq!(px(0, 2), &[255, 255, 255, 255]);
    assert_eq!(px(1, 2), &[0, 0, 0, 255]);
    assert_eq!(px(0, 1), &[0, 0, 0, 255]);
}

#[test]
fn blit_over_empty_layer_is_noop() {
    let mut dst = repeat_px([1, 2, 3, 255], 4);
    let before = dst.clone();
    blit_over(&mut dst, 2, 2, &[], 0, 0, 0, 0).unwrap();
    assert_eq!(dst, before);
}
