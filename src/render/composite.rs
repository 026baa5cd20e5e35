use crate::foundation::core::{PixelRect, Rgba8Premul};
use crate::foundation::error::{GeostampError, GeostampResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over of one premultiplied pixel onto another.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Blend `color` over every canvas pixel covered by `rect`, clipping to the canvas.
pub fn fill_rect_over(
    dst: &mut [u8],
    width: u32,
    height: u32,
    rect: PixelRect,
    color: Rgba8Premul,
) -> GeostampResult<()> {
    check_len(dst, width, height, "fill_rect_over")?;
    let Some((x0, y0, x1, y1)) = rect.clip_to(width, height) else {
        return Ok(());
    };
    let src = color.to_array();
    let stride = width as usize * 4;
    for y in y0..y1 {
        let row = &mut dst[y as usize * stride..(y as usize + 1) * stride];
        for px in row[x0 as usize * 4..x1 as usize * 4].chunks_exact_mut(4) {
            let out = over([px[0], px[1], px[2], px[3]], src);
            px.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Composite a premultiplied `layer` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of the layer falling outside the canvas are dropped.
#[allow(clippy::too_many_arguments)]
pub fn blit_over(
    dst: &mut [u8],
    width: u32,
    height: u32,
    layer: &[u8],
    layer_width: u32,
    layer_height: u32,
    x: i64,
    y: i64,
) -> GeostampResult<()> {
    check_len(dst, width, height, "blit_over dst")?;
    check_len(layer, layer_width, layer_height, "blit_over layer")?;
    if layer_width == 0 || layer_height == 0 {
        return Ok(());
    }
    let rect = PixelRect::new(
        x,
        y,
        x + i64::from(layer_width) - 1,
        y + i64::from(layer_height) - 1,
    );
    let Some((x0, y0, x1, y1)) = rect.clip_to(width, height) else {
        return Ok(());
    };

    for cy in y0..y1 {
        let ly = (i64::from(cy) - y) as usize;
        for cx in x0..x1 {
            let lx = (i64::from(cx) - x) as usize;
            let si = (ly * layer_width as usize + lx) * 4;
            let di = (cy as usize * width as usize + cx as usize) * 4;
            let s = &layer[si..si + 4];
            let d = &mut dst[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

fn check_len(buf: &[u8], width: u32, height: u32, what: &str) -> GeostampResult<()> {
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if buf.len() != expected {
        return Err(GeostampError::render(format!(
            "{what} expects a {width}x{height} rgba8 buffer ({expected} bytes), got {}",
            buf.len()
        )));
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
