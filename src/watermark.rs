//! Location stamp compositing.
//!
//! The caption block is centered horizontally, sits `bottom_margin_px` above the bottom edge and
//! is drawn over a translucent backing rectangle padded by `padding_px` on every side.
//! The stamped region is blended on a premultiplied RGBA8 patch so the backing stays translucent
//! on opaque inputs, then written back into the bitmap in its own pixel format. Pixels outside
//! the region are never touched.

use std::cell::OnceCell;
use std::sync::Arc;

use image::{ColorType, DynamicImage, GenericImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::caption::join_lines;
use crate::config::{OverflowPolicy, StampStyle};
use crate::foundation::core::{PixelRect, TextExtent};
use crate::foundation::error::{GeostampError, GeostampResult};
use crate::render::composite::{
    fill_rect_over, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::text::engine::TextLayoutEngine;
use crate::text::font::CaptionFont;

/// Where the caption block and its backing land on a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Left edge of the text block.
    pub x: i64,
    /// Top edge of the text block.
    pub y: i64,
    pub extent: TextExtent,
    /// Backing rectangle, inclusive corners.
    pub backing: PixelRect,
}

impl Placement {
    /// Text block as an inclusive-corner rectangle `(x, y) .. (x + tw, y + th)`.
    pub fn text_rect(&self) -> PixelRect {
        PixelRect::new(
            self.x,
            self.y,
            self.x + i64::from(self.extent.width),
            self.y + i64::from(self.extent.height),
        )
    }

    /// Return `true` when the text block lies on a `width` x `height` bitmap.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.text_rect().within(width, height)
    }
}

/// Compute the placement of a caption of `extent` pixels on a `width` x `height` bitmap.
///
/// `x` uses floor division, so it is exact integer truncation whenever the caption is narrower
/// than the bitmap.
pub fn place(
    width: u32,
    height: u32,
    extent: TextExtent,
    bottom_margin_px: u32,
    padding_px: u32,
) -> Placement {
    let tw = i64::from(extent.width);
    let th = i64::from(extent.height);
    let pad = i64::from(padding_px);

    let x = (i64::from(width) - tw).div_euclid(2);
    let y = i64::from(height) - th - i64::from(bottom_margin_px);

    Placement {
        x,
        y,
        extent,
        backing: PixelRect::new(x - pad, y - pad, x + tw + pad, y + th + pad),
    }
}

/// Stamps captions onto bitmaps with one lazily resolved font.
pub struct Compositor {
    style: StampStyle,
    engine: TextLayoutEngine,
    font: OnceCell<Arc<CaptionFont>>,
}

impl Compositor {
    pub fn new(style: StampStyle) -> GeostampResult<Self> {
        style.validate()?;
        Ok(Self {
            style,
            engine: TextLayoutEngine::new(),
            font: OnceCell::new(),
        })
    }

    /// Use an already resolved font instead of loading the one named by `style`.
    pub fn with_font(style: StampStyle, font: Arc<CaptionFont>) -> GeostampResult<Self> {
        style.validate()?;
        Ok(Self {
            style,
            engine: TextLayoutEngine::new(),
            font: OnceCell::from(font),
        })
    }

    pub fn style(&self) -> &StampStyle {
        &self.style
    }

    /// The caption font, loaded on first use. Falls back to the built-in font, never fails.
    pub fn font(&mut self) -> Arc<CaptionFont> {
        let Self {
            style,
            engine,
            font,
        } = self;
        font.get_or_init(|| {
            Arc::new(CaptionFont::load_or_builtin(
                engine,
                style.font.as_deref(),
                style.font_size_px,
                style.builtin_font_scale,
            ))
        })
        .clone()
    }

    /// Pixel extent of `text` in the caption font.
    pub fn measure(&mut self, text: &str) -> GeostampResult<TextExtent> {
        let font = self.font();
        font.measure(&mut self.engine, text)
    }

    /// Measure the caption and place it on a `width` x `height` bitmap.
    pub fn placement<S: AsRef<str>>(
        &mut self,
        width: u32,
        height: u32,
        caption_lines: &[S],
        timestamp: &str,
    ) -> GeostampResult<Placement> {
        let text = join_lines(caption_lines, timestamp);
        let extent = self.measure(&text)?;
        Ok(place(
            width,
            height,
            extent,
            self.style.bottom_margin_px,
            self.style.padding_px,
        ))
    }

    /// Burn the caption and timestamp into `bitmap`.
    ///
    /// Returns a bitmap with the same dimensions and pixel format as the input. Only pixels
    /// under the backing rectangle and the caption ink are rewritten.
    #[tracing::instrument(
        skip_all,
        fields(width = bitmap.width(), height = bitmap.height(), lines = caption_lines.len())
    )]
    pub fn composite<S: AsRef<str>>(
        &mut self,
        mut bitmap: DynamicImage,
        caption_lines: &[S],
        timestamp: &str,
    ) -> GeostampResult<DynamicImage> {
        let (width, height) = (bitmap.width(), bitmap.height());
        if width == 0 || height == 0 {
            return Err(GeostampError::validation(format!(
                "bitmap must be non-empty, got {width}x{height}"
            )));
        }
        let color = bitmap.color();
        ensure_supported(color)?;

        let text = join_lines(caption_lines, timestamp);
        let font = self.font();
        let extent = font.measure(&mut self.engine, &text)?;
        let placement = place(
            width,
            height,
            extent,
            self.style.bottom_margin_px,
            self.style.padding_px,
        );
        tracing::debug!(
            x = placement.x,
            y = placement.y,
            tw = extent.width,
            th = extent.height,
            font = %font.describe(),
            "placed caption"
        );

        if !placement.fits(width, height) {
            match self.style.overflow {
                OverflowPolicy::Clip => {
                    tracing::warn!(
                        tw = extent.width,
                        th = extent.height,
                        "caption does not fit on bitmap, clipping"
                    );
                }
                OverflowPolicy::Reject => {
                    return Err(GeostampError::validation(format!(
                        "caption of {}x{} px does not fit on a {width}x{height} bitmap",
                        extent.width, extent.height
                    )));
                }
            }
        }

        let region = placement
            .backing
            .union(font.ink_rect(placement.x, placement.y, extent));
        let Some((rx0, ry0, rx1, ry1)) = region.clip_to(width, height) else {
            return Ok(bitmap);
        };
        let (rw, rh) = (rx1 - rx0, ry1 - ry0);
        let (ox, oy) = (i64::from(rx0), i64::from(ry0));

        let mut buf = image::imageops::crop_imm(&bitmap, rx0, ry0, rw, rh)
            .to_image()
            .into_raw();
        premultiply_rgba8_in_place(&mut buf);
        fill_rect_over(
            &mut buf,
            rw,
            rh,
            placement.backing.translate(-ox, -oy),
            self.style.backing_rgba.premultiplied(),
        )?;
        font.draw(
            &mut self.engine,
            &mut buf,
            rw,
            rh,
            &text,
            placement.x - ox,
            placement.y - oy,
            self.style.text_rgba,
        )?;
        unpremultiply_rgba8_in_place(&mut buf);

        let patch = RgbaImage::from_raw(rw, rh, buf)
            .ok_or_else(|| GeostampError::render("stamp buffer size mismatch"))?;
        bitmap
            .copy_from(&patch, rx0, ry0)
            .map_err(|e| GeostampError::render(format!("write stamp back: {e}")))?;
        Ok(bitmap)
    }
}

/// Stamp `bitmap` using the default style.
pub fn composite<S: AsRef<str>>(
    bitmap: DynamicImage,
    caption_lines: &[S],
    timestamp: &str,
) -> GeostampResult<DynamicImage> {
    Compositor::new(StampStyle::default())?.composite(bitmap, caption_lines, timestamp)
}

fn ensure_supported(color: ColorType) -> GeostampResult<()> {
    match color {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => Ok(()),
        other => Err(GeostampError::validation(format!(
            "unsupported pixel format {other:?}"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/watermark.rs"]
mod tests;
