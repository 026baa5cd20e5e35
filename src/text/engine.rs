use std::collections::HashSet;

use crate::foundation::core::{Rgba8, TextExtent};
use crate::foundation::error::{GeostampError, GeostampResult};

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    registered: HashSet<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashSet::new(),
        }
    }

    /// Register font bytes and return the family name Parley assigned to them.
    pub(crate) fn register_font(&mut self, font_bytes: &[u8]) -> GeostampResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GeostampError::font("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GeostampError::font("registered font family has no name"))?
            .to_string();

        self.registered.insert(family_name.clone());
        Ok(family_name)
    }

    fn ensure_registered(&mut self, family: &str, font_bytes: &[u8]) -> GeostampResult<()> {
        if self.registered.contains(family) {
            return Ok(());
        }
        let got = self.register_font(font_bytes)?;
        if got != family {
            return Err(GeostampError::font(format!(
                "font bytes registered as '{got}', expected '{family}'"
            )));
        }
        Ok(())
    }

    /// Shape and lay out plain multi-line text in `family`, registering its bytes on first use.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        family: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: Rgba8,
    ) -> GeostampResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GeostampError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        self.ensure_registered(family, font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Pixel extent of a laid-out text block, rounded up to whole pixels.
pub(crate) fn layout_extent(layout: &parley::Layout<Rgba8>) -> TextExtent {
    TextExtent::new(
        layout.width().max(0.0).ceil() as u32,
        layout.height().max(0.0).ceil() as u32,
    )
}

/// Slack around a laid-out text block for ink outside the advance box (italics, negative
/// side bearings).
pub(crate) const GLYPH_OVERHANG_PX: u32 = 4;

/// Rasterize `layout` into a transparent premultiplied RGBA8 layer of `extent` pixels, with the
/// layout origin at `(origin, origin)`.
pub(crate) fn rasterize_layout(
    layout: &parley::Layout<Rgba8>,
    font: &vello_cpu::peniko::FontData,
    extent: TextExtent,
    origin: f32,
) -> GeostampResult<Vec<u8>> {
    let w: u16 = extent
        .width
        .try_into()
        .map_err(|_| GeostampError::render("text layer width exceeds u16"))?;
    let h: u16 = extent
        .height
        .try_into()
        .map_err(|_| GeostampError::render("text layer height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + origin,
                y: g.y + origin,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
