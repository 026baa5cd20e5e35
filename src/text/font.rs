use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{PixelRect, Rgba8, TextExtent};
use crate::foundation::error::{GeostampError, GeostampResult};
use crate::text::bitmap::BitmapFont;
use crate::text::engine::{
    GLYPH_OVERHANG_PX, TextLayoutEngine, layout_extent, rasterize_layout,
};

const FONT_SEARCH_MAX_DEPTH: usize = 4;

/// A TrueType/OpenType face loaded from disk and registered with the layout engine.
#[derive(Clone)]
pub struct TrueTypeFont {
    path: PathBuf,
    family: String,
    size_px: f32,
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("path", &self.path)
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl TrueTypeFont {
    pub(crate) fn load(
        engine: &mut TextLayoutEngine,
        requested: &Path,
        size_px: f32,
    ) -> GeostampResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GeostampError::validation(
                "font size_px must be finite and > 0",
            ));
        }
        let path = resolve_font_path(requested).ok_or_else(|| {
            GeostampError::font(format!("font '{}' not found", requested.display()))
        })?;
        let bytes = std::fs::read(&path).map_err(|e| {
            GeostampError::font(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let family = engine.register_font(&bytes)?;
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        let bytes = Arc::new(bytes);
        Ok(Self {
            path,
            family,
            size_px,
            bytes,
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }
}

/// Font used to draw a caption: the preferred face, or the built-in fallback.
#[derive(Clone, Debug)]
pub enum CaptionFont {
    TrueType(TrueTypeFont),
    Builtin(BitmapFont),
}

impl CaptionFont {
    /// Load `requested` at `size_px`, substituting the built-in font on any failure.
    #[tracing::instrument(skip(engine))]
    pub(crate) fn load_or_builtin(
        engine: &mut TextLayoutEngine,
        requested: Option<&Path>,
        size_px: f32,
        builtin_scale: u32,
    ) -> Self {
        let builtin = || Self::Builtin(BitmapFont::new(builtin_scale));
        let Some(requested) = requested else {
            return builtin();
        };
        match TrueTypeFont::load(engine, requested, size_px) {
            Ok(font) => {
                tracing::debug!(
                    path = %font.path.display(),
                    family = %font.family,
                    "loaded caption font"
                );
                Self::TrueType(font)
            }
            Err(err) => {
                tracing::warn!(%err, "preferred font unavailable, using built-in font");
                builtin()
            }
        }
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::TrueType(f) => {
                format!("{} ({}) @ {}px", f.family, f.path.display(), f.size_px)
            }
            Self::Builtin(f) => format!("built-in 5x7 x{}", f.scale()),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    pub(crate) fn measure(
        &self,
        engine: &mut TextLayoutEngine,
        text: &str,
    ) -> GeostampResult<TextExtent> {
        if text.is_empty() {
            return Ok(TextExtent::default());
        }
        match self {
            Self::Builtin(f) => Ok(f.measure(text)),
            Self::TrueType(f) => {
                let layout =
                    engine.layout_plain(text, &f.family, &f.bytes, f.size_px, Rgba8::WHITE)?;
                Ok(layout_extent(&layout))
            }
        }
    }

    /// Pixels `draw` may touch for a text block of `extent` placed at `(x, y)`.
    ///
    /// Outline faces get [`GLYPH_OVERHANG_PX`] of slack on every side for ink outside the
    /// advance box.
    pub(crate) fn ink_rect(&self, x: i64, y: i64, extent: TextExtent) -> PixelRect {
        let rect = PixelRect::new(
            x,
            y,
            x + i64::from(extent.width),
            y + i64::from(extent.height),
        );
        match self {
            Self::Builtin(_) => rect,
            Self::TrueType(_) => rect.inflate(i64::from(GLYPH_OVERHANG_PX)),
        }
    }

    /// Draw `text` at `(x, y)` onto a premultiplied RGBA8 canvas, clipping to its bounds.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw(
        &self,
        engine: &mut TextLayoutEngine,
        dst: &mut [u8],
        width: u32,
        height: u32,
        text: &str,
        x: i64,
        y: i64,
        color: Rgba8,
    ) -> GeostampResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self {
            Self::Builtin(f) => f.draw(dst, width, height, text, x, y, color),
            Self::TrueType(f) => {
                let layout = engine.layout_plain(text, &f.family, &f.bytes, f.size_px, color)?;
                let extent = layout_extent(&layout);
                if extent.is_empty() {
                    return Ok(());
                }
                let pad = GLYPH_OVERHANG_PX;
                let layer_extent = TextExtent::new(
                    extent.width.saturating_add(2 * pad),
                    extent.height.saturating_add(2 * pad),
                );
                let layer = rasterize_layout(&layout, &f.data, layer_extent, pad as f32)?;
                crate::render::composite::blit_over(
                    dst,
                    width,
                    height,
                    &layer,
                    layer_extent.width,
                    layer_extent.height,
                    x - i64::from(pad),
                    y - i64::from(pad),
                )
            }
        }
    }
}

/// Resolve a font path the way desktop imaging tools do: as given, else by file name in the
/// platform font directories.
pub fn resolve_font_path(requested: &Path) -> Option<PathBuf> {
    if requested.is_file() {
        return Some(requested.to_path_buf());
    }
    if requested.components().count() != 1 {
        return None;
    }
    let name = requested.file_name()?;
    font_dirs()
        .into_iter()
        .find_map(|dir| find_file(&dir, name, FONT_SEARCH_MAX_DEPTH))
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    if let Some(windir) = std::env::var_os("WINDIR").map(PathBuf::from) {
        dirs.push(windir.join("Fonts"));
    }
    dirs.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
        ]
        .into_iter()
        .map(PathBuf::from),
    );
    dirs
}

fn find_file(dir: &Path, name: &std::ffi::OsStr, depth: usize) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if candidate.is_file() {
        return Some(candidate);
    }
    if depth == 0 {
        return None;
    }
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, name, depth - 1))
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
