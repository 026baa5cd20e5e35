use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{GeostampError, GeostampResult};
use crate::text::bitmap::MAX_SCALE;

/// What to do when the caption does not fit on the bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Draw anyway; anything outside the canvas is dropped.
    #[default]
    Clip,
    /// Fail with a validation error and leave the bitmap untouched.
    Reject,
}

/// Visual parameters of the location stamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampStyle {
    /// Preferred TrueType font. A bare file name is searched in the platform font directories.
    pub font: Option<PathBuf>,
    pub font_size_px: f32,
    /// Integer scale of the built-in fallback font.
    pub builtin_font_scale: u32,
    /// Gap between the bottom of the text block and the bottom edge of the bitmap.
    pub bottom_margin_px: u32,
    /// Backing rectangle padding on every side of the text block.
    pub padding_px: u32,
    pub backing_rgba: Rgba8,
    pub text_rgba: Rgba8,
    pub overflow: OverflowPolicy,
}

impl Default for StampStyle {
    fn default() -> Self {
        Self {
            font: Some(PathBuf::from("arial.ttf")),
            font_size_px: 30.0,
            builtin_font_scale: 2,
            bottom_margin_px: 30,
            padding_px: 10,
            backing_rgba: Rgba8::new(0, 0, 0, 150),
            text_rgba: Rgba8::WHITE,
            overflow: OverflowPolicy::Clip,
        }
    }
}

impl StampStyle {
    /// Style that never looks for a TrueType font and always draws with the built-in one.
    pub fn builtin() -> Self {
        Self {
            font: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GeostampResult<()> {
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(GeostampError::validation(
                "font_size_px must be finite and > 0",
            ));
        }
        if !(1..=MAX_SCALE).contains(&self.builtin_font_scale) {
            return Err(GeostampError::validation(format!(
                "builtin_font_scale must be in 1..={MAX_SCALE}"
            )));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> GeostampResult<Self> {
        let style: Self = serde_json::from_str(s)
            .map_err(|e| GeostampError::serde(format!("invalid stamp style: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_json_file(path: &Path) -> GeostampResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read stamp style '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/style.rs"]
mod tests;
