//! Writing stamped photos to disk and packaging them as download links.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use chrono::{DateTime, TimeZone};
use image::{DynamicImage, ImageFormat};

use crate::foundation::error::{GeostampError, GeostampResult};

/// Mime type used for photo download links.
pub const IMAGE_LINK_MIME: &str = "file/jpg";
/// Mime type used for audio download links.
pub const AUDIO_LINK_MIME: &str = "file/wav";

/// Default file name for a photo captured at `at`, e.g. `captured_20240605_154510.jpg`.
pub fn capture_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("captured_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// Encode `img` in `format`. Formats without alpha support get an RGB8 copy.
pub fn encode_image(img: &DynamicImage, format: ImageFormat) -> GeostampResult<Vec<u8>> {
    let mut buf = Vec::new();
    let res = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut Cursor::new(&mut buf), format)
    } else {
        img.write_to(&mut Cursor::new(&mut buf), format)
    };
    res.map_err(|e| GeostampError::export(format!("encode {format:?}: {e}")))?;
    Ok(buf)
}

/// Save `img` to `path`, picking the format from the file extension.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn save_image(img: &DynamicImage, path: &Path) -> GeostampResult<Vec<u8>> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        GeostampError::export(format!("unknown image format for '{}': {e}", path.display()))
    })?;
    let bytes = encode_image(img, format)?;
    std::fs::write(path, &bytes).map_err(|e| {
        GeostampError::export(format!("failed to write '{}': {e}", path.display()))
    })?;
    tracing::debug!(bytes = bytes.len(), "saved image");
    Ok(bytes)
}

/// Inline `data:` URI link that downloads `bytes` as `file_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub file_name: String,
}

impl DownloadLink {
    pub fn new(bytes: &[u8], file_name: impl Into<String>, mime: &str) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            href: format!("data:{mime};base64,{b64}"),
            file_name: file_name.into(),
        }
    }

    /// HTML anchor with `label` as its text.
    pub fn to_html(&self, label: &str) -> String {
        format!(
            r#"<a href="{}" download="{}">{}</a>"#,
            self.href,
            escape_attr(&self.file_name),
            escape_attr(label)
        )
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
