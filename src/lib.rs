//! Geostamp burns a location and time caption into photographs.
//!
//! - Build a [`Caption`] from a [`Location`] and a formatted timestamp
//! - Stamp a bitmap with a [`Compositor`] (or the one-shot [`composite`])
//! - Save the result and wrap it in a [`DownloadLink`]
#![forbid(unsafe_code)]

mod foundation;

pub mod caption;
pub mod config;
pub mod export;
pub(crate) mod render;
pub mod text;
pub mod watermark;

pub use crate::caption::{Caption, Location, TIMESTAMP_FORMAT, format_timestamp};
pub use crate::config::{OverflowPolicy, StampStyle};
pub use crate::export::{DownloadLink, capture_file_name, encode_image, save_image};
pub use crate::foundation::core::{PixelRect, Rgba8, Rgba8Premul, TextExtent};
pub use crate::foundation::error::{GeostampError, GeostampResult};
pub use crate::text::bitmap::BitmapFont;
pub use crate::text::font::{CaptionFont, TrueTypeFont, resolve_font_path};
pub use crate::watermark::{Compositor, Placement, composite, place};
