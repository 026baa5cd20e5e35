//! Caption text: the location lines and the capture timestamp stamped onto a photo.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// `05 Jun, 2024 03:45 PM, Wednesday`
pub const TIMESTAMP_FORMAT: &str = "%d %b, %Y %I:%M %p, %A";

const UNKNOWN: &str = "Unknown";

/// Approximate position of the device when the photo was taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Format a capture time for the last caption line.
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Ordered caption lines, drawn top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    lines: Vec<String>,
}

impl Caption {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// City, pincode and coordinate lines for `loc`.
    pub fn for_location(loc: &Location) -> Self {
        Self::new([
            loc.city.as_deref().unwrap_or(UNKNOWN).to_string(),
            format!("Pincode: {}", loc.pincode.as_deref().unwrap_or(UNKNOWN)),
            format!("Lat: {}, Long: {}", loc.latitude, loc.longitude),
        ])
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the lines and a trailing timestamp into one `\n`-separated block.
    ///
    /// An empty timestamp adds no line.
    pub fn text(&self, timestamp: &str) -> String {
        join_lines(&self.lines, timestamp)
    }
}

pub(crate) fn join_lines<S: AsRef<str>>(lines: &[S], timestamp: &str) -> String {
    let mut parts: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
    if !timestamp.is_empty() {
        parts.push(timestamp);
    }
    parts.join("\n")
}

#[cfg(test)]
#[path = "../tests/unit/caption/caption.rs"]
mod tests;
