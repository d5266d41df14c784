//! Combined-document manifest.
//!
//! The manifest is one comment line at the very top of a combined
//! document:
//!
//! ```text
//! /* FCS_MANIFEST_V1:[{"path":"src/main.js","size":21},{"path":"readme.md","size":12}] */
//! ```
//!
//! Sizes are the exact byte lengths of each file's content as emitted,
//! which lets the splitter slice contents back out instead of trusting
//! delimiter parsing. File contents that happen to look like delimiters
//! survive the round trip because of this line.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tag marking the manifest line. The version suffix is part of the tag;
/// a future format change gets a new tag rather than new semantics.
pub const MANIFEST_TAG: &str = "FCS_MANIFEST_V1";

/// Path and exact emitted byte length of one combined file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub size: u64,
}

/// Render the manifest comment line, without a trailing newline.
pub fn render_line(entries: &[ManifestEntry]) -> Result<String> {
    Ok(format!("/* {}:{} */", MANIFEST_TAG, serde_json::to_string(entries)?))
}

/// Parse the JSON array captured from a manifest line.
pub fn parse_entries(json: &str) -> Result<Vec<ManifestEntry>> {
    Ok(serde_json::from_str(json)?)
}
