//! Combined-document parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::manifest::{self, ManifestEntry};

/// One file recovered from a combined document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFile {
    pub path: String,
    pub content: String,
}

static MANIFEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"/\*\s*{}:(\[.*?\])\s*\*/", manifest::MANIFEST_TAG)).unwrap()
});

/// Loose match for a default start delimiter, used only to locate line
/// positions when slicing by manifest sizes.
static START_HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*\s*====\s*START").unwrap());

/// Full default start delimiter with filename and path captures.
static START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\*\s*====\s*START\s*\d+/\d+\s*-\s*(.*?)\s*\((.*?)\)\s*====\s*\*/").unwrap()
});

/// Default end delimiter.
static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*\s*====\s*END\s*-\s*.*?\s*====\s*\*/").unwrap());

/// Parses combined documents back into their files.
///
/// Two strategies, tried in order:
///
/// 1. Manifest slicing. When the document opens with a valid manifest,
///    contents are cut out by the recorded byte sizes. Delimiters are
///    used only as line anchors, so file contents that contain
///    delimiter-looking text survive intact.
/// 2. Delimiter scanning. Without a manifest (or with one that fails to
///    parse), the default start delimiters partition the document and
///    the path is read out of each delimiter's parentheses.
///
/// Both strategies recognize the default delimiter shape (or none at
/// all, for comment-less documents). A document combined with custom
/// delimiter templates is for human consumption and does not split.
#[derive(Debug, Default)]
pub struct Splitter;

impl Splitter {
    pub fn new() -> Self {
        Self
    }

    /// Split a combined document into its files.
    pub fn split(&self, text: &str) -> Result<Vec<SplitFile>> {
        if let Some(caps) = MANIFEST_RE.captures(text) {
            let manifest_end = caps.get(0).map_or(0, |m| m.end());
            match manifest::parse_entries(&caps[1]) {
                Ok(entries) => return Ok(slice_by_manifest(text, manifest_end, &entries)),
                Err(err) => {
                    log::warn!("malformed manifest, falling back to delimiter scan: {}", err);
                }
            }
        }
        scan_by_delimiters(text)
    }
}

/// Byte position just past the newline that ends the line containing
/// `from`, or the end of text for the last line.
fn skip_line(text: &str, from: usize) -> usize {
    match text[from..].find('\n') {
        Some(at) => from + at + 1,
        None => text.len(),
    }
}

fn slice_by_manifest(text: &str, manifest_end: usize, entries: &[ManifestEntry]) -> Vec<SplitFile> {
    let first_start = START_HINT_RE.find_at(text, manifest_end);
    let has_delimiters = first_start.is_some();

    // Position the cursor at the first byte of file content: right after
    // the first start delimiter's line, or past the blank line that
    // closes the preamble when comments were suppressed.
    let mut cursor = match first_start {
        Some(m) => skip_line(text, m.start()),
        None => match text[manifest_end..].find("\n\n") {
            Some(at) => manifest_end + at + 2,
            None => {
                let rest = &text[manifest_end..];
                manifest_end + (rest.len() - rest.trim_start().len())
            }
        },
    };

    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let remaining = text.len().saturating_sub(cursor);
        let wanted = entry.size as usize;
        let mut take = wanted.min(remaining);
        if wanted > remaining {
            log::warn!(
                "manifest size {} for '{}' exceeds the {} bytes left; clamping",
                wanted,
                entry.path,
                remaining
            );
        }
        // A clamped cut can land inside a multi-byte character.
        while take > 0 && !text.is_char_boundary(cursor + take) {
            take -= 1;
        }
        files.push(SplitFile {
            path: entry.path.clone(),
            content: text[cursor..cursor + take].to_string(),
        });
        cursor += take;

        if has_delimiters {
            if let Some(next) = START_HINT_RE.find_at(text, cursor) {
                cursor = skip_line(text, next.start());
            }
        } else if text[cursor..].starts_with("\n\n") {
            // Comment-less sections are separated by one blank line.
            cursor += 2;
        }
    }
    files
}

fn scan_by_delimiters(text: &str) -> Result<Vec<SplitFile>> {
    let sections: Vec<(std::ops::Range<usize>, String)> = START_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let path = caps.get(2)?.as_str().trim().to_string();
            Some((whole.range(), path))
        })
        .collect();

    if sections.is_empty() {
        return Err(Error::UnrecognizedFormat);
    }

    let mut files = Vec::new();
    for (i, (range, path)) in sections.iter().enumerate() {
        if path.is_empty() {
            log::debug!("skipping start delimiter with an empty path");
            continue;
        }
        let end = sections.get(i + 1).map_or(text.len(), |(next, _)| next.start);
        let span = &text[range.end..end];
        files.push(SplitFile {
            path: path.clone(),
            content: strip_trailing_end_delimiter(span).trim().to_string(),
        });
    }
    Ok(files)
}

/// Drop the section's own end delimiter: the last END match, if nothing
/// but whitespace follows it. An END-looking line in the middle of the
/// content stays.
fn strip_trailing_end_delimiter(span: &str) -> &str {
    if let Some(last) = END_RE.find_iter(span).last() {
        if span[last.end()..].trim().is_empty() {
            return &span[..last.start()];
        }
    }
    span
}
