//! # fcs
//!
//! File combine/split engine: merge many text files into one annotated
//! document, and split such documents back into the original files.
//!
//! ## Combined Document Format
//!
//! A combined document opens with a manifest line, optionally carries a
//! human-readable structure header, and wraps each file in delimiter
//! comments:
//!
//! ```text
//! /* FCS_MANIFEST_V1:[{"path":"src/main.js","size":21},{"path":"readme.md","size":12}] */
//!
//! /* ==== File Structure (Tree) ==== */
//! - src/
//!   - main.js
//! - readme.md
//! /* =============================== */
//!
//! /* ==== START 1/2 - main.js (src/main.js) ==== */
//! console.log("hello");
//! /* ==== END - main.js ==== */
//!
//! /* ==== START 2/2 - readme.md (readme.md) ==== */
//! # My project
//! /* ==== END - readme.md ==== */
//! ```
//!
//! Delimiters are templated; see [`template::PRESETS`] for the built-in
//! pairs. Structure headers come in several formats, from a folder tree
//! to a markdown listing.
//!
//! ## Splitting
//!
//! Splitting recognizes two shapes (in priority order):
//! 1. Manifest slicing: contents are cut out by the byte sizes recorded
//!    in the manifest line.
//! 2. Delimiter scanning: the default start delimiters partition the
//!    document and each file's path is read from the delimiter itself.
//!
//! **Why a manifest?**
//! Delimiter scanning breaks as soon as a combined file CONTAINS text
//! that looks like a delimiter, such as a document describing this very
//! format. The manifest records exact byte lengths up front, so content
//! is recovered by slicing and never misparsed. It also keeps documents
//! splittable when delimiter comments are suppressed entirely.
//!
//! ## Sources
//!
//! Files can be staged into a [`Collection`] directly or pulled out of
//! zip archives, with a path-based classifier deciding what counts as
//! text. Split results pack back into a zip.

pub mod classify;
pub mod collection;
pub mod combiner;
pub mod config;
pub mod error;
pub mod manifest;
pub mod splitter;
pub mod stats;
pub mod structure;
pub mod template;
pub mod zip_io;

pub use collection::{Collection, FileRecord};
pub use combiner::{CombineOptions, Combiner, HEADER_CLOSE};
pub use config::{ExclusionRules, Preferences};
pub use error::{EntryError, Error, Result};
pub use manifest::{ManifestEntry, MANIFEST_TAG};
pub use splitter::{SplitFile, Splitter};
pub use stats::CollectionStats;
pub use structure::{format_bytes, StructureFormat};
pub use zip_io::{open_zip, pack_zip, ZipEntries};
