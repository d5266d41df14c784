//! Combined-document assembly.

use std::io::Write;
use std::path::Path;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::manifest::{self, ManifestEntry};
use crate::structure::StructureFormat;
use crate::template::{self, DelimiterContext, DEFAULT_END_TEMPLATE, DEFAULT_START_TEMPLATE};

/// Closing banner line for an embedded structure header.
pub const HEADER_CLOSE: &str = "/* =============================== */";

/// Settings for one combine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOptions {
    /// Structure header format.
    pub structure: StructureFormat,
    /// Drop the structure header and all delimiter comments. The
    /// manifest is unaffected; without it a comment-less document cannot
    /// be split.
    pub suppress_comments: bool,
    /// Start delimiter template.
    pub start_template: String,
    /// End delimiter template.
    pub end_template: String,
    /// Emit the manifest line. On by default; turning it off trims file
    /// contents and leaves splitting to the delimiter scanner.
    pub emit_manifest: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            structure: StructureFormat::default(),
            suppress_comments: false,
            start_template: DEFAULT_START_TEMPLATE.to_string(),
            end_template: DEFAULT_END_TEMPLATE.to_string(),
            emit_manifest: true,
        }
    }
}

/// Assembles a collection into one combined document.
///
/// The output layout is: manifest line, blank line, optional structure
/// header wrapped in banner comments, then one section per file in
/// collection order. With the manifest on, file contents are emitted
/// byte-for-byte so the recorded sizes stay exact; without it contents
/// are trimmed.
pub struct Combiner {
    options: CombineOptions,
}

impl Combiner {
    pub fn new() -> Self {
        Self { options: CombineOptions::default() }
    }

    pub fn with_options(options: CombineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CombineOptions {
        &self.options
    }

    /// Combine the collection into a single document.
    ///
    /// Fails on an empty collection. The result always ends with exactly
    /// one newline.
    pub fn combine(&self, collection: &Collection) -> Result<String> {
        if collection.is_empty() {
            return Err(Error::EmptyCollection);
        }
        let opts = &self.options;
        let mut out = String::new();

        if opts.emit_manifest {
            let entries: Vec<ManifestEntry> = collection
                .iter()
                .map(|record| ManifestEntry {
                    path: record.display_name.clone(),
                    size: record.content.len() as u64,
                })
                .collect();
            out.push_str(&manifest::render_line(&entries)?);
            out.push_str("\n\n");
        }

        if !opts.suppress_comments {
            if let (Some(title), Some(body)) =
                (opts.structure.title(), opts.structure.render(collection))
            {
                out.push_str(&format!("/* ==== {} ==== */\n", title));
                out.push_str(&body);
                out.push('\n');
                out.push_str(HEADER_CLOSE);
                out.push_str("\n\n");
            }
        }

        let total_files = collection.len();
        for (i, record) in collection.iter().enumerate() {
            let ctx = DelimiterContext {
                filename: record.filename(),
                path: &record.display_name,
                index: i + 1,
                total_files,
            };
            if !opts.suppress_comments {
                out.push_str(&template::render(&opts.start_template, &ctx));
                out.push('\n');
            }
            if opts.emit_manifest {
                out.push_str(&record.content);
            } else {
                out.push_str(record.content.trim());
            }
            out.push('\n');
            if !opts.suppress_comments {
                out.push_str(&template::render(&opts.end_template, &ctx));
                out.push_str("\n\n");
            } else {
                out.push('\n');
            }
        }

        let mut result = out.trim_end().to_string();
        result.push('\n');
        Ok(result)
    }

    /// Combine and write the document to `writer`.
    pub fn combine_to_writer<W: Write>(&self, collection: &Collection, mut writer: W) -> Result<()> {
        let combined = self.combine(collection)?;
        writer.write_all(combined.as_bytes())?;
        Ok(())
    }

    /// Combine and write the document to a file.
    pub fn combine_to_file(&self, collection: &Collection, path: &Path) -> Result<()> {
        let combined = self.combine(collection)?;
        std::fs::write(path, combined)?;
        Ok(())
    }
}

impl Default for Combiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_files() -> Collection {
        let mut c = Collection::new();
        c.add("src/main.js", None, "console.log(\"hello\");\n".to_string());
        c.add("readme.md", None, "# My project\n".to_string());
        c
    }

    #[test]
    fn test_empty_collection_fails() {
        let result = Combiner::new().combine(&Collection::new());
        assert!(matches!(result, Err(Error::EmptyCollection)));
    }

    #[test]
    fn test_default_layout_exact() {
        let options = CombineOptions {
            structure: StructureFormat::Flat,
            ..CombineOptions::default()
        };
        let combined = Combiner::with_options(options).combine(&two_files()).unwrap();
        let expected = "\
/* FCS_MANIFEST_V1:[{\"path\":\"src/main.js\",\"size\":22},{\"path\":\"readme.md\",\"size\":13}] */\n\
\n\
/* ==== File List (Flat) ==== */\n\
readme.md\n\
src/main.js\n\
/* =============================== */\n\
\n\
/* ==== START 1/2 - main.js (src/main.js) ==== */\n\
console.log(\"hello\");\n\
\n\
/* ==== END - main.js ==== */\n\
\n\
/* ==== START 2/2 - readme.md (readme.md) ==== */\n\
# My project\n\
\n\
/* ==== END - readme.md ==== */\n";
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_manifest_sizes_are_emitted_byte_lengths() {
        let mut c = Collection::new();
        c.add("u.txt", None, "héllo".to_string());
        let combined = Combiner::new().combine(&c).unwrap();
        assert!(combined.starts_with("/* FCS_MANIFEST_V1:[{\"path\":\"u.txt\",\"size\":6}] */\n\n"));
    }

    #[test]
    fn test_content_untrimmed_when_manifest_on() {
        let mut c = Collection::new();
        c.add("a.txt", None, "  padded  ".to_string());
        c.add("b.txt", None, "tail".to_string());
        let combined = Combiner::new().combine(&c).unwrap();
        assert!(combined.contains("*/\n  padded  \n/*"));
    }

    #[test]
    fn test_content_trimmed_without_manifest() {
        let mut c = Collection::new();
        c.add("a.txt", None, "  padded  ".to_string());
        c.add("b.txt", None, "tail".to_string());
        let options = CombineOptions { emit_manifest: false, ..CombineOptions::default() };
        let combined = Combiner::with_options(options).combine(&c).unwrap();
        assert!(!combined.contains("FCS_MANIFEST_V1"));
        assert!(combined.contains("*/\npadded\n/*"));
    }

    #[test]
    fn test_suppressed_comments_layout() {
        let options = CombineOptions { suppress_comments: true, ..CombineOptions::default() };
        let combined = Combiner::with_options(options).combine(&two_files()).unwrap();
        let expected = "\
/* FCS_MANIFEST_V1:[{\"path\":\"src/main.js\",\"size\":22},{\"path\":\"readme.md\",\"size\":13}] */\n\
\n\
console.log(\"hello\");\n\
\n\
\n\
# My project\n";
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_structure_none_emits_no_header() {
        let options = CombineOptions {
            structure: StructureFormat::None,
            ..CombineOptions::default()
        };
        let combined = Combiner::with_options(options).combine(&two_files()).unwrap();
        assert!(!combined.contains("==== File"));
        assert!(combined.contains("/* ==== START 1/2"));
    }

    #[test]
    fn test_custom_templates() {
        let options = CombineOptions {
            structure: StructureFormat::None,
            start_template: "# START: {filename} ({path})".to_string(),
            end_template: "# END: {filename}".to_string(),
            ..CombineOptions::default()
        };
        let combined = Combiner::with_options(options).combine(&two_files()).unwrap();
        assert!(combined.contains("# START: main.js (src/main.js)\n"));
        assert!(combined.contains("# END: readme.md\n"));
    }

    #[test]
    fn test_single_trailing_newline() {
        let combined = Combiner::new().combine(&two_files()).unwrap();
        assert!(combined.ends_with('\n'));
        assert!(!combined.ends_with("\n\n"));
    }

    #[test]
    fn test_combine_to_writer() {
        let mut buf = Vec::new();
        Combiner::new().combine_to_writer(&two_files(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("/* FCS_MANIFEST_V1:"));
    }

    #[test]
    fn test_combine_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combined.txt");
        Combiner::new().combine_to_file(&two_files(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("/* ==== START 1/2 - main.js (src/main.js) ==== */"));
    }
}
