//! Structure header generation.
//!
//! A combined document can open with a human-readable overview of what
//! went in. Each format here renders only the header body; the combiner
//! wraps it in banner comment lines so the splitter and human readers
//! can tell where the header ends and file content begins.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, FileRecord};

/// Label for the bucket holding files that did not come out of an
/// archive.
const LOOSE_FILES_LABEL: &str = "Files";

/// Header formats for a combined document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StructureFormat {
    /// Indented folder tree, grouped by source archive.
    #[default]
    Tree,
    /// One path per line.
    Flat,
    /// One path per line, numbered.
    #[cfg_attr(feature = "cli", value(alias = "simple"))]
    Numbered,
    /// Date, totals and a per-file size listing.
    Detailed,
    /// Markdown headings and bullet lists.
    Markdown,
    /// No header.
    None,
}

impl StructureFormat {
    /// Title for the banner line that opens an embedded header.
    pub fn title(self) -> Option<&'static str> {
        match self {
            StructureFormat::Tree => Some("File Structure (Tree)"),
            StructureFormat::Flat => Some("File List (Flat)"),
            StructureFormat::Numbered => Some("File List (Numbered)"),
            StructureFormat::Detailed => Some("Detailed Summary"),
            StructureFormat::Markdown => Some("File Structure (Markdown)"),
            StructureFormat::None => None,
        }
    }

    /// Render the header body for `collection`, without banner lines or
    /// a trailing newline. `None` renders nothing.
    pub fn render(self, collection: &Collection) -> Option<String> {
        match self {
            StructureFormat::Tree => Some(render_tree(collection)),
            StructureFormat::Flat => Some(render_flat(collection)),
            StructureFormat::Numbered => Some(render_numbered(collection)),
            StructureFormat::Detailed => Some(render_detailed(collection)),
            StructureFormat::Markdown => Some(render_markdown(collection)),
            StructureFormat::None => None,
        }
    }
}

/// Buckets of records keyed by source: one bucket per archive plus a
/// shared bucket for loose files, in sorted label order.
fn group_by_source(collection: &Collection) -> Vec<(String, Vec<&FileRecord>)> {
    let mut groups: BTreeMap<String, Vec<&FileRecord>> = BTreeMap::new();
    for record in collection.iter() {
        let label = record
            .source_archive
            .clone()
            .unwrap_or_else(|| LOOSE_FILES_LABEL.to_string());
        groups.entry(label).or_default().push(record);
    }
    groups.into_iter().collect()
}

/// Sorted display paths, archive-qualified when the collection mixes in
/// archive members.
fn display_paths(collection: &Collection) -> Vec<String> {
    let qualify = collection.has_archives();
    let mut paths: Vec<String> = collection
        .iter()
        .map(|r| {
            if qualify {
                r.qualified_name()
            } else {
                r.display_name.clone()
            }
        })
        .collect();
    paths.sort();
    paths
}

#[derive(Default)]
struct TreeNode {
    folders: BTreeMap<String, TreeNode>,
    files: Vec<String>,
}

impl TreeNode {
    fn insert(&mut self, path: &str) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            if i + 1 == segments.len() {
                node.files.push((*segment).to_string());
            } else {
                node = node.folders.entry((*segment).to_string()).or_default();
            }
        }
    }

    fn render(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        for (name, child) in &self.folders {
            out.push_str(&indent);
            out.push_str("- ");
            out.push_str(name);
            out.push_str("/\n");
            child.render(depth + 1, out);
        }
        let mut files: Vec<&String> = self.files.iter().collect();
        files.sort();
        for file in files {
            out.push_str(&indent);
            out.push_str("- ");
            out.push_str(file);
            out.push('\n');
        }
    }
}

fn render_tree(collection: &Collection) -> String {
    let groups = group_by_source(collection);
    let label_groups = collection.has_archives();
    let mut out = String::new();
    for (label, records) in &groups {
        let mut root = TreeNode::default();
        for record in records {
            root.insert(&record.display_name);
        }
        if label_groups {
            out.push_str(label);
            out.push_str(":\n");
            root.render(1, &mut out);
            out.push('\n');
        } else {
            root.render(0, &mut out);
        }
    }
    out.trim_end().to_string()
}

fn render_flat(collection: &Collection) -> String {
    display_paths(collection).join("\n")
}

fn render_numbered(collection: &Collection) -> String {
    display_paths(collection)
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{}. {}", i + 1, path))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_detailed(collection: &Collection) -> String {
    let qualify = collection.has_archives();
    let mut rows: Vec<(String, u64)> = collection
        .iter()
        .map(|r| {
            let path = if qualify {
                r.qualified_name()
            } else {
                r.display_name.clone()
            };
            (path, r.original_size)
        })
        .collect();
    rows.sort();

    let mut out = String::new();
    out.push_str(&format!(
        "Date: {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(&format!("Total Files: {}\n", collection.len()));
    out.push_str(&format!("Total Size: {}\n\n", format_bytes(collection.total_size())));
    out.push_str("Files:\n");
    for (path, size) in &rows {
        out.push_str(&format!("- {} ({})\n", path, format_bytes(*size)));
    }
    out.trim_end().to_string()
}

fn render_markdown(collection: &Collection) -> String {
    let mut out = String::from("# File Structure\n\n");
    if collection.has_archives() {
        for (label, records) in group_by_source(collection) {
            out.push_str(&format!("## {}\n\n", label));
            let mut paths: Vec<&str> = records.iter().map(|r| r.display_name.as_str()).collect();
            paths.sort();
            for path in paths {
                out.push_str(&format!("- `{}`\n", path));
            }
            out.push('\n');
        }
    } else {
        let mut paths: Vec<&str> = collection.iter().map(|r| r.display_name.as_str()).collect();
        paths.sort();
        for path in paths {
            out.push_str(&format!("- `{}`\n", path));
        }
    }
    out.trim_end().to_string()
}

/// Human-readable byte count with 1024-based units and at most two
/// decimals, trailing zeros trimmed.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let mut text = format!("{:.2}", value);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{} {}", text, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose(names: &[&str]) -> Collection {
        let mut c = Collection::new();
        for name in names {
            c.add(*name, None, "x".to_string());
        }
        c
    }

    #[test]
    fn test_tree_loose_files_unlabeled() {
        let c = loose(&["src/main.js", "src/lib/util.js", "readme.md"]);
        let body = StructureFormat::Tree.render(&c).unwrap();
        assert_eq!(
            body,
            "- src/\n  - lib/\n    - util.js\n  - main.js\n- readme.md"
        );
    }

    #[test]
    fn test_tree_groups_by_archive() {
        let mut c = Collection::new();
        c.add("b.txt", None, "x".to_string());
        c.add("src/a.js", Some("app.zip".to_string()), "x".to_string());
        let body = StructureFormat::Tree.render(&c).unwrap();
        assert_eq!(
            body,
            "Files:\n  - b.txt\n\napp.zip:\n  - src/\n    - a.js"
        );
    }

    #[test]
    fn test_tree_folders_before_files() {
        let c = loose(&["z.txt", "a/inner.txt"]);
        let body = StructureFormat::Tree.render(&c).unwrap();
        assert_eq!(body, "- a/\n  - inner.txt\n- z.txt");
    }

    #[test]
    fn test_flat_sorted_and_unqualified() {
        let c = loose(&["b.txt", "a.txt"]);
        assert_eq!(StructureFormat::Flat.render(&c).unwrap(), "a.txt\nb.txt");
    }

    #[test]
    fn test_flat_qualifies_when_archives_present() {
        let mut c = Collection::new();
        c.add("loose.txt", None, "x".to_string());
        c.add("in.js", Some("app.zip".to_string()), "x".to_string());
        assert_eq!(
            StructureFormat::Flat.render(&c).unwrap(),
            "app.zip > in.js\nloose.txt"
        );
    }

    #[test]
    fn test_numbered_is_one_based() {
        let c = loose(&["b.txt", "a.txt"]);
        assert_eq!(
            StructureFormat::Numbered.render(&c).unwrap(),
            "1. a.txt\n2. b.txt"
        );
    }

    #[test]
    fn test_detailed_layout() {
        let mut c = Collection::new();
        c.add("a.txt", None, "12345".to_string());
        c.add("b.txt", None, "123".to_string());
        let body = StructureFormat::Detailed.render(&c).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert!(lines[0].starts_with("Date: "));
        assert!(lines[0].ends_with('Z'));
        assert_eq!(lines[1], "Total Files: 2");
        assert_eq!(lines[2], "Total Size: 8 Bytes");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Files:");
        assert_eq!(lines[5], "- a.txt (5 Bytes)");
        assert_eq!(lines[6], "- b.txt (3 Bytes)");
    }

    #[test]
    fn test_markdown_flat_when_no_archives() {
        let c = loose(&["b.md", "a.md"]);
        assert_eq!(
            StructureFormat::Markdown.render(&c).unwrap(),
            "# File Structure\n\n- `a.md`\n- `b.md`"
        );
    }

    #[test]
    fn test_markdown_grouped_with_archives() {
        let mut c = Collection::new();
        c.add("loose.txt", None, "x".to_string());
        c.add("src/a.js", Some("app.zip".to_string()), "x".to_string());
        assert_eq!(
            StructureFormat::Markdown.render(&c).unwrap(),
            "# File Structure\n\n## Files\n\n- `loose.txt`\n\n## app.zip\n\n- `src/a.js`"
        );
    }

    #[test]
    fn test_none_renders_nothing() {
        let c = loose(&["a.txt"]);
        assert!(StructureFormat::None.render(&c).is_none());
        assert!(StructureFormat::None.title().is_none());
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut c = Collection::new();
        c.add("loose.txt", None, "x".to_string());
        c.add("src/a.js", Some("app.zip".to_string()), "x".to_string());
        for format in [StructureFormat::Tree, StructureFormat::Flat, StructureFormat::Markdown] {
            assert_eq!(format.render(&c), format.render(&c));
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5_242_880), "5 MB");
        assert_eq!(format_bytes(1 << 30), "1 GB");
        assert_eq!(format_bytes(1254), "1.22 KB");
    }

    #[test]
    fn test_format_bytes_caps_at_largest_unit() {
        assert_eq!(format_bytes(1 << 50), "1 PB");
        assert_eq!(format_bytes(1 << 60), "1024 PB");
    }
}
