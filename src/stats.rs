//! Collection statistics.

use std::collections::HashMap;

use crate::classify;
use crate::collection::Collection;

/// Counters for one extension bucket, or for the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub files: usize,
    pub bytes: u64,
    pub lines: usize,
    pub chars: usize,
}

impl Tally {
    fn count(&mut self, bytes: u64, lines: usize, chars: usize) {
        self.files += 1;
        self.bytes += bytes;
        self.lines += lines;
        self.chars += chars;
    }
}

/// Totals plus a per-extension breakdown, sorted by file count with
/// ties broken alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub totals: Tally,
    pub by_extension: Vec<(String, Tally)>,
}

/// Summarize a staged collection.
///
/// Extensionless files land in an `other` bucket. Line counts follow
/// newline splitting, so a non-empty file has at least one line and a
/// trailing newline adds one.
pub fn summarize(collection: &Collection) -> CollectionStats {
    let mut totals = Tally::default();
    let mut buckets: HashMap<String, Tally> = HashMap::new();

    for record in collection.iter() {
        let ext = {
            let ext = classify::extension_of(&record.display_name).to_ascii_lowercase();
            if ext.is_empty() {
                "other".to_string()
            } else {
                ext
            }
        };
        let lines = record.content.split('\n').count();
        let chars = record.content.chars().count();
        totals.count(record.original_size, lines, chars);
        buckets.entry(ext).or_default().count(record.original_size, lines, chars);
    }

    let mut by_extension: Vec<(String, Tally)> = buckets.into_iter().collect();
    by_extension.sort_by(|a, b| b.1.files.cmp(&a.1.files).then_with(|| a.0.cmp(&b.0)));
    CollectionStats { totals, by_extension }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_and_buckets() {
        let mut c = Collection::new();
        c.add("a.js", None, "let a;\nlet b;".to_string());
        c.add("b.js", None, "x".to_string());
        c.add("doc.md", None, "# doc\n".to_string());
        let stats = summarize(&c);

        assert_eq!(stats.totals.files, 3);
        assert_eq!(stats.totals.bytes, 13 + 1 + 6);
        assert_eq!(stats.totals.lines, 2 + 1 + 2);

        assert_eq!(stats.by_extension.len(), 2);
        let (ext, js) = &stats.by_extension[0];
        assert_eq!(ext, "js");
        assert_eq!(js.files, 2);
        assert_eq!(js.bytes, 14);
    }

    #[test]
    fn test_sorted_by_count_then_name() {
        let mut c = Collection::new();
        c.add("a.md", None, String::new());
        c.add("b.js", None, String::new());
        c.add("c.js", None, String::new());
        c.add("d.md", None, String::new());
        c.add("e.css", None, String::new());
        let stats = summarize(&c);
        let order: Vec<&str> = stats.by_extension.iter().map(|(e, _)| e.as_str()).collect();
        assert_eq!(order, vec!["js", "md", "css"]);
    }

    #[test]
    fn test_extensionless_goes_to_other() {
        let mut c = Collection::new();
        c.add("Dockerfile", None, "FROM scratch".to_string());
        let stats = summarize(&c);
        assert_eq!(stats.by_extension[0].0, "other");
    }

    #[test]
    fn test_extension_case_folded() {
        let mut c = Collection::new();
        c.add("a.TXT", None, String::new());
        c.add("b.txt", None, String::new());
        let stats = summarize(&c);
        assert_eq!(stats.by_extension.len(), 1);
        assert_eq!(stats.by_extension[0].0, "txt");
        assert_eq!(stats.by_extension[0].1.files, 2);
    }

    #[test]
    fn test_char_count_is_characters_not_bytes() {
        let mut c = Collection::new();
        c.add("u.txt", None, "héllo".to_string());
        let stats = summarize(&c);
        assert_eq!(stats.totals.chars, 5);
        assert_eq!(stats.totals.bytes, 6);
    }
}
