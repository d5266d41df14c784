//! Zip ingestion and packing.
//!
//! Reading is lazy and failure-tolerant: each member yields its own
//! `Result`, so a corrupt or binary entry is reported without dropping
//! the rest of the archive. Only opening the archive itself is fatal.

use std::io::{Cursor, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::classify;
use crate::error::{EntryError, Error, Result};
use crate::splitter::SplitFile;

/// Open a zip archive held in memory and iterate its text members.
pub fn open_zip(archive_name: impl Into<String>, bytes: Vec<u8>) -> Result<ZipEntries> {
    let archive_name = archive_name.into();
    let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|source| Error::ZipOpen {
        archive: archive_name.clone(),
        source,
    })?;
    Ok(ZipEntries { archive_name, archive, index: 0 })
}

/// Iterator over the text members of an archive.
///
/// Directories are skipped silently; members the classifier rejects are
/// skipped with a debug log; members that fail to read or decode come
/// out as [`EntryError`] items.
pub struct ZipEntries {
    archive_name: String,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    index: usize,
}

impl Iterator for ZipEntries {
    type Item = std::result::Result<(String, String), EntryError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let index = self.index;
            self.index += 1;

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(err) => {
                    return Some(Err(EntryError {
                        archive: self.archive_name.clone(),
                        path: format!("#{}", index),
                        reason: err.to_string(),
                    }));
                }
            };
            if entry.is_dir() {
                continue;
            }
            let path = entry.name().replace('\\', "/");
            if !classify::is_likely_text_file(&path) {
                log::debug!("skipping non-text entry in {}: {}", self.archive_name, path);
                continue;
            }

            let mut content = String::new();
            return Some(match entry.read_to_string(&mut content) {
                Ok(_) => Ok((path, content)),
                Err(err) => Err(EntryError {
                    archive: self.archive_name.clone(),
                    path,
                    reason: err.to_string(),
                }),
            });
        }
        None
    }
}

/// Pack split files into a zip archive on `writer`.
///
/// Output is deterministic: files are written in slice order with a
/// fixed timestamp, so packing the same files twice gives identical
/// bytes.
pub fn pack_zip<W: Write + Seek>(writer: W, files: &[SplitFile]) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .last_modified_time(zip::DateTime::default());
    for file in files {
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(file.content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(name.trim_end_matches('/'), options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_text_entries_in_order() {
        let bytes = build_zip(&[
            ("src/main.js", b"let x = 1;".as_slice()),
            ("readme.md", b"# hello".as_slice()),
        ]);
        let entries: Vec<(String, String)> = open_zip("app.zip", bytes)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(
            entries,
            vec![
                ("src/main.js".to_string(), "let x = 1;".to_string()),
                ("readme.md".to_string(), "# hello".to_string()),
            ]
        );
    }

    #[test]
    fn test_skips_directories_and_non_text() {
        let bytes = build_zip(&[
            ("sub/", b"".as_slice()),
            ("logo.png", [0x89, 0x50, 0x4e, 0x47].as_slice()),
            ("sub/notes.txt", b"text".as_slice()),
        ]);
        let names: Vec<String> = open_zip("app.zip", bytes)
            .unwrap()
            .map(|e| e.unwrap().0)
            .collect();
        assert_eq!(names, vec!["sub/notes.txt"]);
    }

    #[test]
    fn test_invalid_utf8_is_an_entry_error() {
        let bytes = build_zip(&[
            ("bad.txt", [0xff, 0xfe, 0x00].as_slice()),
            ("good.txt", b"fine".as_slice()),
        ]);
        let results: Vec<_> = open_zip("app.zip", bytes).unwrap().collect();
        assert_eq!(results.len(), 2);
        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.archive, "app.zip");
        assert_eq!(err.path, "bad.txt");
        assert_eq!(results[1].as_ref().unwrap().1, "fine");
    }

    #[test]
    fn test_open_rejects_garbage() {
        let result = open_zip("junk.zip", vec![1, 2, 3, 4]);
        assert!(matches!(result, Err(Error::ZipOpen { .. })));
    }

    #[test]
    fn test_pack_and_reopen() {
        let files = vec![
            SplitFile { path: "a/b.txt".to_string(), content: "alpha".to_string() },
            SplitFile { path: "c.md".to_string(), content: "# c".to_string() },
        ];
        let mut buf = Cursor::new(Vec::new());
        pack_zip(&mut buf, &files).unwrap();
        let entries: Vec<(String, String)> = open_zip("out.zip", buf.into_inner())
            .unwrap()
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(
            entries,
            vec![
                ("a/b.txt".to_string(), "alpha".to_string()),
                ("c.md".to_string(), "# c".to_string()),
            ]
        );
    }

    #[test]
    fn test_pack_is_deterministic() {
        let files = vec![SplitFile { path: "x.txt".to_string(), content: "same".to_string() }];
        let mut first = Cursor::new(Vec::new());
        let mut second = Cursor::new(Vec::new());
        pack_zip(&mut first, &files).unwrap();
        pack_zip(&mut second, &files).unwrap();
        assert_eq!(first.into_inner(), second.into_inner());
    }
}
