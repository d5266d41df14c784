//! Staged files awaiting a combine.

/// One staged text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Stable id for targeted removal.
    pub id: u64,
    /// Path shown in headers and delimiters. For archive members this is
    /// the path inside the archive; for loose files the path as staged.
    /// Always forward-slash separated.
    pub display_name: String,
    /// Name of the zip archive this file came out of, if any.
    pub source_archive: Option<String>,
    /// File content, decoded as UTF-8.
    pub content: String,
    /// Content length in bytes at staging time.
    pub original_size: u64,
}

impl FileRecord {
    /// Final segment of the display name.
    pub fn filename(&self) -> &str {
        self.display_name.rsplit('/').next().unwrap_or(&self.display_name)
    }

    /// Display name qualified with the source archive, for listings that
    /// mix files from several sources.
    pub fn qualified_name(&self) -> String {
        match &self.source_archive {
            Some(archive) => format!("{} > {}", archive, self.display_name),
            None => self.display_name.clone(),
        }
    }
}

/// Insertion-ordered set of staged files.
///
/// Order is significant: the combiner emits sections in staging order,
/// and the manifest records that same order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    records: Vec<FileRecord>,
    next_id: u64,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file and return its id. The recorded size is the byte
    /// length of `content`.
    pub fn add(
        &mut self,
        display_name: impl Into<String>,
        source_archive: Option<String>,
        content: String,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let original_size = content.len() as u64;
        self.records.push(FileRecord {
            id,
            display_name: display_name.into(),
            source_archive,
            content,
            original_size,
        });
        id
    }

    /// Remove one file by id. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Remove every file that came out of `archive`. Returns the number
    /// of files removed.
    pub fn remove_by_archive(&mut self, archive: &str) -> usize {
        let before = self.records.len();
        self.records
            .retain(|r| r.source_archive.as_deref() != Some(archive));
        before - self.records.len()
    }

    /// Remove every file under `folder` inside `archive`. The folder path
    /// may be given with or without a trailing slash; matching is against
    /// whole path segments, so `src` does not remove `src2/main.js`.
    pub fn remove_by_folder(&mut self, archive: &str, folder: &str) -> usize {
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        let before = self.records.len();
        self.records.retain(|r| {
            r.source_archive.as_deref() != Some(archive) || !r.display_name.starts_with(&prefix)
        });
        before - self.records.len()
    }

    /// Drop everything. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Whether any staged file came out of a zip archive.
    pub fn has_archives(&self) -> bool {
        self.records.iter().any(|r| r.source_archive.is_some())
    }

    /// Sum of the recorded sizes.
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.original_size).sum()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
