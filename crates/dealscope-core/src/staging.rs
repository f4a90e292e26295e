//! The staging set: files queued for the next analysis submission.

use bytes::Bytes;

/// One queued document. Identity is the file name, not the content; the
/// bytes are opaque to the client.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub content: Bytes,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, content: Bytes) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            size,
            content,
        }
    }
}

/// User-curated, deduplicated, insertion-ordered file set.
#[derive(Debug, Default)]
pub struct StagingArea {
    files: Vec<StagedFile>,
}

impl StagingArea {
    /// Stage candidates, silently dropping any whose name is already
    /// present. Returns how many were actually added.
    pub fn add(&mut self, candidates: impl IntoIterator<Item = StagedFile>) -> usize {
        let mut added = 0;
        for candidate in candidates {
            if self.contains(&candidate.name) {
                log::debug!("ignoring duplicate staged file {:?}", candidate.name);
                continue;
            }
            self.files.push(candidate);
            added += 1;
        }
        added
    }

    /// Unstage by name. Returns whether an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    /// Staged files in insertion order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// File size the way the staging list shows it.
pub fn human_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(name: &str, payload: &'static [u8]) -> StagedFile {
        StagedFile::new(name, Bytes::from_static(payload))
    }

    #[test]
    fn duplicate_names_are_dropped() {
        let mut staging = StagingArea::default();
        let added = staging.add([
            staged("a.pdf", b"first"),
            staged("b.pdf", b"other"),
            staged("a.pdf", b"second copy"),
        ]);
        assert_eq!(added, 2);
        assert_eq!(staging.len(), 2);
        // The first occurrence wins.
        assert_eq!(staging.files()[0].content.as_ref(), b"first");
    }

    #[test]
    fn duplicate_across_calls_is_dropped() {
        let mut staging = StagingArea::default();
        staging.add([staged("a.pdf", b"x")]);
        assert_eq!(staging.add([staged("a.pdf", b"y")]), 0);
        assert_eq!(staging.len(), 1);
    }

    #[test]
    fn insertion_order_preserved() {
        let mut staging = StagingArea::default();
        staging.add([staged("z.pdf", b"1"), staged("a.pdf", b"2"), staged("m.pdf", b"3")]);
        let names: Vec<&str> = staging.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["z.pdf", "a.pdf", "m.pdf"]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut staging = StagingArea::default();
        staging.add([staged("a.pdf", b"x")]);
        assert!(!staging.remove("missing.pdf"));
        assert!(staging.remove("a.pdf"));
        assert!(staging.is_empty());
    }

    #[test]
    fn no_two_entries_share_a_name_across_any_sequence() {
        let mut staging = StagingArea::default();
        staging.add([staged("a.pdf", b"1"), staged("b.pdf", b"2")]);
        staging.remove("a.pdf");
        staging.add([staged("a.pdf", b"3"), staged("b.pdf", b"4"), staged("c.pdf", b"5")]);
        let mut names: Vec<&str> = staging.files().iter().map(|f| f.name.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn sizes_tracked() {
        let mut staging = StagingArea::default();
        staging.add([staged("a.pdf", b"12345"), staged("b.pdf", b"123")]);
        assert_eq!(staging.total_bytes(), 8);
        assert_eq!(human_size(10240), "10.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
    }
}
