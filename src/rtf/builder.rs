//! Output seams of the importer.
//!
//! The importer never builds a document model of its own. At the end of a
//! successful conversion it hands every finished part to a [`DocumentBuilder`]
//! and every picture payload to a [`PictureStore`].

use super::destination::TextSlot;
use super::info::DocumentInfo;
use super::picture::PictureFrame;
use super::section::PageLayout;
use super::stylesheet::Style;
use super::table::Table;
use super::text::{Footnote, Paragraph};
use super::types::{Color, FontRef};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receiver of the converted document, called in document order.
pub trait DocumentBuilder {
    fn document_info(&mut self, info: &DocumentInfo);

    fn page_layout(&mut self, layout: &PageLayout);

    /// One font-table entry with its resolved family name.
    fn font(&mut self, id: FontRef, family: &str);

    /// Next color-table entry; entries arrive in index order.
    fn color(&mut self, color: Color);

    /// One style with the resolved name of its following style.
    fn style(&mut self, style: &Style, following: Option<&str>);

    /// Non-empty header or footer text.
    fn header_footer(&mut self, slot: TextSlot, paragraphs: Vec<Paragraph>);

    fn body(&mut self, paragraphs: Vec<Paragraph>);

    fn footnote(&mut self, footnote: Footnote);

    fn table(&mut self, table: Table);

    fn picture(&mut self, frame: PictureFrame);
}

/// Storage for picture payloads.
pub trait PictureStore {
    /// Store `data` under `name`, e.g. `pictures/picture1.png`.
    fn store(&mut self, name: &str, data: &[u8]) -> io::Result<()>;
}

/// Picture store that keeps the payloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pictures: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.pictures.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pictures.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<u8>> {
        self.pictures
    }
}

impl PictureStore for MemoryStore {
    fn store(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        self.pictures.insert(name.to_string(), data.to_vec());
        Ok(())
    }
}

/// Picture store that writes the payloads below a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PictureStore for DirectoryStore {
    fn store(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.store("pictures/picture1.png", &[1, 2, 3]).unwrap();
        assert_eq!(store.get("pictures/picture1.png"), Some(&[1u8, 2, 3][..]));
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["pictures/picture1.png"]);
    }

    #[test]
    fn test_directory_store_creates_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path());
        store.store("pictures/picture1.bmp", b"BM").unwrap();

        let written = std::fs::read(dir.path().join("pictures").join("picture1.bmp")).unwrap();
        assert_eq!(written, b"BM");
    }
}
