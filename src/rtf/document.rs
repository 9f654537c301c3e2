//! RTF document representation.

use super::builder::{DocumentBuilder, MemoryStore};
use super::destination::TextSlot;
use super::error::{RtfError, RtfResult};
use super::info::DocumentInfo;
use super::parser::{ConversionReport, ImportOptions, Importer};
use super::picture::PictureFrame;
use super::section::{DocumentSettings, HeaderFooterPresence, PageLayout};
use super::stylesheet::Style;
use super::table::Table;
use super::text::{Footnote, Paragraph};
use super::types::{Color, ColorTable, FontRef, FontTable};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A style together with the name of the style that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStyle {
    pub style: Style,
    /// Name of the `\snext` style
    pub following: Option<String>,
}

/// RTF Document.
///
/// This is the main entry point for reading RTF documents. It collects the
/// converted document into an owned model, with picture payloads kept in
/// memory.
#[derive(Debug, Clone)]
pub struct RtfDocument {
    info: DocumentInfo,
    layout: PageLayout,
    fonts: FontTable,
    colors: ColorTable,
    styles: Vec<DocumentStyle>,
    headers_footers: Vec<(TextSlot, Vec<Paragraph>)>,
    body: Vec<Paragraph>,
    footnotes: Vec<Footnote>,
    tables: Vec<Table>,
    pictures: Vec<PictureFrame>,
    picture_data: MemoryStore,
    report: ConversionReport,
}

impl Default for RtfDocument {
    fn default() -> Self {
        Self {
            info: DocumentInfo::default(),
            layout: PageLayout::new(
                &DocumentSettings::default(),
                false,
                720,
                720,
                &HeaderFooterPresence::default(),
            ),
            fonts: FontTable::new(),
            colors: ColorTable::new(),
            styles: Vec::new(),
            headers_footers: Vec::new(),
            body: Vec::new(),
            footnotes: Vec::new(),
            tables: Vec::new(),
            pictures: Vec::new(),
            picture_data: MemoryStore::new(),
            report: ConversionReport::default(),
        }
    }
}

impl RtfDocument {
    /// Parse an RTF document from a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rtf_import::rtf::RtfDocument;
    ///
    /// let rtf = r#"{\rtf1\ansi Hello World!\par}"#;
    /// let doc = RtfDocument::parse(rtf)?;
    /// assert_eq!(doc.text(), "Hello World!");
    /// # Ok::<(), rtf_import::rtf::RtfError>(())
    /// ```
    pub fn parse(input: &str) -> RtfResult<Self> {
        Self::from_bytes(input.as_bytes())
    }

    /// Parse an RTF document from bytes.
    ///
    /// Text is decoded with the codepage the document declares, so the bytes
    /// need not be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> RtfResult<Self> {
        Self::from_reader(bytes)
    }

    /// Parse an RTF document from a reader with the default options.
    pub fn from_reader<R: Read>(reader: R) -> RtfResult<Self> {
        Self::with_options(reader, ImportOptions::default())
    }

    /// Parse an RTF document from a reader.
    pub fn with_options<R: Read>(reader: R, options: ImportOptions) -> RtfResult<Self> {
        let mut doc = Self::default();
        let mut store = MemoryStore::new();
        doc.report = Importer::new(reader, options).convert(&mut doc, &mut store)?;
        doc.picture_data = store;
        Ok(doc)
    }

    /// Parse an RTF document from a file.
    ///
    /// `IMPORT` fields are resolved against the file's directory.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rtf_import::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::open("document.rtf")?;
    /// let text = doc.text();
    /// # Ok::<(), rtf_import::rtf::RtfError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> RtfResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => RtfError::FileNotFound(path.to_path_buf()),
            _ => RtfError::Io(err),
        })?;

        let mut options = ImportOptions::default();
        if let Some(dir) = path.parent() {
            options = options.with_base_dir(dir);
        }
        Self::with_options(file, options)
    }

    /// Text of the body, one line per paragraph.
    pub fn text(&self) -> String {
        self.body
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Body paragraphs.
    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.body
    }

    #[inline]
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    #[inline]
    pub fn page_layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Get the font table.
    #[inline]
    pub fn font_table(&self) -> &FontTable {
        &self.fonts
    }

    /// Resolved family name of a font id.
    pub fn font(&self, id: FontRef) -> Option<&str> {
        self.fonts.get(id)
    }

    /// Get the color table.
    #[inline]
    pub fn color_table(&self) -> &ColorTable {
        &self.colors
    }

    /// Color by table index.
    pub fn color(&self, index: i32) -> Option<Color> {
        self.colors.get(index)
    }

    #[inline]
    pub fn styles(&self) -> &[DocumentStyle] {
        &self.styles
    }

    /// Style by name.
    pub fn style(&self, name: &str) -> Option<&DocumentStyle> {
        self.styles.iter().find(|entry| entry.style.name == name)
    }

    /// Header or footer text, if the document has it.
    pub fn header_footer(&self, slot: TextSlot) -> Option<&[Paragraph]> {
        self.headers_footers
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, paragraphs)| paragraphs.as_slice())
    }

    #[inline]
    pub fn footnotes(&self) -> &[Footnote] {
        &self.footnotes
    }

    /// Get all tables in the document.
    #[inline]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table by its anchor number.
    pub fn table(&self, number: usize) -> Option<&Table> {
        self.tables.iter().find(|table| table.number == number)
    }

    #[inline]
    pub fn pictures(&self) -> &[PictureFrame] {
        &self.pictures
    }

    /// Stored bytes of a picture.
    pub fn picture_data(&self, frame: &PictureFrame) -> Option<&[u8]> {
        self.picture_data.get(&frame.file_name)
    }

    /// What the conversion skipped or could not store.
    #[inline]
    pub fn report(&self) -> &ConversionReport {
        &self.report
    }
}

impl DocumentBuilder for RtfDocument {
    fn document_info(&mut self, info: &DocumentInfo) {
        self.info = info.clone();
    }

    fn page_layout(&mut self, layout: &PageLayout) {
        self.layout = *layout;
    }

    fn font(&mut self, id: FontRef, family: &str) {
        self.fonts.insert(id, family.to_string());
    }

    fn color(&mut self, color: Color) {
        self.colors.add(color);
    }

    fn style(&mut self, style: &Style, following: Option<&str>) {
        self.styles.push(DocumentStyle {
            style: style.clone(),
            following: following.map(str::to_string),
        });
    }

    fn header_footer(&mut self, slot: TextSlot, paragraphs: Vec<Paragraph>) {
        self.headers_footers.push((slot, paragraphs));
    }

    fn body(&mut self, paragraphs: Vec<Paragraph>) {
        self.body = paragraphs;
    }

    fn footnote(&mut self, footnote: Footnote) {
        self.footnotes.push(footnote);
    }

    fn table(&mut self, table: Table) {
        self.tables.push(table);
    }

    fn picture(&mut self, frame: PictureFrame) {
        self.pictures.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_document() {
        let rtf = r#"{\rtf1\ansi Hello World!\par}"#;
        let doc = RtfDocument::parse(rtf).unwrap();
        assert_eq!(doc.text(), "Hello World!");
        assert!(doc.report().is_clean());
    }

    #[test]
    fn test_formatted_text() {
        let rtf = r#"{\rtf1\ansi{\b Bold}{\i Italic}\par}"#;
        let doc = RtfDocument::parse(rtf).unwrap();
        let runs = &doc.paragraphs()[0].runs;
        assert_eq!(runs.len(), 2);
        assert!(runs[0].format.bold && !runs[0].format.italic);
        assert!(runs[1].format.italic && !runs[1].format.bold);
    }

    #[test]
    fn test_codepage_bytes() {
        let doc = RtfDocument::from_bytes(b"{\\rtf1\\ansi Caf\xe9\\par}").unwrap();
        assert_eq!(doc.text(), "Caf\u{e9}");
    }

    #[test]
    fn test_tables_and_lookup() {
        let doc = RtfDocument::parse(concat!(
            r"{\rtf1{\fonttbl{\f0\fswiss Arial;}{\f1\froman Times New Roman;}}",
            r"{\colortbl;\red255\green0\blue0;}",
            r"{\stylesheet{\s0 Normal;}}",
            r"{\headerf first\par}",
            r"\trowd\cellx1000\intbl cell\cell\row\pard}",
        ))
        .unwrap();
        assert_eq!(doc.font(1), Some("Times New Roman"));
        assert_eq!(doc.color(1), Some(Color::new(255, 0, 0)));
        assert_eq!(doc.style("Normal").unwrap().following.as_deref(), Some("Normal"));
        assert!(doc.header_footer(TextSlot::FirstPageHeader).is_some());
        assert!(doc.header_footer(TextSlot::OddPagesHeader).is_none());
        assert_eq!(doc.table(1).unwrap().rows[0].cells[0].text(), "cell");
        assert_eq!(doc.tables()[0].name(), "Table 1");
    }

    #[test]
    fn test_default_layout() {
        let doc = RtfDocument::parse(r"{\rtf1 x}").unwrap();
        let layout = doc.page_layout();
        assert_eq!((layout.paper_width, layout.paper_height), (12240, 15840));
        assert_eq!(layout.margin_left, 1800);
        assert!(!layout.has_header);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RtfDocument::open(dir.path().join("missing.rtf")).unwrap_err();
        assert!(matches!(err, RtfError::FileNotFound(_)));
    }

    #[test]
    fn test_open_resolves_imports_next_to_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.bmp"), b"BM\0\0").unwrap();
        let path = dir.path().join("doc.rtf");
        std::fs::write(&path, r"{\rtf1 {\field{\*\fldinst IMPORT pic.bmp}{\fldrslt }}\par}").unwrap();

        let doc = RtfDocument::open(&path).unwrap();
        let frame = &doc.pictures()[0];
        assert_eq!(frame.file_name, "pictures/picture1.bmp");
        assert_eq!(doc.picture_data(frame), Some(&b"BM\0\0"[..]));
    }

    #[test]
    fn test_not_rtf() {
        assert!(matches!(RtfDocument::parse("plain text"), Err(RtfError::WrongFormat(_))));
        assert!(matches!(RtfDocument::parse(""), Err(RtfError::WrongFormat(_))));
    }

    #[test]
    fn test_report_is_kept() {
        let doc = RtfDocument::parse(r"{\rtf1 \mystery1 x\mystery2\par}").unwrap();
        assert_eq!(doc.report().unknown_keywords.get("mystery"), Some(&2));
        assert_eq!(doc.text(), "x");
    }
}
