//! The control-word dispatch engine.
//!
//! [`Importer`] pulls tokens from the [`Tokenizer`] and routes them:
//! - `{` saves the group state, `}` restores it and closes the destination
//!   the group entered, if any.
//! - Control words are looked up in the property table and applied to the
//!   live [`GroupState`]. The first word of a group is also looked up in the
//!   destination table.
//! - Text and binary data go to the current destination.
//!
//! Output is buffered until the document is complete and then handed to the
//! [`DocumentBuilder`] in one pass, so a failed conversion produces nothing.

use super::builder::{DocumentBuilder, PictureStore};
use super::destination::{DestinationFrame, DestinationKind, DestinationStack, TextId, TextSlot};
use super::error::{RtfError, RtfResult};
use super::field::{Field, FieldAction, FieldType, PageVariable, Variable};
use super::fonts::{AnyFontMatcher, FontMatcher, FontRequest, resolve_family};
use super::info::DocumentInfo;
use super::keywords::{
    self, Action, BoolField, Codepage, DestinationEntry, EnumValue, Handler, IntField, Keyword,
    RTF_DESTINATION, SKIP_DESTINATION, SKIP_NAME, TEXT_GROUP,
};
use super::lexer::{ControlWord, Token, Tokenizer};
use super::picture::{self, PictureFrame, PictureProperties, PictureType};
use super::section::{DocumentSettings, HeaderFooterPresence, PageLayout};
use super::state::{CharacterFormat, GroupState, GroupStateStack};
use super::stylesheet::{DEFAULT_STYLE_NAME, Style, StyleSheet};
use super::table::{self, Table, TableRow};
use super::text::{Anchor, Footnote, Paragraph, RunContent, TextState};
use super::types::{Color, ColorTable, FontFamily, FontTable, UnderlineStyle};
use crate::common::encoding::{CharacterSet, TextCodec, codepage_to_codec};
use memchr::memchr;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Default maximum group nesting.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Conversion settings.
#[derive(Debug)]
pub struct ImportOptions {
    /// Maximum `{` nesting before the input is rejected
    pub max_depth: usize,
    /// Directory that `IMPORT` field file names are relative to, the working
    /// directory when unset.
    ///
    /// This is not a sandbox: absolute names and `..` components are
    /// followed, so a document can read any file the process can.
    pub base_dir: Option<PathBuf>,
    /// Resolves font-table names to installed families
    pub font_matcher: Box<dyn FontMatcher>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            base_dir: None,
            font_matcher: Box::new(AnyFontMatcher),
        }
    }
}

impl ImportOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum group nesting
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the directory for `IMPORT` fields
    #[inline]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Set the font matcher
    #[inline]
    pub fn with_font_matcher(mut self, matcher: impl FontMatcher + 'static) -> Self {
        self.font_matcher = Box::new(matcher);
        self
    }
}

/// Problems that did not stop the conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Unrecognized control words with their number of occurrences
    pub unknown_keywords: BTreeMap<String, usize>,
    /// Field types that were replaced by their result text
    pub unsupported_fields: Vec<String>,
    /// Pictures the store refused
    pub picture_store_failures: Vec<String>,
}

impl ConversionReport {
    /// Whether nothing was skipped or lost.
    pub fn is_clean(&self) -> bool {
        self.unknown_keywords.is_empty()
            && self.unsupported_fields.is_empty()
            && self.picture_store_failures.is_empty()
    }
}

/// Footnote text collected during the conversion.
#[derive(Debug, Clone, Copy)]
struct FootnoteText {
    number: usize,
    endnote: bool,
    text: TextId,
}

/// Font-table entry being read.
#[derive(Debug, Default)]
struct PendingFont {
    name: String,
    family: FontFamily,
    pitch: i32,
}

/// RTF import engine for one document.
pub struct Importer<R> {
    tokenizer: Tokenizer<R>,
    options: ImportOptions,
    state: GroupState,
    stack: GroupStateStack,
    destinations: DestinationStack,
    encoding: TextCodec,
    /// One accumulator per [`TextSlot`], followed by one per footnote
    texts: Vec<TextState>,
    text: TextId,
    settings: DocumentSettings,
    info: DocumentInfo,
    fonts: FontTable,
    font: PendingFont,
    colors: ColorTable,
    rgb: [i32; 3],
    styles: StyleSheet,
    style_name: String,
    next_style: i32,
    field: Field,
    /// Index of the saved frame that encloses the outermost open field
    field_dest: Option<usize>,
    field_format: CharacterFormat,
    picture: PictureProperties,
    pictures: Vec<(PictureFrame, Vec<u8>)>,
    tables: Vec<Table>,
    table_count: usize,
    footnotes: Vec<FootnoteText>,
    /// Token pushed back by the `\u` fallback skip
    pending: Option<Token>,
    /// Consecutive `\'` bytes, decoded together
    hex_bytes: Vec<u8>,
    high_surrogate: Option<u32>,
    report: ConversionReport,
}

impl<R: Read> Importer<R> {
    pub fn new(reader: R, options: ImportOptions) -> Self {
        let stack = GroupStateStack::new(options.max_depth);
        Self {
            tokenizer: Tokenizer::open(reader),
            options,
            state: GroupState::default(),
            stack,
            destinations: DestinationStack::new(),
            encoding: TextCodec::default(),
            texts: TextSlot::ALL.iter().map(|_| TextState::default()).collect(),
            text: TextId(TextSlot::Body.index()),
            settings: DocumentSettings::default(),
            info: DocumentInfo::default(),
            fonts: FontTable::new(),
            font: PendingFont::default(),
            colors: ColorTable::new(),
            rgb: [0; 3],
            styles: StyleSheet::new(),
            style_name: String::new(),
            next_style: -1,
            field: Field::default(),
            field_dest: None,
            field_format: CharacterFormat::default(),
            picture: PictureProperties::default(),
            pictures: Vec::new(),
            tables: Vec::new(),
            table_count: 0,
            footnotes: Vec::new(),
            pending: None,
            hex_bytes: Vec::new(),
            high_surrogate: None,
            report: ConversionReport::default(),
        }
    }

    /// Convert the whole document.
    ///
    /// Nothing reaches `builder` or `store` unless the input is RTF 1.x and
    /// could be read to the end.
    pub fn convert<B, S>(mut self, builder: &mut B, store: &mut S) -> RtfResult<ConversionReport>
    where
        B: DocumentBuilder + ?Sized,
        S: PictureStore + ?Sized,
    {
        let started = Instant::now();
        self.read_header()?;
        self.run()?;
        if let Some(err) = self.tokenizer.take_error() {
            return Err(err.into());
        }

        for (keyword, count) in &self.report.unknown_keywords {
            debug!(keyword = %keyword, count, "Unknown keyword");
        }
        self.emit(builder, store);
        debug!(elapsed = ?started.elapsed(), "RTF conversion finished");
        Ok(self.report)
    }

    /// Check for `{\rtfN` with N <= 1 and enter the body destination.
    fn read_header(&mut self) -> RtfResult<()> {
        if self.tokenizer.next() != Token::OpenGroup {
            return Err(self.header_error("Not an RTF file"));
        }
        match self.tokenizer.next() {
            Token::ControlWord(word) if word.is("rtf") && word.value <= 1 => {},
            _ => {
                return Err(
                    self.header_error("Wrong document type or version (RTF version 0 or 1.x expected)")
                );
            },
        }

        self.stack.push(&self.state)?;
        self.change_destination("rtf", &RTF_DESTINATION);
        Ok(())
    }

    /// A read error takes precedence over a format error.
    fn header_error(&mut self, message: &str) -> RtfError {
        match self.tokenizer.take_error() {
            Some(err) => err.into(),
            None => RtfError::WrongFormat(message.to_string()),
        }
    }

    fn run(&mut self) -> RtfResult<()> {
        loop {
            let mut first_token = false;
            let mut ignore_unknown = false;
            let mut token = self.fetch();

            while token == Token::OpenGroup {
                self.stack.push(&self.state)?;
                self.state.closes_destination = false;
                first_token = true;
                ignore_unknown = false;

                token = self.fetch();
                if matches!(&token, Token::ControlWord(word) if word.is("*")) {
                    ignore_unknown = true;
                    token = self.fetch();
                }
            }

            match token {
                Token::CloseGroup => {
                    if self.state.closes_destination {
                        self.close_destination();
                    }
                    if self.stack.depth() > 1 {
                        if let Some(state) = self.stack.pop() {
                            self.state = state;
                        }
                    } else {
                        // End of document, the final state is kept for the page layout
                        self.stack.pop();
                        return Ok(());
                    }
                },
                Token::ControlWord(word) => self.control_word(&word, first_token, ignore_unknown),
                Token::PlainText(text) => {
                    let encoding = self.encoding;
                    self.deliver_text(&text, encoding);
                },
                Token::BinaryData(data) => self.deliver_binary(data),
                Token::OpenGroup => {},
            }
        }
    }

    /// Next token, with pending `\'` bytes and surrogates flushed first.
    fn fetch(&mut self) -> Token {
        let token = self.next_token();
        let (hex, unicode) = match &token {
            Token::ControlWord(word) => (word.is("'"), word.is("u")),
            _ => (false, false),
        };
        if !hex {
            self.flush_hex();
        }
        if !unicode && self.high_surrogate.take().is_some() {
            self.insert_char(char::REPLACEMENT_CHARACTER);
        }
        token
    }

    #[inline]
    fn next_token(&mut self) -> Token {
        match self.pending.take() {
            Some(token) => token,
            None => self.tokenizer.next(),
        }
    }

    fn flush_hex(&mut self) {
        if self.hex_bytes.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.hex_bytes);
        let encoding = self.encoding;
        self.deliver_text(&bytes, encoding);
    }

    fn control_word(&mut self, word: &ControlWord, first_token: bool, ignore_unknown: bool) {
        let (name, group) = {
            let frame = self.destinations.current();
            (frame.name, frame.group)
        };

        if let Some(keyword) = keywords::property(word.name()) {
            if self.state.ignore_group {
                // Keep the digits of a skipped `\'` out of the text stream
                if keyword.handler == Handler::Action(Action::HexSymbol) {
                    let _ = self.tokenizer.read_hex_byte();
                }
                return;
            }
            if keyword.scope.admits(name, group) {
                self.apply(keyword, word);
            }
            return;
        }

        if first_token
            && let Some((dest_name, entry)) = keywords::lookup_destination(word.name())
            && entry.scope.admits(name, group)
        {
            if self.state.ignore_group {
                self.change_destination(SKIP_NAME, &SKIP_DESTINATION);
            } else {
                self.change_destination(dest_name, entry);
            }
            return;
        }

        let skipping = self.state.ignore_group;
        if first_token && ignore_unknown {
            self.change_destination(SKIP_NAME, &SKIP_DESTINATION);
        }
        if !skipping {
            *self
                .report
                .unknown_keywords
                .entry(word.name().to_string())
                .or_default() += 1;
        }
    }

    fn apply(&mut self, keyword: &Keyword, word: &ControlWord) {
        let toggle = !word.has_param || word.value != 0;
        let value = if word.has_param { word.value } else { keyword.value };

        match keyword.handler {
            Handler::Ignore => {},
            Handler::Codepage(codepage) => self.set_codepage(codepage, word.value),
            Handler::Toggle(field) => self.set_bool(field, toggle),
            Handler::Flag(field) => self.set_bool(field, keyword.value != 0),
            Handler::Numeric(field) => self.set_int(field, value),
            Handler::Enum(choice) => self.set_enum(choice),
            Handler::Underline => {
                self.state.format.underline = if toggle {
                    UnderlineStyle::Single
                } else {
                    UnderlineStyle::None
                };
            },
            Handler::Up => self.state.format.baseline = value.saturating_neg(),
            Handler::BorderStyle(style) => self.state.update_borders(|border| border.style = style),
            Handler::BorderProperty(field) => {
                self.state.update_borders(|border| field.apply(border, word.value));
            },
            Handler::SelectBorder(border) => self.state.layout.selected_border = border,
            Handler::Symbol(ch) => self.insert_char(ch),
            Handler::Action(action) => self.action(action, word),
        }
    }

    fn set_codepage(&mut self, codepage: Codepage, value: i32) {
        let encoding = match codepage {
            Codepage::Ansi => CharacterSet::Ansi.codec(),
            Codepage::Mac => CharacterSet::Mac.codec(),
            Codepage::Pc => CharacterSet::Pc.codec(),
            Codepage::Pca => CharacterSet::Pca.codec(),
            Codepage::AnsiCpg => {
                match u32::try_from(value).ok().and_then(codepage_to_codec) {
                    Some(encoding) => encoding,
                    None => {
                        warn!(codepage = value, "Unknown codepage, keeping {}", self.encoding.name());
                        return;
                    },
                }
            },
        };
        debug!(?codepage, requested = value, given = encoding.name(), "Codepage switch");
        self.encoding = encoding;
    }

    fn set_bool(&mut self, field: BoolField, value: bool) {
        let state = &mut self.state;
        match field {
            BoolField::Bold => state.format.bold = value,
            BoolField::Italic => state.format.italic = value,
            BoolField::Strike => state.format.strike = value,
            BoolField::DoubleStrike => state.format.double_strike = value,
            BoolField::Caps => state.format.caps = value,
            BoolField::SmallCaps => state.format.small_caps = value,
            BoolField::Hidden => state.format.hidden = value,
            BoolField::InTable => state.layout.in_table = value,
            BoolField::Keep => state.layout.keep = value,
            BoolField::KeepNext => state.layout.keep_next = value,
            BoolField::PageBreakBefore => state.layout.page_break_before = value,
            BoolField::PageBreakAfter => state.layout.page_break_after = value,
            BoolField::TitlePage => state.section.title_page = value,
            BoolField::PictureScaled => self.picture.scaled = value,
            BoolField::Landscape => self.settings.landscape = value,
            BoolField::FacingPages => self.settings.facing_pages = value,
        }
    }

    fn set_int(&mut self, field: IntField, value: i32) {
        let state = &mut self.state;
        let target = match field {
            IntField::Font => &mut state.format.font,
            IntField::FontSize => &mut state.format.font_size,
            IntField::Baseline => &mut state.format.baseline,
            IntField::Color => &mut state.format.color,
            IntField::Background => &mut state.format.background,
            IntField::UnderlineColor => &mut state.format.underline_color,
            IntField::Uc => &mut state.format.uc,
            IntField::FirstIndent => &mut state.layout.first_indent,
            IntField::LeftIndent => &mut state.layout.left_indent,
            IntField::RightIndent => &mut state.layout.right_indent,
            IntField::SpaceBefore => &mut state.layout.space_before,
            IntField::SpaceAfter => &mut state.layout.space_after,
            IntField::SpaceBetween => &mut state.layout.space_between,
            IntField::Style => &mut state.layout.style,
            IntField::HeaderMargin => &mut state.section.header_margin,
            IntField::FooterMargin => &mut state.section.footer_margin,
            IntField::RowLeft => &mut state.table_row.left,
            IntField::RowHeight => &mut state.table_row.height,
            IntField::CellBackground => &mut state.table_cell.background,
            IntField::Red => &mut self.rgb[0],
            IntField::Green => &mut self.rgb[1],
            IntField::Blue => &mut self.rgb[2],
            IntField::FontPitch => &mut self.font.pitch,
            IntField::NextStyle => &mut self.next_style,
            IntField::DefaultFont => &mut self.settings.default_font,
            IntField::DefaultTab => &mut self.settings.default_tab,
            IntField::PaperWidth => &mut self.settings.paper_width,
            IntField::PaperHeight => &mut self.settings.paper_height,
            IntField::MarginLeft => &mut self.settings.margin_left,
            IntField::MarginRight => &mut self.settings.margin_right,
            IntField::MarginTop => &mut self.settings.margin_top,
            IntField::MarginBottom => &mut self.settings.margin_bottom,
            IntField::PictureWidth => &mut self.picture.width,
            IntField::PictureHeight => &mut self.picture.height,
            IntField::PictureGoalWidth => &mut self.picture.goal_width,
            IntField::PictureGoalHeight => &mut self.picture.goal_height,
            IntField::PictureScaleX => &mut self.picture.scale_x,
            IntField::PictureScaleY => &mut self.picture.scale_y,
            IntField::CropLeft => &mut self.picture.crop.left,
            IntField::CropRight => &mut self.picture.crop.right,
            IntField::CropTop => &mut self.picture.crop.top,
            IntField::CropBottom => &mut self.picture.crop.bottom,
        };
        *target = value;
    }

    fn set_enum(&mut self, choice: EnumValue) {
        match choice {
            EnumValue::Alignment(alignment) => self.state.layout.alignment = alignment,
            EnumValue::RowAlignment(alignment) => self.state.table_row.alignment = alignment,
            EnumValue::VerticalAlign(align) => self.state.format.vertical_align = align,
            EnumValue::Underline(style) => self.state.format.underline = style,
            EnumValue::TabAlignment(alignment) => self.state.layout.pending_tab.alignment = alignment,
            EnumValue::TabLeader(leader) => self.state.layout.pending_tab.leader = leader,
            EnumValue::PictureType(kind) => self.picture.picture_type = kind,
            EnumValue::FontFamily(family) => self.font.family = family,
        }
    }

    fn action(&mut self, action: Action, word: &ControlWord) {
        let default_font = self.settings.default_font;
        match action {
            Action::Paragraph => self.insert_paragraph(),
            Action::PageBreak => self.insert_page_break(),
            Action::TableCell => self.insert_table_cell(),
            Action::TableRow => self.insert_table_row(),
            Action::CellDef => self.state.insert_cell_def(word.value),
            Action::TabDef => self.state.insert_tab_def(word.value),
            Action::Plain => self.state.plain_formatting(default_font),
            Action::ParagraphDefaults => self.state.paragraph_defaults(),
            Action::SectionDefaults => self.state.section_defaults(),
            Action::TableRowDefaults => self.state.table_row_defaults(),
            Action::HexSymbol => {
                if let Some(byte) = self.tokenizer.read_hex_byte() {
                    self.hex_bytes.push(byte);
                }
            },
            Action::Unicode => self.insert_unicode(word.value),
            Action::PageNumber => self.insert_variable(Variable::Page(PageVariable::Number)),
            Action::Date => self.insert_variable(Variable::Date(None)),
            Action::Time => self.insert_variable(Variable::Time(None)),
            Action::Endnote => {
                if let Some(footnote) = self.footnotes.last_mut() {
                    footnote.endnote = true;
                }
            },
        }
    }

    /// `\uN`: insert one UTF-16 code unit and skip its fallback.
    fn insert_unicode(&mut self, value: i32) {
        let unit = if value < 0 { value + 65536 } else { value };
        self.skip_fallback();

        let unit = u32::try_from(unit).unwrap_or(u32::from(char::REPLACEMENT_CHARACTER));
        match unit {
            0xD800..=0xDBFF => {
                if self.high_surrogate.replace(unit).is_some() {
                    self.insert_char(char::REPLACEMENT_CHARACTER);
                }
            },
            0xDC00..=0xDFFF => {
                let ch = self
                    .high_surrogate
                    .take()
                    .and_then(|high| char::from_u32(0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00)))
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.insert_char(ch);
            },
            _ => {
                if self.high_surrogate.take().is_some() {
                    self.insert_char(char::REPLACEMENT_CHARACTER);
                }
                self.insert_char(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            },
        }
    }

    /// Skip `\uc` bytes of fallback text.
    ///
    /// A control word, a `\'hh` escape or a binary block counts as one byte.
    /// A group boundary ends the skip and is kept.
    fn skip_fallback(&mut self) {
        let mut remaining = usize::try_from(self.state.format.uc).unwrap_or(0);
        while remaining > 0 {
            match self.next_token() {
                Token::ControlWord(word) => {
                    if word.is("'") {
                        let _ = self.tokenizer.read_hex_byte();
                    }
                    remaining -= 1;
                },
                Token::BinaryData(_) => remaining -= 1,
                Token::PlainText(text) => {
                    if text.len() <= remaining {
                        remaining -= text.len();
                    } else {
                        self.pending = Some(Token::PlainText(SmallVec::from_slice(&text[remaining..])));
                        remaining = 0;
                    }
                },
                token @ (Token::OpenGroup | Token::CloseGroup) => {
                    self.pending = Some(token);
                    break;
                },
            }
        }
    }

    fn insert_char(&mut self, ch: char) {
        let mut buffer = [0; 4];
        let text = ch.encode_utf8(&mut buffer);
        self.deliver_text(text.as_bytes(), TextCodec::Standard(encoding_rs::UTF_8));
    }

    fn insert_variable(&mut self, variable: Variable) {
        let format = self.state.format;
        self.current_text().push_inline(RunContent::Variable(variable), &format);
    }

    #[inline]
    fn current_text(&mut self) -> &mut TextState {
        &mut self.texts[self.text.0]
    }

    // Destinations

    fn change_destination(&mut self, name: &'static str, entry: &DestinationEntry) {
        let group = if entry.reset {
            None
        } else {
            self.destinations.current().group
        };
        self.destinations.enter(DestinationFrame::new(name, entry.kind, group));
        self.state.closes_destination = true;
        if entry.reset {
            self.state.reset(self.settings.default_font);
        }
        self.open_destination(entry.kind);
    }

    fn open_destination(&mut self, kind: DestinationKind) {
        match kind {
            DestinationKind::RichText(slot) => self.open_rich_text(TextId(slot.index())),
            DestinationKind::FootNote => {
                let number = self.footnotes.len() + 1;
                let text = TextId(self.texts.len());
                self.texts.push(TextState::default());
                self.footnotes.push(FootnoteText {
                    number,
                    endnote: false,
                    text,
                });
                self.insert_variable(Variable::Footnote(number));
                self.open_rich_text(text);
            },
            DestinationKind::FontTable => self.font = PendingFont::default(),
            DestinationKind::ColorTable => self.rgb = [0; 3],
            DestinationKind::StyleSheet => {
                self.style_name.clear();
                self.next_style = -1;
            },
            DestinationKind::PlainText(field) => self.info.field_mut(field).clear(),
            DestinationKind::Picture => {
                if !self.state.ignore_group {
                    self.picture = PictureProperties::default();
                }
            },
            DestinationKind::BlipUid => self.picture.uid.clear(),
            DestinationKind::Field => {
                if self.field_dest.is_none() {
                    self.field_dest = self.destinations.depth().checked_sub(1);
                }
                self.field = Field::default();
                self.field_format = self.state.format;
                self.destinations.current_mut().group = None;
            },
            DestinationKind::FieldInstruction => self.field.instruction.clear(),
            DestinationKind::FieldResult => {
                let enclosing = self
                    .field_dest
                    .and_then(|index| self.destinations.saved(index))
                    .map(|frame| (frame.name, frame.group));
                if self.field.instruction.trim().is_empty()
                    && let Some((name, group)) = enclosing
                {
                    let frame = self.destinations.current_mut();
                    frame.name = name;
                    frame.group = group;
                    frame.passthrough = true;
                } else {
                    self.field.result.clear();
                }
            },
            DestinationKind::Skip => self.state.ignore_group = true,
            DestinationKind::Root | DestinationKind::Group => {},
        }
    }

    fn open_rich_text(&mut self, text: TextId) {
        let previous = std::mem::replace(&mut self.text, text);
        let frame = self.destinations.current_mut();
        frame.saved_text = Some(previous);
        frame.group = Some(TEXT_GROUP);
        self.current_text().clear();
    }

    fn close_destination(&mut self) {
        let frame = self.destinations.current();
        let (kind, saved_text, passthrough) = (frame.kind, frame.saved_text, frame.passthrough);

        match kind {
            DestinationKind::RichText(_) | DestinationKind::FootNote => {
                if self.current_text().has_pending_text() {
                    self.insert_paragraph();
                }
                if self.current_text().table.is_some() {
                    self.finish_table();
                }
                if let Some(text) = saved_text {
                    self.text = text;
                }
            },
            DestinationKind::BlipUid => debug!(uid = %self.picture.uid, "Picture identifier"),
            DestinationKind::Picture => {
                if !self.state.ignore_group {
                    self.finish_picture();
                }
            },
            DestinationKind::Field => self.close_field(),
            DestinationKind::FieldResult => {
                if !passthrough {
                    self.field_format = self.state.format;
                }
            },
            _ => {},
        }

        self.destinations.leave();
    }

    fn deliver_text(&mut self, bytes: &[u8], encoding: TextCodec) {
        let frame = self.destinations.current();
        let (kind, passthrough) = (frame.kind, frame.passthrough);

        match kind {
            kind if kind.is_rich_text() => self.push_rich_text(bytes, encoding),
            DestinationKind::FieldResult if passthrough => self.push_rich_text(bytes, encoding),
            DestinationKind::FieldResult => {
                self.field.result.push_str(&encoding.decode(bytes));
            },
            DestinationKind::FieldInstruction => {
                self.field.instruction.push_str(&encoding.decode(bytes));
            },
            DestinationKind::FontTable => self.parse_font_table(bytes, encoding),
            DestinationKind::ColorTable => {
                for _ in bytes.iter().filter(|&&b| b == b';') {
                    let [red, green, blue] = std::mem::take(&mut self.rgb);
                    self.colors.add(Color::from_components(red, green, blue));
                }
            },
            DestinationKind::StyleSheet => self.parse_style_sheet(bytes, encoding),
            DestinationKind::PlainText(field) => {
                self.info.field_mut(field).push_str(&encoding.decode(bytes));
            },
            DestinationKind::Picture => {
                if !self.state.ignore_group {
                    self.picture.push_hex(bytes);
                }
            },
            DestinationKind::BlipUid => self.picture.uid.push_str(&String::from_utf8_lossy(bytes)),
            _ => {},
        }
    }

    fn deliver_binary(&mut self, data: Vec<u8>) {
        if self.destinations.current().kind == DestinationKind::Picture && !self.state.ignore_group
        {
            debug!(len = data.len(), "Binary picture data");
            self.picture.set_binary(data);
        }
    }

    fn push_rich_text(&mut self, bytes: &[u8], encoding: TextCodec) {
        if self.state.format.hidden {
            return;
        }
        let format = self.state.format;
        let text = encoding.decode(bytes);
        self.current_text().push_text(&text, &format);
    }

    /// Font names end at `;`.
    fn parse_font_table(&mut self, mut bytes: &[u8], encoding: TextCodec) {
        while let Some(end) = memchr(b';', bytes) {
            self.font.name.push_str(&encoding.decode(&bytes[..end]));
            let font = std::mem::take(&mut self.font);
            let request = FontRequest {
                name: &font.name,
                family: font.family,
                fixed_pitch: font.pitch == 1,
            };
            let family = resolve_family(self.options.font_matcher.as_ref(), &request);
            self.fonts.insert(self.state.format.font, family);
            bytes = &bytes[end + 1..];
        }
        self.font.name.push_str(&encoding.decode(bytes));
    }

    /// Style names end at `;`; the style takes the current formatting.
    fn parse_style_sheet(&mut self, mut bytes: &[u8], encoding: TextCodec) {
        while let Some(end) = memchr(b';', bytes) {
            self.style_name.push_str(&encoding.decode(&bytes[..end]));
            let layout = self.state.layout.clone();
            let next = if self.next_style == -1 {
                layout.style
            } else {
                self.next_style
            };
            self.styles.add_style(Style {
                name: std::mem::take(&mut self.style_name),
                format: self.state.format,
                layout,
                next,
            });
            self.next_style = -1;
            bytes = &bytes[end + 1..];
        }
        self.style_name.push_str(&encoding.decode(bytes));
    }

    // Paragraphs and tables

    fn insert_paragraph(&mut self) {
        if self.state.layout.in_table {
            self.open_table();
            let paragraph = self.build_paragraph(false);
            self.current_text().cell.push(paragraph);
        } else {
            if self.current_text().table.is_some() {
                self.finish_table();
            }
            let paragraph = self.build_paragraph(false);
            self.current_text().paragraphs.push(paragraph);
        }
    }

    fn insert_page_break(&mut self) {
        if self.current_text().has_pending_text() {
            self.insert_paragraph();
        }
        let paragraph = self.build_paragraph(true);
        self.current_text().paragraphs.push(paragraph);
    }

    fn insert_table_cell(&mut self) {
        let in_table = self.state.layout.in_table;
        self.state.layout.in_table = true;
        self.insert_paragraph();
        self.state.layout.in_table = in_table;

        let text = self.current_text();
        let cell = std::mem::take(&mut text.cell);
        text.row_cells.push(cell);
    }

    fn insert_table_row(&mut self) {
        if self.current_text().row_cells.is_empty() {
            return;
        }
        // Text after the last `\cell` belongs to no cell
        if self.current_text().has_pending_text() {
            let paragraph = self.build_paragraph(false);
            self.current_text().paragraphs.push(paragraph);
        }
        if self.current_text().rows.is_empty() {
            let number = self.open_table();
            self.insert_table_anchor(number);
        }
        let contents = std::mem::take(&mut self.current_text().row_cells);
        let row = TableRow::build(&self.state.table_row, contents);
        self.current_text().rows.push(row);
    }

    /// Number of the open table, opening a new one if needed.
    fn open_table(&mut self) -> usize {
        if let Some(number) = self.current_text().table {
            return number;
        }
        self.table_count += 1;
        let number = self.table_count;
        self.current_text().table = Some(number);
        number
    }

    /// Paragraph holding the table anchor, with default formatting.
    fn insert_table_anchor(&mut self, number: usize) {
        let saved = self.state.clone();
        self.state.reset(self.settings.default_font);
        self.state.layout.alignment = saved.table_row.alignment;

        let format = self.state.format;
        self.current_text()
            .push_inline(RunContent::Anchor(Anchor::Table(number)), &format);
        let paragraph = self.build_paragraph(false);
        self.current_text().paragraphs.push(paragraph);
        self.state = saved;
    }

    fn finish_table(&mut self) {
        self.insert_table_row();
        let text = self.current_text();
        let rows = std::mem::take(&mut text.rows);
        if let Some(number) = text.table.take()
            && !rows.is_empty()
        {
            self.tables.push(table::finish_table(number, rows));
        }
    }

    fn build_paragraph(&mut self, frame_break: bool) -> Paragraph {
        let has_text = self.current_text().has_pending_text();
        let (style, format) = match self.styles.get(self.state.layout.style) {
            Some(style) => (
                style.name.clone(),
                if has_text { style.format } else { self.state.format },
            ),
            None => (DEFAULT_STYLE_NAME.to_string(), self.state.format),
        };
        Paragraph {
            style,
            layout: self.state.layout.clone(),
            format,
            runs: self.current_text().take_runs(),
            frame_break,
        }
    }

    // Fields and pictures

    fn close_field(&mut self) {
        if !self.field.instruction.trim().is_empty() {
            let field = std::mem::take(&mut self.field);
            let format = self.field_format;
            match field.interpret() {
                FieldAction::Variable(variable) => {
                    self.current_text()
                        .push_inline(RunContent::Variable(variable), &format);
                },
                FieldAction::Symbol(ch) => {
                    self.current_text().push_text(ch.encode_utf8(&mut [0; 4]), &format);
                },
                FieldAction::Import(name) => self.import_picture(&name),
                FieldAction::Literal => {
                    if let Some(name) = field.instruction.split_whitespace().next()
                        && FieldType::from_name(name).is_none()
                    {
                        self.report.unsupported_fields.push(name.to_string());
                    }
                    self.current_text().push_text(&field.result, &format);
                },
            }
        }

        if self.field_dest.is_some() && self.field_dest == self.destinations.depth().checked_sub(1) {
            self.field_dest = None;
        }
    }

    fn finish_picture(&mut self) {
        let number = self.pictures.len() + 1;
        let frame = self.picture.frame(number);
        debug!(file = %frame.file_name, frame = %frame.frame_name(), "Picture");
        let data = self.picture.take_data();
        self.place_picture(frame, data);
    }

    /// Read a picture named by an `IMPORT` field.
    fn import_picture(&mut self, raw_name: &str) {
        if raw_name.is_empty() || raw_name == "\\*" {
            error!("Import field without file name");
            return;
        }
        let relative = raw_name.replace('\\', "/");
        let path = match &self.options.base_dir {
            Some(dir) => dir.join(&relative),
            None => PathBuf::from(&relative),
        };
        debug!(path = %path.display(), "Import field");

        let data = match std::fs::read(&path) {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => {
                error!(file = raw_name, "Import field: file is empty");
                return;
            },
            Err(err) => {
                error!(file = raw_name, %err, "Import field: cannot read file");
                return;
            },
        };

        let number = self.pictures.len() + 1;
        let detected = picture::detect_image_type(&data);
        let extension = match detected {
            Some(kind) => kind.extension().to_string(),
            None => file_extension(&path),
        };
        let (width, height) = picture::image_dimensions(&data).unwrap_or((0, 0));
        let twips = |pixels: u32| i32::try_from(pixels.saturating_mul(20)).unwrap_or(i32::MAX);
        let frame = PictureFrame {
            number,
            file_name: format!("pictures/picture{number}{extension}"),
            key: raw_name.to_string(),
            picture_type: detected.unwrap_or(PictureType::Png),
            width: twips(width),
            height: twips(height),
            crop: Default::default(),
        };
        debug!(file = %frame.file_name, frame = %frame.frame_name(), "Imported picture");
        self.place_picture(frame, data);
    }

    fn place_picture(&mut self, frame: PictureFrame, data: Vec<u8>) {
        let format = self.state.format;
        self.current_text()
            .push_inline(RunContent::Anchor(Anchor::Picture(frame.number)), &format);
        self.pictures.push((frame, data));
    }

    // Output

    fn emit<B, S>(&mut self, builder: &mut B, store: &mut S)
    where
        B: DocumentBuilder + ?Sized,
        S: PictureStore + ?Sized,
    {
        builder.document_info(&self.info);

        let mut presence = HeaderFooterPresence::default();
        for slot in TextSlot::ALL {
            presence.set(slot, !self.texts[slot.index()].paragraphs().is_empty());
        }
        let section = self.state.section;
        builder.page_layout(&PageLayout::new(
            &self.settings,
            section.title_page,
            section.header_margin,
            section.footer_margin,
            &presence,
        ));

        for (id, family) in self.fonts.iter() {
            builder.font(id, family);
        }
        for color in self.colors.colors() {
            builder.color(*color);
        }
        for style in self.styles.styles() {
            builder.style(style, self.styles.following(style));
        }

        for slot in TextSlot::ALL {
            if slot != TextSlot::Body && presence.has(slot) {
                builder.header_footer(slot, self.texts[slot.index()].take_paragraphs());
            }
        }
        builder.body(self.texts[TextSlot::Body.index()].take_paragraphs());

        for footnote in std::mem::take(&mut self.footnotes) {
            builder.footnote(Footnote {
                number: footnote.number,
                endnote: footnote.endnote,
                paragraphs: self.texts[footnote.text.0].take_paragraphs(),
            });
        }
        for table in std::mem::take(&mut self.tables) {
            builder.table(table);
        }
        for (frame, data) in std::mem::take(&mut self.pictures) {
            if let Err(err) = store.store(&frame.file_name, &data) {
                error!(file = %frame.file_name, %err, "Could not save picture");
                self.report.picture_store_failures.push(frame.file_name.clone());
            }
            builder.picture(frame);
        }
    }
}

/// Extension of a file name including the dot, `.png` when there is none.
fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or_else(|| ".png".to_string(), |ext| format!(".{}", ext.to_ascii_lowercase()))
}
