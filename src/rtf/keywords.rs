//! Control-word tables.
//!
//! Two disjoint compile-time tables drive the importer:
//! - [`PROPERTIES`]: control words that set a property or insert content.
//!   Most of them share a handful of generic setters parameterized by a field
//!   selector ([`BoolField`], [`IntField`], [`EnumValue`]).
//! - [`DESTINATIONS`]: control words that switch the current destination.
//!   They are only recognized as the first word of a group.
//!
//! Each entry carries a [`Scope`]: the destination name or group tag the word
//! is valid in.

use super::border::{BorderField, BorderSide, BorderStyle, TabAlignment, TabLeader};
use super::destination::{DestinationKind, TextSlot};
use super::info::InfoField;
use super::picture::PictureType;
use super::state::BorderRef;
use super::types::{Alignment, FontFamily, UnderlineStyle, VerticalAlign};
use phf::phf_map;

/// Name of the implicit destination that is current before `\rtf`.
pub const ROOT_DESTINATION: &str = "";

/// Group tag shared by every rich-text destination.
pub const TEXT_GROUP: &str = "Text";

/// Where a control word is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Everywhere
    Any,
    /// Only while the current destination has this name or group tag
    In(&'static str),
}

impl Scope {
    /// Check the scope against the current destination.
    #[inline]
    pub fn admits(self, name: &str, group: Option<&str>) -> bool {
        match self {
            Scope::Any => true,
            Scope::In(scope) => scope == name || group == Some(scope),
        }
    }
}

/// Boolean property selected by a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolField {
    Bold,
    Italic,
    Strike,
    DoubleStrike,
    Caps,
    SmallCaps,
    Hidden,
    InTable,
    Keep,
    KeepNext,
    PageBreakBefore,
    PageBreakAfter,
    TitlePage,
    PictureScaled,
    Landscape,
    FacingPages,
}

/// Integer property selected by a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntField {
    Font,
    FontSize,
    Baseline,
    Color,
    Background,
    UnderlineColor,
    Uc,
    FirstIndent,
    LeftIndent,
    RightIndent,
    SpaceBefore,
    SpaceAfter,
    SpaceBetween,
    Style,
    HeaderMargin,
    FooterMargin,
    RowLeft,
    RowHeight,
    CellBackground,
    Red,
    Green,
    Blue,
    FontPitch,
    NextStyle,
    DefaultFont,
    DefaultTab,
    PaperWidth,
    PaperHeight,
    MarginLeft,
    MarginRight,
    MarginTop,
    MarginBottom,
    PictureWidth,
    PictureHeight,
    PictureGoalWidth,
    PictureGoalHeight,
    PictureScaleX,
    PictureScaleY,
    CropLeft,
    CropRight,
    CropTop,
    CropBottom,
}

/// Enumerated property together with the value the control word stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue {
    Alignment(Alignment),
    RowAlignment(Alignment),
    VerticalAlign(VerticalAlign),
    Underline(UnderlineStyle),
    TabAlignment(TabAlignment),
    TabLeader(TabLeader),
    PictureType(PictureType),
    FontFamily(FontFamily),
}

/// Codepage switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codepage {
    /// `\ansi`
    Ansi,
    /// `\ansicpgN`
    AnsiCpg,
    /// `\mac`
    Mac,
    /// `\pc`
    Pc,
    /// `\pca`
    Pca,
}

/// Control words with bespoke behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Paragraph,
    PageBreak,
    TableCell,
    TableRow,
    CellDef,
    TabDef,
    Plain,
    ParagraphDefaults,
    SectionDefaults,
    TableRowDefaults,
    HexSymbol,
    Unicode,
    PageNumber,
    Date,
    Time,
    Endnote,
}

/// How a property-table entry is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Recognized but without effect
    Ignore,
    Codepage(Codepage),
    /// `true` unless the parameter is 0
    Toggle(BoolField),
    /// Always the entry's value, the parameter is ignored
    Flag(BoolField),
    /// The parameter, or the entry's value when absent
    Numeric(IntField),
    /// The value the control word itself names
    Enum(EnumValue),
    /// `\ul` on, `\ul0` off
    Underline,
    /// `\upN` raises by N half-points (default from the entry)
    Up,
    BorderStyle(BorderStyle),
    BorderProperty(BorderField),
    /// Select a border for the following border words, `None` deselects
    SelectBorder(Option<BorderRef>),
    /// Insert a fixed character
    Symbol(char),
    Action(Action),
}

/// Property-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub scope: Scope,
    pub handler: Handler,
    pub value: i32,
}

/// Destination-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationEntry {
    pub scope: Scope,
    pub kind: DestinationKind,
    /// Reset all formatting when entering the destination
    pub reset: bool,
}

/// The body destination entered by the `\rtf` header.
pub const RTF_DESTINATION: DestinationEntry = DestinationEntry {
    scope: Scope::In(ROOT_DESTINATION),
    kind: DestinationKind::RichText(TextSlot::Body),
    reset: true,
};

/// Name of the skip destination.
pub const SKIP_NAME: &str = "*";

/// Destination installed for `{\*\unknown ...}` groups.
pub const SKIP_DESTINATION: DestinationEntry = DestinationEntry {
    scope: Scope::Any,
    kind: DestinationKind::Skip,
    reset: false,
};

const ANY: Scope = Scope::Any;
const TEXT: Scope = Scope::In(TEXT_GROUP);
const BODY: Scope = Scope::In("rtf");
const PICT: Scope = Scope::In("pict");
const FONTTBL: Scope = Scope::In("fonttbl");
const COLORTBL: Scope = Scope::In("colortbl");
const STYLESHEET: Scope = Scope::In("stylesheet");
const INFO: Scope = Scope::In("info");
const FIELD: Scope = Scope::In("field");
const FOOTNOTE: Scope = Scope::In("footnote");

const fn entry(scope: Scope, handler: Handler, value: i32) -> Keyword {
    Keyword {
        scope,
        handler,
        value,
    }
}

const fn ignore() -> Keyword {
    entry(ANY, Handler::Ignore, 0)
}

const fn toggle(field: BoolField) -> Keyword {
    entry(ANY, Handler::Toggle(field), 0)
}

const fn flag(scope: Scope, field: BoolField) -> Keyword {
    entry(scope, Handler::Flag(field), 1)
}

const fn numeric(scope: Scope, field: IntField) -> Keyword {
    entry(scope, Handler::Numeric(field), 0)
}

const fn choose(scope: Scope, value: EnumValue) -> Keyword {
    entry(scope, Handler::Enum(value), 0)
}

const fn symbol(ch: char) -> Keyword {
    entry(ANY, Handler::Symbol(ch), 0)
}

const fn action(scope: Scope, action: Action) -> Keyword {
    entry(scope, Handler::Action(action), 0)
}

const fn codepage(codepage: Codepage) -> Keyword {
    entry(ANY, Handler::Codepage(codepage), 0)
}

const fn border_style(style: BorderStyle) -> Keyword {
    entry(ANY, Handler::BorderStyle(style), 0)
}

const fn border_property(field: BorderField) -> Keyword {
    entry(ANY, Handler::BorderProperty(field), 0)
}

const fn select_border(border: BorderRef) -> Keyword {
    entry(ANY, Handler::SelectBorder(Some(border)), 0)
}

const fn underline(style: UnderlineStyle) -> Keyword {
    choose(ANY, EnumValue::Underline(style))
}

const fn picture(kind: PictureType) -> Keyword {
    choose(PICT, EnumValue::PictureType(kind))
}

const fn font_family(family: FontFamily) -> Keyword {
    choose(FONTTBL, EnumValue::FontFamily(family))
}

const fn destination(scope: Scope, kind: DestinationKind, reset: bool) -> DestinationEntry {
    DestinationEntry { scope, kind, reset }
}

/// Property-changing and content-inserting control words.
pub static PROPERTIES: phf::Map<&'static str, Keyword> = phf_map! {
    // Control symbols
    "\n" => action(TEXT, Action::Paragraph),
    "\r" => action(TEXT, Action::Paragraph),
    "'" => action(ANY, Action::HexSymbol),
    "\\" => symbol('\\'),
    "{" => symbol('{'),
    "}" => symbol('}'),
    "_" => symbol('\u{2011}'),
    "|" => symbol('\u{00b7}'),
    "~" => symbol('\u{00a0}'),
    "-" => symbol('\u{00ad}'),

    // Codepages
    "ansi" => codepage(Codepage::Ansi),
    "ansicpg" => codepage(Codepage::AnsiCpg),
    "mac" => codepage(Codepage::Mac),
    "pc" => codepage(Codepage::Pc),
    "pca" => codepage(Codepage::Pca),

    // Character formatting
    "b" => toggle(BoolField::Bold),
    "i" => toggle(BoolField::Italic),
    "strike" => toggle(BoolField::Strike),
    "striked" => toggle(BoolField::DoubleStrike),
    "caps" => toggle(BoolField::Caps),
    "scaps" => toggle(BoolField::SmallCaps),
    "v" => toggle(BoolField::Hidden),
    "f" => numeric(ANY, IntField::Font),
    "fs" => numeric(ANY, IntField::FontSize),
    "cf" => numeric(ANY, IntField::Color),
    "cb" => numeric(ANY, IntField::Background),
    "highlight" => numeric(ANY, IntField::Background),
    "ulc" => numeric(ANY, IntField::UnderlineColor),
    "uc" => numeric(ANY, IntField::Uc),
    "dn" => entry(ANY, Handler::Numeric(IntField::Baseline), 6),
    "up" => entry(ANY, Handler::Up, 6),
    "sub" => choose(ANY, EnumValue::VerticalAlign(VerticalAlign::Subscript)),
    "super" => choose(ANY, EnumValue::VerticalAlign(VerticalAlign::Superscript)),
    "nosupersub" => choose(ANY, EnumValue::VerticalAlign(VerticalAlign::Normal)),
    "plain" => action(ANY, Action::Plain),
    "u" => action(ANY, Action::Unicode),
    "ul" => entry(ANY, Handler::Underline, 0),
    "uld" => underline(UnderlineStyle::Dotted),
    "uldash" => underline(UnderlineStyle::Dashed),
    "uldashd" => underline(UnderlineStyle::DashDot),
    "uldashdd" => underline(UnderlineStyle::DashDotDot),
    "uldb" => underline(UnderlineStyle::Double),
    "ulnone" => underline(UnderlineStyle::None),
    "ulth" => underline(UnderlineStyle::Thick),
    "ulw" => underline(UnderlineStyle::Words),
    "ulwave" => underline(UnderlineStyle::Wave),
    "ulhwave" => underline(UnderlineStyle::Wave),
    "ululdbwave" => underline(UnderlineStyle::Wave),

    // Paragraph formatting
    "pard" => action(ANY, Action::ParagraphDefaults),
    "ql" => choose(ANY, EnumValue::Alignment(Alignment::Left)),
    "qr" => choose(ANY, EnumValue::Alignment(Alignment::Right)),
    "qj" => choose(ANY, EnumValue::Alignment(Alignment::Justify)),
    "qc" => choose(ANY, EnumValue::Alignment(Alignment::Center)),
    "li" => numeric(ANY, IntField::LeftIndent),
    "ri" => numeric(ANY, IntField::RightIndent),
    "fi" => numeric(ANY, IntField::FirstIndent),
    "sb" => numeric(ANY, IntField::SpaceBefore),
    "sa" => numeric(ANY, IntField::SpaceAfter),
    "sl" => numeric(ANY, IntField::SpaceBetween),
    "s" => numeric(ANY, IntField::Style),
    "keep" => flag(ANY, BoolField::Keep),
    "keepn" => flag(ANY, BoolField::KeepNext),
    "pagebb" => flag(ANY, BoolField::PageBreakBefore),
    "pgbrk" => toggle(BoolField::PageBreakAfter),
    "intbl" => flag(ANY, BoolField::InTable),
    "tx" => action(ANY, Action::TabDef),
    "tqc" => choose(ANY, EnumValue::TabAlignment(TabAlignment::Center)),
    "tqr" => choose(ANY, EnumValue::TabAlignment(TabAlignment::Right)),
    "tqdec" => choose(ANY, EnumValue::TabAlignment(TabAlignment::Decimal)),
    "tldot" => choose(ANY, EnumValue::TabLeader(TabLeader::Dot)),
    "tlhyph" => choose(ANY, EnumValue::TabLeader(TabLeader::Hyphen)),
    "tlth" => choose(ANY, EnumValue::TabLeader(TabLeader::ThickLine)),
    "tlul" => choose(ANY, EnumValue::TabLeader(TabLeader::Underline)),

    // Borders
    "box" => entry(ANY, Handler::SelectBorder(None), 0),
    "brdrl" => select_border(BorderRef::Paragraph(BorderSide::Left)),
    "brdrr" => select_border(BorderRef::Paragraph(BorderSide::Right)),
    "brdrt" => select_border(BorderRef::Paragraph(BorderSide::Top)),
    "brdrb" => select_border(BorderRef::Paragraph(BorderSide::Bottom)),
    "clbrdrl" => select_border(BorderRef::Cell(BorderSide::Left)),
    "clbrdrr" => select_border(BorderRef::Cell(BorderSide::Right)),
    "clbrdrt" => select_border(BorderRef::Cell(BorderSide::Top)),
    "clbrdrb" => select_border(BorderRef::Cell(BorderSide::Bottom)),
    "brdrs" => border_style(BorderStyle::Solid),
    "brdrth" => border_style(BorderStyle::Solid),
    "brdrsh" => border_style(BorderStyle::Solid),
    "brdrdb" => border_style(BorderStyle::Solid),
    "brdrhairline" => border_style(BorderStyle::Solid),
    "brdrdot" => border_style(BorderStyle::Dots),
    "brdrdash" => border_style(BorderStyle::Dashes),
    "brdrdashsm" => border_style(BorderStyle::Dashes),
    "brdrdashd" => border_style(BorderStyle::DashDot),
    "brdrdashdd" => border_style(BorderStyle::DashDotDot),
    "brdrw" => border_property(BorderField::Width),
    "brdrcf" => border_property(BorderField::Color),
    "brsp" => border_property(BorderField::Space),

    // Section formatting
    "sectd" => action(ANY, Action::SectionDefaults),
    "headery" => numeric(ANY, IntField::HeaderMargin),
    "footery" => numeric(ANY, IntField::FooterMargin),
    "titlepg" => flag(ANY, BoolField::TitlePage),

    // Tables
    "trowd" => action(ANY, Action::TableRowDefaults),
    "trleft" => numeric(ANY, IntField::RowLeft),
    "trrh" => numeric(ANY, IntField::RowHeight),
    "trql" => choose(ANY, EnumValue::RowAlignment(Alignment::Left)),
    "trqc" => choose(ANY, EnumValue::RowAlignment(Alignment::Center)),
    "trqr" => choose(ANY, EnumValue::RowAlignment(Alignment::Right)),
    "cellx" => action(ANY, Action::CellDef),
    "clcbpat" => numeric(ANY, IntField::CellBackground),
    "cell" => action(TEXT, Action::TableCell),
    "row" => action(TEXT, Action::TableRow),

    // Special characters
    "tab" => symbol('\t'),
    "line" => symbol('\n'),
    "bullet" => symbol('\u{2022}'),
    "emdash" => symbol('\u{2014}'),
    "endash" => symbol('\u{2013}'),
    "emspace" => symbol('\u{2003}'),
    "enspace" => symbol('\u{2002}'),
    "qmspace" => symbol('\u{2004}'),
    "lquote" => symbol('\u{2018}'),
    "rquote" => symbol('\u{2019}'),
    "ldblquote" => symbol('\u{201c}'),
    "rdblquote" => symbol('\u{201d}'),
    "ltrmark" => symbol('\u{200e}'),
    "rtlmark" => symbol('\u{200f}'),
    "zwj" => symbol('\u{200d}'),
    "zwnj" => symbol('\u{200c}'),

    // Breaks and variables
    "par" => action(TEXT, Action::Paragraph),
    "page" => action(TEXT, Action::PageBreak),
    "sect" => action(TEXT, Action::PageBreak),
    "chdate" => action(ANY, Action::Date),
    "chtime" => action(ANY, Action::Time),
    "chpgn" => action(ANY, Action::PageNumber),
    "ftnalt" => action(FOOTNOTE, Action::Endnote),

    // Document formatting
    "deff" => numeric(BODY, IntField::DefaultFont),
    "deftab" => numeric(BODY, IntField::DefaultTab),
    "paperw" => numeric(BODY, IntField::PaperWidth),
    "paperh" => numeric(BODY, IntField::PaperHeight),
    "margl" => numeric(BODY, IntField::MarginLeft),
    "margr" => numeric(BODY, IntField::MarginRight),
    "margt" => numeric(BODY, IntField::MarginTop),
    "margb" => numeric(BODY, IntField::MarginBottom),
    "landscape" => flag(BODY, BoolField::Landscape),
    "facingp" => flag(BODY, BoolField::FacingPages),

    // Font table
    "fnil" => font_family(FontFamily::Nil),
    "froman" => font_family(FontFamily::Roman),
    "fswiss" => font_family(FontFamily::Swiss),
    "fmodern" => font_family(FontFamily::Modern),
    "fscript" => font_family(FontFamily::Script),
    "fdecor" => font_family(FontFamily::Decor),
    "ftech" => font_family(FontFamily::Tech),
    "fprq" => numeric(FONTTBL, IntField::FontPitch),

    // Color table
    "red" => numeric(COLORTBL, IntField::Red),
    "green" => numeric(COLORTBL, IntField::Green),
    "blue" => numeric(COLORTBL, IntField::Blue),

    // Style sheet
    "snext" => numeric(STYLESHEET, IntField::NextStyle),

    // Pictures
    "pngblip" => picture(PictureType::Png),
    "jpegblip" => picture(PictureType::Jpeg),
    "dibitmap" => picture(PictureType::Bmp),
    "wbitmap" => picture(PictureType::Bmp),
    "pmmetafile" => picture(PictureType::Wmf),
    "emfblip" => picture(PictureType::Emf),
    "wmetafile" => picture(PictureType::Emf),
    "macpict" => picture(PictureType::MacPict),
    "picw" => numeric(PICT, IntField::PictureWidth),
    "pich" => numeric(PICT, IntField::PictureHeight),
    "picwgoal" => numeric(PICT, IntField::PictureGoalWidth),
    "pichgoal" => numeric(PICT, IntField::PictureGoalHeight),
    "picscalex" => numeric(PICT, IntField::PictureScaleX),
    "picscaley" => numeric(PICT, IntField::PictureScaleY),
    "picscaled" => flag(PICT, BoolField::PictureScaled),
    "piccropl" => numeric(PICT, IntField::CropLeft),
    "piccropr" => numeric(PICT, IntField::CropRight),
    "piccropt" => numeric(PICT, IntField::CropTop),
    "piccropb" => numeric(PICT, IntField::CropBottom),

    // Recognized, nothing to do
    "adjustright" => ignore(),
    "cs" => ignore(),
    "expnd" => ignore(),
    "expndtw" => ignore(),
    "fcharset" => ignore(),
    "formshade" => ignore(),
};

/// Destination-changing control words.
pub static DESTINATIONS: phf::Map<&'static str, DestinationEntry> = phf_map! {
    "rtf" => RTF_DESTINATION,
    "fonttbl" => destination(BODY, DestinationKind::FontTable, true),
    "colortbl" => destination(BODY, DestinationKind::ColorTable, true),
    "stylesheet" => destination(BODY, DestinationKind::StyleSheet, true),
    "info" => destination(BODY, DestinationKind::Group, true),
    "author" => destination(INFO, DestinationKind::PlainText(InfoField::Author), false),
    "title" => destination(INFO, DestinationKind::PlainText(InfoField::Title), false),
    "company" => destination(INFO, DestinationKind::PlainText(InfoField::Company), false),
    "doccomm" => destination(INFO, DestinationKind::PlainText(InfoField::Comment), false),
    "subject" => destination(INFO, DestinationKind::PlainText(InfoField::Subject), false),
    "keywords" => destination(INFO, DestinationKind::PlainText(InfoField::Keywords), false),
    "operator" => destination(INFO, DestinationKind::PlainText(InfoField::Operator), false),
    "manager" => destination(INFO, DestinationKind::PlainText(InfoField::Manager), false),
    "category" => destination(INFO, DestinationKind::PlainText(InfoField::Category), false),
    "header" => destination(BODY, DestinationKind::RichText(TextSlot::OddPagesHeader), true),
    "headerl" => destination(BODY, DestinationKind::RichText(TextSlot::OddPagesHeader), true),
    "headerr" => destination(BODY, DestinationKind::RichText(TextSlot::EvenPagesHeader), true),
    "headerf" => destination(BODY, DestinationKind::RichText(TextSlot::FirstPageHeader), true),
    "footer" => destination(BODY, DestinationKind::RichText(TextSlot::OddPagesFooter), true),
    "footerl" => destination(BODY, DestinationKind::RichText(TextSlot::OddPagesFooter), true),
    "footerr" => destination(BODY, DestinationKind::RichText(TextSlot::EvenPagesFooter), true),
    "footerf" => destination(BODY, DestinationKind::RichText(TextSlot::FirstPageFooter), true),
    "footnote" => destination(BODY, DestinationKind::FootNote, true),
    "pict" => destination(TEXT, DestinationKind::Picture, true),
    "blipuid" => destination(PICT, DestinationKind::BlipUid, false),
    "field" => destination(TEXT, DestinationKind::Field, false),
    "fldinst" => destination(FIELD, DestinationKind::FieldInstruction, false),
    "fldrslt" => destination(FIELD, DestinationKind::FieldResult, false),
    "shppict" => destination(TEXT, DestinationKind::Group, false),
    "nonshppict" => destination(TEXT, DestinationKind::Skip, false),
    "shpinst" => destination(TEXT, DestinationKind::Skip, true),
    "panose" => destination(ANY, DestinationKind::Skip, false),
    "datafield" => destination(ANY, DestinationKind::Skip, false),
};

/// Look up a property-changing control word.
#[inline]
pub fn property(name: &str) -> Option<&'static Keyword> {
    PROPERTIES.get(name)
}

/// Look up a destination-changing control word.
#[inline]
pub fn destination_entry(name: &str) -> Option<&'static DestinationEntry> {
    DESTINATIONS.get(name)
}

/// Look up a destination-changing control word together with its static name.
#[inline]
pub fn lookup_destination(name: &str) -> Option<(&'static str, &'static DestinationEntry)> {
    DESTINATIONS.get_entry(name).map(|(key, entry)| (*key, entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_disjoint() {
        for name in DESTINATIONS.keys() {
            assert!(PROPERTIES.get(name).is_none(), "{name} is in both tables");
        }
    }

    #[test]
    fn test_generic_setter_entries() {
        let bold = property("b").unwrap();
        assert_eq!(bold.handler, Handler::Toggle(BoolField::Bold));
        assert_eq!(bold.scope, Scope::Any);

        let keep = property("keepn").unwrap();
        assert_eq!(keep.handler, Handler::Flag(BoolField::KeepNext));
        assert_eq!(keep.value, 1);

        let down = property("dn").unwrap();
        assert_eq!(down.handler, Handler::Numeric(IntField::Baseline));
        assert_eq!(down.value, 6);

        assert_eq!(
            property("qc").unwrap().handler,
            Handler::Enum(EnumValue::Alignment(Alignment::Center))
        );
    }

    #[test]
    fn test_scope_admits() {
        assert!(Scope::Any.admits("fonttbl", None));
        assert!(TEXT.admits("footnote", Some(TEXT_GROUP)));
        assert!(!TEXT.admits("fonttbl", None));
        assert!(PICT.admits("pict", None));
        assert!(!PICT.admits("rtf", Some(TEXT_GROUP)));
    }

    #[test]
    fn test_structural_words_need_rich_text() {
        for name in ["par", "cell", "row", "page", "sect", "\n", "\r"] {
            assert_eq!(property(name).unwrap().scope, TEXT, "{name}");
        }
    }

    #[test]
    fn test_destination_entries() {
        let rtf = destination_entry("rtf").unwrap();
        assert!(rtf.scope.admits(ROOT_DESTINATION, None));
        assert!(rtf.reset);

        let fldrslt = destination_entry("fldrslt").unwrap();
        assert_eq!(fldrslt.kind, DestinationKind::FieldResult);
        assert!(fldrslt.scope.admits("field", None));

        assert_eq!(destination_entry("nonshppict").unwrap().kind, DestinationKind::Skip);
        assert!(destination_entry("bogus").is_none());
    }

    #[test]
    fn test_picture_words_are_scoped() {
        for name in ["picw", "pich", "picwgoal", "pngblip", "piccropl"] {
            assert_eq!(property(name).unwrap().scope, PICT, "{name}");
        }
    }
}
