//! RTF field support.
//!
//! RTF fields are structured as:
//! {\field{\*\fldinst FIELD_INSTRUCTION}{\fldrslt FIELD_RESULT}}
//!
//! The first word of the instruction selects the field type. Recognized types
//! become variables in the enclosing text; anything else falls back to the
//! literal result text.

use tracing::{debug, warn};

/// Field type in RTF documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Author,
    FileName,
    Title,
    NumPages,
    Page,
    Time,
    Date,
    Hyperlink,
    Symbol,
    Import,
}

impl FieldType {
    /// Match a field name case-insensitively; backslashes are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name: String = name.chars().filter(|&c| c != '\\').collect();
        let field_type = match name.to_ascii_uppercase().as_str() {
            "AUTHOR" => FieldType::Author,
            "FILENAME" => FieldType::FileName,
            "TITLE" => FieldType::Title,
            "NUMPAGES" => FieldType::NumPages,
            "PAGE" => FieldType::Page,
            "TIME" => FieldType::Time,
            "DATE" => FieldType::Date,
            "HYPERLINK" => FieldType::Hyperlink,
            "SYMBOL" => FieldType::Symbol,
            "IMPORT" => FieldType::Import,
            _ => return None,
        };
        Some(field_type)
    }
}

/// Document property shown by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    Author,
    FileName,
    Title,
}

impl DocumentField {
    /// Text shown until the property is known.
    pub fn placeholder(self) -> &'static str {
        match self {
            DocumentField::Author => "NO AUTHOR",
            DocumentField::FileName => "NO FILENAME",
            DocumentField::Title => "NO TITLE",
        }
    }
}

/// Page-related variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariable {
    /// Current page number
    Number,
    /// Total page count
    Count,
}

/// Variable placed in rich text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    Page(PageVariable),
    Document(DocumentField),
    /// Date with an optional format picture
    Date(Option<String>),
    /// Time with an optional format picture
    Time(Option<String>),
    Link { text: String, href: String },
    /// Footnote reference by footnote number
    Footnote(usize),
}

impl Variable {
    /// Date or time variable.
    ///
    /// A time format containing date characters (`y`, `M`, `d`) makes a date.
    pub fn date_time(format: Option<String>, is_date: bool) -> Self {
        let as_date = is_date
            || format
                .as_deref()
                .is_some_and(|f| f.contains(['y', 'M', 'd']));
        if as_date {
            Variable::Date(format)
        } else {
            Variable::Time(format)
        }
    }
}

/// What a closed field turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    Variable(Variable),
    /// Insert one character
    Symbol(char),
    /// Import a picture file
    Import(String),
    /// Insert the result text as is
    Literal,
}

/// Collected field text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Field instruction (the command)
    pub instruction: String,
    /// Field result (the displayed text)
    pub result: String,
}

impl Field {
    /// Interpret the instruction.
    pub fn interpret(&self) -> FieldAction {
        let mut words = self.instruction.split_whitespace();
        let Some(name) = words.next() else {
            return FieldAction::Literal;
        };
        let Some(field_type) = FieldType::from_name(name) else {
            warn!(field = name, "Field not supported");
            return FieldAction::Literal;
        };
        debug!(?field_type, "Field found");

        match field_type {
            FieldType::Author => FieldAction::Variable(Variable::Document(DocumentField::Author)),
            FieldType::FileName => {
                FieldAction::Variable(Variable::Document(DocumentField::FileName))
            },
            FieldType::Title => FieldAction::Variable(Variable::Document(DocumentField::Title)),
            FieldType::NumPages => FieldAction::Variable(Variable::Page(PageVariable::Count)),
            FieldType::Page => FieldAction::Variable(Variable::Page(PageVariable::Number)),
            FieldType::Hyperlink => FieldAction::Variable(Variable::Link {
                text: self.result.clone(),
                href: hyperlink_target(words),
            }),
            FieldType::Symbol => words
                .next()
                .and_then(|code| code.parse::<u32>().ok())
                .filter(|&code| code > 0)
                .and_then(char::from_u32)
                .map_or(FieldAction::Literal, FieldAction::Symbol),
            FieldType::Time | FieldType::Date => match date_time_format(&self.instruction) {
                Ok(format) => FieldAction::Variable(Variable::date_time(
                    format,
                    field_type == FieldType::Date,
                )),
                Err(()) => FieldAction::Literal,
            },
            FieldType::Import => FieldAction::Import(words.next().unwrap_or("").to_string()),
        }
    }
}

/// Build a link target from the arguments of a HYPERLINK field.
///
/// `\l` introduces a bookmark (`#`), quoted and `http` arguments are appended.
fn hyperlink_target<'a>(args: impl Iterator<Item = &'a str>) -> String {
    let mut href = String::new();
    for arg in args {
        if arg == "\\l" {
            href.push('#');
        } else if arg.len() >= 2 && arg.starts_with('"') && arg.ends_with('"') {
            href.push_str(&arg[1..arg.len() - 1]);
        } else if arg.starts_with("http") {
            href.push_str(arg);
        }
    }
    href
}

/// Extract and normalize the `\@` format picture of a DATE or TIME field.
///
/// Returns `Ok(None)` when the instruction has no picture and `Err(())` when
/// the picture is malformed.
pub(crate) fn date_time_format(instruction: &str) -> Result<Option<String>, ()> {
    let Some(start) = instruction.find("\\@") else {
        return Ok(None);
    };
    let picture = &instruction[start + 2..];

    let quoted = picture.trim_start();
    let raw = if let Some(rest) = quoted.strip_prefix('"')
        && let Some(end) = rest.rfind('"')
        && end > 0
    {
        &rest[..end]
    } else {
        warn!("Date/time field format not in quotes");
        let end = picture
            .find(char::is_whitespace)
            .unwrap_or(picture.len());
        if end == 0 {
            return Err(());
        }
        &picture[..end]
    };

    let format = raw
        .replace("am/pm", "ap")
        .replace("a/p", "ap")
        .replace("AM/PM", "AP")
        .replace("A/P", "AP")
        .replace('\'', "");
    debug!(format = %format, "Date/time field format");
    Ok(Some(format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(instruction: &str, result: &str) -> Field {
        Field {
            instruction: instruction.to_string(),
            result: result.to_string(),
        }
    }

    #[test]
    fn test_field_name_matching() {
        assert_eq!(FieldType::from_name("page"), Some(FieldType::Page));
        assert_eq!(FieldType::from_name("\\PAGE"), Some(FieldType::Page));
        assert_eq!(FieldType::from_name("TOC"), None);
    }

    #[test]
    fn test_page_fields() {
        assert_eq!(
            field(" PAGE ", "3").interpret(),
            FieldAction::Variable(Variable::Page(PageVariable::Number))
        );
        assert_eq!(
            field("NUMPAGES \\* MERGEFORMAT", "").interpret(),
            FieldAction::Variable(Variable::Page(PageVariable::Count))
        );
    }

    #[test]
    fn test_parse_hyperlink() {
        let action = field(r#"HYPERLINK "https://example.com""#, "Example").interpret();
        assert_eq!(
            action,
            FieldAction::Variable(Variable::Link {
                text: "Example".to_string(),
                href: "https://example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_hyperlink_bookmark() {
        let action = field(r#"HYPERLINK \l "chapter2""#, "see").interpret();
        let FieldAction::Variable(Variable::Link { href, .. }) = action else {
            panic!("expected link");
        };
        assert_eq!(href, "#chapter2");
    }

    #[test]
    fn test_symbol_field() {
        assert_eq!(field("SYMBOL 169 \\f \"Symbol\"", "").interpret(), FieldAction::Symbol('©'));
        assert_eq!(field("SYMBOL 0", "x").interpret(), FieldAction::Literal);
        assert_eq!(field("SYMBOL abc", "x").interpret(), FieldAction::Literal);
        assert_eq!(field("SYMBOL", "x").interpret(), FieldAction::Literal);
    }

    #[test]
    fn test_unknown_field_is_literal() {
        assert_eq!(field("TOC \\o", "Contents").interpret(), FieldAction::Literal);
        assert_eq!(field("   ", "x").interpret(), FieldAction::Literal);
    }

    #[test]
    fn test_date_format() {
        assert_eq!(
            date_time_format(r#"DATE \@ "dd/MM/yyyy h:mm am/pm""#),
            Ok(Some("dd/MM/yyyy h:mm ap".to_string()))
        );
        assert_eq!(date_time_format(r#"TIME \@ "HH 'h' mm""#), Ok(Some("HH h mm".to_string())));
        assert_eq!(date_time_format(r#"DATE \@dd.MM.yy"#), Ok(Some("dd.MM.yy".to_string())));
        assert_eq!(date_time_format("DATE"), Ok(None));
        assert_eq!(date_time_format(r#"DATE \@ dd"#), Err(()));
    }

    #[test]
    fn test_time_with_date_picture_is_date() {
        assert_eq!(
            field(r#"TIME \@ "d MMMM""#, "").interpret(),
            FieldAction::Variable(Variable::Date(Some("d MMMM".to_string())))
        );
        assert_eq!(
            field(r#"TIME \@ "HH:mm""#, "").interpret(),
            FieldAction::Variable(Variable::Time(Some("HH:mm".to_string())))
        );
        assert_eq!(field(r#"DATE \@ "#, "today").interpret(), FieldAction::Literal);
    }

    #[test]
    fn test_import_field() {
        assert_eq!(
            field("IMPORT images\\logo.png", "").interpret(),
            FieldAction::Import("images\\logo.png".to_string())
        );
    }
}
