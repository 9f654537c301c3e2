//! Font-table name resolution.
//!
//! Font-table names often carry a charset or style suffix the installed
//! family lacks ("Arial CE", "Times New Roman Greek"). The resolver drops
//! trailing words until the [`FontMatcher`] accepts a name, then asks the
//! matcher for a replacement, and finally keeps the name as written.

use super::types::FontFamily;
use std::fmt;
use tracing::debug;

/// Font-table entry to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest<'a> {
    /// Name as written in the font table
    pub name: &'a str,
    pub family: FontFamily,
    /// `\fprq1`
    pub fixed_pitch: bool,
}

/// Source of installed font families.
pub trait FontMatcher {
    /// Whether a family with exactly this name is available.
    fn exact_match(&self, name: &str) -> bool;

    /// Replacement family when no prefix of the name matched.
    fn fallback(&self, _request: &FontRequest<'_>) -> Option<String> {
        None
    }
}

/// Matcher that accepts every name, so font-table names are kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyFontMatcher;

impl FontMatcher for AnyFontMatcher {
    fn exact_match(&self, _name: &str) -> bool {
        true
    }
}

impl fmt::Debug for dyn FontMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FontMatcher")
    }
}

/// Resolve a font-table name to an available family.
pub fn resolve_family(matcher: &dyn FontMatcher, request: &FontRequest<'_>) -> String {
    let mut candidate = request.name.trim();
    while !candidate.is_empty() {
        if matcher.exact_match(candidate) {
            if candidate != request.name {
                debug!(requested = request.name, found = candidate, "Font name shortened");
            }
            return candidate.to_string();
        }
        match candidate.rfind(' ') {
            Some(end) => candidate = candidate[..end].trim_end(),
            None => break,
        }
    }

    match matcher.fallback(request) {
        Some(family) => {
            debug!(requested = request.name, found = %family, "Font replaced");
            family
        },
        None => request.name.to_string(),
    }
}

#[cfg(feature = "system-fonts")]
pub use system::SystemFontMatcher;

#[cfg(feature = "system-fonts")]
mod system {
    use super::{FontMatcher, FontRequest};
    use crate::rtf::types::FontFamily;
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    /// Matcher backed by the fonts installed on the system.
    pub struct SystemFontMatcher {
        source: SystemSource,
    }

    impl SystemFontMatcher {
        pub fn new() -> Self {
            Self {
                source: SystemSource::new(),
            }
        }
    }

    impl Default for SystemFontMatcher {
        fn default() -> Self {
            Self::new()
        }
    }

    impl FontMatcher for SystemFontMatcher {
        fn exact_match(&self, name: &str) -> bool {
            self.source.select_family_by_name(name).is_ok()
        }

        fn fallback(&self, request: &FontRequest<'_>) -> Option<String> {
            let generic = if request.fixed_pitch {
                FamilyName::Monospace
            } else {
                match request.family {
                    FontFamily::Roman => FamilyName::Serif,
                    FontFamily::Modern | FontFamily::Tech => FamilyName::Monospace,
                    FontFamily::Script => FamilyName::Cursive,
                    FontFamily::Decor => FamilyName::Fantasy,
                    FontFamily::Swiss | FontFamily::Nil => FamilyName::SansSerif,
                }
            };
            let handle = self
                .source
                .select_best_match(&[generic], &Properties::new())
                .ok()?;
            handle.load().ok().map(|font| font.family_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Installed(&'static [&'static str]);

    impl FontMatcher for Installed {
        fn exact_match(&self, name: &str) -> bool {
            self.0.contains(&name)
        }
    }

    struct WithFallback;

    impl FontMatcher for WithFallback {
        fn exact_match(&self, _name: &str) -> bool {
            false
        }

        fn fallback(&self, request: &FontRequest<'_>) -> Option<String> {
            (request.family == FontFamily::Roman).then(|| "Serif".to_string())
        }
    }

    fn request(name: &str, family: FontFamily) -> FontRequest<'_> {
        FontRequest {
            name,
            family,
            fixed_pitch: false,
        }
    }

    #[test]
    fn test_any_matcher_keeps_name() {
        let family = resolve_family(&AnyFontMatcher, &request("Times New Roman", FontFamily::Roman));
        assert_eq!(family, "Times New Roman");
    }

    #[test]
    fn test_trailing_words_are_dropped() {
        let matcher = Installed(&["Times New Roman", "Arial"]);
        assert_eq!(
            resolve_family(&matcher, &request("Times New Roman Greek", FontFamily::Roman)),
            "Times New Roman"
        );
        assert_eq!(resolve_family(&matcher, &request("Arial CE", FontFamily::Swiss)), "Arial");
    }

    #[test]
    fn test_exhausted_name_is_kept() {
        let matcher = Installed(&[]);
        assert_eq!(
            resolve_family(&matcher, &request("Wingdings 2", FontFamily::Decor)),
            "Wingdings 2"
        );
        assert_eq!(resolve_family(&WithFallback, &request("Unknown", FontFamily::Roman)), "Serif");
    }
}
