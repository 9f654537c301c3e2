//! Character encoding utilities for RTF text.
//!
//! RTF text is written in a codepage that is selected mid-stream by
//! `\ansi`, `\ansicpg`, `\mac`, `\pc` and `\pca`. This module maps those
//! selections to a [`TextCodec`] and decodes byte runs to UTF-8. Windows,
//! Mac and East Asian codepages go through `encoding_rs`; the DOS OEM
//! codepages 437 and 850, which `encoding_rs` lacks, use static tables.

use encoding_rs::Encoding;
use std::borrow::Cow;

/// Map Windows codepage identifier to encoding_rs Encoding.
///
/// # Arguments
/// * `codepage` - Windows codepage number (e.g., 936 for Simplified Chinese, 1252 for Western European)
///
/// # Returns
/// Returns `Some(&'static Encoding)` if the codepage is supported, `None` otherwise.
///
/// # Examples
/// ```
/// use rtf_import::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u32) -> Option<&'static Encoding> {
    match codepage {
        866 => Some(encoding_rs::IBM866),
        874 => Some(encoding_rs::WINDOWS_874),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS),
        936 | 20936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        54936 => Some(encoding_rs::GB18030),
        20932 => Some(encoding_rs::EUC_JP),

        // ISO 8859 series
        28591 => Some(encoding_rs::WINDOWS_1252),
        28592 => Some(encoding_rs::ISO_8859_2),
        28593 => Some(encoding_rs::ISO_8859_3),
        28594 => Some(encoding_rs::ISO_8859_4),
        28595 => Some(encoding_rs::ISO_8859_5),
        28596 => Some(encoding_rs::ISO_8859_6),
        28597 => Some(encoding_rs::ISO_8859_7),
        28598 => Some(encoding_rs::ISO_8859_8),
        28603 => Some(encoding_rs::ISO_8859_13),
        28605 => Some(encoding_rs::ISO_8859_15),

        20866 => Some(encoding_rs::KOI8_R),
        21866 => Some(encoding_rs::KOI8_U),

        // Macintosh
        10000 => Some(encoding_rs::MACINTOSH),
        10001 => Some(encoding_rs::SHIFT_JIS),
        10007 => Some(encoding_rs::X_MAC_CYRILLIC),

        65001 => Some(encoding_rs::UTF_8),

        _ => None,
    }
}

/// DOS OEM codepage decoded from a static table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OemCodepage {
    /// IBM PC (CP437)
    Cp437,
    /// IBM PC multilingual (CP850)
    Cp850,
}

impl OemCodepage {
    /// Characters for bytes 0x80..=0xFF. The lower half is ASCII.
    fn upper_half(self) -> &'static [char; 128] {
        match self {
            OemCodepage::Cp437 => &CP437_UPPER,
            OemCodepage::Cp850 => &CP850_UPPER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OemCodepage::Cp437 => "IBM437",
            OemCodepage::Cp850 => "IBM850",
        }
    }

    /// Decode a byte run. Every byte maps to exactly one character.
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        if bytes.is_ascii()
            && let Ok(text) = std::str::from_utf8(bytes)
        {
            return Cow::Borrowed(text);
        }
        let upper = self.upper_half();
        Cow::Owned(
            bytes
                .iter()
                .map(|&b| if b < 0x80 { char::from(b) } else { upper[usize::from(b - 0x80)] })
                .collect(),
        )
    }
}

#[rustfmt::skip]
static CP437_UPPER: [char; 128] = [
    '\u{00C7}', '\u{00FC}', '\u{00E9}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E5}', '\u{00E7}',
    '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00EF}', '\u{00EE}', '\u{00EC}', '\u{00C4}', '\u{00C5}',
    '\u{00C9}', '\u{00E6}', '\u{00C6}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00FB}', '\u{00F9}',
    '\u{00FF}', '\u{00D6}', '\u{00DC}', '\u{00A2}', '\u{00A3}', '\u{00A5}', '\u{20A7}', '\u{0192}',
    '\u{00E1}', '\u{00ED}', '\u{00F3}', '\u{00FA}', '\u{00F1}', '\u{00D1}', '\u{00AA}', '\u{00BA}',
    '\u{00BF}', '\u{2310}', '\u{00AC}', '\u{00BD}', '\u{00BC}', '\u{00A1}', '\u{00AB}', '\u{00BB}',
    '\u{2591}', '\u{2592}', '\u{2593}', '\u{2502}', '\u{2524}', '\u{2561}', '\u{2562}', '\u{2556}',
    '\u{2555}', '\u{2563}', '\u{2551}', '\u{2557}', '\u{255D}', '\u{255C}', '\u{255B}', '\u{2510}',
    '\u{2514}', '\u{2534}', '\u{252C}', '\u{251C}', '\u{2500}', '\u{253C}', '\u{255E}', '\u{255F}',
    '\u{255A}', '\u{2554}', '\u{2569}', '\u{2566}', '\u{2560}', '\u{2550}', '\u{256C}', '\u{2567}',
    '\u{2568}', '\u{2564}', '\u{2565}', '\u{2559}', '\u{2558}', '\u{2552}', '\u{2553}', '\u{256B}',
    '\u{256A}', '\u{2518}', '\u{250C}', '\u{2588}', '\u{2584}', '\u{258C}', '\u{2590}', '\u{2580}',
    '\u{03B1}', '\u{00DF}', '\u{0393}', '\u{03C0}', '\u{03A3}', '\u{03C3}', '\u{00B5}', '\u{03C4}',
    '\u{03A6}', '\u{0398}', '\u{03A9}', '\u{03B4}', '\u{221E}', '\u{03C6}', '\u{03B5}', '\u{2229}',
    '\u{2261}', '\u{00B1}', '\u{2265}', '\u{2264}', '\u{2320}', '\u{2321}', '\u{00F7}', '\u{2248}',
    '\u{00B0}', '\u{2219}', '\u{00B7}', '\u{221A}', '\u{207F}', '\u{00B2}', '\u{25A0}', '\u{00A0}',
];

#[rustfmt::skip]
static CP850_UPPER: [char; 128] = [
    '\u{00C7}', '\u{00FC}', '\u{00E9}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E5}', '\u{00E7}',
    '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00EF}', '\u{00EE}', '\u{00EC}', '\u{00C4}', '\u{00C5}',
    '\u{00C9}', '\u{00E6}', '\u{00C6}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00FB}', '\u{00F9}',
    '\u{00FF}', '\u{00D6}', '\u{00DC}', '\u{00F8}', '\u{00A3}', '\u{00D8}', '\u{00D7}', '\u{0192}',
    '\u{00E1}', '\u{00ED}', '\u{00F3}', '\u{00FA}', '\u{00F1}', '\u{00D1}', '\u{00AA}', '\u{00BA}',
    '\u{00BF}', '\u{00AE}', '\u{00AC}', '\u{00BD}', '\u{00BC}', '\u{00A1}', '\u{00AB}', '\u{00BB}',
    '\u{2591}', '\u{2592}', '\u{2593}', '\u{2502}', '\u{2524}', '\u{00C1}', '\u{00C2}', '\u{00C0}',
    '\u{00A9}', '\u{2563}', '\u{2551}', '\u{2557}', '\u{255D}', '\u{00A2}', '\u{00A5}', '\u{2510}',
    '\u{2514}', '\u{2534}', '\u{252C}', '\u{251C}', '\u{2500}', '\u{253C}', '\u{00E3}', '\u{00C3}',
    '\u{255A}', '\u{2554}', '\u{2569}', '\u{2566}', '\u{2560}', '\u{2550}', '\u{256C}', '\u{00A4}',
    '\u{00F0}', '\u{00D0}', '\u{00CA}', '\u{00CB}', '\u{00C8}', '\u{0131}', '\u{00CD}', '\u{00CE}',
    '\u{00CF}', '\u{2518}', '\u{250C}', '\u{2588}', '\u{2584}', '\u{00A6}', '\u{00CC}', '\u{2580}',
    '\u{00D3}', '\u{00DF}', '\u{00D4}', '\u{00D2}', '\u{00F5}', '\u{00D5}', '\u{00B5}', '\u{00FE}',
    '\u{00DE}', '\u{00DA}', '\u{00DB}', '\u{00D9}', '\u{00FD}', '\u{00DD}', '\u{00AF}', '\u{00B4}',
    '\u{00AD}', '\u{00B1}', '\u{2017}', '\u{00BE}', '\u{00B6}', '\u{00A7}', '\u{00F7}', '\u{00B8}',
    '\u{00B0}', '\u{00A8}', '\u{00B7}', '\u{00B9}', '\u{00B3}', '\u{00B2}', '\u{25A0}', '\u{00A0}',
];

/// Decoder for one RTF codepage selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCodec {
    Standard(&'static Encoding),
    Oem(OemCodepage),
}

impl TextCodec {
    pub fn name(self) -> &'static str {
        match self {
            TextCodec::Standard(encoding) => encoding.name(),
            TextCodec::Oem(oem) => oem.name(),
        }
    }

    /// Decode a byte run, replacing malformed sequences.
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            TextCodec::Standard(encoding) => decode_bytes(encoding, bytes),
            TextCodec::Oem(oem) => oem.decode(bytes),
        }
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        TextCodec::Standard(encoding_rs::WINDOWS_1252)
    }
}

/// Map a codepage number from `\ansicpg` to its decoder.
///
/// ```
/// use rtf_import::common::encoding::codepage_to_codec;
///
/// assert_eq!(codepage_to_codec(850).map(|codec| codec.name()), Some("IBM850"));
/// assert_eq!(codepage_to_codec(1251).map(|codec| codec.name()), Some("windows-1251"));
/// ```
pub fn codepage_to_codec(codepage: u32) -> Option<TextCodec> {
    match codepage {
        437 => Some(TextCodec::Oem(OemCodepage::Cp437)),
        850 => Some(TextCodec::Oem(OemCodepage::Cp850)),
        _ => codepage_to_encoding(codepage).map(TextCodec::Standard),
    }
}

/// Character set selected by one of the RTF header keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSet {
    /// ANSI (Windows-1252 / CP1252)
    #[default]
    Ansi,
    /// Mac (Mac Roman)
    Mac,
    /// PC (DOS / CP437)
    Pc,
    /// PC (DOS / CP850)
    Pca,
}

impl CharacterSet {
    /// The decoder for text written in this character set.
    pub fn codec(self) -> TextCodec {
        match self {
            CharacterSet::Ansi => TextCodec::Standard(encoding_rs::WINDOWS_1252),
            CharacterSet::Mac => TextCodec::Standard(encoding_rs::MACINTOSH),
            CharacterSet::Pc => TextCodec::Oem(OemCodepage::Cp437),
            CharacterSet::Pca => TextCodec::Oem(OemCodepage::Cp850),
        }
    }
}

/// Decode a byte run with the given encoding, replacing malformed sequences.
#[inline]
pub fn decode_bytes<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    encoding.decode_without_bom_handling(bytes).0
}

/// Convert a hex character to its nibble value (0-15).
#[inline]
pub fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
