//! RTF byte tokenizer.
//!
//! The tokenizer pulls raw bytes from any [`Read`] through a refillable buffer
//! and classifies them into four kinds of tokens: group open/close, control
//! words (and control symbols), plain text runs and `\bin` payloads.
//!
//! End of stream is reported as [`Token::CloseGroup`], forever. The dispatch
//! loop relies on this to unwind every open group of a truncated document and
//! terminate. Read errors are latched and behave like end of stream; the
//! caller collects them with [`Tokenizer::take_error`].

use crate::common::encoding::hex_nibble;
use smallvec::SmallVec;
use std::io::{self, Read};

/// Default size of the read buffer.
const BUFFER_SIZE: usize = 8 * 1024;

/// Control word or control symbol with its optional numeric parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlWord {
    /// Letters of the control word, or the single byte of a control symbol
    pub name: SmallVec<[u8; 16]>,
    /// Whether at least one parameter digit was read
    pub has_param: bool,
    /// Signed parameter value (0 when absent)
    pub value: i32,
}

impl ControlWord {
    /// Control word text as a string; empty if the symbol byte is not ASCII.
    #[inline]
    pub fn name(&self) -> &str {
        std::str::from_utf8(&self.name).unwrap_or("")
    }

    /// Check the control word text.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.as_slice() == name.as_bytes()
    }
}

/// Token types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Opening brace
    OpenGroup,
    /// Closing brace, also produced at end of stream
    CloseGroup,
    /// Control word or control symbol
    ControlWord(ControlWord),
    /// Raw text bytes, still in the document codepage
    PlainText(SmallVec<[u8; 64]>),
    /// Payload of a `\binN` control word
    BinaryData(Vec<u8>),
}

/// Streaming RTF tokenizer.
pub struct Tokenizer<R> {
    reader: R,
    buffer: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
    error: Option<io::Error>,
}

impl<R: Read> Tokenizer<R> {
    /// Bind the tokenizer to an input stream.
    pub fn open(reader: R) -> Self {
        Self::with_capacity(reader, BUFFER_SIZE)
    }

    /// Bind the tokenizer to an input stream with a specific buffer size.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            error: None,
        }
    }

    /// Advance by exactly one token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        loop {
            let Some(byte) = self.read_byte() else {
                return Token::CloseGroup;
            };
            match byte {
                // Raw line breaks are insignificant outside control words
                b'\n' | b'\r' => continue,
                b'{' => return Token::OpenGroup,
                b'}' => return Token::CloseGroup,
                b'\\' => return self.control_word(),
                _ => return self.plain_text(byte),
            }
        }
    }

    /// Read the two hex digits following a `\'` control symbol.
    ///
    /// Returns `None` if the digits are missing or malformed; a non-hex byte is
    /// left in the stream.
    pub fn read_hex_byte(&mut self) -> Option<u8> {
        let high = self.read_byte()?;
        let Some(high) = hex_nibble(high) else {
            self.unread();
            return None;
        };
        let low = self.read_byte()?;
        let Some(low) = hex_nibble(low) else {
            self.unread();
            return None;
        };
        Some((high << 4) | low)
    }

    /// Take the read error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Parse a control word or control symbol; the backslash is consumed.
    fn control_word(&mut self) -> Token {
        let Some(first) = self.read_byte() else {
            return Token::CloseGroup;
        };

        let mut name = SmallVec::new();
        name.push(first);

        if !first.is_ascii_alphabetic() {
            // Control symbol: exactly one character, never a parameter
            return Token::ControlWord(ControlWord {
                name,
                has_param: false,
                value: 0,
            });
        }

        let mut next = loop {
            match self.read_byte() {
                Some(byte) if byte.is_ascii_alphabetic() => name.push(byte),
                other => break other,
            }
        };

        let negative = next == Some(b'-');
        if negative {
            next = self.read_byte();
        }

        let mut has_param = false;
        let mut value: i32 = 0;
        while let Some(digit @ b'0'..=b'9') = next {
            has_param = true;
            value = value
                .saturating_mul(10)
                .saturating_add(i32::from(digit - b'0'));
            next = self.read_byte();
        }
        if negative {
            value = -value;
        }

        // A space delimiter belongs to the control word
        match next {
            Some(b' ') | None => {},
            Some(_) => self.unread(),
        }

        if name.as_slice() == b"bin" && has_param && value > 0 {
            return Token::BinaryData(self.read_binary(value as usize));
        }

        Token::ControlWord(ControlWord {
            name,
            has_param,
            value,
        })
    }

    /// Accumulate plain text until a backslash, a brace or a line break.
    fn plain_text(&mut self, first: u8) -> Token {
        let mut text = SmallVec::<[u8; 64]>::new();
        text.push(first);

        loop {
            if self.pos >= self.len && !self.fill() {
                break;
            }
            let available = &self.buffer[self.pos..self.len];
            match available
                .iter()
                .position(|&b| matches!(b, b'\\' | b'{' | b'}' | b'\n' | b'\r'))
            {
                Some(end) => {
                    text.extend_from_slice(&available[..end]);
                    self.pos += end;
                    break;
                },
                None => {
                    text.extend_from_slice(available);
                    self.pos = self.len;
                },
            }
        }

        Token::PlainText(text)
    }

    /// Read up to `count` raw bytes.
    fn read_binary(&mut self, count: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(count.min(self.buffer.len() * 16));
        while data.len() < count {
            if self.pos >= self.len && !self.fill() {
                break;
            }
            let take = (count - data.len()).min(self.len - self.pos);
            data.extend_from_slice(&self.buffer[self.pos..self.pos + take]);
            self.pos += take;
        }
        data
    }

    #[inline]
    fn read_byte(&mut self) -> Option<u8> {
        if self.pos >= self.len && !self.fill() {
            return None;
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Some(byte)
    }

    /// Push back the byte returned by the last successful `read_byte`.
    #[inline]
    fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    fn fill(&mut self) -> bool {
        if self.eof {
            return false;
        }
        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.eof = true;
                    return false;
                },
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return true;
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    self.eof = true;
                    return false;
                },
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reader that hands out at most `chunk` bytes per call.
    pub(crate) struct ChunkedReader<'a> {
        pub data: &'a [u8],
        pub chunk: usize,
    }

    impl Read for ChunkedReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    fn tokenize(input: &[u8]) -> Vec<Token> {
        let mut tokenizer = Tokenizer::open(input);
        let mut tokens = Vec::new();
        let mut depth = 0i32;
        loop {
            let token = tokenizer.next();
            match token {
                Token::OpenGroup => depth += 1,
                Token::CloseGroup => depth -= 1,
                _ => {},
            }
            tokens.push(token);
            if depth <= 0 {
                return tokens;
            }
        }
    }

    fn word(name: &str, value: Option<i32>) -> Token {
        Token::ControlWord(ControlWord {
            name: SmallVec::from_slice(name.as_bytes()),
            has_param: value.is_some(),
            value: value.unwrap_or(0),
        })
    }

    fn text(s: &str) -> Token {
        Token::PlainText(SmallVec::from_slice(s.as_bytes()))
    }

    #[test]
    fn test_simple_tokenization() {
        let tokens = tokenize(br"{\rtf1\ansi Hello}");
        assert_eq!(
            tokens,
            vec![
                Token::OpenGroup,
                word("rtf", Some(1)),
                word("ansi", None),
                text("Hello"),
                Token::CloseGroup,
            ]
        );
    }

    #[test]
    fn test_space_delimiter_is_consumed_once() {
        let tokens = tokenize(br"{\b  bold}");
        assert_eq!(tokens[1], word("b", None));
        assert_eq!(tokens[2], text(" bold"));
    }

    #[test]
    fn test_negative_parameter() {
        let tokens = tokenize(br"{\fi-720x}");
        assert_eq!(tokens[1], word("fi", Some(-720)));
        assert_eq!(tokens[2], text("x"));
    }

    #[test]
    fn test_minus_without_digits_has_no_parameter() {
        let tokens = tokenize(br"{\foo-x}");
        assert_eq!(tokens[1], word("foo", None));
        assert_eq!(tokens[2], text("x"));
    }

    #[test]
    fn test_control_symbols() {
        let tokens = tokenize(br"{\~\_\*\{}");
        assert_eq!(tokens[1], word("~", None));
        assert_eq!(tokens[2], word("_", None));
        assert_eq!(tokens[3], word("*", None));
        assert_eq!(tokens[4], word("{", None));
        assert_eq!(tokens[5], Token::CloseGroup);
    }

    #[test]
    fn test_control_symbol_takes_no_parameter() {
        let tokens = tokenize(br"{\~12}");
        assert_eq!(tokens[1], word("~", None));
        assert_eq!(tokens[2], text("12"));
    }

    #[test]
    fn test_hex_escape_read_by_caller() {
        let mut tokenizer = Tokenizer::open(&br"\'e9t"[..]);
        assert_eq!(tokenizer.next(), word("'", None));
        assert_eq!(tokenizer.read_hex_byte(), Some(0xE9));
        assert_eq!(tokenizer.next(), text("t"));
    }

    #[test]
    fn test_malformed_hex_escape() {
        let mut tokenizer = Tokenizer::open(&br"\'zz"[..]);
        assert_eq!(tokenizer.next(), word("'", None));
        assert_eq!(tokenizer.read_hex_byte(), None);
        assert_eq!(tokenizer.next(), text("zz"));
    }

    #[test]
    fn test_line_breaks_are_skipped() {
        let tokens = tokenize(b"{ab\r\ncd\n}");
        assert_eq!(tokens, vec![Token::OpenGroup, text("ab"), text("cd"), Token::CloseGroup]);
    }

    #[test]
    fn test_escaped_line_break_is_a_control_symbol() {
        let tokens = tokenize(b"{a\\\nb}");
        assert_eq!(tokens[2], word("\n", None));
    }

    #[test]
    fn test_binary_data() {
        let tokens = tokenize(b"{\\bin4 a{}\\x}");
        assert_eq!(tokens[1], Token::BinaryData(b"a{}\\".to_vec()));
        assert_eq!(tokens[2], text("x"));
    }

    #[test]
    fn test_truncated_binary_data() {
        let mut tokenizer = Tokenizer::open(&b"\\bin10 abc"[..]);
        assert_eq!(tokenizer.next(), Token::BinaryData(b"abc".to_vec()));
        assert_eq!(tokenizer.next(), Token::CloseGroup);
    }

    #[test]
    fn test_end_of_stream_is_close_group() {
        let mut tokenizer = Tokenizer::open(&b"{\\b"[..]);
        assert_eq!(tokenizer.next(), Token::OpenGroup);
        assert_eq!(tokenizer.next(), word("b", None));
        for _ in 0..3 {
            assert_eq!(tokenizer.next(), Token::CloseGroup);
        }
        assert!(tokenizer.take_error().is_none());
    }

    #[test]
    fn test_backslash_at_end_of_stream() {
        let mut tokenizer = Tokenizer::open(&b"\\"[..]);
        assert_eq!(tokenizer.next(), Token::CloseGroup);
    }

    #[test]
    fn test_read_error_is_latched() {
        let mut tokenizer = Tokenizer::open(FailingReader);
        assert_eq!(tokenizer.next(), Token::CloseGroup);
        assert!(tokenizer.take_error().is_some());
        assert!(tokenizer.take_error().is_none());
    }

    #[test]
    fn test_parameter_across_refills() {
        let reader = ChunkedReader {
            data: br"\fs-12345 x",
            chunk: 1,
        };
        let mut tokenizer = Tokenizer::with_capacity(reader, 1);
        assert_eq!(tokenizer.next(), word("fs", Some(-12345)));
        assert_eq!(tokenizer.next(), text("x"));
    }

    #[test]
    fn test_text_across_refills() {
        let reader = ChunkedReader {
            data: b"Hello World}",
            chunk: 3,
        };
        let mut tokenizer = Tokenizer::with_capacity(reader, 4);
        assert_eq!(tokenizer.next(), text("Hello World"));
        assert_eq!(tokenizer.next(), Token::CloseGroup);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_numeric_parameter_survives_any_chunking(
            value in -1_000_000i32..1_000_000,
            chunk in 1usize..8,
            capacity in 1usize..8,
        ) {
            let input = format!("\\li{value}x");
            let reader = ChunkedReader { data: input.as_bytes(), chunk };
            let mut tokenizer = Tokenizer::with_capacity(reader, capacity);
            prop_assert_eq!(tokenizer.next(), word("li", Some(value)));
            prop_assert_eq!(tokenizer.next(), text("x"));
        }
    }
}
