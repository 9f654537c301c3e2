//! Format-independent helpers.

pub mod encoding;

pub use encoding::{
    CharacterSet, OemCodepage, TextCodec, codepage_to_codec, codepage_to_encoding, decode_bytes,
};
