//! RTF picture support.
//!
//! Pictures are embedded in a `{\pict ...}` group as hexadecimal text or as a
//! `\bin` payload. Properties arrive as control words before the data; the
//! picture is emitted when the group closes.

use crate::common::encoding::hex_nibble;

/// Embedded picture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PictureType {
    #[default]
    Png,
    Jpeg,
    /// Device-independent bitmap (`\dibitmap`, `\wbitmap`)
    Bmp,
    /// OS/2 metafile (`\pmmetafile`)
    Wmf,
    /// Enhanced metafile (`\emfblip`, `\wmetafile`)
    Emf,
    /// QuickDraw picture (`\macpict`)
    MacPict,
}

impl PictureType {
    /// File extension including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            PictureType::Wmf | PictureType::Emf => ".wmf",
            PictureType::Bmp => ".bmp",
            PictureType::MacPict => ".pict",
            PictureType::Jpeg => ".jpg",
            PictureType::Png => ".png",
        }
    }
}

/// Crop values in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crop {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// Properties and data of the picture being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureProperties {
    pub picture_type: PictureType,
    /// Width in pixels (`\picw`)
    pub width: i32,
    /// Height in pixels (`\pich`)
    pub height: i32,
    /// Desired width in twips (`\picwgoal`)
    pub goal_width: i32,
    /// Desired height in twips (`\pichgoal`)
    pub goal_height: i32,
    /// Horizontal scale in percent
    pub scale_x: i32,
    /// Vertical scale in percent
    pub scale_y: i32,
    pub scaled: bool,
    pub crop: Crop,
    /// Value of `\blipuid`
    pub uid: String,
    data: Vec<u8>,
    /// High nibble waiting for its partner
    nibble: Option<u8>,
}

impl Default for PictureProperties {
    fn default() -> Self {
        Self {
            picture_type: PictureType::Png,
            width: 0,
            height: 0,
            goal_width: 0,
            goal_height: 0,
            scale_x: 100,
            scale_y: 100,
            scaled: false,
            crop: Crop::default(),
            uid: String::new(),
            data: Vec::new(),
            nibble: None,
        }
    }
}

impl PictureProperties {
    /// Append hexadecimal picture text.
    ///
    /// Non-hex bytes are skipped, and an odd trailing digit is carried over
    /// to the next call.
    pub fn push_hex(&mut self, text: &[u8]) {
        self.data.reserve(text.len() / 2);
        for nibble in text.iter().copied().filter_map(hex_nibble) {
            match self.nibble.take() {
                Some(high) => self.data.push((high << 4) | nibble),
                None => self.nibble = Some(nibble),
            }
        }
    }

    /// Replace the data with a `\bin` payload.
    pub fn set_binary(&mut self, data: Vec<u8>) {
        self.data = data;
        self.nibble = None;
    }

    /// Picture bytes collected so far.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the picture bytes.
    #[inline]
    pub fn take_data(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Display width in twips.
    #[inline]
    pub fn display_width(&self) -> i32 {
        scale(self.goal_width, self.scale_x)
    }

    /// Display height in twips.
    #[inline]
    pub fn display_height(&self) -> i32 {
        scale(self.goal_height, self.scale_y)
    }

    /// Frame description for the `number`th picture.
    pub fn frame(&self, number: usize) -> PictureFrame {
        let extension = self.picture_type.extension();
        let file_name = format!("pictures/picture{number}{extension}");
        let uid = self.uid.trim();
        let key = if uid.is_empty() {
            file_name.clone()
        } else {
            format!("{uid}{extension}")
        };
        PictureFrame {
            number,
            file_name,
            key,
            picture_type: self.picture_type,
            width: self.display_width(),
            height: self.display_height(),
            crop: self.crop,
        }
    }
}

#[inline]
fn scale(value: i32, percent: i32) -> i32 {
    (i64::from(value) * i64::from(percent) / 100).clamp(i64::from(i32::MIN), i64::from(i32::MAX))
        as i32
}

/// A picture placed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureFrame {
    /// Picture number, starting at 1
    pub number: usize,
    /// Name under which the bytes are stored, e.g. `pictures/picture1.png`
    pub file_name: String,
    /// Identity of the picture data (blip uid or file name)
    pub key: String,
    pub picture_type: PictureType,
    /// Display width in twips
    pub width: i32,
    /// Display height in twips
    pub height: i32,
    pub crop: Crop,
}

impl PictureFrame {
    /// Frame name, e.g. `Picture 1`.
    pub fn frame_name(&self) -> String {
        format!("Picture {}", self.number)
    }
}

/// Detect the picture type of image file contents.
pub fn detect_image_type(data: &[u8]) -> Option<PictureType> {
    if data.starts_with(&[0xFF, 0xD8]) {
        return Some(PictureType::Jpeg);
    }

    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(PictureType::Png);
    }

    // EMF: record type 1 followed by the " EMF" signature at offset 40
    if data.len() >= 44 && data[0..4] == [0x01, 0x00, 0x00, 0x00] && data[40..44] == *b" EMF" {
        return Some(PictureType::Emf);
    }

    // Aldus placeable metafile
    if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
        return Some(PictureType::Wmf);
    }

    if data.starts_with(b"BM") {
        return Some(PictureType::Bmp);
    }

    None
}

/// Pixel dimensions of PNG, JPEG, GIF and BMP data.
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        // IHDR is always the first chunk
        let width = u32::from_be_bytes(data.get(16..20)?.try_into().ok()?);
        let height = u32::from_be_bytes(data.get(20..24)?.try_into().ok()?);
        return Some((width, height));
    }
    if data.starts_with(b"GIF8") {
        let width = u16::from_le_bytes(data.get(6..8)?.try_into().ok()?);
        let height = u16::from_le_bytes(data.get(8..10)?.try_into().ok()?);
        return Some((u32::from(width), u32::from(height)));
    }
    if data.starts_with(b"BM") {
        let width = i32::from_le_bytes(data.get(18..22)?.try_into().ok()?);
        let height = i32::from_le_bytes(data.get(22..26)?.try_into().ok()?);
        return Some((width.unsigned_abs(), height.unsigned_abs()));
    }
    if data.starts_with(&[0xFF, 0xD8]) {
        return jpeg_dimensions(data);
    }
    None
}

/// Walk the JPEG segments up to the first start-of-frame marker.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    loop {
        while *data.get(pos)? != 0xFF {
            pos += 1;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;
        match marker {
            0xD8 | 0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            _ => {},
        }
        let length = usize::from(u16::from_be_bytes(data.get(pos..pos + 2)?.try_into().ok()?));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let height = u16::from_be_bytes(data.get(pos + 3..pos + 5)?.try_into().ok()?);
            let width = u16::from_be_bytes(data.get(pos + 5..pos + 7)?.try_into().ok()?);
            return Some((u32::from(width), u32::from(height)));
        }
        pos += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_nibble_carry() {
        let mut picture = PictureProperties::default();
        picture.push_hex(b"89504");
        picture.push_hex(b"e\r\n47");
        assert_eq!(picture.data(), &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_binary_replaces_hex() {
        let mut picture = PictureProperties::default();
        picture.push_hex(b"abc");
        picture.set_binary(vec![1, 2, 3]);
        picture.push_hex(b"4");
        assert_eq!(picture.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_frame_naming() {
        let mut picture = PictureProperties {
            picture_type: PictureType::Jpeg,
            goal_width: 1440,
            goal_height: 720,
            scale_x: 50,
            ..PictureProperties::default()
        };
        let frame = picture.frame(3);
        assert_eq!(frame.file_name, "pictures/picture3.jpg");
        assert_eq!(frame.key, "pictures/picture3.jpg");
        assert_eq!(frame.frame_name(), "Picture 3");
        assert_eq!((frame.width, frame.height), (720, 720));

        picture.uid = " 0a1b2c ".to_string();
        assert_eq!(picture.frame(3).key, "0a1b2c.jpg");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(PictureType::Emf.extension(), ".wmf");
        assert_eq!(PictureType::Wmf.extension(), ".wmf");
        assert_eq!(PictureType::MacPict.extension(), ".pict");
        assert_eq!(PictureType::default(), PictureType::Png);
    }

    #[test]
    fn test_detect_png() {
        let png_sig = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_image_type(&png_sig), Some(PictureType::Png));
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg_sig = vec![0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(detect_image_type(&jpeg_sig), Some(PictureType::Jpeg));
        assert_eq!(detect_image_type(b"GIF89a"), None);
    }

    #[test]
    fn test_png_dimensions() {
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&[0, 0, 0, 13]);
        png.extend_from_slice(b"IHDR");
        png.extend_from_slice(&640u32.to_be_bytes());
        png.extend_from_slice(&480u32.to_be_bytes());
        assert_eq!(image_dimensions(&png), Some((640, 480)));
    }

    #[test]
    fn test_jpeg_dimensions() {
        let jpeg = [
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0, 2 payload bytes
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x20, 0x00, 0x40, 0x01, 0x01, 0x11, 0x00,
        ];
        assert_eq!(image_dimensions(&jpeg), Some((64, 32)));
        assert_eq!(image_dimensions(&jpeg[..10]), None);
    }
}
