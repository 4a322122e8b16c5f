//! Collaborator seams: the mounted card and the BMP reader.

use alloc::string::String;

use embedded_graphics::prelude::*;

use crate::{
    ImageError,
    StorageError,
};

/// Longest file name the slideshow will build a path from.
pub const MAX_NAME_LEN: usize = 50;

/// One entry produced by a directory scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// The entry name, cut to at most `max_len` bytes on a char boundary.
    pub fn name(&self, max_len: usize) -> &str {
        if self.name.len() <= max_len {
            return &self.name;
        }
        let mut end = max_len;
        while !self.name.is_char_boundary(end) {
            end -= 1;
        }
        &self.name[..end]
    }

    /// Whether the name carries a `.bmp` extension, in any case.
    pub fn is_bitmap(&self) -> bool {
        !self.is_dir
            && self
                .name
                .rsplit_once('.')
                .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("bmp"))
    }
}

/// A mounted filesystem that can be scanned one entry at a time.
///
/// A cursor only moves forward; rescanning means opening the directory
/// again.
pub trait Storage {
    type Cursor;

    fn open_dir(&mut self, path: &str) -> Result<Self::Cursor, StorageError>;

    /// Next entry in filesystem order, or `Ok(None)` once exhausted.
    fn next_entry(&mut self, cursor: &mut Self::Cursor) -> Result<Option<DirEntry>, StorageError>;
}

/// Measures and blits bitmap files onto a draw target.
pub trait ImageReader<D: DrawTarget> {
    fn dimensions(&mut self, path: &str) -> Result<Size, ImageError>;

    /// Draw the bitmap with its top-left corner at `origin`. Parts outside
    /// the target are clipped.
    fn draw(&mut self, path: &str, target: &mut D, origin: Point) -> Result<(), ImageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_truncated_on_char_boundary() {
        let entry = DirEntry::file("sydän.bmp");
        assert_eq!(entry.name(50), "sydän.bmp");
        assert_eq!(entry.name(4), "syd");
        assert_eq!(entry.name(5), "sydä");
        assert_eq!(entry.name(6), "sydän");
    }

    #[test]
    fn bitmap_detection_ignores_case_and_directories() {
        assert!(DirEntry::file("IMG001.BMP").is_bitmap());
        assert!(DirEntry::file("photo.bmp").is_bitmap());
        assert!(!DirEntry::file("NOTES.TXT").is_bitmap());
        assert!(!DirEntry::file("BMP").is_bitmap());
        assert!(!DirEntry::dir("OLD.BMP").is_bitmap());
    }
}
