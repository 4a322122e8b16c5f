//! In-memory collaborators for the unit tests.

use alloc::{
    string::{
        String,
        ToString,
    },
    vec::Vec,
};
use core::convert::Infallible;

use embassy_time::Instant;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

use crate::{
    DirEntry,
    ImageError,
    ImageReader,
    Storage,
    StorageError,
};

/// Draw target that only counts what it is asked to do.
pub struct NullDisplay {
    size: Size,
    pub fills: Vec<Rgb565>,
    pub pixels: usize,
}

impl NullDisplay {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            fills: Vec::new(),
            pixels: 0,
        }
    }
}

impl OriginDimensions for NullDisplay {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for NullDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pixels += pixels.into_iter().count();
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fills.push(color);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Draw {
    pub path: String,
    pub origin: Point,
    pub at: Instant,
}

/// A card with a fixed directory tree that records every draw.
#[derive(Default)]
pub struct FakeCard {
    dirs: Vec<(String, Vec<DirEntry>)>,
    sizes: Vec<(String, Size)>,
    broken: Vec<(String, ImageError)>,
    pub draws: Vec<Draw>,
    pub scans: usize,
}

pub struct FakeCursor {
    entries: Vec<DirEntry>,
    next: usize,
}

impl FakeCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str, entries: impl IntoIterator<Item = DirEntry>) -> Self {
        self.dirs.push((path.to_string(), entries.into_iter().collect()));
        self
    }

    pub fn with_size(mut self, path: &str, size: Size) -> Self {
        self.sizes.push((path.to_string(), size));
        self
    }

    /// Make every access to `path` fail with `error`.
    pub fn with_broken(mut self, path: &str, error: ImageError) -> Self {
        self.broken.push((path.to_string(), error));
        self
    }

    pub fn drawn_paths(&self) -> Vec<&str> {
        self.draws.iter().map(|d| d.path.as_str()).collect()
    }

    fn check(&self, path: &str) -> Result<(), ImageError> {
        match self.broken.iter().find(|(p, _)| p == path) {
            Some((_, error)) => Err(*error),
            None => Ok(()),
        }
    }
}

impl Storage for FakeCard {
    type Cursor = FakeCursor;

    fn open_dir(&mut self, path: &str) -> Result<FakeCursor, StorageError> {
        let (_, entries) = self
            .dirs
            .iter()
            .find(|(p, _)| p == path)
            .ok_or(StorageError::NotFound)?;
        self.scans += 1;
        Ok(FakeCursor {
            entries: entries.clone(),
            next: 0,
        })
    }

    fn next_entry(&mut self, cursor: &mut FakeCursor) -> Result<Option<DirEntry>, StorageError> {
        let entry = cursor.entries.get(cursor.next).cloned();
        cursor.next += 1;
        Ok(entry)
    }
}

impl<D: DrawTarget> ImageReader<D> for FakeCard {
    fn dimensions(&mut self, path: &str) -> Result<Size, ImageError> {
        self.check(path)?;
        Ok(self
            .sizes
            .iter()
            .find(|(p, _)| p == path)
            .map_or(Size::new(100, 80), |(_, size)| *size))
    }

    fn draw(&mut self, path: &str, _target: &mut D, origin: Point) -> Result<(), ImageError> {
        self.check(path)?;
        self.draws.push(Draw {
            path: path.to_string(),
            origin,
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Lends a card to code that takes its storage by value, such as `run`.
impl Storage for &mut FakeCard {
    type Cursor = FakeCursor;

    fn open_dir(&mut self, path: &str) -> Result<FakeCursor, StorageError> {
        (**self).open_dir(path)
    }

    fn next_entry(&mut self, cursor: &mut FakeCursor) -> Result<Option<DirEntry>, StorageError> {
        (**self).next_entry(cursor)
    }
}

impl<D: DrawTarget> ImageReader<D> for &mut FakeCard {
    fn dimensions(&mut self, path: &str) -> Result<Size, ImageError> {
        <FakeCard as ImageReader<D>>::dimensions(&mut **self, path)
    }

    fn draw(&mut self, path: &str, target: &mut D, origin: Point) -> Result<(), ImageError> {
        (**self).draw(path, target, origin)
    }
}
