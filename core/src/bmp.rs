//! Uncompressed BMP files, decoded one pixel row at a time.
//!
//! Only a single row is ever buffered, so a bitmap larger than the heap
//! still reaches the screen.

use alloc::vec::Vec;

use embedded_graphics::{
    pixelcolor::{
        Rgb565,
        Rgb888,
    },
    prelude::*,
    primitives::Rectangle,
};

use crate::ImageError;

/// File header plus `BITMAPINFOHEADER`.
pub const BMP_HEADER_LEN: usize = 54;
/// Smallest info header with 32-bit width and height.
const MIN_INFO_HEADER_LEN: u32 = 40;
const BI_RGB: u32 = 0;

/// The parts of a BMP header needed to place and stream the pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BmpHeader {
    /// Where the pixel rows start in the file.
    pub data_offset: u32,
    pub size: Size,
    /// Rows are stored top row first (negative height on disk).
    pub top_down: bool,
    pub bits_per_pixel: u16,
    pub compression: u32,
}

impl BmpHeader {
    pub fn parse(header: &[u8; BMP_HEADER_LEN]) -> Result<Self, ImageError> {
        let bytes = |at: usize| [header[at], header[at + 1], header[at + 2], header[at + 3]];

        if &header[..2] != b"BM" || u32::from_le_bytes(bytes(14)) < MIN_INFO_HEADER_LEN {
            return Err(ImageError::FormatUnsupported);
        }
        let width = i32::from_le_bytes(bytes(18));
        let height = i32::from_le_bytes(bytes(22));
        if width <= 0 || height == 0 {
            return Err(ImageError::FormatUnsupported);
        }

        Ok(Self {
            data_offset: u32::from_le_bytes(bytes(10)),
            size: Size::new(width.unsigned_abs(), height.unsigned_abs()),
            top_down: height < 0,
            bits_per_pixel: u16::from_le_bytes([header[28], header[29]]),
            compression: u32::from_le_bytes(bytes(30)),
        })
    }

    /// Uncompressed 24- and 32-bit files can go through [`draw_rows`].
    pub const fn is_streamable(&self) -> bool {
        self.compression == BI_RGB && matches!(self.bits_per_pixel, 24 | 32)
    }

    /// Bytes per stored row, padded to a multiple of four.
    pub fn row_stride(&self) -> Option<usize> {
        let bits = (self.size.width as usize).checked_mul(usize::from(self.bits_per_pixel))?;
        Some(bits.div_ceil(32) * 4)
    }
}

/// Draw every row of a streamable bitmap with its top-left corner at
/// `origin`.
///
/// `read` continues from the first pixel row and fills as much of the
/// buffer as the file still holds, returning the count. Rows are drawn in
/// file order, so bottom-up unless the header is top-down. `row` is the
/// only pixel storage and ends up one stride long.
pub fn draw_rows<D, R>(
    header: &BmpHeader,
    mut read: R,
    target: &mut D,
    origin: Point,
    row: &mut Vec<u8>,
) -> Result<(), ImageError>
where
    D: DrawTarget<Color = Rgb565>,
    R: FnMut(&mut [u8]) -> Result<usize, ImageError>,
{
    if !header.is_streamable() {
        return Err(ImageError::FormatUnsupported);
    }
    let stride = header.row_stride().ok_or(ImageError::FormatUnsupported)?;
    let bytes_per_pixel = usize::from(header.bits_per_pixel / 8);
    // Encoders may leave the padding off the last row.
    let pixel_bytes = header.size.width as usize * bytes_per_pixel;

    row.clear();
    row.try_reserve_exact(stride)
        .map_err(|_| ImageError::OutOfMemory)?;
    row.resize(stride, 0);

    let Size { width, height } = header.size;
    for stored in 0..height {
        if read(row.as_mut_slice())? < pixel_bytes {
            return Err(ImageError::Truncated);
        }
        let y = if header.top_down { stored } else { height - 1 - stored };
        let area = Rectangle::new(origin + Point::new(0, y as i32), Size::new(width, 1));
        let colors = row[..pixel_bytes]
            .chunks_exact(bytes_per_pixel)
            .map(|px| Rgb565::from(Rgb888::new(px[2], px[1], px[0])));
        target
            .fill_contiguous(&area, colors)
            .map_err(|_| ImageError::Display)?;
    }
    Ok(())
}
