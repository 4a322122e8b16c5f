//! BMP reading straight from the card.
//!
//! Dimensions come from the file header alone. Uncompressed 24- and 32-bit
//! files are streamed to the display one row at a time. Other depths are
//! small enough to load whole into the storage's scratch buffer and hand
//! to `tinybmp`.

use alloc::vec::Vec;

use defmt::debug;
use embedded_graphics::{
    image::Image,
    pixelcolor::Rgb565,
    prelude::*,
};
use embedded_sdmmc::RawFile;
use picframe_core::{
    BMP_HEADER_LEN,
    BmpHeader,
    ImageError,
    ImageReader,
    draw_rows,
};
use tinybmp::{
    Bmp,
    ParseError,
};

use crate::storage::{
    SdError,
    SdStorage,
    Volumes,
};

impl<D> ImageReader<D> for SdStorage
where
    D: DrawTarget<Color = Rgb565>,
{
    fn dimensions(&mut self, path: &str) -> Result<Size, ImageError> {
        let file = self.open_file(path).map_err(image_error)?;
        let header = read_header(&self.volumes, file);
        close(&self.volumes, file);
        Ok(header?.size)
    }

    fn draw(&mut self, path: &str, target: &mut D, origin: Point) -> Result<(), ImageError> {
        let file = self.open_file(path).map_err(image_error)?;
        debug!("Drawing {} at {}", path, origin);
        let drawn = self.draw_file(file, target, origin);
        close(&self.volumes, file);
        drawn
    }
}

impl SdStorage {
    fn draw_file<D>(
        &mut self,
        file: RawFile,
        target: &mut D,
        origin: Point,
    ) -> Result<(), ImageError>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let header = read_header(&self.volumes, file)?;
        if header.is_streamable() {
            self.volumes
                .file_seek_from_start(file, header.data_offset)
                .map_err(image_error)?;
            let volumes = &self.volumes;
            let rows = |buf: &mut [u8]| read_into(volumes, file, buf);
            return draw_rows(&header, rows, target, origin, &mut self.buffer);
        }

        self.volumes
            .file_seek_from_start(file, 0)
            .map_err(image_error)?;
        load(&self.volumes, file, &mut self.buffer)?;
        let bmp = Bmp::<Rgb565>::from_slice(&self.buffer).map_err(parse_error)?;
        Image::new(&bmp, origin)
            .draw(target)
            .map_err(|_| ImageError::Display)
    }
}

fn read_header(volumes: &Volumes, file: RawFile) -> Result<BmpHeader, ImageError> {
    let mut header = [0_u8; BMP_HEADER_LEN];
    if read_into(volumes, file, &mut header)? < BMP_HEADER_LEN {
        return Err(ImageError::Truncated);
    }
    BmpHeader::parse(&header)
}

/// Fill `buf` from the current position in `file`; returns how much was read.
fn read_into(volumes: &Volumes, file: RawFile, buf: &mut [u8]) -> Result<usize, ImageError> {
    let mut filled = 0;
    while filled < buf.len() {
        match volumes.read(file, &mut buf[filled..]) {
            Ok(0) | Err(embedded_sdmmc::Error::EndOfFile) => break,
            Ok(n) => filled += n,
            Err(e) => return Err(image_error(e)),
        }
    }
    Ok(filled)
}

/// Replace the contents of `buffer` with the whole of `file`.
fn load(volumes: &Volumes, file: RawFile, buffer: &mut Vec<u8>) -> Result<(), ImageError> {
    let len = volumes.file_length(file).map_err(image_error)? as usize;
    buffer.clear();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| ImageError::OutOfMemory)?;
    buffer.resize(len, 0);

    if read_into(volumes, file, buffer)? < len {
        return Err(ImageError::Truncated);
    }
    Ok(())
}

fn close(volumes: &Volumes, file: RawFile) {
    if volumes.close_file(file).is_err() {
        defmt::warn!("Failed to close file");
    }
}

fn image_error(e: SdError) -> ImageError {
    match e {
        embedded_sdmmc::Error::NotFound | embedded_sdmmc::Error::FilenameError(_) => {
            ImageError::FileNotFound
        }
        embedded_sdmmc::Error::OpenedDirAsFile => ImageError::FormatUnsupported,
        embedded_sdmmc::Error::EndOfFile => ImageError::Truncated,
        _ => ImageError::Io,
    }
}

fn parse_error(e: ParseError) -> ImageError {
    match e {
        ParseError::UnexpectedEndOfFile => ImageError::Truncated,
        _ => ImageError::FormatUnsupported,
    }
}
