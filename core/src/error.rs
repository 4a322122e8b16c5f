//! Failure taxonomy shared by the collaborators.

/// Why an image could not be measured or drawn. Never fatal: callers log
/// it and move on to the next image or sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    FileNotFound,
    /// Not a BMP, or a BMP flavour the decoder does not handle.
    FormatUnsupported,
    /// The file ends before the header or pixel data does.
    Truncated,
    Io,
    /// The file, or one pixel row of it, does not fit in the heap.
    OutOfMemory,
    /// The display rejected the pixels.
    Display,
}

/// Directory enumeration failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    NotFound,
    Io,
}

/// The card could not be brought up. Terminal: the frame shows a
/// message and idles until reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountError {
    /// No card answered on the bus.
    NoCard,
    /// The card answered but has no readable FAT volume.
    NoFilesystem,
    /// The SPI bus could not be configured for the card.
    Bus,
}

impl MountError {
    /// Text shown on screen in error mode.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoCard | Self::Bus => "SD card not detected",
            Self::NoFilesystem => "SD card not readable",
        }
    }
}
