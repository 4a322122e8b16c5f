//! FAT volume on the SD card.

use alloc::{
    format,
    string::{
        String,
        ToString,
    },
    vec::Vec,
};
use core::cell::RefCell;

use defmt::{
    Debug2Format,
    error,
    info,
};
use embedded_hal_bus::spi::RefCellDevice;
use embedded_sdmmc::{
    Mode,
    RawDirectory,
    RawFile,
    RawVolume,
    SdCard,
    TimeSource,
    Timestamp,
    VolumeIdx,
    VolumeManager,
};
use esp_hal::{
    delay::Delay,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Config,
    time::Rate,
};
use picframe_core::{
    DirEntry,
    MountError,
    Storage,
    StorageError,
};

use crate::{
    CardResources,
    SpiBus,
};

type CardDevice = RefCellDevice<'static, SpiBus, Output<'static>, Delay>;
pub(crate) type Volumes = VolumeManager<SdCard<CardDevice, Delay>, FixedClock>;
pub(crate) type SdError = embedded_sdmmc::Error<embedded_sdmmc::SdCardError>;

/// The frame never writes, so file times do not matter.
pub struct FixedClock;

impl TimeSource for FixedClock {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// The mounted card. Implements both directory scanning and, in
/// `image.rs`, BMP reading.
pub struct SdStorage {
    pub(crate) volumes: Volumes,
    pub(crate) volume: RawVolume,
    /// Reused for every bitmap so the heap is not churned per image.
    pub(crate) buffer: Vec<u8>,
}

/// Forward-only position in a directory.
///
/// embedded-sdmmc only iterates whole directories, so the cursor keeps
/// the path and how many entries were already handed out.
pub struct SdCursor {
    path: String,
    index: usize,
}

/// Take the card's chip select and park it high.
///
/// Call before any other device talks on the shared bus, so the card
/// never sees that traffic.
#[must_use]
pub fn card_select(res: CardResources<'static>) -> Output<'static> {
    Output::new(res.cs, Level::High, OutputConfig::default())
}

impl SdStorage {
    /// Identify the card behind `cs` on `bus`, raise the bus to `speed` and
    /// open the first FAT volume.
    pub fn mount(
        bus: &'static RefCell<SpiBus>,
        cs: Output<'static>,
        speed: Rate,
    ) -> Result<Self, MountError> {
        info!("Initializing filesystem...");
        let device = RefCellDevice::new(bus, cs, Delay::new()).map_err(|_| MountError::Bus)?;
        let card = SdCard::new(device, Delay::new());

        let bytes = card.num_bytes().map_err(|e| {
            error!("SD card did not answer: {}", Debug2Format(&e));
            MountError::NoCard
        })?;

        bus.borrow_mut()
            .apply_config(&Config::default().with_frequency(speed))
            .map_err(|e| {
                error!("Failed to raise SPI clock: {}", Debug2Format(&e));
                MountError::Bus
            })?;

        let volumes = VolumeManager::new(card, FixedClock);
        let volume = volumes.open_raw_volume(VolumeIdx(0)).map_err(|e| {
            error!("No FAT volume: {}", Debug2Format(&e));
            MountError::NoFilesystem
        })?;

        info!("SD card mounted, {} MiB", bytes / (1024 * 1024));
        Ok(Self {
            volumes,
            volume,
            buffer: Vec::new(),
        })
    }

    /// Open the directory at an absolute `path`, one component at a time.
    pub(crate) fn open_path(&self, path: &str) -> Result<RawDirectory, SdError> {
        let mut dir = self.volumes.open_root_dir(self.volume)?;
        for part in path.split('/').filter(|part| !part.is_empty()) {
            let child = self.volumes.open_dir(dir, part);
            self.volumes.close_dir(dir)?;
            dir = child?;
        }
        Ok(dir)
    }

    /// Open the file at an absolute `path` for reading.
    pub(crate) fn open_file(&self, path: &str) -> Result<RawFile, SdError> {
        let (dir_path, name) = path.rsplit_once('/').unwrap_or(("", path));
        let dir = self.open_path(dir_path)?;
        let file = self.volumes.open_file_in_dir(dir, name, Mode::ReadOnly);
        self.volumes.close_dir(dir)?;
        file
    }
}

impl Storage for SdStorage {
    type Cursor = SdCursor;

    fn open_dir(&mut self, path: &str) -> Result<SdCursor, StorageError> {
        let dir = self.open_path(path).map_err(storage_error)?;
        self.volumes.close_dir(dir).map_err(storage_error)?;
        Ok(SdCursor {
            path: path.to_string(),
            index: 0,
        })
    }

    fn next_entry(&mut self, cursor: &mut SdCursor) -> Result<Option<DirEntry>, StorageError> {
        let dir = self.open_path(&cursor.path).map_err(storage_error)?;

        let mut seen = 0;
        let mut found = None;
        let scanned = self.volumes.iterate_dir(dir, |entry| {
            let name = format!("{}", entry.name);
            if found.is_some() || entry.attributes.is_volume() || name == "." || name == ".." {
                return;
            }
            if seen == cursor.index {
                found = Some(if entry.attributes.is_directory() {
                    DirEntry::dir(name)
                } else {
                    DirEntry::file(name)
                });
            }
            seen += 1;
        });
        let closed = self.volumes.close_dir(dir);
        scanned.and(closed).map_err(storage_error)?;

        if found.is_some() {
            cursor.index += 1;
        }
        Ok(found)
    }
}

fn storage_error(e: SdError) -> StorageError {
    match e {
        embedded_sdmmc::Error::NotFound | embedded_sdmmc::Error::FilenameError(_) => {
            StorageError::NotFound
        }
        e => {
            error!("SD card error: {}", Debug2Format(&e));
            StorageError::Io
        }
    }
}
