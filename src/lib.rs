//! # picframe
//!
//! Board support for the picframe: an ESP32-S3 driving a 240×320 ILI9341
//! TFT and an SD card reader on one shared SPI bus, plus a mode button.
//!
//! Provides the hardware collaborators for [`picframe_core`]:
//! - **Display**: ILI9341 over SPI with DMA, drawn with `embedded-graphics`
//! - **Storage**: FAT volume on the SD card, which also decodes BMP files
//! - **Mode button**: raw falling-edge detection on the BOOT button
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = picframe::init();
//! let resources = picframe::split_resources!(peripherals);
//!
//! let bus = picframe::spi_bus(resources.spi);
//! let card_cs = picframe::card_select(resources.card);
//! let display = picframe::display(resources.display, bus);
//! let card = SdStorage::mount(bus, card_cs, picframe::CARD_SPEED);
//! ```

#![no_std]

extern crate alloc;

mod button;
mod display;
mod image;
mod storage;

use core::cell::RefCell;

pub use button::ModeButton;
pub use display::{
    Display,
    display,
};
use esp_hal::{
    Blocking,
    assign_resources,
    clock::CpuClock,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    spi::master::{
        Config,
        Spi,
        SpiDmaBus,
    },
    time::Rate,
};
pub use storage::{
    SdCursor,
    SdStorage,
    card_select,
};

/// SPI clock while the card is being identified. Cards must answer their
/// first commands at 400 kHz or less.
pub const BUS_INIT_SPEED: Rate = Rate::from_khz(400);

/// SPI clock once the card is mounted; shared with the display.
pub const CARD_SPEED: Rate = Rate::from_mhz(25);

/// The SPI bus shared by the display and the card reader.
pub type SpiBus = SpiDmaBus<'static, Blocking>;

/// StaticCell helper: allocates a value into a `static` exactly once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

// ── Pin / peripheral assignments ────────────────────────────────────────────

assign_resources! {
    pub Resources<'d> {
        spi: SpiResources<'d> {
            sck: GPIO12,
            mosi: GPIO11,
            miso: GPIO13,
            spi: SPI2,
            dma: DMA_CH0,
        },
        display: DisplayResources<'d> {
            cs: GPIO10,
            dc: GPIO9,
            rst: GPIO8,
        },
        card: CardResources<'d> {
            cs: GPIO14,
        },
        button: ButtonResources<'d> {
            pin: GPIO0,
        }
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// Initialise the chip and return the raw peripheral set.
///
/// Call this once at the top of your `main`. Then use [`split_resources!`] to
/// break the peripherals into typed resource groups.
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    esp_hal::init(config)
}

/// Bring up the shared SPI bus at [`BUS_INIT_SPEED`].
///
/// [`SdStorage::mount`] raises the clock once the card has answered.
pub fn spi_bus(res: SpiResources<'static>) -> &'static RefCell<SpiBus> {
    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(4096);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

    let spi = Spi::new(res.spi, Config::default().with_frequency(BUS_INIT_SPEED))
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf);

    mk_static!(RefCell<SpiBus>, RefCell::new(spi))
}
