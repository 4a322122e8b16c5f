//! # picframe-core
//!
//! Hardware-independent logic for the picframe: a bitmap slideshow read
//! from an SD card and a "pattern" mode that scatters heart sprites
//! around a fixed message. A button toggles between the two.
//!
//! The board crate supplies the collaborators:
//! - **Storage**: directory enumeration on the mounted card ([`Storage`])
//! - **Images**: BMP dimension lookup and blitting ([`ImageReader`]), with
//!   [`draw_rows`] to stream uncompressed files a row at a time
//! - **Display**: any `embedded-graphics` Rgb565 [`DrawTarget`]
//!
//! ## Quick start
//!
//! ```rust,ignore
//! static MODE_CHANGE: ModeSignal = ModeSignal::new();
//!
//! let card = SdStorage::mount(bus, sd_cs, Rate::from_mhz(25));
//! picframe_core::run(card, &mut display, &mut rng, &MODE_CHANGE, &Config::default()).await
//! ```
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// Must come first so the logging macros are visible to the other modules.
#[macro_use]
mod fmt;

mod bmp;
mod config;
mod console;
mod error;
mod mode;
mod pattern;
mod signal;
mod slideshow;
mod sprites;
mod storage;
mod wait;

#[cfg(test)]
mod testing;

pub use bmp::{
    BMP_HEADER_LEN,
    BmpHeader,
    draw_rows,
};
pub use config::{
    ASSET_DIR,
    CLEAR_SPRITE,
    Config,
    HEART_SPRITE,
    MESSAGE_SPRITE,
};
pub use console::Console;
pub use error::{
    ImageError,
    MountError,
    StorageError,
};
pub use mode::{
    Mode,
    ModeMachine,
    halt,
    run,
};
pub use pattern::run_pattern;
pub use signal::ModeSignal;
pub use slideshow::{
    centered,
    run_slideshow,
};
pub use sprites::{
    SPRITE_SLOTS,
    Slot,
    SpriteField,
    TickOutcome,
};
pub use storage::{
    DirEntry,
    ImageReader,
    MAX_NAME_LEN,
    Storage,
};
pub use wait::{
    Wait,
    wait_until,
};
