//! Runtime tuning for the frame.

use embassy_time::Duration;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

/// Directory holding the pattern-mode sprites.
pub const ASSET_DIR: &str = "/PATTERN";
/// Static message drawn under the sprite area.
pub const MESSAGE_SPRITE: &str = "/PATTERN/MESSAGE.BMP";
/// Background-coloured square used to erase a sprite.
pub const CLEAR_SPRITE: &str = "/PATTERN/CLEAR.BMP";
/// The animated sprite itself.
pub const HEART_SPRITE: &str = "/PATTERN/HEART.BMP";

/// Frame configuration.
///
/// [`Config::default`] matches the 240×320 panel the firmware ships with;
/// the `with_*` builders override single fields.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Panel size in pixels (width × length, portrait).
    pub screen: Size,
    /// How long each slideshow image stays up.
    pub slideshow_interval: Duration,
    /// Cadence of sprite show/hide steps in pattern mode.
    pub sprite_interval: Duration,
    /// Minimum gap between two accepted mode changes.
    pub debounce: Duration,
    /// Longest sleep between two checks of the mode-change signal.
    pub poll_quantum: Duration,
    /// Side of the square sprites.
    pub sprite_size: u32,
    /// Band at the bottom of the screen kept free for the message sprite.
    pub message_reserve: u32,
    /// Where the message sprite is drawn.
    pub message_origin: Point,
    /// Directory the slideshow enumerates.
    pub image_dir: &'static str,
    /// Fill colour for pattern and error screens.
    pub background: Rgb565,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            screen: Size::new(240, 320),
            slideshow_interval: Duration::from_millis(4000),
            sprite_interval: Duration::from_millis(500),
            debounce: Duration::from_millis(50),
            poll_quantum: Duration::from_millis(10),
            sprite_size: 32,
            message_reserve: 100,
            // The message bitmap is not quite centred, hence the nudge left.
            message_origin: Point::new(-5, 220),
            image_dir: "/",
            background: Rgb565::BLACK,
        }
    }

    #[must_use]
    pub const fn with_screen(mut self, screen: Size) -> Self {
        self.screen = screen;
        self
    }

    #[must_use]
    pub const fn with_slideshow_interval(mut self, interval: Duration) -> Self {
        self.slideshow_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_sprite_interval(mut self, interval: Duration) -> Self {
        self.sprite_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub const fn with_poll_quantum(mut self, quantum: Duration) -> Self {
        self.poll_quantum = quantum;
        self
    }

    #[must_use]
    pub const fn with_sprite_size(mut self, size: u32) -> Self {
        self.sprite_size = size;
        self
    }

    #[must_use]
    pub const fn with_message_reserve(mut self, reserve: u32) -> Self {
        self.message_reserve = reserve;
        self
    }

    #[must_use]
    pub const fn with_image_dir(mut self, dir: &'static str) -> Self {
        self.image_dir = dir;
        self
    }

    /// Exclusive upper bounds for a sprite's top-left corner.
    ///
    /// Never smaller than 1×1, so a sprite always has at least the origin
    /// to go to.
    pub const fn placement_area(&self) -> Size {
        let width = self.screen.width.saturating_sub(self.sprite_size);
        let height = self
            .screen
            .height
            .saturating_sub(self.sprite_size)
            .saturating_sub(self.message_reserve);
        Size::new(
            if width == 0 { 1 } else { width },
            if height == 0 { 1 } else { height },
        )
    }
}
