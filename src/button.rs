//! Mode button on the BOOT pin.
//!
//! Edges are reported raw. Debouncing happens where the press is consumed,
//! so the waiting side stays a single store.

use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::ButtonResources;

/// The push button that toggles between slideshow and pattern mode.
pub struct ModeButton {
    pin: Input<'static>,
}

impl From<ButtonResources<'static>> for ModeButton {
    fn from(res: ButtonResources<'static>) -> Self {
        Self {
            pin: Input::new(res.pin, InputConfig::default().with_pull(Pull::Up)),
        }
    }
}

impl ModeButton {
    /// Wait for the next press (falling edge, active low).
    pub async fn wait_for_press(&mut self) {
        self.pin.wait_for_falling_edge().await;
    }
}
