//! Top-level mode switching and the terminal error screen.

use embassy_time::{
    Duration,
    Instant,
    Timer,
};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};
use rand::Rng;

use crate::{
    Config,
    Console,
    ImageReader,
    ModeSignal,
    MountError,
    Storage,
    run_pattern,
    run_slideshow,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Slideshow,
    Pattern,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Slideshow, Self::Pattern];

    /// Unknown indices fall back to the slideshow.
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Pattern,
            _ => Self::Slideshow,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The following mode, wrapping around after the last.
    pub const fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }
}

/// Debounced mode selection.
pub struct ModeMachine {
    mode: Mode,
    last_change: Instant,
    debounce: Duration,
}

impl ModeMachine {
    /// Start in [`Mode::Slideshow`], with the debounce window opening at
    /// `now`.
    pub const fn new(debounce: Duration, now: Instant) -> Self {
        Self {
            mode: Mode::Slideshow,
            last_change: now,
            debounce,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Consume the signal and return the mode to run next.
    ///
    /// A raised signal advances the mode only if the previous change is at
    /// least one debounce window old; either way it is cleared.
    pub fn poll(&mut self, signal: &ModeSignal, now: Instant) -> Mode {
        if signal.take() {
            if now.saturating_duration_since(self.last_change) >= self.debounce {
                self.mode = self.mode.next();
                self.last_change = now;
                info!("Mode change: {}", self.mode);
            } else {
                debug!("Ignoring bounce");
            }
        }
        self.mode
    }
}

/// Run the frame forever.
///
/// A failed mount ends up on the error screen; otherwise the slideshow
/// and pattern modes alternate on each accepted button press.
pub async fn run<C, D, R>(
    card: Result<C, MountError>,
    target: &mut D,
    rng: &mut R,
    signal: &ModeSignal,
    config: &Config,
) -> !
where
    C: Storage + ImageReader<D>,
    D: DrawTarget<Color = Rgb565>,
    R: Rng,
{
    let mut card = match card {
        Ok(card) => card,
        Err(e) => {
            error!("Mount failed: {}", e);
            halt(target, e.message(), config).await
        }
    };

    let mut machine = ModeMachine::new(config.debounce, Instant::now());
    loop {
        match machine.poll(signal, Instant::now()) {
            Mode::Slideshow => run_slideshow(&mut card, target, signal, config).await,
            Mode::Pattern => run_pattern(&mut card, target, rng, signal, config).await,
        }
    }
}

/// Show `message` with reset instructions and idle until power-off.
pub async fn halt<D>(target: &mut D, message: &str, config: &Config) -> !
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut console = Console::new(target);
    let drawn = console.fill(config.background).and_then(|()| {
        console.set_cursor(0, 0);
        console.set_text_size(2);
        console.set_text_color(Rgb565::WHITE);
        console.print_line(message)?;
        console.print_line(" ")?;
        console.print_line("Please unplug and \nreplug the device")
    });
    if drawn.is_err() {
        error!("Failed to draw error screen");
    }

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
