//! Pattern mode: the message sprite plus blinking hearts.

use embassy_time::Instant;
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};
use rand::Rng;

use crate::{
    Config,
    ImageReader,
    MESSAGE_SPRITE,
    ModeSignal,
    SpriteField,
    TickOutcome,
    wait_until,
};

/// Run the sprite animation until `signal` is raised.
///
/// Every `config.sprite_interval` one slot is toggled. The signal is left
/// raised for the mode machine to consume.
pub async fn run_pattern<I, D, R>(
    images: &mut I,
    target: &mut D,
    rng: &mut R,
    signal: &ModeSignal,
    config: &Config,
) where
    I: ImageReader<D>,
    D: DrawTarget<Color = Rgb565>,
    R: Rng,
{
    if target.clear(config.background).is_err() {
        error!("Failed to clear display");
    }
    if let Err(e) = images.draw(MESSAGE_SPRITE, target, config.message_origin) {
        error!("Failed to draw message: {}", e);
    }

    let mut field = SpriteField::new(config);
    let mut last_tick = Instant::now();
    loop {
        let next_tick = last_tick + config.sprite_interval;
        if wait_until(next_tick, signal, config.poll_quantum)
            .await
            .is_cancelled()
        {
            return;
        }
        if field.tick(images, target, rng, signal).await == TickOutcome::Aborted {
            return;
        }
        last_tick = Instant::now();
    }
}
