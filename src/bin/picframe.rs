//! Picture frame firmware.
//!
//! Boots into a slideshow of every BMP in the card's root directory. The
//! BOOT button switches to the heart pattern and back. Without a readable
//! card the screen says so and the frame idles until reset.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::{
    rng::Rng,
    timer::timg::TimerGroup,
};
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use picframe::*;
use picframe_core::{
    Config,
    ModeSignal,
};
use rand::{
    SeedableRng,
    rngs::SmallRng,
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

/// Raised by the button task, consumed by the frame loop.
static MODE_CHANGE: ModeSignal = ModeSignal::new();

#[embassy_executor::task]
async fn mode_button_task(button: &'static mut ModeButton) {
    loop {
        button.wait_for_press().await;
        MODE_CHANGE.raise();
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = picframe::init();
    let resources = split_resources!(peripherals);

    // Room for one full-screen 16-bit bitmap; 24- and 32-bit ones are streamed.
    esp_alloc::heap_allocator!(size: 200 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let bus = spi_bus(resources.spi);
    let card_cs = card_select(resources.card);
    let display = mk_static!(Display<'static>, display(resources.display, bus));
    let card = SdStorage::mount(bus, card_cs, CARD_SPEED);

    let seed = Rng::new().random();
    info!("Sprite seed: {}", seed);
    let mut rng = SmallRng::seed_from_u64(u64::from(seed));

    let button = mk_static!(ModeButton, resources.button.into());
    spawner.must_spawn(mode_button_task(button));

    picframe_core::run(card, display, &mut rng, &MODE_CHANGE, &Config::default()).await
}
