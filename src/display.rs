//! ILI9341 display driver for the 240×320 TFT on the shared SPI bus.

use core::cell::RefCell;

use embedded_hal_bus::spi::RefCellDevice;
use esp_hal::{
    delay::Delay,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
};
use mipidsi::options::{
    ColorOrder,
    Orientation,
};

use crate::{
    DisplayResources,
    SpiBus,
    mk_static,
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    RefCellDevice<'a, SpiBus, Output<'a>, Delay>,
    Output<'a>,
>;

/// The frame's ILI9341 display, ready to draw on with `embedded-graphics`.
pub type Display<'a> =
    mipidsi::Display<SpiInterface<'a>, mipidsi::models::ILI9341Rgb565, Output<'a>>;

/// Reset and initialise the panel in portrait orientation.
pub fn display(res: DisplayResources<'static>, bus: &'static RefCell<SpiBus>) -> Display<'static> {
    let mut delay = Delay::new();

    let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
    let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
    rst.set_high();

    let cs = Output::new(res.cs, Level::High, OutputConfig::default());
    let spi_device = RefCellDevice::new(bus, cs, delay).unwrap();

    let buffer = mk_static!([u8; 4096], [0_u8; 4096]);
    let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

    mipidsi::Builder::new(mipidsi::models::ILI9341Rgb565, di)
        .reset_pin(rst)
        .display_size(240, 320)
        .color_order(ColorOrder::Bgr)
        .orientation(Orientation::new())
        .init(&mut delay)
        .unwrap()
}
