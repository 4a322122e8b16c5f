//! Line-oriented text output on a draw target.

use embedded_graphics::{
    mono_font::{
        MonoFont,
        MonoTextStyle,
        ascii::FONT_6X10,
        iso_8859_1::FONT_10X20,
    },
    pixelcolor::Rgb565,
    prelude::*,
    text::{
        Baseline,
        Text,
    },
};

/// Cursor-based text writer, used for the error screen.
pub struct Console<'a, D> {
    target: &'a mut D,
    cursor: Point,
    font: &'static MonoFont<'static>,
    color: Rgb565,
}

impl<'a, D> Console<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            cursor: Point::zero(),
            font: &FONT_6X10,
            color: Rgb565::WHITE,
        }
    }

    pub fn fill(&mut self, color: Rgb565) -> Result<(), D::Error> {
        self.target.clear(color)
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    pub const fn cursor(&self) -> Point {
        self.cursor
    }

    /// Size 1 is the small 6×10 font, anything larger the 10×20 one.
    pub fn set_text_size(&mut self, size: u8) {
        self.font = if size <= 1 { &FONT_6X10 } else { &FONT_10X20 };
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.color = color;
    }

    /// Print `text` at the cursor and move the cursor to the start of the
    /// line below. Embedded newlines start further lines.
    pub fn print_line(&mut self, text: &str) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(self.font, self.color);
        let line_height = self.font.character_size.height as i32;
        for line in text.split('\n') {
            Text::with_baseline(line, self.cursor, style, Baseline::Top).draw(self.target)?;
            self.cursor = Point::new(0, self.cursor.y + line_height);
        }
        Ok(())
    }
}
