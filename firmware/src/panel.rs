// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status panel rendering: a welcome/idle banner and one live status
//! line. Draw failures are logged and dropped; the panel is an output
//! of last resort, never a reason to stall the sampler.

use core::fmt::Write;

use consts::SHORT_NAME;
use defmt::warn;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

pub const WIDTH: u16 = 240;
pub const HEIGHT: u16 = 240;

const RULE_Y: i32 = 13;
const STATUS_Y: i32 = 18;

pub struct Panel<D> {
    target: D,
}

impl<D> Panel<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Welcome/idle screen: device name, firmware version, a rule.
    pub fn welcome(&mut self) {
        if self.draw_welcome().is_err() {
            warn!("display write failed");
        }
    }

    /// Live status line below the rule.
    pub fn status(&mut self, line: &str) {
        if self.draw_status(line).is_err() {
            warn!("display write failed");
        }
    }

    fn draw_welcome(&mut self) -> Result<(), D::Error> {
        self.target.clear(Rgb565::BLACK)?;

        let mut banner: String<48> = String::new();
        // Name and version are compile-time short; 48 bytes cannot overflow.
        let _ = write!(banner, "{} ({})", SHORT_NAME, env!("CARGO_PKG_VERSION"));

        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        Text::with_baseline(banner.as_str(), Point::zero(), style, Baseline::Top)
            .draw(&mut self.target)?;
        Line::new(Point::new(0, RULE_Y), Point::new(i32::from(WIDTH) - 1, RULE_Y))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(&mut self.target)?;
        Ok(())
    }

    fn draw_status(&mut self, line: &str) -> Result<(), D::Error> {
        // Clear the row so a shorter line leaves no stale glyphs.
        Rectangle::new(
            Point::new(0, STATUS_Y),
            Size::new(u32::from(WIDTH), FONT_6X10.character_size.height + 2),
        )
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
        .draw(&mut self.target)?;

        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        Text::with_baseline(line, Point::new(0, STATUS_Y), style, Baseline::Top)
            .draw(&mut self.target)?;
        Ok(())
    }
}
