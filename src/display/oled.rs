//! SH1106 facade: drives the panel over I2C on Linux and falls back to an
//! in-memory stand-in on other platforms so the daemon stays buildable on
//! dev hosts.

use crate::config::{Config, FontName};
use crate::display::{DisplayLine, Screen, ScreenConnector};
use crate::Result;

#[cfg(target_os = "linux")]
use crate::{display::font::font_for, Error};
#[cfg(target_os = "linux")]
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
#[cfg(target_os = "linux")]
use linux_embedded_hal::I2cdev;
#[cfg(target_os = "linux")]
use sh1106::{interface::I2cInterface, mode::GraphicsMode, Builder};

/// Connection parameters for the panel; `connect` opens a fresh device
/// every time it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OledConnector {
    pub bus: u8,
    pub addr: u8,
    pub font: FontName,
}

impl OledConnector {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bus: config.i2c_bus,
            addr: config.i2c_addr,
            font: config.font,
        }
    }
}

#[cfg(target_os = "linux")]
pub struct Oled {
    display: GraphicsMode<I2cInterface<I2cdev>>,
    font: &'static MonoFont<'static>,
}

#[cfg(target_os = "linux")]
impl ScreenConnector for OledConnector {
    type Screen = Oled;

    fn connect(&self) -> Result<Oled> {
        let device = format!("/dev/i2c-{}", self.bus);
        let i2c = I2cdev::new(&device)
            .map_err(|err| Error::Display(format!("open {device}: {err}")))?;
        let mut display: GraphicsMode<_> = Builder::new()
            .with_i2c_addr(self.addr)
            .connect_i2c(i2c)
            .into();
        display.init().map_err(map_driver_err)?;
        display.clear();
        display.flush().map_err(map_driver_err)?;
        Ok(Oled {
            display,
            font: font_for(self.font),
        })
    }
}

#[cfg(target_os = "linux")]
impl Screen for Oled {
    fn set_contrast(&mut self, level: u8) -> Result<()> {
        self.display.set_contrast(level).map_err(map_driver_err)
    }

    fn draw_frame(&mut self, lines: &[DisplayLine]) -> Result<()> {
        self.display.clear();
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        for line in lines {
            Text::with_baseline(&line.text, Point::new(0, line.y), style, Baseline::Top)
                .draw(&mut self.display)
                .map_err(map_driver_err)?;
        }
        // The buffer hits the wire only here, so a torn frame is never shown.
        self.display.flush().map_err(map_driver_err)
    }
}

#[cfg(target_os = "linux")]
fn map_driver_err<E: core::fmt::Debug>(err: E) -> Error {
    Error::Display(format!("{err:?}"))
}

/// Non-Linux stand-in; records what would have been drawn.
#[cfg(not(target_os = "linux"))]
pub struct Oled {
    pub contrast: u8,
    pub frames: usize,
    pub last_frame: Vec<DisplayLine>,
}

#[cfg(not(target_os = "linux"))]
impl ScreenConnector for OledConnector {
    type Screen = Oled;

    fn connect(&self) -> Result<Oled> {
        Ok(Oled {
            contrast: 0,
            frames: 0,
            last_frame: Vec::new(),
        })
    }
}

#[cfg(not(target_os = "linux"))]
impl Screen for Oled {
    fn set_contrast(&mut self, level: u8) -> Result<()> {
        self.contrast = level;
        Ok(())
    }

    fn draw_frame(&mut self, lines: &[DisplayLine]) -> Result<()> {
        self.frames += 1;
        self.last_frame = lines.to_vec();
        Ok(())
    }
}
