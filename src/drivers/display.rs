// GestureWatch - SSD1306 OLED Driver
//
// 128x64 monochrome panel over I2C. Drawing goes into a local page buffer
// (embedded-graphics `DrawTarget`); nothing reaches the panel until
// `present()` pushes the whole buffer.

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_hal::i2c::{Error as _, I2c};

use crate::config::*;
use crate::error::DisplayError;

/// Output collaborator the actuation controller renders results through.
pub trait GestureDisplay {
    fn clear(&mut self) -> Result<(), DisplayError>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError>;
    fn present(&mut self) -> Result<(), DisplayError>;
}

// SSD1306 command set
const SET_CONTRAST: u8 = 0x81;
const SET_ENTIRE_ON: u8 = 0xA4;
const SET_NORM_INV: u8 = 0xA6;
const SET_DISP: u8 = 0xAE;
const SET_MEM_ADDR: u8 = 0x20;
const SET_COL_ADDR: u8 = 0x21;
const SET_PAGE_ADDR: u8 = 0x22;
const SET_DISP_START_LINE: u8 = 0x40;
const SET_SEG_REMAP: u8 = 0xA1;
const SET_MUX_RATIO: u8 = 0xA8;
const SET_COM_OUT_DIR: u8 = 0xC8;
const SET_DISP_OFFSET: u8 = 0xD3;
const SET_COM_PIN_CFG: u8 = 0xDA;
const SET_DISP_CLK_DIV: u8 = 0xD5;
const SET_PRECHARGE: u8 = 0xD9;
const SET_VCOM_DESEL: u8 = 0xDB;
const SET_CHARGE_PUMP: u8 = 0x8D;

const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const DATA_CHUNK: usize = 32;
const PAGES: usize = SCREEN_HEIGHT as usize / 8;

/// Internal charge pump, 128x64 COM layout.
#[rustfmt::skip]
const INIT_SEQUENCE: &[u8] = &[
    SET_DISP,
    SET_MEM_ADDR, 0x00, // horizontal addressing
    SET_DISP_START_LINE,
    SET_SEG_REMAP,
    SET_MUX_RATIO, SCREEN_HEIGHT as u8 - 1,
    SET_COM_OUT_DIR,
    SET_DISP_OFFSET, 0x00,
    SET_COM_PIN_CFG, 0x12,
    SET_DISP_CLK_DIV, 0x80,
    SET_PRECHARGE, 0xF1,
    SET_VCOM_DESEL, 0x30,
    SET_CONTRAST, 0xFF,
    SET_ENTIRE_ON,
    SET_NORM_INV,
    SET_CHARGE_PUMP, 0x14,
    SET_DISP | 0x01,
];

pub struct Ssd1306<I2C> {
    bus: I2C,
    address: u8,
    buffer: [u8; DISPLAY_BUFFER_SIZE],
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(bus: I2C) -> Self {
        Self::with_address(bus, I2C_ADDR_OLED)
    }

    pub fn with_address(bus: I2C, address: u8) -> Self {
        Self {
            bus,
            address,
            buffer: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    /// Run the power-on sequence and blank the panel.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        for &cmd in INIT_SEQUENCE {
            self.command(cmd)?;
        }
        self.buffer.fill(0);
        self.present()?;
        log::info!("SSD1306 initialised at 0x{:02X}", self.address);
        Ok(())
    }

    pub fn is_connected(&mut self) -> bool {
        self.bus.write(self.address, &[CONTROL_CMD, SET_NORM_INV]).is_ok()
    }

    pub fn release(self) -> I2C {
        self.bus
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.bus
            .write(self.address, &[CONTROL_CMD, cmd])
            .map_err(|e| DisplayError::Bus(e.kind()))
    }

    fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        let bit = 1u8 << (y % 8);
        if on {
            self.buffer[idx] |= bit;
        } else {
            self.buffer[idx] &= !bit;
        }
    }

    fn pixel(&self, x: u32, y: u32) -> bool {
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        self.buffer[idx] & (1 << (y % 8)) != 0
    }
}

impl<I2C: I2c> GestureDisplay for Ssd1306<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0);
        Ok(())
    }

    /// `(x, y)` is the top-left corner of the first glyph.
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(self)
            .unwrap_or_else(|never| match never {});
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        for cmd in [
            SET_COL_ADDR,
            0,
            SCREEN_WIDTH as u8 - 1,
            SET_PAGE_ADDR,
            0,
            PAGES as u8 - 1,
        ] {
            self.command(cmd)?;
        }

        let mut frame = [0u8; DATA_CHUNK + 1];
        frame[0] = CONTROL_DATA;
        for chunk in self.buffer.chunks(DATA_CHUNK) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.bus
                .write(self.address, &frame[..=chunk.len()])
                .map_err(|e| DisplayError::Bus(e.kind()))?;
        }
        Ok(())
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl<I2C: I2c> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Ok((x, y)) = <(u32, u32)>::try_from(point) {
                if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
                    self.set_pixel(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}
