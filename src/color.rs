//! Colors the IT8951 drawing target understands

use embedded_graphics_core::pixelcolor::{BinaryColor, Gray2, Gray4, Gray8, GrayColor, PixelColor};

use crate::transfer::PixelFormat;

/// Maps an embedded-graphics color to a pixel format and a gray level
pub trait ColorType: PixelColor {
    /// Format of buffers holding this color
    const FORMAT: PixelFormat;

    /// 8 bit gray level, 0x00 black and 0xFF white
    fn gray(&self) -> u8;
}

/// `On` is black ink
impl ColorType for BinaryColor {
    const FORMAT: PixelFormat = PixelFormat::Bpp1;

    fn gray(&self) -> u8 {
        match self {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        }
    }
}

impl ColorType for Gray2 {
    const FORMAT: PixelFormat = PixelFormat::Bpp2;

    fn gray(&self) -> u8 {
        self.luma() * 0x55
    }
}

impl ColorType for Gray4 {
    const FORMAT: PixelFormat = PixelFormat::Bpp4;

    fn gray(&self) -> u8 {
        self.luma() * 0x11
    }
}

impl ColorType for Gray8 {
    const FORMAT: PixelFormat = PixelFormat::Bpp8;

    fn gray(&self) -> u8 {
        self.luma()
    }
}
