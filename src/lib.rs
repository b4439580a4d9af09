//! A Driver for e-paper panels behind an IT8951 controller via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO must be connected, the controller answers register and info reads
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - The chip select is driven by the driver, a whole command frame is sent under one selection
//!
//! ### Other....
//!
//! - HRDY is the busy input, high means the controller accepts the next word
//! - Image buffers are packed MSB first, rows are `(width * bits_per_pixel + 7) / 8` bytes long,
//!   see [`PixelBuffer::required_len`](buffer::PixelBuffer::required_len)
//!
//! # Examples
//!
//! ```ignore
//! use epd_it8951::prelude::*;
//!
//! let interface = SpiInterface::<_, _, _, _, _, false>::new(spi, cs, busy, rst, delay, None);
//! let mut epd = It8951::new(interface, Config::default());
//! let info = epd.init()?;
//!
//! // flush stale waveforms
//! epd.clear_refresh(WaveformMode::INIT)?;
//!
//! let mut buffer = [0u8; 1872 * 1404 / 2];
//! let mut display = Display::<Gray4>::new(&mut buffer, info.panel_width, info.panel_height)?;
//!
//! // draw something into the display
//!
//! let area = Rect::full(info.panel_width, info.panel_height);
//! epd.refresh(display.buffer(), PixelFormat::Bpp4, area, true, info.image_buffer_address(), false)?;
//!
//! epd.sleep()?;
//! ```
#![no_std]

// Needs to come first so the macros are visible to the other modules
mod log;

pub mod buffer;
pub mod channel;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod rect;
pub mod refresh;
pub mod transfer;

mod it8951;
mod register;

/// Interface for the physical connection between controller and host
pub mod interface;

#[cfg(feature = "graphics")]
pub mod color;
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod sim;

pub use crate::it8951::{It8951, PowerState};

/// Includes everything important besides the chosen display
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::config::{vcom_from_volts, Config};
    pub use crate::device::DeviceInfo;
    pub use crate::error::{Error, ErrorKind};
    pub use crate::interface::{SpiInterface, Transport};
    pub use crate::rect::Rect;
    pub use crate::refresh::WaveformMode;
    pub use crate::transfer::{
        AreaImageInfo, Endianness, LoadImageInfo, PixelFormat, Rotation,
    };
    pub use crate::{It8951, PowerState, SPI_MODE};

    #[cfg(feature = "graphics")]
    pub use crate::color::ColorType;
    #[cfg(feature = "graphics")]
    pub use crate::graphics::{Display, DisplayRotation};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
