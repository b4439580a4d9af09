use core::fmt::{Debug, Display, Formatter};

use crate::rect::Rect;
use crate::transfer::PixelFormat;

/// Fault reported by one of the peripherals behind [`SpiInterface`](crate::interface::SpiInterface)
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind<SpiE, CsE, BusyE, RstE> {
    /// Encountered an SPI error
    SpiError(SpiE),

    /// Encountered an error on the chip select GPIO
    CsError(CsE),

    /// Encountered an error on the Busy (HRDY) GPIO
    BusyError(BusyE),

    /// Encountered an error on the RST GPIO
    RstError(RstE),
}

impl<SpiE, CsE, BusyE, RstE> Display for ErrorKind<SpiE, CsE, BusyE, RstE>
where
    SpiE: Debug,
    CsE: Debug,
    BusyE: Debug,
    RstE: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi error: {:?}", err),
            Self::CsError(err) => write!(f, "chip select pin error: {:?}", err),
            Self::BusyError(err) => write!(f, "busy pin error: {:?}", err),
            Self::RstError(err) => write!(f, "reset pin error: {:?}", err),
        }
    }
}

impl<SpiE, CsE, BusyE, RstE> Debug for ErrorKind<SpiE, CsE, BusyE, RstE>
where
    SpiE: Debug,
    CsE: Debug,
    BusyE: Debug,
    RstE: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::CsError(err) => f.debug_tuple("CsError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
        }
    }
}

/// Driver error type
///
/// `E` is the error of the underlying [`Transport`](crate::interface::Transport).
/// Everything except `Interface` is detected on the host before any bus traffic is issued.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// The transport failed
    Interface(E),

    /// The operation needs device info, but [`It8951::init`](crate::It8951::init) hasn't run yet
    NotInitialized,

    /// The host buffer is shorter than the transfer needs
    BufferTooSmall {
        /// Bytes needed
        required: usize,
        /// Bytes given
        actual: usize,
    },

    /// The area does not fit inside the panel
    AreaOutOfBounds(Rect),

    /// The area has a zero width or height
    EmptyArea,

    /// The pixel format can't be used for this operation
    UnsupportedFormat(PixelFormat),

    /// A memory burst of this many words doesn't fit the 26 bit count field
    BurstTooLong(usize),
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(err) => write!(f, "transport error: {:?}", err),
            Self::NotInitialized => write!(f, "controller has not been initialized"),
            Self::BufferTooSmall { required, actual } => write!(
                f,
                "buffer too small: {} bytes required, {} given",
                required, actual
            ),
            Self::AreaOutOfBounds(rect) => write!(
                f,
                "area {}x{} at ({}, {}) exceeds the panel",
                rect.w, rect.h, rect.x, rect.y
            ),
            Self::EmptyArea => write!(f, "area is empty"),
            Self::UnsupportedFormat(format) => write!(f, "unsupported pixel format {:?}", format),
            Self::BurstTooLong(words) => write!(f, "memory burst of {} words is too long", words),
        }
    }
}
