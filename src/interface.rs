use crate::error::ErrorKind;
use core::fmt::Debug;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

/// Byte level access to the controller
///
/// Everything above this trait only speaks in preambles, commands and words,
/// so a transport for another interconnect only has to move bytes, drive the
/// select and reset lines and report the ready (HRDY) line.
pub trait Transport {
    /// Error of the underlying peripherals
    type Error: Debug;

    /// Write bytes to the controller
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read bytes from the controller
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Samples the ready line, `true` when the controller accepts the next transfer
    fn is_ready(&mut self) -> Result<bool, Self::Error>;

    /// Asserts chip select
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Finishes outstanding transfers and deasserts chip select
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Drives the reset line, `true` for high
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Blocks for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Blocks for `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Called between two polls of a busy condition
    ///
    /// Does nothing by default, which makes every wait a tight busy loop.
    /// Implementations may sleep or yield here, or return an error to abandon
    /// the wait from the outside.
    fn idle(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Waits until the controller is ready (HRDY == HIGH)
    ///
    /// There is no timeout: a controller that never gets ready blocks forever
    /// unless [`idle`](Transport::idle) bails out.
    fn wait_until_ready(&mut self) -> Result<(), Self::Error> {
        while !self.is_ready()? {
            self.idle()?;
        }
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, buffer)
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        T::is_ready(self)
    }

    fn select(&mut self) -> Result<(), Self::Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        T::deselect(self)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        T::set_reset(self, high)
    }

    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }

    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }

    fn idle(&mut self) -> Result<(), Self::Error> {
        T::idle(self)
    }

    fn wait_until_ready(&mut self) -> Result<(), Self::Error> {
        T::wait_until_ready(self)
    }
}

/// The SPI connection of an IT8951 board
///
/// Chip select is driven by hand since it has to stay asserted while the
/// ready line is sampled in the middle of a transaction.
///
/// SINGLE_BYTE_WRITE defines if a data block is written bytewise
/// or blockwise to the spi bus
pub struct SpiInterface<SPI, CS, BUSY, RST, DELAY, const SINGLE_BYTE_WRITE: bool> {
    /// SPI
    spi: SPI,
    /// Chip select, active low
    cs: CS,
    /// HRDY, low for busy. Wait until the controller is ready!
    busy: BUSY,
    /// Pin for Resetting
    rst: RST,
    /// Delay provider
    delay: DELAY,
    /// number of us the idle loop should sleep on
    delay_us: u32,
}

type InterfaceError<SPI, CS, BUSY, RST> = ErrorKind<
    <SPI as embedded_hal::spi::ErrorType>::Error,
    <CS as embedded_hal::digital::ErrorType>::Error,
    <BUSY as embedded_hal::digital::ErrorType>::Error,
    <RST as embedded_hal::digital::ErrorType>::Error,
>;

impl<SPI, CS, BUSY, RST, DELAY, const SINGLE_BYTE_WRITE: bool>
    SpiInterface<SPI, CS, BUSY, RST, DELAY, SINGLE_BYTE_WRITE>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `SpiInterface` struct
    ///
    /// `delay_us` is the number of us the idle loop sleeps between two polls of HRDY.
    /// None or 0 implies busy waiting.
    pub fn new(spi: SPI, cs: CS, busy: BUSY, rst: RST, delay: DELAY, delay_us: Option<u32>) -> Self {
        SpiInterface {
            spi,
            cs,
            busy,
            rst,
            delay,
            delay_us: delay_us.unwrap_or(0),
        }
    }

    /// Consumes the interface, releasing the peripherals to the caller.
    pub fn release(self) -> (SPI, CS, BUSY, RST, DELAY) {
        (self.spi, self.cs, self.busy, self.rst, self.delay)
    }

    // spi write helper/abstraction function
    fn spi_write(&mut self, data: &[u8]) -> Result<(), InterfaceError<SPI, CS, BUSY, RST>> {
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                self.spi.write(data_chunk).map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            self.spi.write(data).map_err(ErrorKind::SpiError)
        }
    }
}

impl<SPI, CS, BUSY, RST, DELAY, const SINGLE_BYTE_WRITE: bool> Transport
    for SpiInterface<SPI, CS, BUSY, RST, DELAY, SINGLE_BYTE_WRITE>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = InterfaceError<SPI, CS, BUSY, RST>;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if SINGLE_BYTE_WRITE {
            for val in data.iter().copied() {
                // Transfer data one u8 at a time over spi
                self.spi_write(&[val])?;
            }
            Ok(())
        } else {
            self.spi_write(data)
        }
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if SINGLE_BYTE_WRITE {
            for byte in buffer.chunks_mut(1) {
                self.spi.read(byte).map_err(ErrorKind::SpiError)?;
            }
            Ok(())
        } else {
            self.spi.read(buffer).map_err(ErrorKind::SpiError)
        }
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        self.busy.is_high().map_err(ErrorKind::BusyError)
    }

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(ErrorKind::CsError)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(ErrorKind::SpiError)?;
        self.cs.set_high().map_err(ErrorKind::CsError)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.rst.set_high().map_err(ErrorKind::RstError)
        } else {
            self.rst.set_low().map_err(ErrorKind::RstError)
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn idle(&mut self) -> Result<(), Self::Error> {
        if self.delay_us > 0 {
            self.delay.delay_us(self.delay_us);
        }
        Ok(())
    }
}
