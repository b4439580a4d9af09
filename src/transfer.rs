//! Moving host pixel buffers into controller memory

use bit_field::BitField;

use crate::command::HostCommand;
use crate::device::DeviceInfo;
use crate::error::Error;
use crate::interface::Transport;
use crate::it8951::It8951;
use crate::log::debug;
use crate::rect::Rect;

/// Byte order the controller applies to each image word
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Endianness {
    /// Little endian
    #[default]
    Little = 0,
    /// Big endian
    Big = 1,
}

/// Pixel formats understood by the image load commands
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    /// 1 bit per pixel, sent on the 8bpp path with 8 pixels per byte
    ///
    /// Only shows correctly through [`It8951::display_1bpp`], which turns on the
    /// controller's 1bpp remap for the duration of the refresh.
    Bpp1,
    /// 2 bits per pixel
    Bpp2,
    /// 3 bits per pixel
    Bpp3,
    /// 4 bits per pixel
    Bpp4,
    /// 8 bits per pixel, never sent in packed mode
    Bpp8,
}

impl PixelFormat {
    /// Format field of the image load argument
    pub fn tag(self) -> u16 {
        match self {
            PixelFormat::Bpp2 => 0,
            PixelFormat::Bpp3 => 1,
            PixelFormat::Bpp4 => 2,
            PixelFormat::Bpp8 | PixelFormat::Bpp1 => 3,
        }
    }

    /// Bits of one pixel in a host buffer
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            PixelFormat::Bpp1 => 1,
            PixelFormat::Bpp2 => 2,
            PixelFormat::Bpp3 => 3,
            PixelFormat::Bpp4 => 4,
            PixelFormat::Bpp8 => 8,
        }
    }

    /// Bits per native unit on the wire, 1bpp rides the 8bpp path
    pub(crate) fn wire_bits(self) -> usize {
        match self {
            PixelFormat::Bpp1 => 8,
            other => usize::from(other.bits_per_pixel()),
        }
    }

    /// Horizontal pixels per native unit of an [`AreaImageInfo`]
    pub fn pixels_per_unit(self) -> u16 {
        match self {
            PixelFormat::Bpp1 => 8,
            _ => 1,
        }
    }

    /// Whether image words of this format may go out under one preamble
    pub fn supports_packed(self) -> bool {
        // the controller drops data of packed 8bpp loads
        self != PixelFormat::Bpp8
    }
}

/// Rotation the controller applies while loading
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0 = 0,
    /// Rotate by 90 degrees
    Rotate90 = 1,
    /// Rotate by 180 degrees
    Rotate180 = 2,
    /// Rotate by 270 degrees
    Rotate270 = 3,
}

/// Describes where an image comes from and where it goes
///
/// `source` holds the image as 16 bit words, two consecutive bytes form one
/// little endian word. Rows are `words_per_row` words long, see [`AreaImageInfo::words_per_row`].
#[derive(Clone, Copy, Debug)]
pub struct LoadImageInfo<'a> {
    /// Endianness tag
    pub endianness: Endianness,
    /// Pixel format tag
    pub pixel_format: PixelFormat,
    /// Rotation tag
    pub rotation: Rotation,
    /// Host buffer
    pub source: &'a [u8],
    /// Absolute address in controller memory, usually
    /// [`DeviceInfo::image_buffer_address`] plus an offset chosen by the caller
    pub target_memory_addr: u32,
}

impl<'a> LoadImageInfo<'a> {
    /// Little endian, unrotated load of `source`
    pub fn new(source: &'a [u8], pixel_format: PixelFormat, target_memory_addr: u32) -> Self {
        LoadImageInfo {
            endianness: Endianness::default(),
            pixel_format,
            rotation: Rotation::default(),
            source,
            target_memory_addr,
        }
    }

    /// First argument of `LD_IMG` and `LD_IMG_AREA`
    pub fn argument(&self) -> u16 {
        let mut arg = 0u16;
        arg.set_bits(8..9, self.endianness as u16);
        arg.set_bits(4..7, self.pixel_format.tag());
        arg.set_bits(0..2, self.rotation as u16);
        arg
    }
}

/// Area of an image load in the native unit of its pixel format
///
/// For [`PixelFormat::Bpp1`] `x` and `width` count bytes of 8 pixels,
/// for every other format they count pixels. [`from_pixels`](AreaImageInfo::from_pixels)
/// does the conversion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AreaImageInfo {
    /// Origin X
    pub x: u16,
    /// Origin Y
    pub y: u16,
    /// Width
    pub width: u16,
    /// Height
    pub height: u16,
}

impl AreaImageInfo {
    /// Area from a rectangle in panel pixels
    ///
    /// 1bpp areas should start and end on multiples of 8, other pixels are cut off.
    pub fn from_pixels(area: Rect, format: PixelFormat) -> Self {
        let unit = format.pixels_per_unit();
        AreaImageInfo {
            x: area.x / unit,
            y: area.y,
            width: area.w / unit,
            height: area.h,
        }
    }

    /// Words per row: the row's bytes rounded up, halved
    pub fn words_per_row(&self, format: PixelFormat) -> usize {
        (usize::from(self.width) * format.wire_bits() + 7) / 8 / 2
    }

    /// Words transferred for the whole area
    pub fn word_count(&self, format: PixelFormat) -> usize {
        self.words_per_row(format) * usize::from(self.height)
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl<T: Transport> It8951<T> {
    /// Loads an area of an image into controller memory
    ///
    /// With `packed` all image words share one preamble, otherwise every word is
    /// framed on its own. 8bpp loads are always framed word by word.
    ///
    /// The area and buffer length are checked before anything is sent.
    pub fn load_image_area(
        &mut self,
        info: &LoadImageInfo,
        area: &AreaImageInfo,
        packed: bool,
    ) -> Result<(), Error<T::Error>> {
        let device_info = self.require_device_info()?;
        check_area(&device_info, area, info.pixel_format)?;
        let words = area.word_count(info.pixel_format);
        check_source(info.source, words)?;

        debug!(
            "Loading {}x{} at ({}, {}) as {:?} to {:#010x}",
            area.width,
            area.height,
            area.x,
            area.y,
            info.pixel_format,
            info.target_memory_addr
        );

        self.channel
            .set_target_memory_address(info.target_memory_addr)
            .map_err(Error::Interface)?;
        self.channel
            .send_command_with_args(
                HostCommand::LdImgArea,
                &[info.argument(), area.x, area.y, area.width, area.height],
            )
            .map_err(Error::Interface)?;
        self.stream_image(
            source_words(info.source, words),
            info.pixel_format,
            packed,
        )
    }

    /// Loads a whole panel sized image into controller memory
    ///
    /// Same rules as [`load_image_area`](It8951::load_image_area) with the area
    /// covering the full panel.
    pub fn load_image(&mut self, info: &LoadImageInfo, packed: bool) -> Result<(), Error<T::Error>> {
        let device_info = self.require_device_info()?;
        let area = AreaImageInfo::from_pixels(
            Rect::full(device_info.panel_width, device_info.panel_height),
            info.pixel_format,
        );
        let words = area.word_count(info.pixel_format);
        check_source(info.source, words)?;

        debug!(
            "Loading full image as {:?} to {:#010x}",
            info.pixel_format, info.target_memory_addr
        );

        self.channel
            .set_target_memory_address(info.target_memory_addr)
            .map_err(Error::Interface)?;
        self.channel
            .send_command_with_args(HostCommand::LdImg, &[info.argument()])
            .map_err(Error::Interface)?;
        self.stream_image(
            source_words(info.source, words),
            info.pixel_format,
            packed,
        )
    }

    /// Loads `count` copies of `word` into an area, used for clearing
    pub(crate) fn fill_image_area(
        &mut self,
        argument: u16,
        area: &AreaImageInfo,
        format: PixelFormat,
        word: u16,
        target: u32,
        packed: bool,
    ) -> Result<(), Error<T::Error>> {
        let count = area.word_count(format);
        self.channel
            .set_target_memory_address(target)
            .map_err(Error::Interface)?;
        self.channel
            .send_command_with_args(
                HostCommand::LdImgArea,
                &[argument, area.x, area.y, area.width, area.height],
            )
            .map_err(Error::Interface)?;
        self.stream_image(core::iter::repeat(word).take(count), format, packed)
    }

    // image words followed by LD_IMG_END
    fn stream_image<I>(&mut self, words: I, format: PixelFormat, packed: bool) -> Result<(), Error<T::Error>>
    where
        I: Iterator<Item = u16>,
    {
        if packed && format.supports_packed() {
            self.channel
                .send_data_burst(words)
                .map_err(Error::Interface)?;
        } else {
            for word in words {
                self.channel.send_data(word).map_err(Error::Interface)?;
            }
        }
        self.channel
            .send_command(HostCommand::LdImgEnd)
            .map_err(Error::Interface)
    }

    /// Writes `words` straight into controller memory at `address`
    pub fn memory_burst_write(&mut self, address: u32, words: &[u16]) -> Result<(), Error<T::Error>> {
        let count = burst_count(words.len())?;
        self.channel
            .send_command_with_args(
                HostCommand::MemBstWr,
                &[
                    address as u16,
                    (address >> 16) as u16,
                    count as u16,
                    (count >> 16) as u16,
                ],
            )
            .map_err(Error::Interface)?;
        self.channel
            .send_data_burst(words.iter().copied())
            .map_err(Error::Interface)?;
        self.channel
            .send_command(HostCommand::MemBstEnd)
            .map_err(Error::Interface)
    }

    /// Fills `words` from controller memory at `address`
    pub fn memory_burst_read(&mut self, address: u32, words: &mut [u16]) -> Result<(), Error<T::Error>> {
        let count = burst_count(words.len())?;
        self.channel
            .send_command_with_args(
                HostCommand::MemBstRdT,
                &[
                    address as u16,
                    (address >> 16) as u16,
                    count as u16,
                    (count >> 16) as u16,
                ],
            )
            .map_err(Error::Interface)?;
        self.channel
            .send_command(HostCommand::MemBstRdS)
            .map_err(Error::Interface)?;
        self.channel
            .read_data_burst(words)
            .map_err(Error::Interface)?;
        self.channel
            .send_command(HostCommand::MemBstEnd)
            .map_err(Error::Interface)
    }
}

pub(crate) fn check_area<E>(
    device_info: &DeviceInfo,
    area: &AreaImageInfo,
    format: PixelFormat,
) -> Result<(), Error<E>> {
    let rect = area.as_rect();
    if rect.is_empty() {
        return Err(Error::EmptyArea);
    }
    // whole native units of the panel, 1bpp counts bytes of 8 pixels
    let unit = format.pixels_per_unit();
    if !rect.fits_within(device_info.panel_width / unit, device_info.panel_height) {
        return Err(Error::AreaOutOfBounds(rect));
    }
    Ok(())
}

/// Words a single memory burst can move, the count field is 26 bits wide
pub const MAX_BURST_WORDS: usize = (1 << 26) - 1;

fn burst_count<E>(len: usize) -> Result<u32, Error<E>> {
    if len > MAX_BURST_WORDS {
        return Err(Error::BurstTooLong(len));
    }
    Ok(len as u32)
}

fn check_source<E>(source: &[u8], words: usize) -> Result<(), Error<E>> {
    let required = words * 2;
    if source.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            actual: source.len(),
        });
    }
    Ok(())
}

fn source_words(source: &[u8], words: usize) -> impl Iterator<Item = u16> + '_ {
    source
        .chunks_exact(2)
        .take(words)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}
