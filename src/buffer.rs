//! Bounds checked host side pixel buffer

use core::convert::Infallible;

use crate::error::Error;
use crate::transfer::PixelFormat;

/// count the number of bytes per line knowing that it may contains padding bits
pub const fn line_bytes(width: u16, bits_per_pixel: u8) -> usize {
    // round to upper 8 bit count
    (width as usize * bits_per_pixel as usize + 7) / 8
}

/// Pixels packed MSB first into a caller owned byte slice
///
/// The leftmost pixel of each byte sits in its highest bits. Gray levels are
/// given as 8 bit values (0x00 black, 0xFF white) and stored as their top
/// `bits_per_pixel` bits. Rows are [`line_bytes`] long.
pub struct PixelBuffer<'a> {
    data: &'a mut [u8],
    width: u16,
    height: u16,
    format: PixelFormat,
}

impl<'a> PixelBuffer<'a> {
    /// Bytes needed for a `width` x `height` image
    pub fn required_len(width: u16, height: u16, format: PixelFormat) -> usize {
        line_bytes(width, format.bits_per_pixel()) * usize::from(height)
    }

    /// Wraps `data`, which must hold at least [`required_len`](PixelBuffer::required_len) bytes
    ///
    /// 3bpp pixels straddle byte boundaries and are not supported.
    pub fn new(
        data: &'a mut [u8],
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> Result<Self, Error<Infallible>> {
        if format == PixelFormat::Bpp3 {
            return Err(Error::UnsupportedFormat(format));
        }
        let required = Self::required_len(width, height, format);
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }
        Ok(PixelBuffer {
            data,
            width,
            height,
            format,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The packed image, ready for a load
    pub fn data(&self) -> &[u8] {
        &self.data[..Self::required_len(self.width, self.height, self.format)]
    }

    fn stride(&self) -> usize {
        line_bytes(self.width, self.format.bits_per_pixel())
    }

    // byte index, shift and mask of a pixel
    fn locate(&self, x: u16, y: u16) -> Option<(usize, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bits = self.format.bits_per_pixel();
        let per_byte = 8 / bits;
        let index = usize::from(y) * self.stride() + usize::from(x) / usize::from(per_byte);
        let shift = 8 - bits * ((x % u16::from(per_byte)) as u8 + 1);
        let mask = (((1u16 << bits) - 1) as u8) << shift;
        Some((index, shift, mask))
    }

    /// Sets a pixel to an 8 bit gray level, pixels outside the buffer are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, gray: u8) {
        if let Some((index, shift, mask)) = self.locate(x, y) {
            let level = gray >> (8 - self.format.bits_per_pixel());
            let byte = &mut self.data[index];
            *byte = (*byte & !mask) | ((level << shift) & mask);
        }
    }

    /// Stored level of a pixel, `0..2^bits_per_pixel`
    pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
        self.locate(x, y)
            .map(|(index, shift, mask)| (self.data[index] & mask) >> shift)
    }

    /// Sets every pixel to an 8 bit gray level
    pub fn fill(&mut self, gray: u8) {
        let bits = self.format.bits_per_pixel();
        let level = gray >> (8 - bits);
        let mut pattern = 0u8;
        for slot in 0..8 / bits {
            pattern |= level << (bits * slot);
        }
        let len = Self::required_len(self.width, self.height, self.format);
        self.data[..len].fill(pattern);
    }

    /// Reverses the row order
    ///
    /// BMP files store the bottom row first, this turns them top down.
    pub fn flip_rows(&mut self) {
        let stride = self.stride();
        let height = usize::from(self.height);
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let (upper, lower) = self.data.split_at_mut(bottom * stride);
            upper[top * stride..(top + 1) * stride].swap_with_slice(&mut lower[..stride]);
        }
    }
}
