//! Graphics Support for IT8951 panels

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_graphics_core::prelude::*;

use crate::buffer::PixelBuffer;
use crate::color::ColorType;
use crate::error::Error;

/// Display rotation, only 90° increments supported
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Drawing target for embedded-graphics over a caller owned buffer
///
/// The buffer format follows the color type, e.g. `Display<Gray4>` packs 4bpp.
/// Hand [`buffer`](Display::buffer) to a load or refresh with `COLOR::FORMAT`.
pub struct Display<'a, COLOR: ColorType> {
    buffer: PixelBuffer<'a>,
    rotation: DisplayRotation,
    _color: PhantomData<COLOR>,
}

impl<'a, COLOR: ColorType> Display<'a, COLOR> {
    /// You must allocate the buffer by yourself, it must hold
    /// [`PixelBuffer::required_len`] bytes for `COLOR::FORMAT`.
    pub fn new(buffer: &'a mut [u8], width: u16, height: u16) -> Result<Self, Error<Infallible>> {
        Ok(Display {
            buffer: PixelBuffer::new(buffer, width, height, COLOR::FORMAT)?,
            rotation: DisplayRotation::default(),
            _color: PhantomData,
        })
    }

    /// The packed image, ready for a load or refresh
    pub fn buffer(&self) -> &[u8] {
        self.buffer.data()
    }

    /// The underlying pixel buffer, e.g. to flip rows of a BMP
    pub fn pixel_buffer_mut(&mut self) -> &mut PixelBuffer<'a> {
        &mut self.buffer
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Set a specific pixel color on this display
    pub fn set_pixel(&mut self, pixel: Pixel<COLOR>) {
        let Pixel(point, color) = pixel;
        let width = i32::from(self.buffer.width());
        let height = i32::from(self.buffer.height());

        // final coordinates
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (width - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (width - 1 - point.x, height - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, height - 1 - point.x),
        };

        // Out of range check
        if x < 0 || x >= width || y < 0 || y >= height {
            return;
        }

        self.buffer.set_pixel(x as u16, y as u16, color.gray());
    }
}

/// Drawing with embedded-graphics, pixels outside the buffer are dropped
impl<'a, COLOR: ColorType> DrawTarget for Display<'a, COLOR> {
    type Color = COLOR;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(color.gray());
        Ok(())
    }
}

/// Size as seen by embedded-graphics, swapped for 90 and 270 degrees
impl<'a, COLOR: ColorType> OriginDimensions for Display<'a, COLOR> {
    fn size(&self) -> Size {
        let width = u32::from(self.buffer.width());
        let height = u32::from(self.buffer.height());
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(width, height),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(height, width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::PixelFormat;
    use embedded_graphics::{
        pixelcolor::{BinaryColor, Gray4},
        prelude::*,
        primitives::{Line, PrimitiveStyle},
    };

    #[test]
    fn draw_line_4bpp() {
        let mut buffer = [0xFFu8; 8 / 2 * 2];
        let mut display = Display::<Gray4>::new(&mut buffer, 8, 2).unwrap();

        Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(Gray4::BLACK, 1))
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.buffer(), [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn rotation_swaps_size() {
        let mut buffer = [0u8; 16 / 8 * 4];
        let mut display = Display::<BinaryColor>::new(&mut buffer, 16, 4).unwrap();
        assert_eq!(display.size(), Size::new(16, 4));
        display.set_rotation(DisplayRotation::Rotate90);
        assert_eq!(display.size(), Size::new(4, 16));
    }

    #[test]
    fn rotated_pixel_lands_in_the_corner() {
        let mut buffer = [0u8; 2 * 2];
        let mut display = Display::<Gray4>::new(&mut buffer, 4, 2).unwrap();
        display.set_rotation(DisplayRotation::Rotate180);

        Pixel(Point::new(0, 0), Gray4::WHITE).draw(&mut display).unwrap();

        assert_eq!(display.buffer(), [0x00, 0x00, 0x00, 0x0F]);
    }

    #[test]
    fn clear_fills_binary_buffer() {
        let mut buffer = [0u8; 2];
        let mut display = Display::<BinaryColor>::new(&mut buffer, 16, 1).unwrap();
        display.clear(BinaryColor::Off).unwrap();
        assert_eq!(display.buffer(), [0xFF, 0xFF]);
        assert_eq!(<BinaryColor as ColorType>::FORMAT, PixelFormat::Bpp1);
    }
}
