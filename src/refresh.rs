//! Display refreshes and the LUT engine

use crate::command::{register, HostCommand};
use crate::error::Error;
use crate::interface::Transport;
use crate::it8951::It8951;
use crate::log::debug;
use crate::rect::Rect;
use crate::transfer::{check_area, AreaImageInfo, LoadImageInfo, PixelFormat};

/// Waveform mode of a refresh
///
/// Passed to the controller as is, the available modes depend on the panel's LUT.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct WaveformMode(pub u16);

impl WaveformMode {
    /// Full clear to white with heavy flashing, removes ghosting
    pub const INIT: WaveformMode = WaveformMode(0);
    /// 16 gray levels with flashing
    pub const GC16: WaveformMode = WaveformMode(2);
    /// Fast black and white without flashing, the number differs for some LUTs,
    /// see [`DeviceInfo::a2_mode`](crate::device::DeviceInfo::a2_mode)
    pub const A2: WaveformMode = WaveformMode(6);
}

/// Gray level of white in a 1bpp refresh
pub const BACKGROUND_GRAY_1BPP: u8 = 0xF0;
/// Gray level of black in a 1bpp refresh
pub const FOREGROUND_GRAY_1BPP: u8 = 0x00;

impl<T: Transport> It8951<T> {
    /// Waits until no LUT engine is busy anymore
    ///
    /// Polls `LUTAFSR` without a timeout.
    pub fn wait_for_display_ready(&mut self) -> Result<(), Error<T::Error>> {
        while self.read_register(register::LUTAFSR)? != 0 {
            self.channel
                .transport_mut()
                .idle()
                .map_err(Error::Interface)?;
        }
        Ok(())
    }

    /// Refreshes `area` from the image buffer the controller is bound to
    pub fn display_area(&mut self, area: Rect, mode: WaveformMode) -> Result<(), Error<T::Error>> {
        self.check_display_area(area)?;
        debug!("Display {:?} with {:?}", area, mode);
        self.channel
            .send_command_with_args(
                HostCommand::DpyArea,
                &[area.x, area.y, area.w, area.h, mode.0],
            )
            .map_err(Error::Interface)
    }

    /// Refreshes `area` from the image buffer at `target` in controller memory
    pub fn display_area_from_buffer(
        &mut self,
        area: Rect,
        mode: WaveformMode,
        target: u32,
    ) -> Result<(), Error<T::Error>> {
        self.check_display_area(area)?;
        debug!("Display {:?} with {:?} from {:#010x}", area, mode, target);
        self.channel
            .send_command_with_args(
                HostCommand::DpyBufArea,
                &[
                    area.x,
                    area.y,
                    area.w,
                    area.h,
                    mode.0,
                    target as u16,
                    (target >> 16) as u16,
                ],
            )
            .map_err(Error::Interface)
    }

    /// Refreshes a 1bpp image
    ///
    /// Turns on the 1bpp remap, sets the two gray levels, refreshes from the bound
    /// buffer if `target` is 0 and from `target` otherwise, waits for the LUT engine
    /// and turns the remap off again.
    pub fn display_1bpp(
        &mut self,
        area: Rect,
        mode: WaveformMode,
        target: u32,
        back_gray: u8,
        fore_gray: u8,
    ) -> Result<(), Error<T::Error>> {
        self.check_display_area(area)?;

        self.set_1bpp_mode(true)?;
        let shown = self.show_1bpp(area, mode, target, back_gray, fore_gray);
        // the remap must not outlive a failed or abandoned refresh
        let restored = self.set_1bpp_mode(false);
        shown.and(restored)
    }

    fn show_1bpp(
        &mut self,
        area: Rect,
        mode: WaveformMode,
        target: u32,
        back_gray: u8,
        fore_gray: u8,
    ) -> Result<(), Error<T::Error>> {
        self.write_register(
            register::BGVR,
            (u16::from(fore_gray) << 8) | u16::from(back_gray),
        )?;

        if target == 0 {
            self.display_area(area, mode)?;
        } else {
            self.display_area_from_buffer(area, mode, target)?;
        }

        self.wait_for_display_ready()
    }

    /// Loads white into the whole image buffer and refreshes the panel with `mode`
    ///
    /// Use [`WaveformMode::INIT`] after power up to flush stale waveforms.
    pub fn clear_refresh(&mut self, mode: WaveformMode) -> Result<(), Error<T::Error>> {
        let device_info = self.require_device_info()?;
        let panel = Rect::full(device_info.panel_width, device_info.panel_height);
        let area = AreaImageInfo::from_pixels(panel, PixelFormat::Bpp4);
        let argument = LoadImageInfo::new(&[], PixelFormat::Bpp4, 0).argument();

        debug!("Clearing panel with {:?}", mode);
        self.wait_for_display_ready()?;
        self.fill_image_area(
            argument,
            &area,
            PixelFormat::Bpp4,
            0xFFFF,
            device_info.image_buffer_address(),
            self.config.packed_write,
        )?;
        self.display_area(panel, mode)
    }

    /// Loads a 1bpp image and refreshes it
    ///
    /// `area` is in pixels with `x` and `w` multiples of 8, `buffer` holds
    /// one bit per pixel, rows `w / 8` bytes long. The image is loaded to and
    /// shown from `target`.
    pub fn refresh_1bpp(
        &mut self,
        buffer: &[u8],
        area: Rect,
        mode: WaveformMode,
        target: u32,
        packed: bool,
    ) -> Result<(), Error<T::Error>> {
        self.write_1bpp_frame(buffer, area, target, packed)?;
        self.display_1bpp(
            area,
            mode,
            target,
            BACKGROUND_GRAY_1BPP,
            FOREGROUND_GRAY_1BPP,
        )
    }

    /// Loads one frame of a 1bpp animation to `target` without showing it
    ///
    /// Frames need non-overlapping targets, the usual layout is the image buffer
    /// address plus `n * frame size`.
    pub fn write_1bpp_frame(
        &mut self,
        buffer: &[u8],
        area: Rect,
        target: u32,
        packed: bool,
    ) -> Result<(), Error<T::Error>> {
        self.wait_for_display_ready()?;
        self.load_image_area(
            &LoadImageInfo::new(buffer, PixelFormat::Bpp1, target),
            &AreaImageInfo::from_pixels(area, PixelFormat::Bpp1),
            packed,
        )
    }

    /// Shows a frame loaded with [`write_1bpp_frame`](It8951::write_1bpp_frame)
    /// using the panel's A2 mode
    pub fn display_1bpp_frame(&mut self, area: Rect, target: u32) -> Result<(), Error<T::Error>> {
        let a2 = self.require_device_info()?.a2_mode();
        self.wait_for_display_ready()?;
        self.display_1bpp(
            area,
            a2,
            target,
            BACKGROUND_GRAY_1BPP,
            FOREGROUND_GRAY_1BPP,
        )
    }

    /// Loads a gray image and refreshes it with GC16
    ///
    /// With `hold` the refresh uses the buffer the controller is bound to,
    /// otherwise the one at `target`. [`PixelFormat::Bpp1`] images are shown
    /// through [`display_1bpp`](It8951::display_1bpp).
    #[allow(clippy::too_many_arguments)]
    pub fn refresh(
        &mut self,
        buffer: &[u8],
        format: PixelFormat,
        area: Rect,
        hold: bool,
        target: u32,
        packed: bool,
    ) -> Result<(), Error<T::Error>> {
        if format == PixelFormat::Bpp1 {
            self.write_1bpp_frame(buffer, area, target, packed)?;
            return self.display_1bpp(
                area,
                WaveformMode::GC16,
                if hold { 0 } else { target },
                BACKGROUND_GRAY_1BPP,
                FOREGROUND_GRAY_1BPP,
            );
        }

        self.wait_for_display_ready()?;
        self.load_image_area(
            &LoadImageInfo::new(buffer, format, target),
            &AreaImageInfo::from_pixels(area, format),
            packed,
        )?;

        if hold {
            self.display_area(area, WaveformMode::GC16)
        } else {
            self.display_area_from_buffer(area, WaveformMode::GC16, target)
        }
    }

    fn check_display_area(&self, area: Rect) -> Result<(), Error<T::Error>> {
        let device_info = self.require_device_info()?;
        check_area(
            &device_info,
            &AreaImageInfo::from_pixels(area, PixelFormat::Bpp8),
            PixelFormat::Bpp8,
        )
    }
}
