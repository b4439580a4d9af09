//! The device info record reported by `GET_DEV_INFO`

use crate::refresh::WaveformMode;

/// Length of the device info record in words
pub const DEVICE_INFO_WORDS: usize = 20;

const VERSION_WORDS: usize = 8;
const VERSION_BYTES: usize = VERSION_WORDS * 2;

/// Panel geometry, image buffer location and version strings of a controller
///
/// The record carries no checksum: on a flaky link the fields are reported as read.
/// Use [`is_plausible`](DeviceInfo::is_plausible) for a cheap sanity check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeviceInfo {
    /// Panel width in pixels
    pub panel_width: u16,
    /// Panel height in pixels
    pub panel_height: u16,
    /// Low word of the image buffer address
    pub image_buffer_addr_low: u16,
    /// High word of the image buffer address
    pub image_buffer_addr_high: u16,
    firmware_version: [u8; VERSION_BYTES],
    lut_version: [u8; VERSION_BYTES],
}

impl DeviceInfo {
    /// Parses the raw record
    ///
    /// Versions are NUL terminated ASCII with the first character in the low byte of each word.
    pub fn from_words(words: &[u16; DEVICE_INFO_WORDS]) -> Self {
        fn version(words: &[u16]) -> [u8; VERSION_BYTES] {
            let mut bytes = [0u8; VERSION_BYTES];
            for (pair, word) in bytes.chunks_exact_mut(2).zip(words) {
                pair.copy_from_slice(&word.to_le_bytes());
            }
            bytes
        }

        DeviceInfo {
            panel_width: words[0],
            panel_height: words[1],
            image_buffer_addr_low: words[2],
            image_buffer_addr_high: words[3],
            firmware_version: version(&words[4..4 + VERSION_WORDS]),
            lut_version: version(&words[4 + VERSION_WORDS..4 + 2 * VERSION_WORDS]),
        }
    }

    /// Start of the controller's image buffer
    pub fn image_buffer_address(&self) -> u32 {
        u32::from(self.image_buffer_addr_low) | (u32::from(self.image_buffer_addr_high) << 16)
    }

    /// Firmware version, cut at the first NUL or invalid byte
    pub fn firmware_version(&self) -> &str {
        version_str(&self.firmware_version)
    }

    /// Waveform/LUT version, cut at the first NUL or invalid byte
    pub fn lut_version(&self) -> &str {
        version_str(&self.lut_version)
    }

    /// Both dimensions are non-zero
    pub fn is_plausible(&self) -> bool {
        self.panel_width > 0 && self.panel_height > 0
    }

    /// The A2 waveform mode number of the panel's LUT
    pub fn a2_mode(&self) -> WaveformMode {
        match self.lut_version() {
            "M641" => WaveformMode(4),
            _ => WaveformMode::A2,
        }
    }

    /// Whether image loads on this panel need a width that is a multiple of 32 pixels
    pub fn four_byte_align(&self) -> bool {
        matches!(self.lut_version(), "M641" | "M841_TFAB512")
    }

    /// Panel width usable for image loads
    pub fn aligned_width(&self) -> u16 {
        if self.four_byte_align() {
            self.panel_width - self.panel_width % 32
        } else {
            self.panel_width
        }
    }
}

fn version_str(bytes: &[u8]) -> &str {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    match core::str::from_utf8(&bytes[..end]) {
        Ok(version) => version,
        Err(err) => core::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
    }
}
