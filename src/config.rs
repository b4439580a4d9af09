#[derive(Copy, Clone, Debug, Eq, PartialEq)]
/// Controller configuration applied by [`It8951::init`](crate::It8951::init)
pub struct Config {
    /// VCOM in mV as printed on the panel's flex cable, without the sign
    ///
    /// See [`vcom_from_volts`] for converting the printed value.
    pub vcom: u16,
    /// How [`It8951::clear_refresh`](crate::It8951::clear_refresh) streams the white image:
    /// - `false`: one preamble per image word, works on every interconnect
    /// - `true`: one preamble per image load
    ///
    /// Loads and refreshes taking image data get a `packed` flag per call instead.
    pub packed_write: bool,
    /// Raise the source driver output strength, fixes blurred images on long flex cables
    pub enhance_driving: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vcom: 1500,
            packed_write: false,
            enhance_driving: false,
        }
    }
}

/// Converts a VCOM voltage like `-2.51` into the mV magnitude the controller expects
pub fn vcom_from_volts(volts: f32) -> u16 {
    let millivolts = volts * 1000.0;
    let magnitude = if millivolts < 0.0 {
        -millivolts
    } else {
        millivolts
    };
    // round half up without std
    (magnitude + 0.5) as u16
}
