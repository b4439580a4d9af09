//! Host commands and register map of the IT8951 controller

/// All commands need to have this trait which gives the 16 bit code of the command
/// which is sent after the command preamble
pub trait Command: Copy {
    /// Returns the code of the command
    fn address(self) -> u16;
}

/// Raw codes, e.g. vendor defined commands without a [`HostCommand`] variant
impl Command for u16 {
    fn address(self) -> u16 {
        self
    }
}

/// IT8951 host commands
///
/// Commands taking parameters expect them as separate data words after the command,
/// see [`CommandChannel::send_command_with_args`](crate::channel::CommandChannel::send_command_with_args).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HostCommand {
    /// Wake up and run the controller
    SysRun = 0x0001,
    /// Standby, clocks gated off
    Standby = 0x0002,
    /// Sleep, clocks and PLL off
    Sleep = 0x0003,
    /// Read a register, param: address
    RegRd = 0x0010,
    /// Write a register, params: address, value
    RegWr = 0x0011,
    /// Memory burst read trigger, params: address lo, address hi, count lo, count hi
    MemBstRdT = 0x0012,
    /// Memory burst read start
    MemBstRdS = 0x0013,
    /// Memory burst write, params: address lo, address hi, count lo, count hi
    MemBstWr = 0x0014,
    /// End of a memory burst cycle
    MemBstEnd = 0x0015,
    /// Load a full image, param: endian/format/rotation word
    LdImg = 0x0020,
    /// Load an image area, params: endian/format/rotation word, x, y, w, h
    LdImgArea = 0x0021,
    /// End of an image load
    LdImgEnd = 0x0022,
    /// Display an area from the bound buffer, params: x, y, w, h, mode
    DpyArea = 0x0034,
    /// Display an area from an explicit buffer, params: x, y, w, h, mode, address lo, address hi
    DpyBufArea = 0x0037,
    /// Get (param 0) or set (param 1, value) VCOM in mV
    Vcom = 0x0039,
    /// Query the 20 word device info record
    GetDevInfo = 0x0302,
}

impl Command for HostCommand {
    fn address(self) -> u16 {
        self as u16
    }
}

/// Preamble starting a command transaction
pub(crate) const PREAMBLE_COMMAND: u16 = 0x6000;
/// Preamble starting a data write transaction
pub(crate) const PREAMBLE_WRITE: u16 = 0x0000;
/// Preamble starting a data read transaction
pub(crate) const PREAMBLE_READ: u16 = 0x1000;

/// Register addresses
pub mod register {
    /// Base of the display engine registers
    pub const DISPLAY_REG_BASE: u16 = 0x1000;
    /// LUT0 engine width/height
    pub const LUT0EWHR: u16 = DISPLAY_REG_BASE;
    /// LUT0 XY
    pub const LUT0XYR: u16 = DISPLAY_REG_BASE + 0x40;
    /// LUT0 base address
    pub const LUT0BADDR: u16 = DISPLAY_REG_BASE + 0x80;
    /// LUT0 mode and frame number
    pub const LUT0MFN: u16 = DISPLAY_REG_BASE + 0xC0;
    /// LUT0 and LUT1 active flag
    pub const LUT01AF: u16 = DISPLAY_REG_BASE + 0x114;
    /// Update parameter 0 setting
    pub const UP0SR: u16 = DISPLAY_REG_BASE + 0x134;
    /// Update parameter 1 setting, the 1bpp enable bit lives in the word at `UP1SR + 2`
    pub const UP1SR: u16 = DISPLAY_REG_BASE + 0x138;
    /// LUT0 alpha blend and fill rectangle value
    pub const LUT0ABFRV: u16 = DISPLAY_REG_BASE + 0x13C;
    /// Update buffer base address
    pub const UPBBADDR: u16 = DISPLAY_REG_BASE + 0x17C;
    /// LUT0 image buffer X/Y offset
    pub const LUT0IMXY: u16 = DISPLAY_REG_BASE + 0x180;
    /// LUT status, non-zero while any refresh engine is busy
    pub const LUTAFSR: u16 = DISPLAY_REG_BASE + 0x224;
    /// 1bpp background/foreground gray table
    pub const BGVR: u16 = DISPLAY_REG_BASE + 0x250;

    /// Base of the system registers
    pub const SYS_REG_BASE: u16 = 0x0000;
    /// I80 command/parameter control, 1 enables packed writes
    pub const I80CPCR: u16 = SYS_REG_BASE + 0x04;

    /// Base of the memory converter registers
    pub const MCSR_BASE_ADDR: u16 = 0x0200;
    /// Memory converter status
    pub const MCSR: u16 = MCSR_BASE_ADDR;
    /// Load image start address, low word here and high word at `LISAR + 2`
    pub const LISAR: u16 = MCSR_BASE_ADDR + 0x08;

    /// Source driver output strength
    pub const DRIVING_CAPABILITY: u16 = 0x0038;
    /// Value of [`DRIVING_CAPABILITY`] for long or noisy flex cables
    pub const DRIVING_CAPABILITY_ENHANCED: u16 = 0x0602;

    /// Bit in `UP1SR + 2` remapping the 8bpp path to 1bpp
    pub const UP1SR_1BPP_BIT: usize = 2;
}
