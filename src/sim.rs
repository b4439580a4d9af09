//! A simulated IT8951 behind a [`Transport`], for tests
//!
//! Decodes preambles, commands and their arguments from the raw byte stream,
//! keeps registers, VCOM and a sparse memory, and records every completed
//! command as an [`Op`]. Framing mistakes end up in `violations`.

extern crate std;

use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use crate::command::register::{LISAR, LUTAFSR};
use crate::command::{HostCommand, PREAMBLE_COMMAND, PREAMBLE_READ, PREAMBLE_WRITE};
use crate::device::{tests::record, DEVICE_INFO_WORDS};
use crate::interface::Transport;

/// Word the controller shifts out before the real read data
pub(crate) const DUMMY_WORD: u16 = 0xDEAD;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SimError;

/// A completed controller operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Op {
    Reset(bool),
    SysRun,
    Standby,
    Sleep,
    RegRead(u16),
    RegWrite(u16, u16),
    GetVcom,
    SetVcom(u16),
    GetDevInfo,
    LoadImage(u16),
    LoadArea([u16; 5]),
    LoadEnd { words: usize },
    DisplayArea([u16; 5]),
    DisplayBuffer([u16; 7]),
    MemBurstWrite { address: u32, count: u32 },
    MemBurstReadTrigger { address: u32, count: u32 },
    MemBurstReadStart,
    MemBurstEnd,
    Unknown(u16),
}

enum Pending {
    None,
    Args { code: u16, args: Vec<u16> },
    Image { words: usize },
    Burst { address: u32, written: u32 },
}

pub(crate) struct Controller {
    pub device_info: [u16; DEVICE_INFO_WORDS],
    pub vcom: u16,
    /// Number of `LUTAFSR` reads answering busy
    pub lut_busy_polls: u32,
    /// Number of HRDY samples answering busy
    pub not_ready_polls: u32,
    /// `idle` fails once it has been called this often
    pub fail_idle_after: Option<usize>,

    pub ops: Vec<Op>,
    pub delays_ms: Vec<u32>,
    pub image_words: Vec<u16>,
    pub image_bytes: usize,
    /// Data frames carrying more than one word
    pub burst_frames: usize,
    pub idle_calls: usize,
    pub violations: Vec<&'static str>,

    registers: BTreeMap<u16, u16>,
    memory: BTreeMap<u32, u16>,
    read_trigger: (u32, u32),

    selected: bool,
    polled: bool,
    preamble: Option<u16>,
    partial: Vec<u8>,
    frame_words: usize,
    dummy_pending: bool,
    read_queue: VecDeque<u16>,
    pending: Pending,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            device_info: record(1200, 825, 0x0010_0000, "SWv_0.1.1", "M841_TFA2812"),
            vcom: 1500,
            lut_busy_polls: 0,
            not_ready_polls: 0,
            fail_idle_after: None,
            ops: Vec::new(),
            delays_ms: Vec::new(),
            image_words: Vec::new(),
            image_bytes: 0,
            burst_frames: 0,
            idle_calls: 0,
            violations: Vec::new(),
            registers: BTreeMap::new(),
            memory: BTreeMap::new(),
            read_trigger: (0, 0),
            selected: false,
            polled: false,
            preamble: None,
            partial: Vec::new(),
            frame_words: 0,
            dummy_pending: false,
            read_queue: VecDeque::new(),
            pending: Pending::None,
        }
    }

    pub fn register(&self, address: u16) -> u16 {
        self.registers.get(&address).copied().unwrap_or(0)
    }

    pub fn set_register(&mut self, address: u16, value: u16) {
        self.registers.insert(address, value);
    }

    pub fn image_buffer_target(&self) -> u32 {
        (u32::from(self.register(LISAR + 2)) << 16) | u32::from(self.register(LISAR))
    }

    /// Forgets everything recorded so far, state is kept
    pub fn clear_log(&mut self) {
        self.ops.clear();
        self.delays_ms.clear();
        self.image_words.clear();
        self.image_bytes = 0;
        self.burst_frames = 0;
        self.idle_calls = 0;
    }

    fn on_word(&mut self, word: u16) {
        match self.preamble {
            Some(PREAMBLE_COMMAND) => self.on_command(word),
            Some(PREAMBLE_WRITE) => {
                self.frame_words += 1;
                self.on_data(word);
            }
            _ => self.violations.push("write during a read transaction"),
        }
    }

    fn on_command(&mut self, code: u16) {
        // answers only ever belong to the latest command
        self.read_queue.clear();
        match core::mem::replace(&mut self.pending, Pending::None) {
            Pending::Image { words } => {
                if code == HostCommand::LdImgEnd as u16 {
                    self.ops.push(Op::LoadEnd { words });
                } else {
                    self.violations.push("image load not ended");
                }
                return;
            }
            Pending::Burst { .. } => {
                if code == HostCommand::MemBstEnd as u16 {
                    self.ops.push(Op::MemBurstEnd);
                } else {
                    self.violations.push("memory burst not ended");
                }
                return;
            }
            Pending::Args { .. } => self.violations.push("command with missing arguments"),
            Pending::None => {}
        }

        match code {
            0x0001 => self.ops.push(Op::SysRun),
            0x0002 => self.ops.push(Op::Standby),
            0x0003 => self.ops.push(Op::Sleep),
            0x0302 => {
                self.ops.push(Op::GetDevInfo);
                self.read_queue.extend(self.device_info);
            }
            0x0013 => {
                self.ops.push(Op::MemBurstReadStart);
                let (address, count) = self.read_trigger;
                for i in 0..count {
                    let word = self.memory.get(&(address + 2 * i)).copied().unwrap_or(0);
                    self.read_queue.push_back(word);
                }
            }
            0x0015 => self.ops.push(Op::MemBurstEnd),
            0x0010 | 0x0011 | 0x0012 | 0x0014 | 0x0020 | 0x0021 | 0x0034 | 0x0037 | 0x0039 => {
                self.pending = Pending::Args {
                    code,
                    args: Vec::new(),
                }
            }
            other => self.ops.push(Op::Unknown(other)),
        }
    }

    fn on_data(&mut self, word: u16) {
        match &mut self.pending {
            Pending::None => self.violations.push("data without a command"),
            Pending::Image { words } => {
                *words += 1;
                self.image_words.push(word);
                self.image_bytes += 2;
            }
            Pending::Burst { address, written } => {
                let key = *address + 2 * *written;
                *written += 1;
                self.memory.insert(key, word);
            }
            Pending::Args { code, args } => {
                args.push(word);
                let code = *code;
                let args = args.clone();
                self.on_args(code, &args);
            }
        }
    }

    // runs once per argument, acts when the argument list is complete
    fn on_args(&mut self, code: u16, args: &[u16]) {
        let long = |lo: u16, hi: u16| u32::from(lo) | (u32::from(hi) << 16);
        let done = match (code, args) {
            (0x0010, [address]) => {
                self.ops.push(Op::RegRead(*address));
                let value = if *address == LUTAFSR && self.lut_busy_polls > 0 {
                    self.lut_busy_polls -= 1;
                    1
                } else {
                    self.register(*address)
                };
                self.read_queue.push_back(value);
                Pending::None
            }
            (0x0011, [address, value]) => {
                self.ops.push(Op::RegWrite(*address, *value));
                self.registers.insert(*address, *value);
                Pending::None
            }
            (0x0039, [0]) => {
                self.ops.push(Op::GetVcom);
                self.read_queue.push_back(self.vcom);
                Pending::None
            }
            (0x0039, [1, vcom]) => {
                self.ops.push(Op::SetVcom(*vcom));
                self.vcom = *vcom;
                Pending::None
            }
            (0x0020, [argument]) => {
                self.ops.push(Op::LoadImage(*argument));
                Pending::Image { words: 0 }
            }
            (0x0021, &[a, x, y, w, h]) => {
                self.ops.push(Op::LoadArea([a, x, y, w, h]));
                Pending::Image { words: 0 }
            }
            (0x0034, &[x, y, w, h, mode]) => {
                self.ops.push(Op::DisplayArea([x, y, w, h, mode]));
                Pending::None
            }
            (0x0037, &[x, y, w, h, mode, lo, hi]) => {
                self.ops
                    .push(Op::DisplayBuffer([x, y, w, h, mode, lo, hi]));
                Pending::None
            }
            (0x0012, &[a_lo, a_hi, c_lo, c_hi]) => {
                let (address, count) = (long(a_lo, a_hi), long(c_lo, c_hi));
                self.ops.push(Op::MemBurstReadTrigger { address, count });
                self.read_trigger = (address, count);
                Pending::None
            }
            (0x0014, &[a_lo, a_hi, c_lo, c_hi]) => {
                let (address, count) = (long(a_lo, a_hi), long(c_lo, c_hi));
                self.ops.push(Op::MemBurstWrite { address, count });
                Pending::Burst {
                    address,
                    written: 0,
                }
            }
            _ => return,
        };
        self.pending = done;
    }
}

impl Transport for Controller {
    type Error = SimError;

    fn write(&mut self, data: &[u8]) -> Result<(), SimError> {
        if !self.selected {
            self.violations.push("write without chip select");
        }
        for byte in data.iter().copied() {
            if self.preamble.is_some() && self.partial.is_empty() && self.frame_words == 0 && !self.polled {
                self.violations.push("payload before waiting for ready");
            }
            self.partial.push(byte);
            if self.partial.len() == 2 {
                let word = u16::from_be_bytes([self.partial[0], self.partial[1]]);
                self.partial.clear();
                match self.preamble {
                    None => {
                        self.preamble = Some(word);
                        self.polled = false;
                        self.dummy_pending = word == PREAMBLE_READ;
                    }
                    Some(_) => {
                        if self.preamble == Some(PREAMBLE_COMMAND) {
                            self.frame_words += 1;
                        }
                        self.on_word(word);
                    }
                }
            }
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), SimError> {
        if self.preamble != Some(PREAMBLE_READ) {
            self.violations.push("read without read preamble");
        }
        if !self.polled {
            self.violations.push("read before waiting for ready");
        }
        if buffer.len() % 2 != 0 {
            self.violations.push("odd read length");
        }
        for pair in buffer.chunks_exact_mut(2) {
            let word = if self.dummy_pending {
                self.dummy_pending = false;
                self.polled = false;
                DUMMY_WORD
            } else {
                self.read_queue.pop_front().unwrap_or_else(|| {
                    self.violations.push("read with nothing to answer");
                    0
                })
            };
            pair.copy_from_slice(&word.to_be_bytes());
        }
        Ok(())
    }

    fn is_ready(&mut self) -> Result<bool, SimError> {
        if self.not_ready_polls > 0 {
            self.not_ready_polls -= 1;
            return Ok(false);
        }
        self.polled = true;
        Ok(true)
    }

    fn select(&mut self) -> Result<(), SimError> {
        if self.selected {
            self.violations.push("select while selected");
        }
        if !self.polled {
            self.violations.push("select before waiting for ready");
        }
        self.selected = true;
        self.preamble = None;
        self.partial.clear();
        self.frame_words = 0;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), SimError> {
        if !self.partial.is_empty() {
            self.violations.push("half a word in frame");
        }
        if self.preamble == Some(PREAMBLE_WRITE) && self.frame_words > 1 {
            self.burst_frames += 1;
        }
        self.selected = false;
        self.preamble = None;
        self.polled = false;
        Ok(())
    }

    fn set_reset(&mut self, high: bool) -> Result<(), SimError> {
        self.ops.push(Op::Reset(high));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }

    fn delay_us(&mut self, _us: u32) {}

    fn idle(&mut self) -> Result<(), SimError> {
        if self.fail_idle_after == Some(self.idle_calls) {
            return Err(SimError);
        }
        self.idle_calls += 1;
        Ok(())
    }
}

#[test]
fn busy_controller_is_waited_for() {
    use crate::channel::CommandChannel;

    let mut controller = Controller::new();
    controller.not_ready_polls = 5;
    let mut channel = CommandChannel::new(&mut controller);

    channel.send_command(HostCommand::SysRun).unwrap();

    assert_eq!(controller.idle_calls, 5);
    assert_eq!(controller.ops, [Op::SysRun]);
    assert!(controller.violations.is_empty());
}

#[test]
fn dummy_word_never_reaches_the_caller() {
    use crate::channel::CommandChannel;
    use crate::command::register::I80CPCR;

    let mut controller = Controller::new();
    controller.set_register(I80CPCR, 0x0001);
    let mut channel = CommandChannel::new(&mut controller);

    let mut words = [0u16; 3];
    channel.send_command(HostCommand::GetDevInfo).unwrap();
    channel.read_data_burst(&mut words).unwrap();
    assert_eq!(words, [1200, 825, 0x0000]);
    assert_eq!(channel.read_register(I80CPCR).unwrap(), 0x0001);
}
