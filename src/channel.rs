//! Preamble framing of every controller transaction

use crate::command::{Command, PREAMBLE_COMMAND, PREAMBLE_READ, PREAMBLE_WRITE};
use crate::interface::Transport;

/// Words staged on the stack per bus write during a burst
const BURST_CHUNK_WORDS: usize = 256;

/// Frames commands, data words and reads on top of a [`Transport`]
///
/// Each transaction waits for HRDY, asserts chip select, sends a 16 bit preamble
/// telling the controller what follows, waits for HRDY again and only then moves
/// the payload. Words go out high byte first.
pub struct CommandChannel<T> {
    transport: T,
}

impl<T: Transport> CommandChannel<T> {
    /// Wraps a transport
    pub fn new(transport: T) -> Self {
        CommandChannel { transport }
    }

    /// Consumes the channel, returning the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Direct access to the transport, e.g. for delays or the reset line
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Waits until the controller is ready (HRDY == HIGH)
    pub fn wait_until_ready(&mut self) -> Result<(), T::Error> {
        self.transport.wait_until_ready()
    }

    // wait, select, preamble, wait
    fn begin(&mut self, preamble: u16) -> Result<(), T::Error> {
        self.transport.wait_until_ready()?;
        self.transport.select()?;
        self.transport.write(&preamble.to_be_bytes())?;
        self.transport.wait_until_ready()
    }

    /// Sends a command code
    pub fn send_command<C: Command>(&mut self, command: C) -> Result<(), T::Error> {
        self.begin(PREAMBLE_COMMAND)?;
        self.transport.write(&command.address().to_be_bytes())?;
        self.transport.deselect()
    }

    /// Sends a single data word
    pub fn send_data(&mut self, word: u16) -> Result<(), T::Error> {
        self.begin(PREAMBLE_WRITE)?;
        self.transport.write(&word.to_be_bytes())?;
        self.transport.deselect()
    }

    /// Sends all words under a single preamble
    ///
    /// This is the packed write path, it needs `I80CPCR` set to 1 on the controller.
    pub fn send_data_burst<I>(&mut self, words: I) -> Result<(), T::Error>
    where
        I: IntoIterator<Item = u16>,
    {
        self.begin(PREAMBLE_WRITE)?;

        let mut staging = [0u8; BURST_CHUNK_WORDS * 2];
        let mut len = 0;
        for word in words {
            let [hi, lo] = word.to_be_bytes();
            staging[len] = hi;
            staging[len + 1] = lo;
            len += 2;
            if len == staging.len() {
                self.transport.write(&staging)?;
                len = 0;
            }
        }
        if len > 0 {
            self.transport.write(&staging[..len])?;
        }

        self.transport.deselect()
    }

    /// Sends `count` copies of `word` under a single preamble
    pub fn send_data_repeat(&mut self, word: u16, count: usize) -> Result<(), T::Error> {
        self.send_data_burst(core::iter::repeat(word).take(count))
    }

    /// Sends a command followed by one data transaction per argument
    pub fn send_command_with_args<C: Command>(
        &mut self,
        command: C,
        args: &[u16],
    ) -> Result<(), T::Error> {
        self.send_command(command)?;
        for arg in args.iter().copied() {
            self.send_data(arg)?;
        }
        Ok(())
    }

    // read preamble plus the dummy word the controller always sends first
    fn begin_read(&mut self) -> Result<(), T::Error> {
        self.begin(PREAMBLE_READ)?;
        let mut dummy = [0u8; 2];
        self.transport.read(&mut dummy)?;
        self.transport.wait_until_ready()
    }

    /// Reads a single data word
    pub fn read_data(&mut self) -> Result<u16, T::Error> {
        self.begin_read()?;
        let mut word = [0u8; 2];
        self.transport.read(&mut word)?;
        self.transport.deselect()?;
        Ok(u16::from_be_bytes(word))
    }

    /// Fills `words` from a single read transaction
    pub fn read_data_burst(&mut self, words: &mut [u16]) -> Result<(), T::Error> {
        self.begin_read()?;

        let mut staging = [0u8; BURST_CHUNK_WORDS * 2];
        for chunk in words.chunks_mut(BURST_CHUNK_WORDS) {
            let bytes = &mut staging[..chunk.len() * 2];
            self.transport.read(bytes)?;
            for (word, pair) in chunk.iter_mut().zip(bytes.chunks_exact(2)) {
                *word = u16::from_be_bytes([pair[0], pair[1]]);
            }
        }

        self.transport.deselect()
    }
}
