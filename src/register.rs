//! Register access on top of the [`CommandChannel`]

use crate::channel::CommandChannel;
use crate::command::{register::LISAR, HostCommand};
use crate::interface::Transport;

impl<T: Transport> CommandChannel<T> {
    /// Reads a 16 bit register
    pub fn read_register(&mut self, address: u16) -> Result<u16, T::Error> {
        self.send_command(HostCommand::RegRd)?;
        self.send_data(address)?;
        self.read_data()
    }

    /// Writes a 16 bit register
    pub fn write_register(&mut self, address: u16, value: u16) -> Result<(), T::Error> {
        self.send_command(HostCommand::RegWr)?;
        self.send_data(address)?;
        self.send_data(value)
    }

    /// Points the next image load at `address` in controller memory
    ///
    /// The controller latches the address on the low word, so the high word goes first.
    pub fn set_target_memory_address(&mut self, address: u32) -> Result<(), T::Error> {
        let high = (address >> 16) as u16;
        let low = address as u16;
        self.write_register(LISAR + 2, high)?;
        self.write_register(LISAR, low)
    }
}

#[cfg(test)]
mod tests {
    use crate::channel::CommandChannel;
    use crate::command::register::{I80CPCR, LISAR};
    use crate::sim::{Controller, Op};

    #[test]
    fn write_then_read_back() {
        let mut controller = Controller::new();
        let mut channel = CommandChannel::new(&mut controller);

        channel.write_register(I80CPCR, 0x0001).unwrap();
        assert_eq!(channel.read_register(I80CPCR).unwrap(), 0x0001);

        assert!(controller.violations.is_empty());
    }

    #[test]
    fn target_address_high_word_first() {
        let mut controller = Controller::new();
        let mut channel = CommandChannel::new(&mut controller);

        channel.set_target_memory_address(0x0012_3456).unwrap();

        assert_eq!(
            controller.ops,
            [
                Op::RegWrite(LISAR + 2, 0x0012),
                Op::RegWrite(LISAR, 0x3456)
            ]
        );
        assert_eq!(controller.image_buffer_target(), 0x0012_3456);
    }
}
