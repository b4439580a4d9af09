//! Controller session: reset, init, power states and VCOM

use bit_field::BitField;

use crate::channel::CommandChannel;
use crate::command::{register, Command, HostCommand};
use crate::config::Config;
use crate::device::{DeviceInfo, DEVICE_INFO_WORDS};
use crate::error::Error;
use crate::interface::Transport;
use crate::log::{debug, info, warning};

/// Power state of the controller as last commanded by the session
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerState {
    /// Nothing has been sent yet
    Unreset,
    /// Hardware reset done, controller not running yet
    Reset,
    /// Accepting every command
    Running,
    /// Clocks gated off, only [`It8951::system_run`] wakes it up
    Standby,
    /// Clocks and PLL off, only [`It8951::system_run`] wakes it up
    Sleep,
}

/// An IT8951 controller
///
/// Created with [`new`](It8951::new), brought up with [`init`](It8951::init)
/// and finally put to sleep with [`shutdown`](It8951::shutdown).
/// Everything learned during init lives in this struct, several controllers can
/// be driven side by side.
pub struct It8951<T> {
    pub(crate) channel: CommandChannel<T>,
    pub(crate) config: Config,
    pub(crate) device_info: Option<DeviceInfo>,
    power: PowerState,
}

impl<T: Transport> It8951<T> {
    /// Creates a new session, no bus traffic happens until [`init`](It8951::init)
    pub fn new(transport: T, config: Config) -> Self {
        It8951 {
            channel: CommandChannel::new(transport),
            config,
            device_info: None,
            power: PowerState::Unreset,
        }
    }

    /// Resets the controller with the reset line
    ///
    /// High for 200ms, low for 10ms, high for 200ms again. The controller needs the full timing.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        debug!("Resetting IT8951");
        let transport = self.channel.transport_mut();
        transport.set_reset(true).map_err(Error::Interface)?;
        transport.delay_ms(200);
        transport.set_reset(false).map_err(Error::Interface)?;
        transport.delay_ms(10);
        transport.set_reset(true).map_err(Error::Interface)?;
        transport.delay_ms(200);
        self.power = PowerState::Reset;
        Ok(())
    }

    /// Resets and initializes the controller with the VCOM from [`Config`]
    pub fn init(&mut self) -> Result<DeviceInfo, Error<T::Error>> {
        self.init_with_vcom(self.config.vcom)
    }

    /// Resets and initializes the controller
    ///
    /// Runs the controller, reads the device info, enables packed writes and
    /// updates VCOM to `vcom` mV if the controller holds a different value.
    pub fn init_with_vcom(&mut self, vcom: u16) -> Result<DeviceInfo, Error<T::Error>> {
        info!("Initialising IT8951");
        self.reset()?;
        self.system_run()?;

        let device_info = self.query_device_info()?;
        info!(
            "Panel {}x{}, image buffer at {:#010x}, FW {}, LUT {}",
            device_info.panel_width,
            device_info.panel_height,
            device_info.image_buffer_address(),
            device_info.firmware_version(),
            device_info.lut_version()
        );
        if !device_info.is_plausible() {
            warning!("Implausible device info, check the wiring: {:?}", device_info);
        }

        // packed write
        self.write_register(register::I80CPCR, 0x0001)?;

        if self.config.enhance_driving {
            self.enhance_driving_capability()?;
        }

        let current = self.get_vcom()?;
        if current != vcom {
            info!("Changing VCOM from {} mV to {} mV", current, vcom);
            self.set_vcom(vcom)?;
        }

        self.device_info = Some(device_info);
        Ok(device_info)
    }

    /// Device info read during [`init`](It8951::init)
    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    pub(crate) fn require_device_info(&self) -> Result<DeviceInfo, Error<T::Error>> {
        self.device_info.ok_or(Error::NotInitialized)
    }

    /// Last commanded power state
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Configuration the session was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the 20 word device info record
    pub fn query_device_info(&mut self) -> Result<DeviceInfo, Error<T::Error>> {
        let mut words = [0u16; DEVICE_INFO_WORDS];
        self.channel
            .send_command(HostCommand::GetDevInfo)
            .map_err(Error::Interface)?;
        self.channel
            .read_data_burst(&mut words)
            .map_err(Error::Interface)?;
        Ok(DeviceInfo::from_words(&words))
    }

    /// Runs the controller, also wakes it from standby and sleep
    pub fn system_run(&mut self) -> Result<(), Error<T::Error>> {
        self.power_command(HostCommand::SysRun, PowerState::Running)
    }

    /// Puts the controller into standby
    pub fn standby(&mut self) -> Result<(), Error<T::Error>> {
        self.power_command(HostCommand::Standby, PowerState::Standby)
    }

    /// Puts the controller to sleep
    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        self.power_command(HostCommand::Sleep, PowerState::Sleep)
    }

    fn power_command(&mut self, command: HostCommand, state: PowerState) -> Result<(), Error<T::Error>> {
        debug!("{:?}", command);
        self.channel.send_command(command).map_err(Error::Interface)?;
        self.power = state;
        Ok(())
    }

    /// Reads VCOM in mV
    pub fn get_vcom(&mut self) -> Result<u16, Error<T::Error>> {
        self.channel
            .send_command(HostCommand::Vcom)
            .map_err(Error::Interface)?;
        self.channel.send_data(0x0000).map_err(Error::Interface)?;
        self.channel.read_data().map_err(Error::Interface)
    }

    /// Sets VCOM in mV
    pub fn set_vcom(&mut self, vcom: u16) -> Result<(), Error<T::Error>> {
        self.channel
            .send_command_with_args(HostCommand::Vcom, &[0x0001, vcom])
            .map_err(Error::Interface)
    }

    /// Raises the source driver output strength
    pub fn enhance_driving_capability(&mut self) -> Result<(), Error<T::Error>> {
        debug!("Enhancing driving capability");
        self.write_register(
            register::DRIVING_CAPABILITY,
            register::DRIVING_CAPABILITY_ENHANCED,
        )
    }

    /// Reads a controller register, see [`register`](crate::command::register) for addresses
    pub fn read_register(&mut self, address: u16) -> Result<u16, Error<T::Error>> {
        self.channel.read_register(address).map_err(Error::Interface)
    }

    /// Writes a controller register
    pub fn write_register(&mut self, address: u16, value: u16) -> Result<(), Error<T::Error>> {
        self.channel
            .write_register(address, value)
            .map_err(Error::Interface)
    }

    /// Sends a command with arguments, for commands this driver doesn't wrap
    pub fn command<C: Command>(&mut self, command: C, args: &[u16]) -> Result<(), Error<T::Error>> {
        self.channel
            .send_command_with_args(command, args)
            .map_err(Error::Interface)
    }

    /// Direct access to the command channel
    pub fn channel_mut(&mut self) -> &mut CommandChannel<T> {
        &mut self.channel
    }

    /// Sets or clears the 1bpp remap bit in `UP1SR + 2`
    pub(crate) fn set_1bpp_mode(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        let mut value = self.read_register(register::UP1SR + 2)?;
        value.set_bit(register::UP1SR_1BPP_BIT, enabled);
        self.write_register(register::UP1SR + 2, value)
    }

    /// Puts the controller to sleep and releases the transport
    pub fn shutdown(mut self) -> Result<T, Error<T::Error>> {
        self.sleep()?;
        Ok(self.channel.release())
    }

    /// Releases the transport without touching the controller
    pub fn release(self) -> T {
        self.channel.release()
    }
}
