#![deny(warnings)]

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyleBuilder},
    pixelcolor::{BinaryColor, Gray4},
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
    text::{Baseline, Text},
};
use epd_it8951::prelude::*;
use linux_embedded_hal::{
    spidev::{self, SpidevOptions},
    sysfs_gpio::Direction,
    Delay, SPIError, SpidevBus, SysfsPin,
};

// activate spi, gpio in raspi-config
// needs to be run with sudo because of some sysfs_gpio permission problems and follow-up timing problems
// see https://github.com/rust-embedded/rust-sysfs-gpio/issues/5 and follow-up issues

// VCOM printed on the ribbon cable of the panel
const VCOM_VOLTS: f32 = -1.50;

fn main() -> Result<(), SPIError> {
    // Configure SPI
    let mut spi = SpidevBus::open("/dev/spidev0.0").expect("spidev directory");
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(12_000_000)
        .mode(spidev::SpiModeFlags::SPI_MODE_0 | spidev::SpiModeFlags::SPI_NO_CS)
        .build();
    spi.configure(&options).expect("spi configuration");

    // Configure Digital I/O Pin to be used as Chip Select for SPI
    let cs = SysfsPin::new(8); //BCM8 CE0
    cs.export().expect("cs export");
    while !cs.is_exported() {}
    cs.set_direction(Direction::Out).expect("CS Direction");
    cs.set_value(1).expect("CS Value set to 1");

    let busy = SysfsPin::new(24); // HRDY, GPIO 24
    busy.export().expect("busy export");
    while !busy.is_exported() {}
    busy.set_direction(Direction::In).expect("busy Direction");

    let rst = SysfsPin::new(17); // GPIO 17
    rst.export().expect("rst export");
    while !rst.is_exported() {}
    rst.set_direction(Direction::Out).expect("rst Direction");
    rst.set_value(1).expect("rst Value set to 1");

    let interface =
        SpiInterface::<_, _, _, _, _, false>::new(spi, cs, busy, rst, Delay {}, Some(10));
    let config = Config {
        vcom: vcom_from_volts(VCOM_VOLTS),
        ..Config::default()
    };
    let mut epd = It8951::new(interface, config);

    let info = epd.init().expect("it8951 init");
    println!(
        "Panel {}x{}, image buffer at {:#010x}, firmware {:?}, LUT {:?}",
        info.panel_width,
        info.panel_height,
        info.image_buffer_address(),
        info.firmware_version(),
        info.lut_version(),
    );

    println!("Clear the panel");
    epd.clear_refresh(WaveformMode::INIT).expect("clear");

    println!("Draw a 16 level gray scale");
    let (width, height) = (info.panel_width, info.panel_height / 4);
    let mut buffer = vec![0u8; PixelBuffer::required_len(width, height, PixelFormat::Bpp4)];
    let mut display = Display::<Gray4>::new(&mut buffer, width, height).expect("gray buffer");
    let band = u32::from(width) / 16;
    for level in 0..16u8 {
        embedded_graphics::primitives::Rectangle::new(
            Point::new((u32::from(level) * band) as i32, 0),
            Size::new(band, u32::from(height)),
        )
        .into_styled(PrimitiveStyle::with_fill(Gray4::new(level)))
        .draw(&mut display)
        .expect("draw band");
    }
    epd.refresh(
        display.buffer(),
        PixelFormat::Bpp4,
        Rect::new(0, 0, width, height),
        true,
        info.image_buffer_address(),
        false,
    )
    .expect("gray refresh");

    println!("Draw black and white with the fast mode");
    let (width, height) = (info.aligned_width() & !7, 200);
    let mut buffer = vec![0u8; PixelBuffer::required_len(width, height, PixelFormat::Bpp1)];
    let mut display =
        Display::<BinaryColor>::new(&mut buffer, width, height).expect("binary buffer");
    display.clear(BinaryColor::Off).expect("clear buffer");
    let style = MonoTextStyleBuilder::new()
        .font(&FONT_10X20)
        .text_color(BinaryColor::On)
        .background_color(BinaryColor::Off)
        .build();
    let _ = Text::with_baseline("Hello from Rust!", Point::new(20, 40), style, Baseline::Top)
        .draw(&mut display);
    let _ = Circle::new(Point::new(300, 20), 160)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 4))
        .draw(&mut display);

    let area = Rect::new(0, info.panel_height / 2, width, height);
    epd.refresh_1bpp(
        display.buffer(),
        area,
        info.a2_mode(),
        info.image_buffer_address(),
        false,
    )
    .expect("1bpp refresh");

    println!("Finished tests - going to sleep");
    epd.shutdown().expect("shutdown");
    Ok(())
}
