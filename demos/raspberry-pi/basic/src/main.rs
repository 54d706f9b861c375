//! Minimal one-shot reading loop for a MAX31865 board on a Raspberry Pi.
//!
//! Expects the chip on the first hardware chip select of SPI0, which the
//! kernel exposes as `/dev/spidev0.0`.

use std::thread;
use std::time::Duration;

use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{Delay, SpidevDevice};
use max31865::config::Config;
use max31865::params::{FilterFrequency, WireMode};
use max31865::Max31865;

fn main() {
    let mut spi = SpidevDevice::open("/dev/spidev0.0").expect("spidev not available");
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(1_000_000)
        .mode(SpiModeFlags::SPI_MODE_1)
        .build();
    spi.0.configure(&options).expect("spidev configuration failed");

    let config = Config::pt100(WireMode::Three, FilterFrequency::Hz50);
    let mut sensor = Max31865::new_spi(spi, config);
    sensor.init().expect("sensor initialization failed");

    let mut delay = Delay;
    loop {
        let reading = sensor.read_one_shot(&mut delay).expect("acquisition failed");
        if reading.fault {
            let status = sensor.read_fault_status().expect("fault status read failed");
            println!("fault status {status:#04x}, clearing");
            sensor.clear_fault().expect("fault clear failed");
        } else {
            let m = sensor.temperature(reading);
            println!(
                "rtd {} -> {:.3} ohm -> {:.2} C",
                reading.rtd, m.resistance, m.temperature
            );
        }

        thread::sleep(Duration::from_millis(500));
    }
}
