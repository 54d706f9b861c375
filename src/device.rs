//! High-level MAX31865 device driver implementation.

use crate::config::Config;
use crate::conversion::{callendar_van_dusen, pt100_polynomial, Measurement};
use crate::error::{Error, Result};
use crate::interface::spi::SpiInterface;
use crate::interface::Max31865Interface;
use crate::log::{debug, trace, warn};
use crate::registers::{Configuration, REG_CONFIG, REG_FAULT_STATUS, REG_RTD_MSB};
use embedded_hal::spi::SpiDevice;
use embedded_hal::delay::DelayNs;

// MAX31865 datasheet bias settling time before a conversion (milliseconds).
const BIAS_SETTLE_DELAY_MS: u32 = 10;
// Worst-case single conversion time under 50 Hz filtering (milliseconds).
const CONVERSION_DELAY_MS: u32 = 65;
// Number of consecutive bytes spanning the RTD MSB and LSB registers.
const RAW_RTD_BYTES: usize = 2;

/// High-level synchronous driver for the MAX31865 RTD front-end.
pub struct Max31865<IFACE> {
    interface: IFACE,
    config: Config,
    // Idle register pattern currently on the chip, conversion-mode bit included.
    base: Configuration,
}

/// Raw RTD register contents split into the ratio code and fault flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtdReading {
    /// 15-bit ratio code, RTD resistance relative to the reference resistor.
    pub rtd: u16,
    /// RTD[0] fault flag; set while any fault status bit is latched.
    pub fault: bool,
}

impl RtdReading {
    /// Splits the combined 16-bit RTD register value into code and flag.
    pub fn from_register(value: u16) -> Self {
        Self {
            rtd: value >> 1,
            fault: value & 1 != 0,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RtdReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RtdReading {{ rtd: {}, fault: {} }}",
            self.rtd,
            self.fault
        );
    }
}

impl<IFACE> Max31865<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        let base = config.register_value();
        Self {
            interface,
            config,
            base,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<SPI> Max31865<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Max31865<IFACE>
where
    IFACE: Max31865Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Configuration ================================
    // ==================================================================
    /// Initializes the chip using the current configuration.
    ///
    /// Writes the idle pattern derived from the configuration and reads it
    /// back; a mismatch usually points at wiring or SPI mode problems and is
    /// reported as [`Error::ConfigMismatch`].
    pub fn init(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        let base = self.config.register_value();
        self.apply_config(base)?;

        debug!("configured, idle pattern {=u8:#x}", u8::from(base));
        Ok(())
    }

    /// Applies a new configuration to the device.
    ///
    /// The chip drops back to the idle pattern of the new configuration, so a
    /// running continuous acquisition is stopped.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.apply_config(config.register_value())?;
        self.config = config;

        debug!("reconfigured, idle pattern {=u8:#x}", u8::from(self.base));
        Ok(())
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the active configuration.
    ///
    /// Register-backed fields take effect the next time the configuration is
    /// applied; the conversion constants are consulted on every reading.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    // ==================================================================
    // == Conversion Mode Control =======================================
    // ==================================================================
    /// Returns `true` while automatic conversion mode is active.
    pub fn is_continuous(&self) -> bool {
        self.base.conversion_mode()
    }

    /// Starts automatic conversions with the bias output held on.
    pub fn enable_continuous(&mut self) -> Result<(), CommE> {
        let target = self
            .config
            .register_value()
            .with_vbias(true)
            .with_conversion_mode(true);
        self.apply_config(target)?;

        debug!("continuous conversion enabled");
        Ok(())
    }

    /// Stops automatic conversions and shuts the bias output back down.
    pub fn disable_continuous(&mut self) -> Result<(), CommE> {
        let target = self.config.register_value();
        self.apply_config(target)?;

        debug!("continuous conversion disabled");
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    fn read_rtd_register(&mut self) -> Result<RtdReading, CommE> {
        let mut raw = [0u8; RAW_RTD_BYTES];
        self
            .interface
            .read_many(REG_RTD_MSB, &mut raw)
            .map_err(Error::from)?;

        let reading = RtdReading::from_register(u16::from_be_bytes(raw));
        trace!("rtd code {=u16}, fault flag {=bool}", reading.rtd, reading.fault);
        if reading.fault {
            warn!("fault flag latched in the rtd register");
        }

        Ok(reading)
    }

    /// Runs a single conversion and returns the raw reading.
    ///
    /// The bias output is powered up for the conversion and shut down again
    /// afterwards, which keeps RTD self-heating low at slow sampling rates.
    /// The call blocks on the provided delay for the 10 ms bias settle and
    /// the 65 ms conversion time. While automatic conversion mode is active
    /// this returns [`Error::ModeMismatch`] without touching the bus.
    pub fn read_one_shot(&mut self, delay: &mut impl DelayNs) -> Result<RtdReading, CommE> {
        if self.is_continuous() {
            return Err(Error::ModeMismatch);
        }

        let base = self.base;
        self.write_config(base.with_vbias(true))?;
        delay.delay_ms(BIAS_SETTLE_DELAY_MS);

        self.write_config(base.with_vbias(true).with_one_shot(true))?;
        delay.delay_ms(CONVERSION_DELAY_MS);

        // Restore the idle pattern even when the read itself failed.
        let reading = self.read_rtd_register();
        self.write_config(base)?;

        reading
    }

    /// Returns the latest reading produced by automatic conversion mode.
    ///
    /// Requires a prior [`Self::enable_continuous`]; otherwise the chip has
    /// no conversion running and this returns [`Error::ModeMismatch`].
    pub fn read_continuous(&mut self) -> Result<RtdReading, CommE> {
        if !self.is_continuous() {
            return Err(Error::ModeMismatch);
        }

        self.read_rtd_register()
    }

    // ==================================================================
    // == Temperature Conversion ========================================
    // ==================================================================
    /// Converts a raw reading with the Callendar-Van Dusen equation.
    pub fn temperature(&self, reading: RtdReading) -> Measurement {
        callendar_van_dusen(reading.rtd, self.config.ref_resistor, self.config.rtd_nominal)
    }

    /// Converts a raw reading with the direct PT100 polynomial fit.
    pub fn temperature_polynomial(&self, reading: RtdReading) -> Measurement {
        pt100_polynomial(reading.rtd, self.config.ref_resistor)
    }

    /// Runs a single conversion and converts it in one call.
    ///
    /// The fault flag is not inspected here; acquire with
    /// [`Self::read_one_shot`] and convert separately when fault handling
    /// matters.
    pub fn read_temperature(&mut self, delay: &mut impl DelayNs) -> Result<Measurement, CommE> {
        let reading = self.read_one_shot(delay)?;
        Ok(self.temperature(reading))
    }

    // ==================================================================
    // == Fault Handling ================================================
    // ==================================================================
    /// Reads the latched fault status byte.
    pub fn read_fault_status(&mut self) -> Result<u8, CommE> {
        self
            .interface
            .read_register(REG_FAULT_STATUS)
            .map_err(Error::from)
    }

    /// Clears all latched fault status bits.
    ///
    /// The clear bit self-clears, so the idle pattern is not disturbed and a
    /// running continuous acquisition keeps going.
    pub fn clear_fault(&mut self) -> Result<(), CommE> {
        self.write_config(self.base.with_fault_clear(true))
    }

    // ==================================================================
    // == Internal Register Helpers =====================================
    // ==================================================================
    // Read-back verification only holds for patterns without self-clearing
    // bits; accepted patterns become the new idle base.
    fn apply_config(&mut self, target: Configuration) -> Result<(), CommE> {
        let wrote = u8::from(target);
        self.write_config(target)?;

        let read = self
            .interface
            .read_register(REG_CONFIG)
            .map_err(Error::from)?;

        if read != wrote {
            warn!("config readback {=u8:#x} after writing {=u8:#x}", read, wrote);
            return Err(Error::ConfigMismatch { wrote, read });
        }

        self.base = target;
        Ok(())
    }

    fn write_config(&mut self, value: Configuration) -> Result<(), CommE> {
        self
            .interface
            .write_register(REG_CONFIG, u8::from(value))
            .map_err(Error::from)
    }
}
