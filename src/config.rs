//! Configuration primitives for the MAX31865 driver.

use crate::params::{FilterFrequency, WireMode};
use crate::registers::Configuration;

/// User-facing configuration for the MAX31865 front-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// RTD wiring configuration.
    pub wires: WireMode,
    /// Mains rejection filter selection.
    pub filter: FilterFrequency,
    /// Reference resistor on the board, in ohms.
    pub ref_resistor: f32,
    /// Nominal RTD resistance at 0 °C, in ohms.
    pub rtd_nominal: f32,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Configuration for a PT100 element on the common 430 Ω reference board.
    pub const fn pt100(wires: WireMode, filter: FilterFrequency) -> Self {
        Self {
            wires,
            filter,
            ref_resistor: 430.0,
            rtd_nominal: 100.0,
        }
    }

    /// Configuration for a PT1000 element on the common 4.3 kΩ reference board.
    pub const fn pt1000(wires: WireMode, filter: FilterFrequency) -> Self {
        Self {
            wires,
            filter,
            ref_resistor: 4300.0,
            rtd_nominal: 1000.0,
        }
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if !(self.ref_resistor.is_finite() && self.ref_resistor > 0.0) {
            return Err(ConfigError::NonPositiveReference);
        }

        if !(self.rtd_nominal.is_finite() && self.rtd_nominal > 0.0) {
            return Err(ConfigError::NonPositiveNominal);
        }

        Ok(())
    }

    /// Derives the idle configuration register value.
    ///
    /// Only the three-wire and filter bits may be set in the idle pattern; the
    /// bias, conversion-mode, one-shot and fault bits are layered on top by
    /// the driver as each operation requires them.
    pub fn register_value(&self) -> Configuration {
        Configuration::new()
            .with_three_wire(self.wires.is_three_wire())
            .with_filter(self.filter)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the wiring configuration.
    pub fn wires(mut self, wires: WireMode) -> Self {
        self.config.wires = wires;
        self
    }

    /// Overrides the mains rejection filter selection.
    pub fn filter(mut self, filter: FilterFrequency) -> Self {
        self.config.filter = filter;
        self
    }

    /// Sets the reference resistor value in ohms.
    pub fn ref_resistor(mut self, ohms: f32) -> Self {
        self.config.ref_resistor = ohms;
        self
    }

    /// Sets the nominal RTD resistance at 0 °C in ohms.
    pub fn rtd_nominal(mut self, ohms: f32) -> Self {
        self.config.rtd_nominal = ohms;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::pt100(WireMode::Two, FilterFrequency::Hz50)
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Wire count other than 2, 3 or 4 was requested.
    UnsupportedWireCount,
    /// Mains filter other than 50 Hz or 60 Hz was requested.
    UnsupportedFilterFrequency,
    /// The reference resistor value must be positive and finite.
    NonPositiveReference,
    /// The nominal RTD resistance must be positive and finite.
    NonPositiveNominal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_wire_sets_the_wiring_bit() {
        let config = Config::pt100(WireMode::Three, FilterFrequency::Hz60);
        assert_eq!(u8::from(config.register_value()), 0b0001_0000);
    }

    #[test]
    fn two_and_four_wire_leave_the_wiring_bit_clear() {
        for wires in [WireMode::Two, WireMode::Four] {
            let config = Config::pt100(wires, FilterFrequency::Hz60);
            assert_eq!(u8::from(config.register_value()), 0b0000_0000);
        }
    }

    #[test]
    fn filter_selection_drives_bit_zero() {
        let fifty = Config::pt100(WireMode::Two, FilterFrequency::Hz50);
        assert_eq!(u8::from(fifty.register_value()), 0b0000_0001);

        let sixty = Config::pt100(WireMode::Two, FilterFrequency::Hz60);
        assert_eq!(u8::from(sixty.register_value()), 0b0000_0000);
    }

    #[test]
    fn numeric_parameters_reject_unsupported_values() {
        assert_eq!(WireMode::try_from(3), Ok(WireMode::Three));
        assert_eq!(
            WireMode::try_from(5),
            Err(ConfigError::UnsupportedWireCount)
        );

        assert_eq!(FilterFrequency::try_from(60), Ok(FilterFrequency::Hz60));
        assert_eq!(
            FilterFrequency::try_from(45),
            Err(ConfigError::UnsupportedFilterFrequency)
        );
    }

    #[test]
    fn validate_rejects_non_positive_resistances() {
        let config = Config::new().ref_resistor(0.0).build();
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveReference));

        let config = Config::new().rtd_nominal(-100.0).build();
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveNominal));

        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn builder_overrides_the_defaults() {
        let config = Config::new()
            .wires(WireMode::Four)
            .filter(FilterFrequency::Hz60)
            .ref_resistor(400.0)
            .rtd_nominal(1000.0)
            .build();

        assert_eq!(config.wires, WireMode::Four);
        assert_eq!(config.filter, FilterFrequency::Hz60);
        assert_eq!(config.ref_resistor, 400.0);
        assert_eq!(config.rtd_nominal, 1000.0);
    }
}
