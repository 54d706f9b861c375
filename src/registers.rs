//! Register map definitions for the MAX31865 RTD converter.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::FilterFrequency;

/// Register address of `CONFIG`.
pub const REG_CONFIG: u8 = 0x00;
/// Register address of `RTD_MSB`.
pub const REG_RTD_MSB: u8 = 0x01;
/// Register address of `RTD_LSB`.
pub const REG_RTD_LSB: u8 = 0x02;
/// Register address of `HIGH_FAULT_MSB`.
pub const REG_HIGH_FAULT_MSB: u8 = 0x03;
/// Register address of `HIGH_FAULT_LSB`.
pub const REG_HIGH_FAULT_LSB: u8 = 0x04;
/// Register address of `LOW_FAULT_MSB`.
pub const REG_LOW_FAULT_MSB: u8 = 0x05;
/// Register address of `LOW_FAULT_LSB`.
pub const REG_LOW_FAULT_LSB: u8 = 0x06;
/// Register address of `FAULT_STATUS`.
pub const REG_FAULT_STATUS: u8 = 0x07;

/// Bitfield representation of the `CONFIG` register (address `0x00`).
///
/// The same layout is used for reads-back, so a value written while no
/// self-clearing bit is set must compare equal to the following read.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    // Mains rejection filter selection (bit 0).
    pub filter: FilterFrequency,
    // Fault status clear, self-clearing (bit 1).
    pub fault_clear: bool,
    // Fault detection cycle control (bits 3:2).
    pub fault_detection: B2,
    // Three-wire sensing enable (bit 4).
    pub three_wire: bool,
    // One-shot conversion trigger, self-clearing (bit 5).
    pub one_shot: bool,
    // Automatic conversion mode enable (bit 6).
    pub conversion_mode: bool,
    // Bias voltage output enable (bit 7).
    pub vbias: bool,
}

impl From<u8> for Configuration {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Configuration> for u8 {
    fn from(value: Configuration) -> Self {
        value.into_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that Configuration bitfields match the datasheet layout.
    #[test]
    fn configuration_layout_matches_datasheet() {
        let config = Configuration::from(0b1010_0001);
        assert!(config.vbias());
        assert!(!config.conversion_mode());
        assert!(config.one_shot());
        assert!(!config.three_wire());
        assert_eq!(config.fault_detection(), 0);
        assert!(!config.fault_clear());
        assert_eq!(config.filter(), FilterFrequency::Hz50);
    }

    /// Ensures Configuration encodes and decodes as expected across all fields.
    #[test]
    fn configuration_roundtrip() {
        let config = Configuration::new()
            .with_vbias(true)
            .with_three_wire(true)
            .with_filter(FilterFrequency::Hz60);

        assert_eq!(u8::from(config), 0b1001_0000);
        let decoded = Configuration::from(u8::from(config));
        assert!(decoded.vbias());
        assert!(!decoded.conversion_mode());
        assert!(decoded.three_wire());
        assert_eq!(decoded.filter(), FilterFrequency::Hz60);
    }
}
