//! Strongly typed parameter enumerations for the MAX31865 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use max31865::params::{FilterFrequency, WireMode};
//!
//! let wires = WireMode::Three;
//! let filter = FilterFrequency::Hz50;
//! let _ = (wires, filter);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::config::ConfigError;

/// RTD sensing element wiring configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMode {
    /// Two-wire sensing; lead resistance adds to the measurement.
    Two,
    /// Three-wire sensing with lead resistance cancellation.
    Three,
    /// Four-wire (Kelvin) sensing.
    Four,
}

impl WireMode {
    /// Returns the number of sensing leads.
    pub const fn wire_count(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Returns `true` when the mode requires the three-wire configuration bit.
    pub const fn is_three_wire(self) -> bool {
        matches!(self, Self::Three)
    }
}

impl TryFrom<u8> for WireMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(ConfigError::UnsupportedWireCount),
        }
    }
}

/// Mains rejection filter selections encoded in `CONFIG[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum FilterFrequency {
    /// 60 Hz mains rejection.
    Hz60 = 0,
    /// 50 Hz mains rejection.
    Hz50 = 1,
}

impl FilterFrequency {
    /// Returns the rejected mains frequency in hertz.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz60 => 60,
            Self::Hz50 => 50,
        }
    }
}

impl TryFrom<u8> for FilterFrequency {
    type Error = ConfigError;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            50 => Ok(Self::Hz50),
            60 => Ok(Self::Hz60),
            _ => Err(ConfigError::UnsupportedFilterFrequency),
        }
    }
}
