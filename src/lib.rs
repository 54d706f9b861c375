#![no_std]

use embedded_hal::spi::{Mode, MODE_1};

mod error;

pub mod config;
pub mod conversion;
pub mod device;
pub mod interface;
mod log;
pub mod params;
pub mod registers;

pub use crate::device::Max31865;
pub use crate::error::{Error, Result};

/// SPI mode the chip expects; mode 3 is also accepted.
pub const MODE: Mode = MODE_1;

/// Maximum supported SPI clock in hertz.
pub const MAX_SPI_CLOCK_HZ: u32 = 5_000_000;
